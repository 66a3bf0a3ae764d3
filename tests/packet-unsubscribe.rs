// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
mod common;
use common::mqtt;

use mqtt::packet::{Packet, Property, Unsubscribe};
use mqtt::{CodecError, Role, Version};

#[test]
fn v3_1_1_wire_image() {
    common::init_tracing();
    let unsubscribe = Unsubscribe::builder()
        .packet_id(8)
        .topic_filter("a/b")
        .unwrap()
        .topic_filter("c")
        .unwrap()
        .build()
        .unwrap();
    let packet = Packet::from(unsubscribe);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    assert_eq!(
        bytes,
        [0xA2, 0x0A, 0x00, 0x08, 0x00, 0x03, b'a', b'/', b'b', 0x00, 0x01, b'c']
    );
    assert_eq!(common::decode_one(&bytes, Version::V3_1_1, Role::Server), packet);
}

#[test]
fn v5_0_round_trip_with_user_property() {
    common::init_tracing();
    let unsubscribe = Unsubscribe::builder()
        .packet_id(11)
        .topic_filter("gone/+")
        .unwrap()
        .props(vec![Property::UserProperty(
            "why".try_into().unwrap(),
            "cleanup".try_into().unwrap(),
        )])
        .build()
        .unwrap();
    let packet = Packet::from(unsubscribe);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Server), packet);
}

#[test]
fn builder_validation() {
    common::init_tracing();
    assert_eq!(
        Unsubscribe::builder().packet_id(1).build().unwrap_err(),
        CodecError::MalformedPacket
    );
    assert_eq!(
        Unsubscribe::builder()
            .topic_filter("t")
            .unwrap()
            .build()
            .unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_wrong_fixed_header_flags() {
    common::init_tracing();
    let bytes = [0xA0, 0x05, 0x00, 0x01, 0x00, 0x01, b't'];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::InvalidFixedHeader
    );
}

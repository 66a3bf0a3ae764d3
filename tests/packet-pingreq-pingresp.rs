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

use mqtt::packet::{Packet, Pingreq, Pingresp};
use mqtt::{CodecError, Role, Version};

#[test]
fn pingreq_wire_image() {
    common::init_tracing();
    let packet = Packet::from(Pingreq::new());
    for version in [Version::V3_1_1, Version::V5_0] {
        let bytes = common::encode_packet(&packet, version);
        assert_eq!(bytes, [0xC0, 0x00]);
        assert_eq!(common::decode_one(&bytes, version, Role::Server), packet);
    }
}

#[test]
fn pingresp_wire_image() {
    common::init_tracing();
    let packet = Packet::from(Pingresp::new());
    for version in [Version::V3_1_1, Version::V5_0] {
        let bytes = common::encode_packet(&packet, version);
        assert_eq!(bytes, [0xD0, 0x00]);
        assert_eq!(common::decode_one(&bytes, version, Role::Client), packet);
    }
}

#[test]
fn direction_is_enforced() {
    common::init_tracing();
    // a client does not receive PINGREQ
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Client);
    assert_eq!(
        decoder.feed(&[0xC0, 0x00]).unwrap_err(),
        CodecError::UnsupportedPacketType
    );
}

#[test]
fn decode_rejects_payload_bytes() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Server);
    assert_eq!(
        decoder.feed(&[0xC0, 0x01, 0x00]).unwrap_err(),
        CodecError::PayloadLengthMismatch
    );
}

#[test]
fn decode_rejects_flag_bits() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Server);
    assert_eq!(
        decoder.feed(&[0xC4, 0x00]).unwrap_err(),
        CodecError::InvalidFixedHeader
    );
}

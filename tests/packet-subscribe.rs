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

use mqtt::packet::{
    Packet, Property, Qos, RetainHandling, SubEntry, SubOpts, Subscribe, VariableByteInteger,
};
use mqtt::{CodecError, Role, Version};

#[test]
fn v5_0_with_subscription_identifier_wire_image() {
    common::init_tracing();
    let subscribe = Subscribe::builder()
        .packet_id(42)
        .props(vec![Property::SubscriptionIdentifier(
            VariableByteInteger::from_u32(47).unwrap(),
        )])
        .entries(vec![SubEntry::new("up", SubOpts::new().set_qos(Qos::AtLeastOnce)).unwrap()])
        .build()
        .unwrap();
    let packet = Packet::from(subscribe);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(
        bytes,
        [0x82, 0x0A, 0x00, 0x2A, 0x02, 0x0B, 0x2F, 0x00, 0x02, b'u', b'p', 0x01]
    );
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Server), packet);
}

#[test]
fn v3_1_1_round_trip() {
    common::init_tracing();
    let subscribe = Subscribe::builder()
        .packet_id(9)
        .entries(vec![
            SubEntry::new("a/#", SubOpts::new().set_qos(Qos::ExactlyOnce)).unwrap(),
            SubEntry::new("b", SubOpts::new()).unwrap(),
        ])
        .build()
        .unwrap();
    let packet = Packet::from(subscribe);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    assert_eq!(
        bytes,
        [0x82, 0x0C, 0x00, 0x09, 0x00, 0x03, b'a', b'/', b'#', 0x02, 0x00, 0x01, b'b', 0x00]
    );
    assert_eq!(common::decode_one(&bytes, Version::V3_1_1, Role::Server), packet);
}

#[test]
fn v5_0_option_bits_round_trip() {
    common::init_tracing();
    let opts = SubOpts::new()
        .set_qos(Qos::AtLeastOnce)
        .set_nl(true)
        .set_rap(true)
        .set_rh(RetainHandling::DoNotSendRetained);
    assert_eq!(opts.as_u8(), 0b0010_1101);

    let subscribe = Subscribe::builder()
        .packet_id(3)
        .entries(vec![SubEntry::new("opts/topic", opts).unwrap()])
        .build()
        .unwrap();
    let packet = Packet::from(subscribe);
    let bytes = common::encode_packet(&packet, Version::V5_0);
    match common::decode_one(&bytes, Version::V5_0, Role::Server) {
        Packet::Subscribe(s) => {
            let entry = &s.entries()[0];
            assert_eq!(entry.sub_opts(), opts);
            assert_eq!(entry.sub_opts().rh(), RetainHandling::DoNotSendRetained);
            assert!(entry.sub_opts().nl());
            assert!(entry.sub_opts().rap());
        }
        other => panic!("unexpected packet {other:?}"),
    }
}

#[test]
fn v5_option_bits_have_no_v3_1_1_encoding() {
    common::init_tracing();
    let subscribe = Subscribe::builder()
        .packet_id(3)
        .entries(vec![SubEntry::new("t", SubOpts::new().set_nl(true)).unwrap()])
        .build()
        .unwrap();
    assert_eq!(
        mqtt::codec::encode(&Packet::from(subscribe), Version::V3_1_1).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );
}

#[test]
fn builder_validation() {
    common::init_tracing();
    assert_eq!(
        Subscribe::builder()
            .entries(vec![SubEntry::new("t", SubOpts::new()).unwrap()])
            .build()
            .unwrap_err(),
        CodecError::MalformedPacket
    );
    assert_eq!(
        Subscribe::builder().packet_id(1).build().unwrap_err(),
        CodecError::MalformedPacket
    );
    assert_eq!(
        Subscribe::builder()
            .packet_id(1)
            .props(vec![Property::SubscriptionIdentifier(
                VariableByteInteger::from_u32(0).unwrap(),
            )])
            .entries(vec![SubEntry::new("t", SubOpts::new()).unwrap()])
            .build()
            .unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_reserved_option_bits() {
    common::init_tracing();
    // v5 options byte with bit 6 set
    let bytes = [0x82, 0x07, 0x00, 0x01, 0x00, 0x00, 0x01, b't', 0x40];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::MalformedPacket
    );

    // v3.1.1 payload QoS byte with upper bits set
    let bytes = [0x82, 0x06, 0x00, 0x01, 0x00, 0x01, b't', 0x04];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_wrong_fixed_header_flags() {
    common::init_tracing();
    // SUBSCRIBE without the required 0x02 reserved bits
    let bytes = [0x80, 0x05, 0x00, 0x01, 0x00, 0x01, b't'];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::InvalidFixedHeader
    );
}

#[test]
fn decode_rejects_empty_entry_list() {
    common::init_tracing();
    // v5 subscribe with empty property section and no entries
    let bytes = [0x82, 0x03, 0x00, 0x01, 0x00];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::MalformedPacket
    );
}

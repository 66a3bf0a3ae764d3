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

use mqtt::packet::{Packet, Property, Puback};
use mqtt::result_code::PubackReasonCode;
use mqtt::{CodecError, Role, Version};

#[test]
fn v5_0_success_short_form() {
    common::init_tracing();
    let puback = Puback::builder().packet_id(5).build().unwrap();
    let packet = Packet::from(puback);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    // reason code and properties elided at remaining length 2
    assert_eq!(bytes, [0x40, 0x02, 0x00, 0x05]);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Client), packet);
}

#[test]
fn v5_0_explicit_success_decodes_to_same_value() {
    common::init_tracing();
    let short = common::decode_one(&[0x40, 0x02, 0x00, 0x05], Version::V5_0, Role::Client);
    let explicit = common::decode_one(&[0x40, 0x03, 0x00, 0x05, 0x00], Version::V5_0, Role::Client);
    assert_eq!(short, explicit);
}

#[test]
fn v5_0_reason_code_form() {
    common::init_tracing();
    let puback = Puback::builder()
        .packet_id(5)
        .reason_code(PubackReasonCode::QuotaExceeded)
        .build()
        .unwrap();
    let packet = Packet::from(puback);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(bytes, [0x40, 0x03, 0x00, 0x05, 0x97]);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Server), packet);
}

#[test]
fn v5_0_full_form_round_trip() {
    common::init_tracing();
    let puback = Puback::builder()
        .packet_id(77)
        .reason_code(PubackReasonCode::NotAuthorized)
        .props(vec![
            Property::ReasonString("no such right".try_into().unwrap()),
            Property::UserProperty("audit".try_into().unwrap(), "42".try_into().unwrap()),
        ])
        .build()
        .unwrap();
    let packet = Packet::from(puback);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Client), packet);
}

#[test]
fn v3_1_1_fixed_layout() {
    common::init_tracing();
    let puback = Puback::builder().packet_id(0x1234).build().unwrap();
    let packet = Packet::from(puback);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    assert_eq!(bytes, [0x40, 0x02, 0x12, 0x34]);
    assert_eq!(common::decode_one(&bytes, Version::V3_1_1, Role::Server), packet);
}

#[test]
fn v3_1_1_cannot_carry_reason_code() {
    common::init_tracing();
    let puback = Puback::builder()
        .packet_id(1)
        .reason_code(PubackReasonCode::QuotaExceeded)
        .build()
        .unwrap();
    assert_eq!(
        mqtt::codec::encode(&Packet::from(puback), Version::V3_1_1).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );
}

#[test]
fn builder_rejects_zero_packet_id() {
    common::init_tracing();
    assert_eq!(
        Puback::builder().packet_id(0).build().unwrap_err(),
        CodecError::MalformedPacket
    );
    assert_eq!(
        Puback::builder().build().unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_zero_packet_id() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Client);
    assert_eq!(
        decoder.feed(&[0x40, 0x02, 0x00, 0x00]).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_unknown_reason_code() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V5_0, Role::Client);
    assert_eq!(
        decoder.feed(&[0x40, 0x03, 0x00, 0x05, 0x42]).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn v3_1_1_decode_rejects_trailing_bytes() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Client);
    assert_eq!(
        decoder.feed(&[0x40, 0x03, 0x00, 0x05, 0x00]).unwrap_err(),
        CodecError::PayloadLengthMismatch
    );
}

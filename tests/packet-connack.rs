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

use mqtt::packet::{Connack, Packet, Property};
use mqtt::result_code::{ConnectReasonCode, ConnectReturnCode};
use mqtt::{CodecError, Role, Version};

#[test]
fn v3_1_1_wire_image() {
    common::init_tracing();
    let connack = Connack::builder()
        .session_present(true)
        .return_code(ConnectReturnCode::Accepted)
        .build()
        .unwrap();
    let packet = Packet::from(connack);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    assert_eq!(bytes, [0x20, 0x02, 0x01, 0x00]);
    assert_eq!(common::decode_one(&bytes, Version::V3_1_1, Role::Client), packet);
}

#[test]
fn v3_1_1_rejection_codes() {
    common::init_tracing();
    let connack = Connack::builder()
        .return_code(ConnectReturnCode::NotAuthorized)
        .build()
        .unwrap();
    let packet = Packet::from(connack);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    assert_eq!(bytes, [0x20, 0x02, 0x00, 0x05]);
    assert_eq!(common::decode_one(&bytes, Version::V3_1_1, Role::Client), packet);
}

#[test]
fn v5_0_round_trip_with_props() {
    common::init_tracing();
    let connack = Connack::builder()
        .session_present(false)
        .reason_code(ConnectReasonCode::Success)
        .props(vec![
            Property::AssignedClientIdentifier("assigned-17".try_into().unwrap()),
            Property::ServerKeepAlive(45),
            Property::ReceiveMaximum(10),
        ])
        .build()
        .unwrap();
    let packet = Packet::from(connack);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Client), packet);
}

#[test]
fn v5_0_empty_properties_on_wire() {
    common::init_tracing();
    let connack = Connack::builder()
        .reason_code(ConnectReasonCode::NotAuthorized)
        .build()
        .unwrap();
    let bytes = common::encode_packet(&Packet::from(connack), Version::V5_0);
    // ack flags, reason code, empty property section
    assert_eq!(bytes, [0x20, 0x03, 0x00, 0x87, 0x00]);
}

#[test]
fn builder_requires_exactly_one_code() {
    common::init_tracing();
    assert_eq!(
        Connack::builder().build().unwrap_err(),
        CodecError::MalformedPacket
    );
    assert_eq!(
        Connack::builder()
            .return_code(ConnectReturnCode::Accepted)
            .reason_code(ConnectReasonCode::Success)
            .build()
            .unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn encode_requires_matching_version_code() {
    common::init_tracing();
    let v3_only = Packet::from(
        Connack::builder()
            .return_code(ConnectReturnCode::Accepted)
            .build()
            .unwrap(),
    );
    assert_eq!(
        mqtt::codec::encode(&v3_only, Version::V5_0).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );

    let v5_only = Packet::from(
        Connack::builder()
            .reason_code(ConnectReasonCode::Success)
            .build()
            .unwrap(),
    );
    assert_eq!(
        mqtt::codec::encode(&v5_only, Version::V3_1_1).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );
}

#[test]
fn decode_rejects_reserved_ack_flags() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Client);
    assert_eq!(
        decoder.feed(&[0x20, 0x02, 0x02, 0x00]).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_unknown_return_code() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Client);
    assert_eq!(
        decoder.feed(&[0x20, 0x02, 0x00, 0x06]).unwrap_err(),
        CodecError::MalformedPacket
    );
}

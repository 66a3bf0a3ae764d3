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

use mqtt::packet::{Connect, Packet, Property, Qos, Will};
use mqtt::{CodecError, Role, Version};

#[test]
fn minimal_v3_1_1_wire_image() {
    common::init_tracing();
    let connect = Connect::builder()
        .client_id("")
        .unwrap()
        .clean_start(true)
        .keep_alive(1200u16)
        .build()
        .unwrap();
    let bytes = common::encode_packet(&Packet::from(connect.clone()), Version::V3_1_1);
    assert_eq!(
        bytes,
        [0x10, 0x0C, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x04, 0x02, 0x04, 0xB0, 0x00, 0x00]
    );

    let decoded = common::decode_one(&bytes, Version::V3_1_1, Role::Server);
    assert_eq!(decoded, Packet::from(connect));
}

#[test]
fn builder_defaults() {
    common::init_tracing();
    let packet = Connect::builder().build().unwrap();
    assert_eq!(packet.client_id(), "");
    assert!(packet.clean_start());
    assert_eq!(packet.keep_alive(), 0);
    assert!(packet.will().is_none());
    assert!(packet.user_name().is_none());
    assert!(packet.password().is_none());
}

#[test]
fn credentials_round_trip_both_versions() {
    common::init_tracing();
    let connect = Connect::builder()
        .client_id("client-1")
        .unwrap()
        .user_name("user")
        .unwrap()
        .password(b"secret")
        .unwrap()
        .build()
        .unwrap();
    let packet = Packet::from(connect);

    for version in [Version::V3_1_1, Version::V5_0] {
        let bytes = common::encode_packet(&packet, version);
        assert_eq!(common::decode_one(&bytes, version, Role::Server), packet);
    }
}

#[test]
fn password_without_user_name_is_v5_only() {
    common::init_tracing();
    let connect = Connect::builder()
        .client_id("c")
        .unwrap()
        .password(b"secret")
        .unwrap()
        .build()
        .unwrap();
    let packet = Packet::from(connect);

    assert_eq!(
        mqtt::codec::encode(&packet, Version::V3_1_1).unwrap_err(),
        CodecError::MalformedPacket
    );
    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Server), packet);
}

#[test]
fn will_retain_survives_v3_1_1_round_trip() {
    common::init_tracing();
    let will = Will::new("alarm/last", b"gone", Qos::AtLeastOnce, true).unwrap();
    let connect = Connect::builder()
        .client_id("c")
        .unwrap()
        .will(will)
        .build()
        .unwrap();
    let packet = Packet::from(connect);

    let bytes = common::encode_packet(&packet, Version::V3_1_1);
    let decoded = common::decode_one(&bytes, Version::V3_1_1, Role::Server);
    match &decoded {
        Packet::Connect(c) => {
            let will = c.will().expect("will present");
            assert!(will.retain());
            assert_eq!(will.qos(), Qos::AtLeastOnce);
            assert_eq!(will.topic(), "alarm/last");
            assert_eq!(will.payload(), b"gone");
        }
        other => panic!("unexpected packet {other:?}"),
    }
    assert_eq!(decoded, packet);
}

#[test]
fn v5_properties_round_trip() {
    common::init_tracing();
    let will = Will::new("will/topic", b"", Qos::AtMostOnce, false)
        .unwrap()
        .with_props(vec![
            Property::WillDelayInterval(30),
            Property::ContentType("application/json".try_into().unwrap()),
        ])
        .unwrap();
    let connect = Connect::builder()
        .client_id("v5-client")
        .unwrap()
        .keep_alive(60u16)
        .props(vec![
            Property::SessionExpiryInterval(3600),
            Property::ReceiveMaximum(20),
            Property::UserProperty("k".try_into().unwrap(), "v".try_into().unwrap()),
        ])
        .will(will)
        .build()
        .unwrap();
    let packet = Packet::from(connect);

    let bytes = common::encode_packet(&packet, Version::V5_0);
    assert_eq!(common::decode_one(&bytes, Version::V5_0, Role::Server), packet);

    // the same value has no v3.1.1 representation
    assert_eq!(
        mqtt::codec::encode(&packet, Version::V3_1_1).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );
}

#[test]
fn builder_rejects_foreign_properties() {
    common::init_tracing();
    let err = Connect::builder()
        .client_id("c")
        .unwrap()
        .props(vec![Property::TopicAlias(4)])
        .build()
        .unwrap_err();
    assert_eq!(err, CodecError::UnknownPropertyCode);

    let err = Will::new("t", b"", Qos::AtMostOnce, false)
        .unwrap()
        .with_props(vec![Property::SessionExpiryInterval(1)])
        .unwrap_err();
    assert_eq!(err, CodecError::UnknownPropertyCode);
}

#[test]
fn decode_rejects_wrong_protocol_name() {
    common::init_tracing();
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    let bytes = [
        0x10, 0x0C, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x51, // "MQTQ"
        0x04, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn decode_rejects_version_mismatch() {
    common::init_tracing();
    let connect = Connect::builder().client_id("c").unwrap().build().unwrap();
    let bytes = common::encode_packet(&Packet::from(connect), Version::V5_0);

    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::ProtocolVersionMismatch
    );
}

#[test]
fn decode_rejects_reserved_flag_bit() {
    common::init_tracing();
    // flags byte 0x03: reserved bit 0 set
    let bytes = [
        0x10, 0x0C, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x04, 0x03, 0x00, 0x00, 0x00, 0x00,
    ];
    let mut decoder = mqtt::codec::PacketDecoder::new(Version::V3_1_1, Role::Server);
    assert_eq!(
        decoder.feed(&bytes).unwrap_err(),
        CodecError::MalformedPacket
    );
}

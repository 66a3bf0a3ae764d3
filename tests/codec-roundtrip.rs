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
    Connack, Connect, Packet, PacketMeta, Property, Qos, Suback, Unsuback, VariableByteInteger,
    Will,
};
use mqtt::result_code::{
    ConnectReasonCode, ConnectReturnCode, SubackReasonCode, UnsubackReasonCode,
};
use mqtt::{Role, Version};

/// The role that receives a given packet, for driving decoders in tests.
fn receiving_role(packet: &Packet) -> Role {
    if Role::Client.receives(packet.packet_type()) {
        Role::Client
    } else {
        Role::Server
    }
}

fn assert_round_trip(packet: &Packet, version: Version) {
    let bytes = common::encode_packet(packet, version);
    let decoded = common::decode_one(&bytes, version, receiving_role(packet));
    assert_eq!(&decoded, packet, "round trip diverged in {version}");

    // remaining-length consistency: the VLI after the first byte counts
    // exactly the bytes that follow it
    let (remaining, consumed) = VariableByteInteger::decode(&bytes[1..]).unwrap();
    assert_eq!(remaining.to_u32() as usize, bytes.len() - 1 - consumed);
}

fn both_version_packets() -> Vec<Packet> {
    let mut packets = common::client_sample_packets();
    packets.push(Packet::from(
        Connect::builder()
            .client_id("roundtrip")
            .unwrap()
            .keep_alive(300u16)
            .clean_start(false)
            .will(Will::new("w/t", b"bye", Qos::ExactlyOnce, true).unwrap())
            .user_name("u")
            .unwrap()
            .password(b"p")
            .unwrap()
            .build()
            .unwrap(),
    ));
    packets.push(Packet::from(
        Suback::builder()
            .packet_id(21)
            .reason_codes(vec![
                SubackReasonCode::GrantedQos0,
                SubackReasonCode::UnspecifiedError,
            ])
            .build()
            .unwrap(),
    ));
    packets.push(Packet::from(mqtt::packet::Pingresp::new()));
    packets
}

#[test]
fn round_trip_shared_model_v3_1_1() {
    common::init_tracing();
    let mut packets = both_version_packets();
    packets.push(Packet::from(
        Connack::builder()
            .session_present(true)
            .return_code(ConnectReturnCode::Accepted)
            .build()
            .unwrap(),
    ));
    packets.push(Packet::from(
        Unsuback::builder().packet_id(17).build().unwrap(),
    ));

    for packet in &packets {
        assert_round_trip(packet, Version::V3_1_1);
    }
}

#[test]
fn round_trip_shared_model_v5_0() {
    common::init_tracing();
    let mut packets = both_version_packets();
    packets.push(common::publish_with_props());
    packets.push(Packet::from(
        Connack::builder()
            .reason_code(ConnectReasonCode::Success)
            .props(vec![
                Property::SessionExpiryInterval(600),
                Property::MaximumQos(1),
                Property::WildcardSubscriptionAvailable(1),
            ])
            .build()
            .unwrap(),
    ));
    packets.push(Packet::from(
        Unsuback::builder()
            .packet_id(17)
            .reason_codes(vec![UnsubackReasonCode::Success])
            .build()
            .unwrap(),
    ));
    packets.push(Packet::from(
        Connect::builder()
            .client_id("v5")
            .unwrap()
            .props(vec![
                Property::ReceiveMaximum(5),
                Property::MaximumPacketSize(65_535),
                Property::AuthenticationMethod("SCRAM-SHA-1".try_into().unwrap()),
                Property::AuthenticationData("nonce".as_bytes().try_into().unwrap()),
            ])
            .build()
            .unwrap(),
    ));

    for packet in &packets {
        assert_round_trip(packet, Version::V5_0);
    }
}

#[test]
fn property_section_length_matches_entries() {
    common::init_tracing();
    let packet = common::publish_with_props();
    let bytes = common::encode_packet(&packet, Version::V5_0);

    // walk to the property section: first byte, remaining length, topic,
    // packet id
    let (_, rl_len) = VariableByteInteger::decode(&bytes[1..]).unwrap();
    let mut offset = 1 + rl_len;
    let topic_len = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]) as usize;
    offset += 2 + topic_len + 2;

    let (props_len, len_len) = VariableByteInteger::decode(&bytes[offset..]).unwrap();
    let props_len = props_len.to_u32() as usize;
    offset += len_len;

    // the declared section ends exactly where the payload begins
    let payload_start = bytes.len() - b"hello".len();
    assert_eq!(offset + props_len, payload_start);
}

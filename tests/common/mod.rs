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

pub use mqtt_codec_core::mqtt;

use mqtt::codec::{encode, EncodeProgress, PacketDecoder, PacketEncoder};
use mqtt::packet::{Packet, Property, Publish, Qos, SubEntry, SubOpts, Subscribe};
use mqtt::result_code::{DisconnectReasonCode, PubackReasonCode};
use mqtt::{Role, Version};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Single-shot encode, panicking on caller bugs.
#[allow(dead_code)]
pub fn encode_packet(packet: &Packet, version: Version) -> Vec<u8> {
    encode(packet, version).expect("packet must encode")
}

/// Decodes exactly one packet out of `bytes` for the given mode and role.
#[allow(dead_code)]
pub fn decode_one(bytes: &[u8], version: Version, role: Role) -> Packet {
    let mut decoder = PacketDecoder::new(version, role);
    let mut packets = decoder.feed(bytes).expect("bytes must decode");
    assert_eq!(packets.len(), 1, "expected exactly one packet");
    packets.pop().expect("one packet")
}

/// Drives a streaming encoder with fixed-size windows, concatenating
/// everything it writes.
#[allow(dead_code)]
pub fn encode_windowed(
    packet: &Packet,
    version: Version,
    role: Role,
    window_size: usize,
) -> Vec<u8> {
    let mut encoder = PacketEncoder::new(packet, version, role).expect("packet must encode");
    let mut window = vec![0u8; window_size];
    let mut out = Vec::new();
    loop {
        match encoder.service(&mut window) {
            EncodeProgress::Complete { written } => {
                out.extend_from_slice(&window[..written]);
                return out;
            }
            EncodeProgress::InProgress { written } => {
                out.extend_from_slice(&window[..written]);
            }
        }
    }
}

/// Feeds `bytes` to a fresh decoder in fragments of at most `chunk` bytes.
#[allow(dead_code)]
pub fn decode_fragmented(
    bytes: &[u8],
    version: Version,
    role: Role,
    chunk: usize,
) -> Vec<Packet> {
    let mut decoder = PacketDecoder::new(version, role);
    let mut packets = Vec::new();
    for fragment in bytes.chunks(chunk) {
        packets.extend(decoder.feed(fragment).expect("fragment must decode"));
    }
    packets
}

/// A spread of client-sent packets that are valid in both protocol
/// versions.
#[allow(dead_code)]
pub fn client_sample_packets() -> Vec<Packet> {
    let publish_qos0 = Publish::builder()
        .topic_name("plain/topic")
        .unwrap()
        .payload(b"payload bytes")
        .build()
        .unwrap();
    let publish_qos1 = Publish::builder()
        .topic_name("acked/topic")
        .unwrap()
        .qos(Qos::AtLeastOnce)
        .packet_id(7)
        .retain(true)
        .payload(&[0u8, 1, 2, 3, 255][..])
        .build()
        .unwrap();
    let subscribe = Subscribe::builder()
        .packet_id(12)
        .entries(vec![
            SubEntry::new("alpha/#", SubOpts::new().set_qos(Qos::AtLeastOnce)).unwrap(),
            SubEntry::new("beta/+/gamma", SubOpts::new()).unwrap(),
        ])
        .build()
        .unwrap();
    let puback = mqtt::packet::Puback::builder()
        .packet_id(7)
        .reason_code(PubackReasonCode::Success)
        .build()
        .unwrap();
    let disconnect = mqtt::packet::Disconnect::builder()
        .reason_code(DisconnectReasonCode::NormalDisconnection)
        .build()
        .unwrap();

    vec![
        Packet::from(publish_qos0),
        Packet::from(publish_qos1),
        Packet::from(subscribe),
        Packet::from(puback),
        Packet::from(mqtt::packet::Pingreq::new()),
        Packet::from(disconnect),
    ]
}

/// A v5.0-only PUBLISH making use of the property section.
#[allow(dead_code)]
pub fn publish_with_props() -> Packet {
    use mqtt::packet::{PayloadFormat, VariableByteInteger};

    let props = vec![
        Property::PayloadFormatIndicator(PayloadFormat::String),
        Property::MessageExpiryInterval(120),
        Property::SubscriptionIdentifier(VariableByteInteger::from_u32(3).unwrap()),
        Property::SubscriptionIdentifier(VariableByteInteger::from_u32(70_000).unwrap()),
        Property::UserProperty(
            "origin".try_into().unwrap(),
            "sensor-bank-4".try_into().unwrap(),
        ),
        Property::UserProperty(
            "origin".try_into().unwrap(),
            "sensor-bank-5".try_into().unwrap(),
        ),
    ];
    Packet::from(
        Publish::builder()
            .topic_name("props/topic")
            .unwrap()
            .qos(Qos::AtLeastOnce)
            .packet_id(99)
            .props(props)
            .payload(b"hello")
            .build()
            .unwrap(),
    )
}

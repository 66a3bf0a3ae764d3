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

use core::fmt;

use enum_dispatch::enum_dispatch;
use serde::{Serialize, Serializer};

use crate::mqtt::packet::packet_type::PacketType;
use crate::mqtt::packet::{
    Connack, Connect, Disconnect, Pingreq, Pingresp, Puback, Publish, Suback, Subscribe,
    Unsuback, Unsubscribe,
};

/// Accessors shared by every packet type.
#[enum_dispatch]
pub trait PacketMeta {
    /// The packet type carried in the fixed header's type nibble.
    fn packet_type(&self) -> PacketType;
}

/// Any MQTT packet, as one exhaustive sum type.
///
/// One variant per packet type; the same value model serves both protocol
/// versions, with the version picked at encode/decode time. `From`
/// conversions from each concrete packet type are generated, so
/// `Packet::from(connect)` and `connect.into()` both work.
#[enum_dispatch(PacketMeta)]
#[derive(Clone, PartialEq, Eq)]
pub enum Packet {
    Connect,
    Connack,
    Publish,
    Puback,
    Subscribe,
    Suback,
    Unsubscribe,
    Unsuback,
    Pingreq,
    Pingresp,
    Disconnect,
}

impl Serialize for Packet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Packet::Connect(p) => p.serialize(serializer),
            Packet::Connack(p) => p.serialize(serializer),
            Packet::Publish(p) => p.serialize(serializer),
            Packet::Puback(p) => p.serialize(serializer),
            Packet::Subscribe(p) => p.serialize(serializer),
            Packet::Suback(p) => p.serialize(serializer),
            Packet::Unsubscribe(p) => p.serialize(serializer),
            Packet::Unsuback(p) => p.serialize(serializer),
            Packet::Pingreq(p) => p.serialize(serializer),
            Packet::Pingresp(p) => p.serialize(serializer),
            Packet::Disconnect(p) => p.serialize(serializer),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

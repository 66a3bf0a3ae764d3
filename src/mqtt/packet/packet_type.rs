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

use num_enum::TryFromPrimitive;
use serde::{Serialize, Serializer};

/// MQTT Control Packet Type enumeration
///
/// The packet types this codec handles, as defined by bits 7-4 of the Fixed
/// Header's first byte. The QoS 2 handshake types (PUBREC, PUBREL, PUBCOMP)
/// and AUTH are not part of the codec's surface; their nibbles decode as
/// unsupported packet types.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::packet::PacketType;
///
/// let packet_type = PacketType::Connect;
/// assert_eq!(packet_type.as_u8(), 1);
/// assert_eq!(packet_type.as_str(), "connect");
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PacketType {
    /// Client connection request packet
    Connect = 1,
    /// Server connection acknowledgment packet
    Connack = 2,
    /// Publish message packet
    Publish = 3,
    /// Publish acknowledgment packet (QoS 1)
    Puback = 4,
    /// Client subscription request packet
    Subscribe = 8,
    /// Server subscription acknowledgment packet
    Suback = 9,
    /// Client unsubscription request packet
    Unsubscribe = 10,
    /// Server unsubscription acknowledgment packet
    Unsuback = 11,
    /// Ping request packet (keep-alive)
    Pingreq = 12,
    /// Ping response packet (keep-alive)
    Pingresp = 13,
    /// Disconnect notification packet
    Disconnect = 14,
}

/// MQTT Fixed Header first byte enumeration
///
/// The complete first byte of the Fixed Header: packet type in bits 7-4 and
/// packet-specific flags or reserved bits in bits 3-0. SUBSCRIBE and
/// UNSUBSCRIBE carry the reserved `0x02` bits; PUBLISH's low nibble holds
/// DUP, QoS, and RETAIN and is OR'd in by its encoder.
#[derive(Debug, PartialEq, Eq, Copy, Clone, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FixedHeader {
    /// CONNECT packet header (0x10)
    Connect = 0x10,
    /// CONNACK packet header (0x20)
    Connack = 0x20,
    /// PUBLISH packet header (0x30) - flags for DUP, QoS, RETAIN in lower bits
    Publish = 0x30,
    /// PUBACK packet header (0x40)
    Puback = 0x40,
    /// SUBSCRIBE packet header (0x82) - reserved bits set as required
    Subscribe = 0x82,
    /// SUBACK packet header (0x90)
    Suback = 0x90,
    /// UNSUBSCRIBE packet header (0xa2) - reserved bits set as required
    Unsubscribe = 0xa2,
    /// UNSUBACK packet header (0xb0)
    Unsuback = 0xb0,
    /// PINGREQ packet header (0xc0)
    Pingreq = 0xc0,
    /// PINGRESP packet header (0xd0)
    Pingresp = 0xd0,
    /// DISCONNECT packet header (0xe0)
    Disconnect = 0xe0,
}

impl PacketType {
    /// The packet type as the numeric value used in the type nibble.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase name, used for logging and JSON serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketType::Connect => "connect",
            PacketType::Connack => "connack",
            PacketType::Publish => "publish",
            PacketType::Puback => "puback",
            PacketType::Subscribe => "subscribe",
            PacketType::Suback => "suback",
            PacketType::Unsubscribe => "unsubscribe",
            PacketType::Unsuback => "unsuback",
            PacketType::Pingreq => "pingreq",
            PacketType::Pingresp => "pingresp",
            PacketType::Disconnect => "disconnect",
        }
    }

    /// The corresponding `FixedHeader` with default flags/reserved bits.
    pub fn to_fixed_header(self) -> FixedHeader {
        match self {
            PacketType::Connect => FixedHeader::Connect,
            PacketType::Connack => FixedHeader::Connack,
            PacketType::Publish => FixedHeader::Publish,
            PacketType::Puback => FixedHeader::Puback,
            PacketType::Subscribe => FixedHeader::Subscribe,
            PacketType::Suback => FixedHeader::Suback,
            PacketType::Unsubscribe => FixedHeader::Unsubscribe,
            PacketType::Unsuback => FixedHeader::Unsuback,
            PacketType::Pingreq => FixedHeader::Pingreq,
            PacketType::Pingresp => FixedHeader::Pingresp,
            PacketType::Disconnect => FixedHeader::Disconnect,
        }
    }
}

impl FixedHeader {
    /// The complete first-byte value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The packet type encoded in bits 7-4.
    pub fn packet_type(self) -> PacketType {
        match self {
            FixedHeader::Connect => PacketType::Connect,
            FixedHeader::Connack => PacketType::Connack,
            FixedHeader::Publish => PacketType::Publish,
            FixedHeader::Puback => PacketType::Puback,
            FixedHeader::Subscribe => PacketType::Subscribe,
            FixedHeader::Suback => PacketType::Suback,
            FixedHeader::Unsubscribe => PacketType::Unsubscribe,
            FixedHeader::Unsuback => PacketType::Unsuback,
            FixedHeader::Pingreq => PacketType::Pingreq,
            FixedHeader::Pingresp => PacketType::Pingresp,
            FixedHeader::Disconnect => PacketType::Disconnect,
        }
    }

    /// The flags/reserved bits in bits 3-0.
    pub fn flags(self) -> u8 {
        self.as_u8() & 0x0F
    }
}

impl Serialize for PacketType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

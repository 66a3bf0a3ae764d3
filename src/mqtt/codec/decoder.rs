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

use alloc::vec::Vec;

use crate::mqtt::codec::packet_builder::{PacketBuildResult, PacketBuilder, RawPacket};
use crate::mqtt::common::tracing::{debug, error};
use crate::mqtt::common::Cursor;
use crate::mqtt::error::CodecError;
use crate::mqtt::packet::{
    Connack, Connect, Disconnect, Packet, PacketMeta, PacketType, Pingreq, Pingresp, Puback,
    Publish, Suback, Subscribe, Unsuback, Unsubscribe,
};
use crate::mqtt::{Role, Version};

/// Dispatches a reassembled frame to the per-packet decoder selected by
/// `(version, packet type)`, after the role and first-byte checks.
fn parse_packet(version: Version, role: Role, raw: &RawPacket) -> Result<Packet, CodecError> {
    let packet_type = PacketType::try_from(raw.packet_type_nibble())
        .map_err(|_| CodecError::UnsupportedPacketType)?;
    if !role.receives(packet_type) {
        return Err(CodecError::UnsupportedPacketType);
    }

    let flags = raw.flags();
    if packet_type != PacketType::Publish && flags != packet_type.to_fixed_header().flags() {
        return Err(CodecError::InvalidFixedHeader);
    }

    let data = raw.data();
    let packet: Packet = match packet_type {
        PacketType::Connect => Connect::parse(version, data)?.into(),
        PacketType::Connack => Connack::parse(version, data)?.into(),
        PacketType::Publish => Publish::parse(version, flags, data)?.into(),
        PacketType::Puback => Puback::parse(version, data)?.into(),
        PacketType::Subscribe => Subscribe::parse(version, data)?.into(),
        PacketType::Suback => Suback::parse(version, data)?.into(),
        PacketType::Unsubscribe => Unsubscribe::parse(version, data)?.into(),
        PacketType::Unsuback => Unsuback::parse(version, data)?.into(),
        PacketType::Pingreq => Pingreq::parse(version, data)?.into(),
        PacketType::Pingresp => Pingresp::parse(version, data)?.into(),
        PacketType::Disconnect => Disconnect::parse(version, data)?.into(),
    };
    debug_assert_eq!(packet.packet_type(), packet_type);
    Ok(packet)
}

/// Streaming packet decoder.
///
/// One per connection. Feed it arbitrary fragments of the read stream; it
/// reassembles frames across fragment boundaries and emits every completely
/// decoded packet exactly once, in arrival order. Partial state (first byte,
/// in-progress remaining length, partial payload) persists between calls.
///
/// The first protocol error poisons the decoder permanently: the error is
/// returned, every later [`feed`](Self::feed) returns it again, and the
/// caller is expected to drop the connection. Packets decoded from earlier
/// frames of the same fragment are lost with it, which is fine because the
/// connection is unusable anyway.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::{codec::PacketDecoder, Role, Version};
///
/// let mut decoder = PacketDecoder::new(Version::V3_1_1, Role::Server);
/// // a PINGREQ split across two reads
/// assert!(decoder.feed(&[0xC0]).unwrap().is_empty());
/// let packets = decoder.feed(&[0x00]).unwrap();
/// assert_eq!(packets.len(), 1);
/// ```
pub struct PacketDecoder {
    version: Version,
    role: Role,
    builder: PacketBuilder,
    poison: Option<CodecError>,
}

impl PacketDecoder {
    /// Creates a decoder for one connection.
    pub fn new(version: Version, role: Role) -> Self {
        Self {
            version,
            role,
            builder: PacketBuilder::new(),
            poison: None,
        }
    }

    /// The protocol version this decoder expects.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The role this decoder receives for.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The fatal error this decoder stopped at, if any.
    pub fn error(&self) -> Option<CodecError> {
        self.poison
    }

    /// Consumes one read fragment and returns the packets it completed.
    ///
    /// An empty return just means no frame finished inside this fragment.
    ///
    /// # Errors
    ///
    /// The first protocol error encountered; the decoder is poisoned from
    /// then on and keeps returning the same error.
    pub fn feed(&mut self, fragment: &[u8]) -> Result<Vec<Packet>, CodecError> {
        if let Some(e) = self.poison {
            return Err(e);
        }

        let mut cursor = Cursor::new(fragment);
        let mut packets = Vec::new();
        loop {
            match self.builder.feed(&mut cursor) {
                PacketBuildResult::Complete(raw) => {
                    match parse_packet(self.version, self.role, &raw) {
                        Ok(packet) => {
                            debug!(packet_type = %packet.packet_type(), "packet decoded");
                            packets.push(packet);
                        }
                        Err(e) => {
                            error!(error = %e, "protocol error, decoder poisoned");
                            self.poison = Some(e);
                            return Err(e);
                        }
                    }
                }
                PacketBuildResult::Incomplete => return Ok(packets),
                PacketBuildResult::Error(e) => {
                    error!(error = %e, "protocol error, decoder poisoned");
                    self.poison = Some(e);
                    return Err(e);
                }
            }
        }
    }
}

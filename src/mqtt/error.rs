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

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors reported by the wire codec.
///
/// On the decode side every variant except [`CodecError::ShortBuffer`] is a
/// protocol violation and fatal for the connection: the streaming decoder
/// reports the first one and stays poisoned. `ShortBuffer` only means "the
/// element being decoded needs more bytes than the window holds"; the
/// streaming decoder never surfaces it because it keeps buffering instead.
///
/// On the encode side errors are caller bugs (a value that has no
/// representation in the selected protocol version, or one that exceeds a
/// wire limit) and are reported synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// The readable window ends before the element being decoded does.
    #[error("not enough bytes to decode the requested element")]
    ShortBuffer,

    /// A variable byte integer kept its continuation bit set into a fifth
    /// byte.
    #[error("variable byte integer exceeds four bytes")]
    MalformedVariableByteInteger,

    /// A value does not fit its wire representation (a variable byte integer
    /// of 2^28 or more, or a string/binary field longer than 65 535 bytes).
    #[error("value does not fit the wire representation")]
    ValueOutOfRange,

    /// The writable window is too small for the requested element.
    #[error("write window too small for the requested element")]
    BufferTooSmall,

    /// A CONNECT packet's protocol level byte does not match the version the
    /// codec was configured with.
    #[error("protocol version does not match the configured mode")]
    ProtocolVersionMismatch,

    /// The fixed header's first byte carries flags that are not allowed for
    /// its packet type.
    #[error("fixed header flags not allowed for this packet type")]
    InvalidFixedHeader,

    /// The lengths declared inside a packet do not add up to the length of
    /// its payload.
    #[error("declared lengths do not match the packet payload")]
    PayloadLengthMismatch,

    /// A property code that is unknown, or not permitted in this packet
    /// type's property section.
    #[error("property code not permitted in this packet type")]
    UnknownPropertyCode,

    /// A property entry runs past the end of its declared section.
    #[error("property entry crosses the property section boundary")]
    PropertySectionOverflow,

    /// The declared property section length disagrees with the enclosing
    /// packet.
    #[error("property section length does not match its entries")]
    PropertySectionLengthMismatch,

    /// A string field holds bytes that are not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// The packet type nibble is not handled by the configured version and
    /// role.
    #[error("packet type not handled by the configured codec")]
    UnsupportedPacketType,

    /// A structural protocol rule is violated: a zero packet identifier where
    /// one is required, an unknown reason code, inconsistent CONNECT flags,
    /// a reserved bit that is set, and similar.
    #[error("packet violates a structural protocol rule")]
    MalformedPacket,
}

impl Serialize for CodecError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

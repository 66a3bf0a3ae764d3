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

use core::convert::{From, TryFrom};
use core::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mqtt::error::CodecError;

/// MQTT Variable Byte Integer representation with pre-encoded byte buffer.
///
/// Encodes a value in `[0, 2^28)` as 1-4 bytes; every byte carries seven
/// payload bits in little-endian digit order and the high bit of each
/// non-terminal byte is the continuation bit. The encoder always produces
/// the shortest form; the decoder accepts padded forms as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableByteInteger {
    /// Encoded bytes, at most 4 bytes.
    encoded: ArrayVec<u8, 4>,
}

impl VariableByteInteger {
    /// Largest encodable value (2^28 - 1).
    pub const MAX: u32 = 0x0FFF_FFFF;

    /// Encode a `u32` into 1-4 bytes.
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if `value` exceeds [`Self::MAX`].
    pub fn from_u32(mut value: u32) -> Result<Self, CodecError> {
        if value > Self::MAX {
            return Err(CodecError::ValueOutOfRange);
        }
        let mut buf = ArrayVec::<u8, 4>::new();
        loop {
            let mut byte = (value % 128) as u8;
            value /= 128;
            if value > 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                break;
            }
        }
        Ok(Self { encoded: buf })
    }

    /// Decode back to `u32`.
    pub fn to_u32(&self) -> u32 {
        let mut multiplier = 1u32;
        let mut result = 0u32;
        for &b in &*self.encoded {
            result += u32::from(b & 0x7F) * multiplier;
            multiplier = multiplier.saturating_mul(128);
        }
        result
    }

    /// Number of bytes in the encoding.
    pub fn size(&self) -> usize {
        self.encoded.len()
    }

    /// Number of bytes `value` takes on the wire without encoding it.
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if `value` exceeds [`Self::MAX`].
    pub fn byte_length(value: u32) -> Result<usize, CodecError> {
        match value {
            0..=0x7F => Ok(1),
            0x80..=0x3FFF => Ok(2),
            0x4000..=0x1F_FFFF => Ok(3),
            0x20_0000..=Self::MAX => Ok(4),
            _ => Err(CodecError::ValueOutOfRange),
        }
    }

    /// Borrow as byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Copies the encoding into the front of `window`, returning the number
    /// of bytes written.
    ///
    /// # Errors
    ///
    /// `CodecError::BufferTooSmall` if the window is shorter than the
    /// encoding.
    pub fn encode_into(&self, window: &mut [u8]) -> Result<usize, CodecError> {
        let n = self.encoded.len();
        if window.len() < n {
            return Err(CodecError::BufferTooSmall);
        }
        window[..n].copy_from_slice(&self.encoded);
        Ok(n)
    }

    /// Decodes a variable byte integer from the front of `buf`, returning it
    /// together with the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// - `CodecError::ShortBuffer` if `buf` ends before a terminal byte
    /// - `CodecError::MalformedVariableByteInteger` if a fifth continuation
    ///   byte would be required
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut multiplier = 1u32;
        let mut value = 0u32;
        let mut read = ArrayVec::<u8, 4>::new();

        for (i, &b) in buf.iter().take(4).enumerate() {
            value = value
                .checked_add(u32::from(b & 0x7F) * multiplier)
                .unwrap_or(u32::MAX);
            if value > Self::MAX {
                return Err(CodecError::MalformedVariableByteInteger);
            }
            read.push(b);

            if (b & 0x80) == 0 {
                // terminal byte: keep the bytes as read, padded forms included
                return Ok((Self { encoded: read }, i + 1));
            }
            multiplier = multiplier.saturating_mul(128);
        }

        if buf.len() < 4 {
            Err(CodecError::ShortBuffer)
        } else {
            Err(CodecError::MalformedVariableByteInteger)
        }
    }
}

impl Serialize for VariableByteInteger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.to_u32())
    }
}

impl<'de> Deserialize<'de> for VariableByteInteger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let val = u32::deserialize(deserializer)?;
        VariableByteInteger::from_u32(val).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for VariableByteInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u32())
    }
}

impl From<VariableByteInteger> for u32 {
    fn from(vbi: VariableByteInteger) -> Self {
        vbi.to_u32()
    }
}

impl TryFrom<u32> for VariableByteInteger {
    type Error = CodecError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        VariableByteInteger::from_u32(value)
    }
}

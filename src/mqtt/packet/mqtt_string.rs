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
use core::fmt;

use serde::{Serialize, Serializer};

use crate::mqtt::error::CodecError;

/// MQTT String representation with pre-encoded byte buffer
///
/// Stores a UTF-8 string in its wire form: a 2-byte big-endian length prefix
/// followed by the string bytes, all in one owned buffer. Keeping the
/// encoded image around makes length calculations over packets a walk over
/// already-measured buffers, and serializing is a single copy.
///
/// UTF-8 validity is checked once at construction or decode; afterwards
/// `as_str` is free. The string data may be at most 65 535 bytes.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::packet::MqttString;
///
/// let s = MqttString::new("hi").unwrap();
/// assert_eq!(s.as_str(), "hi");
/// assert_eq!(s.as_bytes(), &[0x00, 0x02, b'h', b'i']);
/// assert_eq!(s.size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MqttString {
    /// Complete buffer including length prefix (2 bytes) + UTF-8 byte sequence
    encoded: Vec<u8>,
}

impl MqttString {
    /// Create a new MqttString from a string
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if the string is longer than 65 535
    /// bytes.
    pub fn new(s: impl AsRef<str>) -> Result<Self, CodecError> {
        let s_ref = s.as_ref();
        let len = s_ref.len();

        if len > 65535 {
            return Err(CodecError::ValueOutOfRange);
        }

        let mut encoded = Vec::with_capacity(2 + len);
        encoded.push((len >> 8) as u8);
        encoded.push(len as u8);
        encoded.extend_from_slice(s_ref.as_bytes());

        Ok(Self { encoded })
    }

    /// The complete encoded byte sequence including the length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// The string content, excluding the length prefix.
    pub fn as_str(&self) -> &str {
        // SAFETY: UTF-8 validity was verified when the buffer was created or
        // decoded, and the buffer is never mutated afterwards.
        unsafe { core::str::from_utf8_unchecked(&self.encoded[2..]) }
    }

    /// Byte length of the string data (without the prefix).
    pub fn len(&self) -> usize {
        self.encoded.len() - 2
    }

    /// Whether the string data is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total wire size: length prefix plus string bytes.
    pub fn size(&self) -> usize {
        self.encoded.len()
    }

    /// Decodes a length-prefixed string from the front of `data`, returning
    /// it with the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// - `CodecError::ShortBuffer` if `data` ends before the declared length
    /// - `CodecError::InvalidUtf8` if the string bytes are not valid UTF-8
    pub fn decode(data: &[u8]) -> Result<(Self, usize), CodecError> {
        if data.len() < 2 {
            return Err(CodecError::ShortBuffer);
        }
        let len = usize::from(u16::from_be_bytes([data[0], data[1]]));
        if data.len() < 2 + len {
            return Err(CodecError::ShortBuffer);
        }
        core::str::from_utf8(&data[2..2 + len]).map_err(|_| CodecError::InvalidUtf8)?;
        Ok((
            Self {
                encoded: data[..2 + len].to_vec(),
            },
            2 + len,
        ))
    }
}

impl Default for MqttString {
    fn default() -> Self {
        Self {
            encoded: vec![0, 0],
        }
    }
}

impl TryFrom<&str> for MqttString {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MqttString::new(value)
    }
}

impl AsRef<str> for MqttString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for MqttString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for MqttString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

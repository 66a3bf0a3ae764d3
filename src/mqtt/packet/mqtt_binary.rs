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

use serde::{Serialize, Serializer};

use crate::mqtt::error::CodecError;

/// MQTT Binary Data representation with pre-encoded byte buffer
///
/// The binary counterpart of `MqttString`: a 2-byte big-endian length prefix
/// followed by up to 65 535 opaque bytes, held in one owned buffer in wire
/// form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MqttBinary {
    /// Complete buffer including length prefix (2 bytes) + data bytes
    encoded: Vec<u8>,
}

impl MqttBinary {
    /// Create new binary data from a byte slice.
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if the data is longer than 65 535
    /// bytes.
    pub fn new(data: impl AsRef<[u8]>) -> Result<Self, CodecError> {
        let data_ref = data.as_ref();
        let len = data_ref.len();

        if len > 65535 {
            return Err(CodecError::ValueOutOfRange);
        }

        let mut encoded = Vec::with_capacity(2 + len);
        encoded.push((len >> 8) as u8);
        encoded.push(len as u8);
        encoded.extend_from_slice(data_ref);

        Ok(Self { encoded })
    }

    /// The complete encoded byte sequence including the length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// The data bytes, excluding the length prefix.
    pub fn as_slice(&self) -> &[u8] {
        &self.encoded[2..]
    }

    /// Byte length of the data (without the prefix).
    pub fn len(&self) -> usize {
        self.encoded.len() - 2
    }

    /// Whether the data is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total wire size: length prefix plus data bytes.
    pub fn size(&self) -> usize {
        self.encoded.len()
    }

    /// Decodes length-prefixed binary data from the front of `data`,
    /// returning it with the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// `CodecError::ShortBuffer` if `data` ends before the declared length.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), CodecError> {
        if data.len() < 2 {
            return Err(CodecError::ShortBuffer);
        }
        let len = usize::from(u16::from_be_bytes([data[0], data[1]]));
        if data.len() < 2 + len {
            return Err(CodecError::ShortBuffer);
        }
        Ok((
            Self {
                encoded: data[..2 + len].to_vec(),
            },
            2 + len,
        ))
    }
}

impl Default for MqttBinary {
    fn default() -> Self {
        Self {
            encoded: vec![0, 0],
        }
    }
}

impl TryFrom<&[u8]> for MqttBinary {
    type Error = CodecError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        MqttBinary::new(value)
    }
}

impl AsRef<[u8]> for MqttBinary {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Serialize for MqttBinary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.as_slice())
    }
}

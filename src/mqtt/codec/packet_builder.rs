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

use crate::mqtt::common::Cursor;
use crate::mqtt::error::CodecError;

/// A reassembled inbound frame: the fixed header's first byte plus the
/// complete payload the remaining length announced.
#[derive(Debug, Clone)]
pub struct RawPacket {
    fixed_header: u8,
    data: Vec<u8>,
}

impl RawPacket {
    /// The fixed header's first byte.
    pub fn fixed_header(&self) -> u8 {
        self.fixed_header
    }

    /// The packet type nibble (bits 7-4 of the first byte).
    pub fn packet_type_nibble(&self) -> u8 {
        self.fixed_header >> 4
    }

    /// The flag nibble (bits 3-0 of the first byte).
    pub fn flags(&self) -> u8 {
        self.fixed_header & 0x0F
    }

    /// The payload: variable header plus payload bytes, exactly as long as
    /// the remaining length declared.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The declared remaining length.
    pub fn remaining_length(&self) -> usize {
        self.data.len()
    }
}

/// Result of feeding bytes to the frame assembler.
#[derive(Debug)]
pub enum PacketBuildResult {
    /// A whole frame is buffered.
    Complete(RawPacket),
    /// More data is needed.
    Incomplete,
    /// The length prefix is malformed.
    Error(CodecError),
}

/// Incremental frame assembler for the inbound byte stream.
///
/// Reassembles fixed-header first byte, remaining-length variable byte
/// integer (accumulated one byte at a time), and payload across arbitrarily
/// fragmented reads, handing out one [`RawPacket`] per frame. State persists
/// between [`feed`](Self::feed) calls and resets itself after each completed
/// frame, so a single builder serves a connection's whole lifetime.
pub struct PacketBuilder {
    /// Current read state
    state: ReadState,
    /// Fixed header first byte of the frame being read
    first_byte: u8,
    /// Remaining length accumulated so far
    remaining_length: usize,
    /// Multiplier for variable-length integer decoding
    multiplier: u32,
    /// Payload buffer of the frame being read
    raw_buf: Vec<u8>,
}

/// Packet reading state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Reading fixed header
    FixedHeader,
    /// Reading remaining length
    RemainingLength,
    /// Reading payload
    Payload,
}

impl PacketBuilder {
    /// Create new packet builder
    pub fn new() -> Self {
        Self {
            state: ReadState::FixedHeader,
            first_byte: 0,
            remaining_length: 0,
            multiplier: 1,
            raw_buf: Vec::new(),
        }
    }

    /// Reset builder for reuse
    pub fn reset(&mut self) {
        self.state = ReadState::FixedHeader;
        self.first_byte = 0;
        self.remaining_length = 0;
        self.multiplier = 1;
        self.raw_buf = Vec::new();
    }

    fn complete(&mut self) -> PacketBuildResult {
        let packet = RawPacket {
            fixed_header: self.first_byte,
            data: core::mem::take(&mut self.raw_buf),
        };
        self.reset();
        PacketBuildResult::Complete(packet)
    }

    /// Drives the assembler with the cursor's remaining bytes.
    ///
    /// Consumes from `data` until a frame completes or the cursor runs dry,
    /// whichever comes first. A remaining length of zero completes the frame
    /// immediately without consuming payload bytes.
    pub fn feed(&mut self, data: &mut Cursor<&[u8]>) -> PacketBuildResult {
        loop {
            match self.state {
                ReadState::FixedHeader => {
                    let Some(byte) = data.read_u8() else {
                        return PacketBuildResult::Incomplete;
                    };
                    self.first_byte = byte;
                    self.state = ReadState::RemainingLength;
                }

                ReadState::RemainingLength => {
                    let Some(byte) = data.read_u8() else {
                        return PacketBuildResult::Incomplete;
                    };

                    self.remaining_length +=
                        ((byte & 0x7F) as usize) * (self.multiplier as usize);

                    if byte & 0x80 != 0 {
                        self.multiplier = self.multiplier.saturating_mul(128);
                        // a fifth continuation byte would be required
                        if self.multiplier > 128 * 128 * 128 {
                            self.reset();
                            return PacketBuildResult::Error(
                                CodecError::MalformedVariableByteInteger,
                            );
                        }
                    } else if self.remaining_length == 0 {
                        return self.complete();
                    } else {
                        self.raw_buf = Vec::with_capacity(self.remaining_length);
                        self.state = ReadState::Payload;
                    }
                }

                ReadState::Payload => {
                    let missing = self.remaining_length - self.raw_buf.len();
                    let available = data.remaining();
                    let take = missing.min(available);
                    if take == 0 {
                        return PacketBuildResult::Incomplete;
                    }

                    let offset = self.raw_buf.len();
                    self.raw_buf.resize(offset + take, 0);
                    let read = data.read(&mut self.raw_buf[offset..]);
                    debug_assert_eq!(read, take);

                    if self.raw_buf.len() == self.remaining_length {
                        return self.complete();
                    }
                    return PacketBuildResult::Incomplete;
                }
            }
        }
    }
}

impl Default for PacketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

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

use crate::mqtt::packet::VariableByteInteger;

/// One element of a packet's encoding-step list.
///
/// A per-packet encoder reduces a packet value to an ordered list of these
/// steps; the streaming encoder then evaluates them against write windows.
/// Fixed-width steps are written all-or-nothing, a `Vli` suspends
/// conservatively, and a `Bytes` step is clipped in place when a window
/// fills mid-copy. `Bytes` borrows the packet's buffers, which is what keeps
/// them alive and unmodified until the encoder reports completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeStep<'a> {
    /// A single byte.
    U8(u8),
    /// A big-endian 16-bit integer.
    U16(u16),
    /// A big-endian 32-bit integer.
    U32(u32),
    /// A variable byte integer.
    Vli(VariableByteInteger),
    /// A borrowed byte run, copied verbatim.
    Bytes(&'a [u8]),
}

impl EncodeStep<'_> {
    /// The number of bytes this step contributes to the output.
    pub fn size(&self) -> usize {
        match self {
            EncodeStep::U8(_) => 1,
            EncodeStep::U16(_) => 2,
            EncodeStep::U32(_) => 4,
            EncodeStep::Vli(v) => v.size(),
            EncodeStep::Bytes(b) => b.len(),
        }
    }
}

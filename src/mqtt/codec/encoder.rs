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

use crate::mqtt::codec::EncodeStep;
use crate::mqtt::common::tracing::trace;
use crate::mqtt::error::CodecError;
use crate::mqtt::packet::{Packet, PacketMeta};
use crate::mqtt::{Role, Version};

/// Outcome of one [`PacketEncoder::service`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeProgress {
    /// The packet is fully written; `written` bytes went into this window
    /// and the rest of it is unused.
    Complete { written: usize },
    /// The window filled up (or the next step will not fit); `written`
    /// bytes went into it and further service calls are required.
    InProgress { written: usize },
}

/// Builds the full encoding-step list for `packet`: the version dispatch
/// point of the encode direction.
pub(crate) fn push_packet_steps<'a>(
    packet: &'a Packet,
    version: Version,
    steps: &mut Vec<EncodeStep<'a>>,
) -> Result<(), CodecError> {
    match packet {
        Packet::Connect(p) => p.encode_steps(version, steps),
        Packet::Connack(p) => p.encode_steps(version, steps),
        Packet::Publish(p) => p.encode_steps(version, steps),
        Packet::Puback(p) => p.encode_steps(version, steps),
        Packet::Subscribe(p) => p.encode_steps(version, steps),
        Packet::Suback(p) => p.encode_steps(version, steps),
        Packet::Unsubscribe(p) => p.encode_steps(version, steps),
        Packet::Unsuback(p) => p.encode_steps(version, steps),
        Packet::Pingreq(p) => p.encode_steps(version, steps),
        Packet::Pingresp(p) => p.encode_steps(version, steps),
        Packet::Disconnect(p) => p.encode_steps(version, steps),
    }
}

/// Encodes a packet in one shot.
///
/// The incremental path through [`PacketEncoder`] produces exactly this byte
/// sequence; this entry point skips the windowing for callers that buffer
/// whole packets anyway. No role filtering is applied here.
pub fn encode(packet: &Packet, version: Version) -> Result<Vec<u8>, CodecError> {
    let mut steps = Vec::new();
    push_packet_steps(packet, version, &mut steps)?;
    let mut out = Vec::with_capacity(steps.iter().map(EncodeStep::size).sum());
    for step in &steps {
        match step {
            EncodeStep::U8(v) => out.push(*v),
            EncodeStep::U16(v) => out.extend_from_slice(&v.to_be_bytes()),
            EncodeStep::U32(v) => out.extend_from_slice(&v.to_be_bytes()),
            EncodeStep::Vli(v) => out.extend_from_slice(v.as_bytes()),
            EncodeStep::Bytes(b) => out.extend_from_slice(b),
        }
    }
    Ok(out)
}

/// Streaming packet encoder.
///
/// Created per packet; building one computes the packet's encoding-step list
/// and borrows the packet until the encoder is dropped, so the buffers a
/// `Bytes` step references cannot move or change mid-encode. Repeatedly
/// [`service`](Self::service) caller-supplied write windows until
/// [`EncodeProgress::Complete`]; the concatenation of everything written is
/// the packet's canonical encoding.
///
/// Suspension is cooperative and per step: a fixed-width field is written
/// only if the window still has room for all of it, a variable byte integer
/// only with four bytes of headroom, and a byte run is split across windows
/// by clipping the step in place.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::{
///     codec::{EncodeProgress, PacketEncoder},
///     packet::{Packet, Pingreq},
///     Role, Version,
/// };
///
/// let packet = Packet::from(Pingreq::new());
/// let mut encoder = PacketEncoder::new(&packet, Version::V5_0, Role::Client).unwrap();
/// let mut window = [0u8; 4];
/// assert_eq!(
///     encoder.service(&mut window),
///     EncodeProgress::Complete { written: 2 }
/// );
/// assert_eq!(&window[..2], &[0xC0, 0x00]);
/// ```
pub struct PacketEncoder<'a> {
    steps: Vec<EncodeStep<'a>>,
    current: usize,
}

impl<'a> PacketEncoder<'a> {
    /// Initializes an encoder for one packet.
    ///
    /// # Errors
    ///
    /// - `CodecError::UnsupportedPacketType` if `role` does not send this
    ///   packet type
    /// - any error of the per-packet encoder, e.g.
    ///   `CodecError::ProtocolVersionMismatch` for a value that has no
    ///   representation in `version`
    pub fn new(packet: &'a Packet, version: Version, role: Role) -> Result<Self, CodecError> {
        if !role.sends(packet.packet_type()) {
            return Err(CodecError::UnsupportedPacketType);
        }
        let mut steps = Vec::new();
        push_packet_steps(packet, version, &mut steps)?;
        trace!(
            packet_type = %packet.packet_type(),
            steps = steps.len(),
            "encoder initialized"
        );
        Ok(Self { steps, current: 0 })
    }

    /// Whether every step has been written.
    pub fn is_complete(&self) -> bool {
        self.current == self.steps.len()
    }

    /// Writes as much of the packet as fits into `window`.
    ///
    /// Bytes are emitted in step order across calls; the total written over
    /// all calls equals the packet's encoded length. Calling again after
    /// completion writes nothing and reports `Complete`.
    pub fn service(&mut self, window: &mut [u8]) -> EncodeProgress {
        let mut written = 0usize;
        while self.current < self.steps.len() {
            let room = window.len() - written;
            match &mut self.steps[self.current] {
                EncodeStep::U8(v) => {
                    if room < 1 {
                        return EncodeProgress::InProgress { written };
                    }
                    window[written] = *v;
                    written += 1;
                }
                EncodeStep::U16(v) => {
                    if room < 2 {
                        return EncodeProgress::InProgress { written };
                    }
                    window[written..written + 2].copy_from_slice(&v.to_be_bytes());
                    written += 2;
                }
                EncodeStep::U32(v) => {
                    if room < 4 {
                        return EncodeProgress::InProgress { written };
                    }
                    window[written..written + 4].copy_from_slice(&v.to_be_bytes());
                    written += 4;
                }
                EncodeStep::Vli(v) => {
                    // conservative: suspend below four bytes of headroom so a
                    // too-small window turns into InProgress, not an error
                    if room < 4 {
                        return EncodeProgress::InProgress { written };
                    }
                    match v.encode_into(&mut window[written..]) {
                        Ok(n) => written += n,
                        Err(_) => return EncodeProgress::InProgress { written },
                    }
                }
                EncodeStep::Bytes(src) => {
                    let n = room.min(src.len());
                    window[written..written + n].copy_from_slice(&src[..n]);
                    written += n;
                    if n < src.len() {
                        // clip the step in place and resume mid-run next call
                        *src = &src[n..];
                        return EncodeProgress::InProgress { written };
                    }
                }
            }
            self.current += 1;
        }
        EncodeProgress::Complete { written }
    }
}

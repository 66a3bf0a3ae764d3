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

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::mqtt::codec::EncodeStep;
use crate::mqtt::error::CodecError;
use crate::mqtt::packet::{MqttString, Qos, RetainHandling};
use crate::mqtt::Version;

/// Subscription options byte
///
/// Bit layout: bits 1-0 QoS, bit 2 No Local, bit 3 Retain As Published,
/// bits 5-4 Retain Handling. Bits 7-6 are reserved and must be zero.
/// For v3.1.1 only the QoS bits exist on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubOpts {
    bits: u8,
}

impl SubOpts {
    /// All options at their defaults: QoS 0, deliver own publications, fresh
    /// retain flag, send retained messages on subscribe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from a raw byte, validating reserved bits and field
    /// ranges.
    ///
    /// # Errors
    ///
    /// `CodecError::MalformedPacket` if bits 7-6 are set, the QoS bits hold
    /// 3, or the retain handling bits hold 3.
    pub fn from_u8(value: u8) -> Result<Self, CodecError> {
        if value & 0b1100_0000 != 0 {
            return Err(CodecError::MalformedPacket);
        }
        if value & 0b0000_0011 == 0b0000_0011 {
            return Err(CodecError::MalformedPacket);
        }
        if value & 0b0011_0000 == 0b0011_0000 {
            return Err(CodecError::MalformedPacket);
        }
        Ok(Self { bits: value })
    }

    /// Requested maximum QoS.
    pub fn qos(&self) -> Qos {
        match self.bits & 0b0000_0011 {
            0 => Qos::AtMostOnce,
            1 => Qos::AtLeastOnce,
            _ => Qos::ExactlyOnce,
        }
    }

    /// Sets the requested maximum QoS.
    pub fn set_qos(mut self, qos: Qos) -> Self {
        self.bits = (self.bits & !0b0000_0011) | qos as u8;
        self
    }

    /// No Local: do not deliver this client's own publications back to it.
    pub fn nl(&self) -> bool {
        self.bits & 0b0000_0100 != 0
    }

    /// Sets the No Local flag.
    pub fn set_nl(mut self, nl: bool) -> Self {
        if nl {
            self.bits |= 0b0000_0100;
        } else {
            self.bits &= !0b0000_0100;
        }
        self
    }

    /// Retain As Published: keep the retain flag of forwarded messages.
    pub fn rap(&self) -> bool {
        self.bits & 0b0000_1000 != 0
    }

    /// Sets the Retain As Published flag.
    pub fn set_rap(mut self, rap: bool) -> Self {
        if rap {
            self.bits |= 0b0000_1000;
        } else {
            self.bits &= !0b0000_1000;
        }
        self
    }

    /// Retained-message handling for this subscription.
    pub fn rh(&self) -> RetainHandling {
        match (self.bits >> 4) & 0b0000_0011 {
            0 => RetainHandling::SendRetained,
            1 => RetainHandling::SendRetainedIfNotExists,
            _ => RetainHandling::DoNotSendRetained,
        }
    }

    /// Sets the retained-message handling.
    pub fn set_rh(mut self, rh: RetainHandling) -> Self {
        self.bits = (self.bits & !0b0011_0000) | ((rh as u8) << 4);
        self
    }

    /// The raw options byte.
    pub fn as_u8(&self) -> u8 {
        self.bits
    }
}

impl Serialize for SubOpts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("sub_opts", 4)?;
        state.serialize_field("qos", &self.qos())?;
        state.serialize_field("nl", &self.nl())?;
        state.serialize_field("rap", &self.rap())?;
        state.serialize_field("rh", &self.rh())?;
        state.end()
    }
}

/// One SUBSCRIBE payload entry: topic filter plus subscription options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    topic_filter: MqttString,
    sub_opts: SubOpts,
}

impl SubEntry {
    /// Creates an entry from a topic filter and options.
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if the topic filter exceeds 65 535
    /// bytes.
    pub fn new(topic_filter: impl AsRef<str>, sub_opts: SubOpts) -> Result<Self, CodecError> {
        Ok(Self {
            topic_filter: MqttString::new(topic_filter)?,
            sub_opts,
        })
    }

    /// The topic filter.
    pub fn topic_filter(&self) -> &str {
        self.topic_filter.as_str()
    }

    /// The subscription options.
    pub fn sub_opts(&self) -> SubOpts {
        self.sub_opts
    }

    /// Wire size: topic filter plus the options byte.
    pub fn size(&self) -> usize {
        self.topic_filter.size() + 1
    }

    /// Appends the entry's encoding steps for `version`.
    ///
    /// # Errors
    ///
    /// `CodecError::ProtocolVersionMismatch` if v5.0-only option bits are
    /// set for a v3.1.1 encode.
    pub(crate) fn push_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        steps.push(EncodeStep::Bytes(self.topic_filter.as_bytes()));
        match version {
            Version::V3_1_1 => {
                if self.sub_opts.as_u8() & !0b0000_0011 != 0 {
                    return Err(CodecError::ProtocolVersionMismatch);
                }
                steps.push(EncodeStep::U8(self.sub_opts.qos() as u8));
            }
            Version::V5_0 => steps.push(EncodeStep::U8(self.sub_opts.as_u8())),
        }
        Ok(())
    }

    /// Parses one entry from the front of `data`, returning it with the
    /// number of bytes consumed.
    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<(Self, usize), CodecError> {
        let (topic_filter, mut consumed) = MqttString::decode(data)?;
        let opts_byte = *data.get(consumed).ok_or(CodecError::ShortBuffer)?;
        consumed += 1;
        let sub_opts = match version {
            Version::V3_1_1 => {
                // only the requested QoS exists in a v3.1.1 payload
                if opts_byte & !0b0000_0011 != 0 {
                    return Err(CodecError::MalformedPacket);
                }
                SubOpts::from_u8(opts_byte)?
            }
            Version::V5_0 => SubOpts::from_u8(opts_byte)?,
        };
        Ok((
            Self {
                topic_filter,
                sub_opts,
            },
            consumed,
        ))
    }
}

impl Serialize for SubEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("sub_entry", 2)?;
        state.serialize_field("topic_filter", &self.topic_filter)?;
        state.serialize_field("sub_opts", &self.sub_opts)?;
        state.end()
    }
}

impl fmt::Display for SubEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

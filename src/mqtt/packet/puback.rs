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

use derive_builder::Builder;
use getset::CopyGetters;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::mqtt::codec::EncodeStep;
use crate::mqtt::error::CodecError;
use crate::mqtt::packet::packet_type::{FixedHeader, PacketType};
use crate::mqtt::packet::variable_byte_integer::VariableByteInteger;
use crate::mqtt::packet::{
    parse_properties, read_u16, read_u8, validate_properties, PacketMeta, Properties,
    PropertiesSize, PropertiesToSteps, PropertySection,
};
use crate::mqtt::result_code::PubackReasonCode;
use crate::mqtt::Version;

/// A PUBACK packet, acknowledging a QoS 1 PUBLISH.
///
/// The reason code defaults to `Success`. On the v5.0 wire a successful
/// acknowledgment without properties is encoded in its 2-byte short form
/// (packet identifier only); a reason code without properties adds one byte,
/// and properties bring the full layout. Decoding any of the three forms
/// yields the same value, so round trips are byte-stable.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Puback {
    /// Identifier of the PUBLISH being acknowledged.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    packet_id: u16,
    /// Outcome of the PUBLISH processing.
    #[getset(get_copy = "pub")]
    reason_code: PubackReasonCode,
    props: Properties,
}

impl Puback {
    /// Creates a new builder.
    pub fn builder() -> PubackBuilder {
        PubackBuilder::default()
    }

    /// The PUBACK properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        steps.push(EncodeStep::U8(FixedHeader::Puback.as_u8()));
        match version {
            Version::V3_1_1 => {
                if self.reason_code != PubackReasonCode::Success || !self.props.is_empty() {
                    return Err(CodecError::ProtocolVersionMismatch);
                }
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(2)?));
                steps.push(EncodeStep::U16(self.packet_id));
            }
            Version::V5_0 => {
                if self.reason_code == PubackReasonCode::Success && self.props.is_empty() {
                    // short form: trailing reason code and properties elided
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(2)?));
                    steps.push(EncodeStep::U16(self.packet_id));
                } else if self.props.is_empty() {
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(3)?));
                    steps.push(EncodeStep::U16(self.packet_id));
                    steps.push(EncodeStep::U8(self.reason_code as u8));
                } else {
                    let remaining = 3 + self.props.section_size();
                    let remaining =
                        u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
                    steps.push(EncodeStep::U16(self.packet_id));
                    steps.push(EncodeStep::U8(self.reason_code as u8));
                    self.props.push_section_steps(steps)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = 0usize;

        let packet_id = read_u16(data, &mut cursor)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }

        let (reason_code, props) = match version {
            Version::V3_1_1 => (PubackReasonCode::Success, Properties::new()),
            Version::V5_0 => {
                if cursor == data.len() {
                    (PubackReasonCode::Success, Properties::new())
                } else {
                    let code = read_u8(data, &mut cursor)?;
                    let reason_code = PubackReasonCode::try_from(code)
                        .map_err(|_| CodecError::MalformedPacket)?;
                    let props = if cursor < data.len() {
                        let (props, consumed) =
                            parse_properties(&data[cursor..], PropertySection::Puback)?;
                        cursor += consumed;
                        props
                    } else {
                        Properties::new()
                    };
                    (reason_code, props)
                }
            }
        };

        if cursor != data.len() {
            return Err(CodecError::PayloadLengthMismatch);
        }

        Ok(Puback {
            packet_id,
            reason_code,
            props,
        })
    }
}

impl PubackBuilder {
    /// Sets the packet identifier.
    pub fn packet_id(mut self, id: u16) -> Self {
        self.packet_id = Some(id);
        self
    }

    /// Builds the packet.
    ///
    /// # Errors
    ///
    /// `CodecError::MalformedPacket` if the packet identifier is missing or
    /// zero.
    pub fn build(self) -> Result<Puback, CodecError> {
        let packet_id = self.packet_id.ok_or(CodecError::MalformedPacket)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Puback)?;

        Ok(Puback {
            packet_id,
            reason_code: self.reason_code.unwrap_or(PubackReasonCode::Success),
            props,
        })
    }
}

impl PacketMeta for Puback {
    fn packet_type(&self) -> PacketType {
        PacketType::Puback
    }
}

impl Serialize for Puback {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 3; // type, packet_id, reason_code
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("puback", field_count)?;
        state.serialize_field("type", PacketType::Puback.as_str())?;
        state.serialize_field("packet_id", &self.packet_id)?;
        state.serialize_field("reason_code", &self.reason_code)?;
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Puback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Puback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

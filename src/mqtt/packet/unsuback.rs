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
use crate::mqtt::result_code::UnsubackReasonCode;
use crate::mqtt::Version;

/// An UNSUBACK packet.
///
/// In v5.0 the payload carries one reason code per topic filter of the
/// UNSUBSCRIBE it acknowledges. The v3.1.1 wire has no reason codes at all,
/// so a value must have an empty code list to encode for v3.1.1 and decodes
/// to one.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Unsuback {
    /// Identifier of the UNSUBSCRIBE being acknowledged.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    packet_id: u16,
    reason_codes: Vec<UnsubackReasonCode>,
    props: Properties,
}

impl Unsuback {
    /// Creates a new builder.
    pub fn builder() -> UnsubackBuilder {
        UnsubackBuilder::default()
    }

    /// The per-filter reason codes (empty for v3.1.1).
    pub fn reason_codes(&self) -> &[UnsubackReasonCode] {
        &self.reason_codes
    }

    /// The UNSUBACK properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        steps.push(EncodeStep::U8(FixedHeader::Unsuback.as_u8()));
        match version {
            Version::V3_1_1 => {
                if !self.reason_codes.is_empty() || !self.props.is_empty() {
                    return Err(CodecError::ProtocolVersionMismatch);
                }
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(2)?));
                steps.push(EncodeStep::U16(self.packet_id));
            }
            Version::V5_0 => {
                if self.reason_codes.is_empty() {
                    return Err(CodecError::MalformedPacket);
                }
                let remaining =
                    2 + self.props.section_size() + self.reason_codes.len();
                let remaining =
                    u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
                steps.push(EncodeStep::U16(self.packet_id));
                self.props.push_section_steps(steps)?;
                for rc in &self.reason_codes {
                    steps.push(EncodeStep::U8(*rc as u8));
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

        let (reason_codes, props) = match version {
            Version::V3_1_1 => (Vec::new(), Properties::new()),
            Version::V5_0 => {
                let (props, consumed) =
                    parse_properties(&data[cursor..], PropertySection::Unsuback)?;
                cursor += consumed;
                let mut reason_codes = Vec::new();
                while cursor < data.len() {
                    let code = read_u8(data, &mut cursor)?;
                    let rc = UnsubackReasonCode::try_from(code)
                        .map_err(|_| CodecError::MalformedPacket)?;
                    reason_codes.push(rc);
                }
                if reason_codes.is_empty() {
                    return Err(CodecError::MalformedPacket);
                }
                (reason_codes, props)
            }
        };

        if cursor != data.len() {
            return Err(CodecError::PayloadLengthMismatch);
        }

        Ok(Unsuback {
            packet_id,
            reason_codes,
            props,
        })
    }
}

impl UnsubackBuilder {
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
    pub fn build(self) -> Result<Unsuback, CodecError> {
        let packet_id = self.packet_id.ok_or(CodecError::MalformedPacket)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Unsuback)?;

        Ok(Unsuback {
            packet_id,
            reason_codes: self.reason_codes.unwrap_or_default(),
            props,
        })
    }
}

impl PacketMeta for Unsuback {
    fn packet_type(&self) -> PacketType {
        PacketType::Unsuback
    }
}

impl Serialize for Unsuback {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 2; // type, packet_id
        if !self.reason_codes.is_empty() {
            field_count += 1;
        }
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("unsuback", field_count)?;
        state.serialize_field("type", PacketType::Unsuback.as_str())?;
        state.serialize_field("packet_id", &self.packet_id)?;
        if !self.reason_codes.is_empty() {
            state.serialize_field("reason_codes", &self.reason_codes)?;
        }
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Unsuback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Unsuback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

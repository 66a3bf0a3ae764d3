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
    parse_properties, read_u8, validate_properties, PacketMeta, Properties, PropertiesSize,
    PropertiesToSteps, PropertySection,
};
use crate::mqtt::result_code::DisconnectReasonCode;
use crate::mqtt::Version;

/// A DISCONNECT packet.
///
/// In v3.1.1 the packet is always the two bytes `E0 00`. In v5.0 the reason
/// code and properties are appended, with the shortest form chosen: a
/// `NormalDisconnection` without properties is `E0 00` as well, a bare
/// reason code adds one byte, and properties bring the full layout.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Disconnect {
    /// Why the connection is being closed.
    #[getset(get_copy = "pub")]
    reason_code: DisconnectReasonCode,
    props: Properties,
}

impl Disconnect {
    /// Creates a new builder. The reason code defaults to
    /// `NormalDisconnection`.
    pub fn builder() -> DisconnectBuilder {
        DisconnectBuilder::default()
    }

    /// The DISCONNECT properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        steps.push(EncodeStep::U8(FixedHeader::Disconnect.as_u8()));
        match version {
            Version::V3_1_1 => {
                if self.reason_code != DisconnectReasonCode::NormalDisconnection
                    || !self.props.is_empty()
                {
                    return Err(CodecError::ProtocolVersionMismatch);
                }
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(0)?));
            }
            Version::V5_0 => {
                if self.reason_code == DisconnectReasonCode::NormalDisconnection
                    && self.props.is_empty()
                {
                    // shortest form: reason code and properties elided
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(0)?));
                } else if self.props.is_empty() {
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(1)?));
                    steps.push(EncodeStep::U8(self.reason_code as u8));
                } else {
                    let remaining = 1 + self.props.section_size();
                    let remaining =
                        u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
                    steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
                    steps.push(EncodeStep::U8(self.reason_code as u8));
                    self.props.push_section_steps(steps)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<Self, CodecError> {
        match version {
            Version::V3_1_1 => {
                if !data.is_empty() {
                    return Err(CodecError::PayloadLengthMismatch);
                }
                Ok(Disconnect {
                    reason_code: DisconnectReasonCode::NormalDisconnection,
                    props: Properties::new(),
                })
            }
            Version::V5_0 => {
                if data.is_empty() {
                    return Ok(Disconnect {
                        reason_code: DisconnectReasonCode::NormalDisconnection,
                        props: Properties::new(),
                    });
                }
                let mut cursor = 0usize;
                let code = read_u8(data, &mut cursor)?;
                let reason_code = DisconnectReasonCode::try_from(code)
                    .map_err(|_| CodecError::MalformedPacket)?;
                let props = if cursor < data.len() {
                    let (props, consumed) =
                        parse_properties(&data[cursor..], PropertySection::Disconnect)?;
                    cursor += consumed;
                    props
                } else {
                    Properties::new()
                };
                if cursor != data.len() {
                    return Err(CodecError::PayloadLengthMismatch);
                }
                Ok(Disconnect { reason_code, props })
            }
        }
    }
}

impl DisconnectBuilder {
    /// Builds the packet, validating the property set.
    pub fn build(self) -> Result<Disconnect, CodecError> {
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Disconnect)?;

        Ok(Disconnect {
            reason_code: self
                .reason_code
                .unwrap_or(DisconnectReasonCode::NormalDisconnection),
            props,
        })
    }
}

impl PacketMeta for Disconnect {
    fn packet_type(&self) -> PacketType {
        PacketType::Disconnect
    }
}

impl Serialize for Disconnect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 2; // type, reason_code
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("disconnect", field_count)?;
        state.serialize_field("type", PacketType::Disconnect.as_str())?;
        state.serialize_field("reason_code", &self.reason_code)?;
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

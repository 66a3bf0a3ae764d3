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
use crate::mqtt::result_code::{ConnectReasonCode, ConnectReturnCode};
use crate::mqtt::Version;

/// A CONNACK packet.
///
/// The two protocol versions put different code spaces in the second
/// variable-header byte, so the value carries one optional code per version
/// and each mode's codec requires its own: a v3.1.1 encode needs
/// `return_code`, a v5.0 encode needs `reason_code`.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Connack {
    /// Whether the server resumed a stored session.
    #[getset(get_copy = "pub")]
    session_present: bool,
    /// The v3.1.1 return code.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    return_code: Option<ConnectReturnCode>,
    /// The v5.0 reason code.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    reason_code: Option<ConnectReasonCode>,
    props: Properties,
}

impl Connack {
    /// Creates a new builder.
    pub fn builder() -> ConnackBuilder {
        ConnackBuilder::default()
    }

    /// The CONNACK properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        steps.push(EncodeStep::U8(FixedHeader::Connack.as_u8()));
        match version {
            Version::V3_1_1 => {
                let return_code = self
                    .return_code
                    .ok_or(CodecError::ProtocolVersionMismatch)?;
                if !self.props.is_empty() {
                    return Err(CodecError::ProtocolVersionMismatch);
                }
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(2)?));
                steps.push(EncodeStep::U8(self.session_present as u8));
                steps.push(EncodeStep::U8(return_code as u8));
            }
            Version::V5_0 => {
                let reason_code = self
                    .reason_code
                    .ok_or(CodecError::ProtocolVersionMismatch)?;
                let remaining = 2 + self.props.section_size();
                let remaining =
                    u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
                steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
                steps.push(EncodeStep::U8(self.session_present as u8));
                steps.push(EncodeStep::U8(reason_code as u8));
                self.props.push_section_steps(steps)?;
            }
        }
        Ok(())
    }

    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = 0usize;

        let ack_flags = read_u8(data, &mut cursor)?;
        if ack_flags & !0b0000_0001 != 0 {
            return Err(CodecError::MalformedPacket);
        }
        let session_present = ack_flags & 0b0000_0001 != 0;

        let code = read_u8(data, &mut cursor)?;
        let (return_code, reason_code, props) = match version {
            Version::V3_1_1 => {
                let return_code =
                    ConnectReturnCode::try_from(code).map_err(|_| CodecError::MalformedPacket)?;
                (Some(return_code), None, Properties::new())
            }
            Version::V5_0 => {
                let reason_code =
                    ConnectReasonCode::try_from(code).map_err(|_| CodecError::MalformedPacket)?;
                let (props, consumed) =
                    parse_properties(&data[cursor..], PropertySection::Connack)?;
                cursor += consumed;
                (None, Some(reason_code), props)
            }
        };

        if cursor != data.len() {
            return Err(CodecError::PayloadLengthMismatch);
        }

        Ok(Connack {
            session_present,
            return_code,
            reason_code,
            props,
        })
    }
}

impl ConnackBuilder {
    /// Sets the v3.1.1 return code.
    pub fn return_code(mut self, rc: ConnectReturnCode) -> Self {
        self.return_code = Some(Some(rc));
        self
    }

    /// Sets the v5.0 reason code.
    pub fn reason_code(mut self, rc: ConnectReasonCode) -> Self {
        self.reason_code = Some(Some(rc));
        self
    }

    /// Builds the packet. Exactly one of the version codes must be set.
    pub fn build(self) -> Result<Connack, CodecError> {
        let return_code = self.return_code.flatten();
        let reason_code = self.reason_code.flatten();
        if return_code.is_none() == reason_code.is_none() {
            return Err(CodecError::MalformedPacket);
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Connack)?;

        Ok(Connack {
            session_present: self.session_present.unwrap_or(false),
            return_code,
            reason_code,
            props,
        })
    }
}

impl PacketMeta for Connack {
    fn packet_type(&self) -> PacketType {
        PacketType::Connack
    }
}

impl Serialize for Connack {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 2; // type, session_present
        if self.return_code.is_some() {
            field_count += 1;
        }
        if self.reason_code.is_some() {
            field_count += 1;
        }
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("connack", field_count)?;
        state.serialize_field("type", PacketType::Connack.as_str())?;
        state.serialize_field("session_present", &self.session_present)?;
        if let Some(return_code) = &self.return_code {
            state.serialize_field("return_code", return_code)?;
        }
        if let Some(reason_code) = &self.reason_code {
            state.serialize_field("reason_code", reason_code)?;
        }
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Connack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Connack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

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
use crate::mqtt::result_code::SubackReasonCode;
use crate::mqtt::Version;

/// A SUBACK packet.
///
/// Carries one reason code per subscription entry of the SUBSCRIBE it
/// acknowledges, in the same order. The v3.1.1 wire only knows the granted
/// QoS values and the failure code.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Suback {
    /// Identifier of the SUBSCRIBE being acknowledged.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    packet_id: u16,
    reason_codes: Vec<SubackReasonCode>,
    props: Properties,
}

impl Suback {
    /// Creates a new builder.
    pub fn builder() -> SubackBuilder {
        SubackBuilder::default()
    }

    /// The per-entry reason codes.
    pub fn reason_codes(&self) -> &[SubackReasonCode] {
        &self.reason_codes
    }

    /// The SUBACK properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        if version == Version::V3_1_1 {
            if !self.props.is_empty() {
                return Err(CodecError::ProtocolVersionMismatch);
            }
            if !self.reason_codes.iter().all(|rc| rc.is_v3_1_1()) {
                return Err(CodecError::ProtocolVersionMismatch);
            }
        }

        let mut remaining = 2usize;
        if version == Version::V5_0 {
            remaining += self.props.section_size();
        }
        remaining += self.reason_codes.len();

        steps.push(EncodeStep::U8(FixedHeader::Suback.as_u8()));
        let remaining = u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
        steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
        steps.push(EncodeStep::U16(self.packet_id));
        if version == Version::V5_0 {
            self.props.push_section_steps(steps)?;
        }
        for rc in &self.reason_codes {
            steps.push(EncodeStep::U8(*rc as u8));
        }
        Ok(())
    }

    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = 0usize;

        let packet_id = read_u16(data, &mut cursor)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }

        let props = if version == Version::V5_0 {
            let (props, consumed) = parse_properties(&data[cursor..], PropertySection::Suback)?;
            cursor += consumed;
            props
        } else {
            Properties::new()
        };

        let mut reason_codes = Vec::new();
        while cursor < data.len() {
            let code = read_u8(data, &mut cursor)?;
            let rc =
                SubackReasonCode::try_from(code).map_err(|_| CodecError::MalformedPacket)?;
            if version == Version::V3_1_1 && !rc.is_v3_1_1() {
                return Err(CodecError::MalformedPacket);
            }
            reason_codes.push(rc);
        }
        if reason_codes.is_empty() {
            return Err(CodecError::MalformedPacket);
        }

        Ok(Suback {
            packet_id,
            reason_codes,
            props,
        })
    }
}

impl SubackBuilder {
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
    /// zero, or no reason codes are present.
    pub fn build(self) -> Result<Suback, CodecError> {
        let packet_id = self.packet_id.ok_or(CodecError::MalformedPacket)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }
        let reason_codes = self.reason_codes.unwrap_or_default();
        if reason_codes.is_empty() {
            return Err(CodecError::MalformedPacket);
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Suback)?;

        Ok(Suback {
            packet_id,
            reason_codes,
            props,
        })
    }
}

impl PacketMeta for Suback {
    fn packet_type(&self) -> PacketType {
        PacketType::Suback
    }
}

impl Serialize for Suback {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 3; // type, packet_id, reason_codes
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("suback", field_count)?;
        state.serialize_field("type", PacketType::Suback.as_str())?;
        state.serialize_field("packet_id", &self.packet_id)?;
        state.serialize_field("reason_codes", &self.reason_codes)?;
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Suback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Suback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

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
    parse_properties, read_u16, validate_properties, MqttString, PacketMeta, Properties,
    PropertiesSize, PropertiesToSteps, PropertySection,
};
use crate::mqtt::Version;

/// An UNSUBSCRIBE packet.
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Unsubscribe {
    /// Packet identifier correlating the UNSUBACK.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    packet_id: u16,
    #[builder(setter(custom))]
    topic_filters: Vec<MqttString>,
    props: Properties,
}

impl Unsubscribe {
    /// Creates a new builder.
    pub fn builder() -> UnsubscribeBuilder {
        UnsubscribeBuilder::default()
    }

    /// The topic filters to remove.
    pub fn topic_filters(&self) -> impl Iterator<Item = &str> {
        self.topic_filters.iter().map(MqttString::as_str)
    }

    /// The UNSUBSCRIBE properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        if version == Version::V3_1_1 && !self.props.is_empty() {
            return Err(CodecError::ProtocolVersionMismatch);
        }

        let mut remaining = 2usize;
        if version == Version::V5_0 {
            remaining += self.props.section_size();
        }
        remaining += self
            .topic_filters
            .iter()
            .map(MqttString::size)
            .sum::<usize>();

        steps.push(EncodeStep::U8(FixedHeader::Unsubscribe.as_u8()));
        let remaining = u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
        steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
        steps.push(EncodeStep::U16(self.packet_id));
        if version == Version::V5_0 {
            self.props.push_section_steps(steps)?;
        }
        for filter in &self.topic_filters {
            steps.push(EncodeStep::Bytes(filter.as_bytes()));
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
            let (props, consumed) =
                parse_properties(&data[cursor..], PropertySection::Unsubscribe)?;
            cursor += consumed;
            props
        } else {
            Properties::new()
        };

        let mut topic_filters = Vec::new();
        while cursor < data.len() {
            let (filter, consumed) = MqttString::decode(&data[cursor..])?;
            cursor += consumed;
            topic_filters.push(filter);
        }
        if topic_filters.is_empty() {
            return Err(CodecError::MalformedPacket);
        }

        Ok(Unsubscribe {
            packet_id,
            topic_filters,
            props,
        })
    }
}

impl UnsubscribeBuilder {
    /// Sets the packet identifier.
    pub fn packet_id(mut self, id: u16) -> Self {
        self.packet_id = Some(id);
        self
    }

    /// Appends a topic filter.
    pub fn topic_filter(mut self, v: impl AsRef<str>) -> Result<Self, CodecError> {
        let mut filters = self.topic_filters.take().unwrap_or_default();
        filters.push(MqttString::new(v)?);
        self.topic_filters = Some(filters);
        Ok(self)
    }

    /// Builds the packet.
    ///
    /// # Errors
    ///
    /// `CodecError::MalformedPacket` if the packet identifier is missing or
    /// zero, or no topic filters are present.
    pub fn build(self) -> Result<Unsubscribe, CodecError> {
        let packet_id = self.packet_id.ok_or(CodecError::MalformedPacket)?;
        if packet_id == 0 {
            return Err(CodecError::MalformedPacket);
        }
        let topic_filters = self.topic_filters.unwrap_or_default();
        if topic_filters.is_empty() {
            return Err(CodecError::MalformedPacket);
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Unsubscribe)?;

        Ok(Unsubscribe {
            packet_id,
            topic_filters,
            props,
        })
    }
}

impl PacketMeta for Unsubscribe {
    fn packet_type(&self) -> PacketType {
        PacketType::Unsubscribe
    }
}

impl Serialize for Unsubscribe {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 3; // type, packet_id, topic_filters
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("unsubscribe", field_count)?;
        state.serialize_field("type", PacketType::Unsubscribe.as_str())?;
        state.serialize_field("packet_id", &self.packet_id)?;
        state.serialize_field("topic_filters", &self.topic_filters)?;
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

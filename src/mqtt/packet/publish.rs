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
    PropertiesSize, PropertiesToSteps, PropertySection, Qos,
};
use crate::mqtt::Version;

/// A PUBLISH packet.
///
/// Carries an application message in either direction. The DUP, QoS, and
/// RETAIN flags live in the fixed header's low nibble; the payload is opaque
/// bytes running to the end of the packet. A packet identifier exists if and
/// only if the QoS is greater than 0.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::packet::{Publish, Qos};
///
/// let publish = Publish::builder()
///     .topic_name("room/temperature")
///     .unwrap()
///     .qos(Qos::AtLeastOnce)
///     .packet_id(17u16)
///     .payload(b"21.5")
///     .build()
///     .unwrap();
/// ```
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Publish {
    /// Duplicate delivery flag.
    #[getset(get_copy = "pub")]
    dup: bool,
    /// Quality of service level.
    #[getset(get_copy = "pub")]
    qos: Qos,
    /// Retain flag.
    #[getset(get_copy = "pub")]
    retain: bool,
    #[builder(setter(custom))]
    topic_name: MqttString,
    /// Packet identifier; present exactly when the QoS is above 0.
    #[builder(setter(custom))]
    #[getset(get_copy = "pub")]
    packet_id: Option<u16>,
    props: Properties,
    #[builder(setter(custom))]
    payload: Vec<u8>,
}

impl Publish {
    /// Creates a new builder. QoS defaults to 0 with no packet identifier,
    /// flags clear, and an empty payload.
    pub fn builder() -> PublishBuilder {
        PublishBuilder::default()
    }

    /// The topic name.
    pub fn topic_name(&self) -> &str {
        self.topic_name.as_str()
    }

    /// The PUBLISH properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    /// The application payload, possibly empty.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn first_byte(&self) -> u8 {
        let mut byte = FixedHeader::Publish.as_u8();
        if self.dup {
            byte |= 0b0000_1000;
        }
        byte |= (self.qos as u8) << 1;
        if self.retain {
            byte |= 0b0000_0001;
        }
        byte
    }

    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        if (self.qos > Qos::AtMostOnce) != self.packet_id.is_some() {
            return Err(CodecError::MalformedPacket);
        }
        if version == Version::V3_1_1 && !self.props.is_empty() {
            return Err(CodecError::ProtocolVersionMismatch);
        }

        let mut remaining = self.topic_name.size();
        if self.packet_id.is_some() {
            remaining += 2;
        }
        if version == Version::V5_0 {
            remaining += self.props.section_size();
        }
        remaining += self.payload.len();

        steps.push(EncodeStep::U8(self.first_byte()));
        let remaining = u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
        steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
        steps.push(EncodeStep::Bytes(self.topic_name.as_bytes()));
        if let Some(packet_id) = self.packet_id {
            steps.push(EncodeStep::U16(packet_id));
        }
        if version == Version::V5_0 {
            self.props.push_section_steps(steps)?;
        }
        if !self.payload.is_empty() {
            steps.push(EncodeStep::Bytes(&self.payload));
        }
        Ok(())
    }

    /// Parses a PUBLISH payload. `flags` is the fixed header's low nibble.
    pub(crate) fn parse(version: Version, flags: u8, data: &[u8]) -> Result<Self, CodecError> {
        let qos = match (flags >> 1) & 0b0000_0011 {
            0 => Qos::AtMostOnce,
            1 => Qos::AtLeastOnce,
            2 => Qos::ExactlyOnce,
            _ => return Err(CodecError::InvalidFixedHeader),
        };
        let dup = flags & 0b0000_1000 != 0;
        let retain = flags & 0b0000_0001 != 0;

        let mut cursor = 0usize;
        let (topic_name, consumed) = MqttString::decode(data)?;
        cursor += consumed;

        let packet_id = if qos > Qos::AtMostOnce {
            let id = read_u16(data, &mut cursor)?;
            if id == 0 {
                return Err(CodecError::MalformedPacket);
            }
            Some(id)
        } else {
            None
        };

        let props = if version == Version::V5_0 {
            let (props, consumed) = parse_properties(&data[cursor..], PropertySection::Publish)?;
            cursor += consumed;
            props
        } else {
            Properties::new()
        };

        let payload = data[cursor..].to_vec();

        Ok(Publish {
            dup,
            qos,
            retain,
            topic_name,
            packet_id,
            props,
            payload,
        })
    }
}

impl PublishBuilder {
    /// Sets the topic name.
    pub fn topic_name(mut self, v: impl AsRef<str>) -> Result<Self, CodecError> {
        self.topic_name = Some(MqttString::new(v)?);
        Ok(self)
    }

    /// Sets the packet identifier.
    pub fn packet_id(mut self, id: u16) -> Self {
        self.packet_id = Some(Some(id));
        self
    }

    /// Sets the application payload.
    pub fn payload(mut self, v: impl AsRef<[u8]>) -> Self {
        self.payload = Some(v.as_ref().to_vec());
        self
    }

    /// Builds the packet.
    ///
    /// # Errors
    ///
    /// `CodecError::MalformedPacket` if the topic name is missing, a QoS 0
    /// packet carries a packet identifier, a QoS above 0 lacks one or it is
    /// zero.
    pub fn build(self) -> Result<Publish, CodecError> {
        let topic_name = self.topic_name.ok_or(CodecError::MalformedPacket)?;
        let qos = self.qos.unwrap_or(Qos::AtMostOnce);
        let packet_id = self.packet_id.flatten();
        match qos {
            Qos::AtMostOnce => {
                if packet_id.is_some() {
                    return Err(CodecError::MalformedPacket);
                }
            }
            _ => match packet_id {
                Some(0) | None => return Err(CodecError::MalformedPacket),
                Some(_) => {}
            },
        }
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Publish)?;

        Ok(Publish {
            dup: self.dup.unwrap_or(false),
            qos,
            retain: self.retain.unwrap_or(false),
            topic_name,
            packet_id,
            props,
            payload: self.payload.unwrap_or_default(),
        })
    }
}

impl PacketMeta for Publish {
    fn packet_type(&self) -> PacketType {
        PacketType::Publish
    }
}

impl Serialize for Publish {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 6; // type, topic_name, qos, retain, dup, payload
        if self.packet_id.is_some() {
            field_count += 1;
        }
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("publish", field_count)?;
        state.serialize_field("type", PacketType::Publish.as_str())?;
        state.serialize_field("topic_name", &self.topic_name)?;
        state.serialize_field("qos", &self.qos)?;
        state.serialize_field("retain", &self.retain)?;
        state.serialize_field("dup", &self.dup)?;
        if let Some(packet_id) = &self.packet_id {
            state.serialize_field("packet_id", packet_id)?;
        }
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.serialize_field("payload", &self.payload)?;
        state.end()
    }
}

impl fmt::Display for Publish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Publish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

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
    parse_properties, read_u16, read_u8, validate_properties, MqttBinary, MqttString, PacketMeta,
    Properties, PropertiesSize, PropertiesToSteps, PropertySection, Qos,
};
use crate::mqtt::Version;

/// Protocol name field shared by both versions: length prefix plus "MQTT".
const PROTOCOL_NAME: [u8; 6] = [0x00, 0x04, b'M', b'Q', b'T', b'T'];

/// A will message configured in a CONNECT packet.
///
/// Published by the server on the client's behalf when the connection ends
/// abnormally. The properties are the will's own property section and exist
/// only on the v5.0 wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Will {
    pub(crate) topic: MqttString,
    pub(crate) payload: MqttBinary,
    pub(crate) qos: Qos,
    pub(crate) retain: bool,
    pub(crate) props: Properties,
}

impl Will {
    /// Creates a will message without properties.
    ///
    /// # Errors
    ///
    /// `CodecError::ValueOutOfRange` if the topic or payload exceeds 65 535
    /// bytes.
    pub fn new(
        topic: impl AsRef<str>,
        payload: impl AsRef<[u8]>,
        qos: Qos,
        retain: bool,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            topic: MqttString::new(topic)?,
            payload: MqttBinary::new(payload)?,
            qos,
            retain,
            props: Properties::new(),
        })
    }

    /// Attaches will properties (v5.0).
    ///
    /// # Errors
    ///
    /// `CodecError::UnknownPropertyCode` for a property the will section
    /// does not permit.
    pub fn with_props(mut self, props: Properties) -> Result<Self, CodecError> {
        validate_properties(&props, PropertySection::Will)?;
        self.props = props;
        Ok(self)
    }

    /// The will topic.
    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    /// The will payload.
    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    /// The will QoS.
    pub fn qos(&self) -> Qos {
        self.qos
    }

    /// The will retain flag.
    pub fn retain(&self) -> bool {
        self.retain
    }

    /// The will properties.
    pub fn props(&self) -> &Properties {
        &self.props
    }
}

impl Serialize for Will {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 4;
        if !self.props.is_empty() {
            field_count += 1;
        }
        let mut state = serializer.serialize_struct("will", field_count)?;
        state.serialize_field("topic", &self.topic)?;
        state.serialize_field("payload", &self.payload)?;
        state.serialize_field("qos", &self.qos)?;
        state.serialize_field("retain", &self.retain)?;
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

/// A CONNECT packet.
///
/// The first packet a client sends on a fresh connection. One value covers
/// both protocol versions: the properties (and will properties) only exist
/// on the v5.0 wire, and a v3.1.1 encode rejects a value that carries them.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::packet::Connect;
///
/// let connect = Connect::builder()
///     .client_id("sensor-17")
///     .unwrap()
///     .clean_start(true)
///     .keep_alive(30u16)
///     .build()
///     .unwrap();
/// assert_eq!(connect.client_id(), "sensor-17");
/// ```
#[derive(PartialEq, Eq, Clone, Builder, CopyGetters)]
#[builder(no_std, derive(Debug), pattern = "owned", setter(into), build_fn(skip))]
pub struct Connect {
    /// Clean session (v3.1.1) / clean start (v5.0) flag.
    #[getset(get_copy = "pub")]
    clean_start: bool,
    /// Keep alive interval in seconds; 0 disables the keep alive mechanism.
    #[getset(get_copy = "pub")]
    keep_alive: u16,
    #[builder(setter(custom))]
    client_id: MqttString,
    #[builder(setter(custom))]
    will: Option<Will>,
    #[builder(setter(custom))]
    user_name: Option<MqttString>,
    #[builder(setter(custom))]
    password: Option<MqttBinary>,
    props: Properties,
}

impl Connect {
    /// Creates a new builder. `clean_start` defaults to `true`, the keep
    /// alive to 0, and the client identifier to the empty string.
    pub fn builder() -> ConnectBuilder {
        ConnectBuilder::default()
    }

    /// The client identifier.
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// The will message, if one is configured.
    pub fn will(&self) -> Option<&Will> {
        self.will.as_ref()
    }

    /// The user name, if present.
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_ref().map(MqttString::as_str)
    }

    /// The password, if present.
    pub fn password(&self) -> Option<&[u8]> {
        self.password.as_ref().map(MqttBinary::as_slice)
    }

    /// The CONNECT properties (v5.0).
    pub fn props(&self) -> &Properties {
        &self.props
    }

    /// The connect flags byte. Every presence bit is derived from whether
    /// the corresponding field is set, never from its value.
    fn connect_flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.clean_start {
            flags |= 0b0000_0010;
        }
        if let Some(will) = &self.will {
            flags |= 0b0000_0100;
            flags |= (will.qos as u8) << 3;
            if will.retain {
                flags |= 0b0010_0000;
            }
        }
        if self.user_name.is_some() {
            flags |= 0b1000_0000;
        }
        if self.password.is_some() {
            flags |= 0b0100_0000;
        }
        flags
    }

    /// Appends the packet's encoding steps for `version`.
    pub(crate) fn encode_steps<'a>(
        &'a self,
        version: Version,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        if version == Version::V3_1_1 {
            if self.password.is_some() && self.user_name.is_none() {
                return Err(CodecError::MalformedPacket);
            }
            if !self.props.is_empty()
                || self.will.as_ref().is_some_and(|w| !w.props.is_empty())
            {
                return Err(CodecError::ProtocolVersionMismatch);
            }
        }

        let mut remaining = PROTOCOL_NAME.len() + 1 + 1 + 2;
        if version == Version::V5_0 {
            remaining += self.props.section_size();
        }
        remaining += self.client_id.size();
        if let Some(will) = &self.will {
            if version == Version::V5_0 {
                remaining += will.props.section_size();
            }
            remaining += will.topic.size() + will.payload.size();
        }
        if let Some(user_name) = &self.user_name {
            remaining += user_name.size();
        }
        if let Some(password) = &self.password {
            remaining += password.size();
        }

        steps.push(EncodeStep::U8(FixedHeader::Connect.as_u8()));
        let remaining = u32::try_from(remaining).map_err(|_| CodecError::ValueOutOfRange)?;
        steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(remaining)?));
        steps.push(EncodeStep::Bytes(&PROTOCOL_NAME));
        steps.push(EncodeStep::U8(version.protocol_level()));
        steps.push(EncodeStep::U8(self.connect_flags()));
        steps.push(EncodeStep::U16(self.keep_alive));
        if version == Version::V5_0 {
            self.props.push_section_steps(steps)?;
        }
        steps.push(EncodeStep::Bytes(self.client_id.as_bytes()));
        if let Some(will) = &self.will {
            if version == Version::V5_0 {
                will.props.push_section_steps(steps)?;
            }
            steps.push(EncodeStep::Bytes(will.topic.as_bytes()));
            steps.push(EncodeStep::Bytes(will.payload.as_bytes()));
        }
        if let Some(user_name) = &self.user_name {
            steps.push(EncodeStep::Bytes(user_name.as_bytes()));
        }
        if let Some(password) = &self.password {
            steps.push(EncodeStep::Bytes(password.as_bytes()));
        }
        Ok(())
    }

    /// Parses a CONNECT payload (everything after the remaining length).
    pub(crate) fn parse(version: Version, data: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = 0usize;

        let name = data.get(..6).ok_or(CodecError::ShortBuffer)?;
        if name != PROTOCOL_NAME {
            return Err(CodecError::MalformedPacket);
        }
        cursor += 6;

        let level = read_u8(data, &mut cursor)?;
        if level != version.protocol_level() {
            return Err(CodecError::ProtocolVersionMismatch);
        }

        let flags = read_u8(data, &mut cursor)?;
        if flags & 0b0000_0001 != 0 {
            return Err(CodecError::MalformedPacket);
        }
        let keep_alive = read_u16(data, &mut cursor)?;

        let props = if version == Version::V5_0 {
            let (props, consumed) = parse_properties(&data[cursor..], PropertySection::Connect)?;
            cursor += consumed;
            props
        } else {
            Properties::new()
        };

        let (client_id, consumed) = MqttString::decode(&data[cursor..])?;
        cursor += consumed;

        let will_flag = flags & 0b0000_0100 != 0;
        let will_qos_bits = (flags >> 3) & 0b0000_0011;
        let will_retain = flags & 0b0010_0000 != 0;
        if will_qos_bits == 3 {
            return Err(CodecError::MalformedPacket);
        }
        if !will_flag && (will_qos_bits != 0 || will_retain) {
            return Err(CodecError::MalformedPacket);
        }

        let will = if will_flag {
            let will_props = if version == Version::V5_0 {
                let (will_props, consumed) =
                    parse_properties(&data[cursor..], PropertySection::Will)?;
                cursor += consumed;
                will_props
            } else {
                Properties::new()
            };
            let (topic, consumed) = MqttString::decode(&data[cursor..])?;
            cursor += consumed;
            let (payload, consumed) = MqttBinary::decode(&data[cursor..])?;
            cursor += consumed;
            let qos = match will_qos_bits {
                0 => Qos::AtMostOnce,
                1 => Qos::AtLeastOnce,
                _ => Qos::ExactlyOnce,
            };
            Some(Will {
                topic,
                payload,
                qos,
                retain: will_retain,
                props: will_props,
            })
        } else {
            None
        };

        let user_name_flag = flags & 0b1000_0000 != 0;
        let password_flag = flags & 0b0100_0000 != 0;
        if version == Version::V3_1_1 && password_flag && !user_name_flag {
            return Err(CodecError::MalformedPacket);
        }

        let user_name = if user_name_flag {
            let (user_name, consumed) = MqttString::decode(&data[cursor..])?;
            cursor += consumed;
            Some(user_name)
        } else {
            None
        };
        let password = if password_flag {
            let (password, consumed) = MqttBinary::decode(&data[cursor..])?;
            cursor += consumed;
            Some(password)
        } else {
            None
        };

        if cursor != data.len() {
            return Err(CodecError::PayloadLengthMismatch);
        }

        Ok(Connect {
            clean_start: flags & 0b0000_0010 != 0,
            keep_alive,
            client_id,
            will,
            user_name,
            password,
            props,
        })
    }
}

impl ConnectBuilder {
    /// Sets the client identifier.
    pub fn client_id(mut self, v: impl AsRef<str>) -> Result<Self, CodecError> {
        self.client_id = Some(MqttString::new(v)?);
        Ok(self)
    }

    /// Configures a will message.
    pub fn will(mut self, will: Will) -> Self {
        self.will = Some(Some(will));
        self
    }

    /// Sets the user name.
    pub fn user_name(mut self, v: impl AsRef<str>) -> Result<Self, CodecError> {
        self.user_name = Some(Some(MqttString::new(v)?));
        Ok(self)
    }

    /// Sets the password.
    pub fn password(mut self, v: impl AsRef<[u8]>) -> Result<Self, CodecError> {
        self.password = Some(Some(MqttBinary::new(v)?));
        Ok(self)
    }

    /// Builds the packet, validating the property sets.
    pub fn build(self) -> Result<Connect, CodecError> {
        let props = self.props.unwrap_or_default();
        validate_properties(&props, PropertySection::Connect)?;
        let will = self.will.flatten();
        if let Some(will) = &will {
            validate_properties(&will.props, PropertySection::Will)?;
        }

        Ok(Connect {
            clean_start: self.clean_start.unwrap_or(true),
            keep_alive: self.keep_alive.unwrap_or(0),
            client_id: self.client_id.unwrap_or_default(),
            will,
            user_name: self.user_name.flatten(),
            password: self.password.flatten(),
            props,
        })
    }
}

impl PacketMeta for Connect {
    fn packet_type(&self) -> PacketType {
        PacketType::Connect
    }
}

impl Serialize for Connect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut field_count = 4; // type, client_id, clean_start, keep_alive
        if self.will.is_some() {
            field_count += 1;
        }
        if self.user_name.is_some() {
            field_count += 1;
        }
        if self.password.is_some() {
            field_count += 1;
        }
        if !self.props.is_empty() {
            field_count += 1;
        }

        let mut state = serializer.serialize_struct("connect", field_count)?;
        state.serialize_field("type", PacketType::Connect.as_str())?;
        state.serialize_field("client_id", &self.client_id)?;
        state.serialize_field("clean_start", &self.clean_start)?;
        state.serialize_field("keep_alive", &self.keep_alive)?;
        if let Some(will) = &self.will {
            state.serialize_field("will", will)?;
        }
        if let Some(user_name) = &self.user_name {
            state.serialize_field("user_name", user_name)?;
        }
        if let Some(password) = &self.password {
            state.serialize_field("password", password)?;
        }
        if !self.props.is_empty() {
            state.serialize_field("props", &self.props)?;
        }
        state.end()
    }
}

impl fmt::Display for Connect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

impl fmt::Debug for Connect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

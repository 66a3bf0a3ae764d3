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

//! The MQTT v5.0 property framework.
//!
//! A property section is a variable byte integer length followed by zero or
//! more `(code, payload)` entries. Each code has a fixed wire shape and a
//! fixed set of packet types it may appear in. The encoder emits entries in
//! source order (which thereby defines the canonical order); the decoder
//! accepts any order.

use alloc::vec::Vec;
use core::fmt;

use num_enum::TryFromPrimitive;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::mqtt::codec::EncodeStep;
use crate::mqtt::error::CodecError;
use crate::mqtt::packet::variable_byte_integer::VariableByteInteger;
use crate::mqtt::packet::{read_u16, read_u32, read_u8, MqttBinary, MqttString};

/// MQTT v5.0 property identifier
///
/// The discriminants are the property codes assigned by the protocol.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PropertyId {
    PayloadFormatIndicator = 1,
    MessageExpiryInterval = 2,
    ContentType = 3,
    ResponseTopic = 8,
    CorrelationData = 9,
    SubscriptionIdentifier = 11,
    SessionExpiryInterval = 17,
    AssignedClientIdentifier = 18,
    ServerKeepAlive = 19,
    AuthenticationMethod = 21,
    AuthenticationData = 22,
    RequestProblemInformation = 23,
    WillDelayInterval = 24,
    RequestResponseInformation = 25,
    ResponseInformation = 26,
    ServerReference = 28,
    ReasonString = 31,
    ReceiveMaximum = 33,
    TopicAliasMaximum = 34,
    TopicAlias = 35,
    MaximumQos = 36,
    RetainAvailable = 37,
    UserProperty = 38,
    MaximumPacketSize = 39,
    WildcardSubscriptionAvailable = 40,
    SubscriptionIdentifierAvailable = 41,
    SharedSubscriptionAvailable = 42,
}

/// The property sections a property code can appear in.
///
/// One per packet type that carries properties, plus the will section inside
/// CONNECT, which has its own permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertySection {
    Connect,
    Will,
    Connack,
    Publish,
    Puback,
    Subscribe,
    Suback,
    Unsubscribe,
    Unsuback,
    Disconnect,
}

impl PropertyId {
    /// Lowercase name, used for logging and JSON serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyId::PayloadFormatIndicator => "payload_format_indicator",
            PropertyId::MessageExpiryInterval => "message_expiry_interval",
            PropertyId::ContentType => "content_type",
            PropertyId::ResponseTopic => "response_topic",
            PropertyId::CorrelationData => "correlation_data",
            PropertyId::SubscriptionIdentifier => "subscription_identifier",
            PropertyId::SessionExpiryInterval => "session_expiry_interval",
            PropertyId::AssignedClientIdentifier => "assigned_client_identifier",
            PropertyId::ServerKeepAlive => "server_keep_alive",
            PropertyId::AuthenticationMethod => "authentication_method",
            PropertyId::AuthenticationData => "authentication_data",
            PropertyId::RequestProblemInformation => "request_problem_information",
            PropertyId::WillDelayInterval => "will_delay_interval",
            PropertyId::RequestResponseInformation => "request_response_information",
            PropertyId::ResponseInformation => "response_information",
            PropertyId::ServerReference => "server_reference",
            PropertyId::ReasonString => "reason_string",
            PropertyId::ReceiveMaximum => "receive_maximum",
            PropertyId::TopicAliasMaximum => "topic_alias_maximum",
            PropertyId::TopicAlias => "topic_alias",
            PropertyId::MaximumQos => "maximum_qos",
            PropertyId::RetainAvailable => "retain_available",
            PropertyId::UserProperty => "user_property",
            PropertyId::MaximumPacketSize => "maximum_packet_size",
            PropertyId::WildcardSubscriptionAvailable => "wildcard_subscription_available",
            PropertyId::SubscriptionIdentifierAvailable => "subscription_identifier_available",
            PropertyId::SharedSubscriptionAvailable => "shared_subscription_available",
        }
    }

    /// Whether the protocol permits this code inside `section`.
    pub fn allowed_in(self, section: PropertySection) -> bool {
        use PropertySection::*;
        match self {
            PropertyId::PayloadFormatIndicator => matches!(section, Will | Publish),
            PropertyId::MessageExpiryInterval => matches!(section, Will | Publish),
            PropertyId::ContentType => matches!(section, Will | Publish),
            PropertyId::ResponseTopic => matches!(section, Will | Publish),
            PropertyId::CorrelationData => matches!(section, Will | Publish),
            PropertyId::SubscriptionIdentifier => matches!(section, Publish | Subscribe),
            PropertyId::SessionExpiryInterval => {
                matches!(section, Connect | Connack | Disconnect)
            }
            PropertyId::AssignedClientIdentifier => matches!(section, Connack),
            PropertyId::ServerKeepAlive => matches!(section, Connack),
            PropertyId::AuthenticationMethod => matches!(section, Connect | Connack),
            PropertyId::AuthenticationData => matches!(section, Connect | Connack),
            PropertyId::RequestProblemInformation => matches!(section, Connect),
            PropertyId::WillDelayInterval => matches!(section, Will),
            PropertyId::RequestResponseInformation => matches!(section, Connect),
            PropertyId::ResponseInformation => matches!(section, Connack),
            PropertyId::ServerReference => matches!(section, Connack | Disconnect),
            PropertyId::ReasonString => {
                matches!(section, Connack | Puback | Suback | Unsuback | Disconnect)
            }
            PropertyId::ReceiveMaximum => matches!(section, Connect | Connack),
            PropertyId::TopicAliasMaximum => matches!(section, Connect | Connack),
            PropertyId::TopicAlias => matches!(section, Publish),
            PropertyId::MaximumQos => matches!(section, Connack),
            PropertyId::RetainAvailable => matches!(section, Connack),
            PropertyId::UserProperty => true,
            PropertyId::MaximumPacketSize => matches!(section, Connect | Connack),
            PropertyId::WildcardSubscriptionAvailable => matches!(section, Connack),
            PropertyId::SubscriptionIdentifierAvailable => matches!(section, Connack),
            PropertyId::SharedSubscriptionAvailable => matches!(section, Connack),
        }
    }

    /// Whether the code may legally repeat inside one section.
    fn repeatable_in(self, section: PropertySection) -> bool {
        match self {
            PropertyId::UserProperty => true,
            PropertyId::SubscriptionIdentifier => section == PropertySection::Publish,
            _ => false,
        }
    }
}

impl Serialize for PropertyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload format indicator values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PayloadFormat {
    /// Payload is unspecified bytes (binary data)
    Binary = 0,
    /// Payload is UTF-8 encoded character data
    String = 1,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayloadFormat::Binary => "binary",
            PayloadFormat::String => "string",
        };
        write!(f, "{s}")
    }
}

/// One property entry: code plus typed payload.
///
/// The wire shape is fixed per code: a one-byte value, a big-endian `u16` or
/// `u32`, a variable byte integer, a length-prefixed string or binary
/// buffer, or a string pair for user properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    PayloadFormatIndicator(PayloadFormat),
    MessageExpiryInterval(u32),
    ContentType(MqttString),
    ResponseTopic(MqttString),
    CorrelationData(MqttBinary),
    SubscriptionIdentifier(VariableByteInteger),
    SessionExpiryInterval(u32),
    AssignedClientIdentifier(MqttString),
    ServerKeepAlive(u16),
    AuthenticationMethod(MqttString),
    AuthenticationData(MqttBinary),
    RequestProblemInformation(u8),
    WillDelayInterval(u32),
    RequestResponseInformation(u8),
    ResponseInformation(MqttString),
    ServerReference(MqttString),
    ReasonString(MqttString),
    ReceiveMaximum(u16),
    TopicAliasMaximum(u16),
    TopicAlias(u16),
    MaximumQos(u8),
    RetainAvailable(u8),
    UserProperty(MqttString, MqttString),
    MaximumPacketSize(u32),
    WildcardSubscriptionAvailable(u8),
    SubscriptionIdentifierAvailable(u8),
    SharedSubscriptionAvailable(u8),
}

impl Property {
    /// The property code of this entry.
    pub fn id(&self) -> PropertyId {
        match self {
            Property::PayloadFormatIndicator(_) => PropertyId::PayloadFormatIndicator,
            Property::MessageExpiryInterval(_) => PropertyId::MessageExpiryInterval,
            Property::ContentType(_) => PropertyId::ContentType,
            Property::ResponseTopic(_) => PropertyId::ResponseTopic,
            Property::CorrelationData(_) => PropertyId::CorrelationData,
            Property::SubscriptionIdentifier(_) => PropertyId::SubscriptionIdentifier,
            Property::SessionExpiryInterval(_) => PropertyId::SessionExpiryInterval,
            Property::AssignedClientIdentifier(_) => PropertyId::AssignedClientIdentifier,
            Property::ServerKeepAlive(_) => PropertyId::ServerKeepAlive,
            Property::AuthenticationMethod(_) => PropertyId::AuthenticationMethod,
            Property::AuthenticationData(_) => PropertyId::AuthenticationData,
            Property::RequestProblemInformation(_) => PropertyId::RequestProblemInformation,
            Property::WillDelayInterval(_) => PropertyId::WillDelayInterval,
            Property::RequestResponseInformation(_) => PropertyId::RequestResponseInformation,
            Property::ResponseInformation(_) => PropertyId::ResponseInformation,
            Property::ServerReference(_) => PropertyId::ServerReference,
            Property::ReasonString(_) => PropertyId::ReasonString,
            Property::ReceiveMaximum(_) => PropertyId::ReceiveMaximum,
            Property::TopicAliasMaximum(_) => PropertyId::TopicAliasMaximum,
            Property::TopicAlias(_) => PropertyId::TopicAlias,
            Property::MaximumQos(_) => PropertyId::MaximumQos,
            Property::RetainAvailable(_) => PropertyId::RetainAvailable,
            Property::UserProperty(_, _) => PropertyId::UserProperty,
            Property::MaximumPacketSize(_) => PropertyId::MaximumPacketSize,
            Property::WildcardSubscriptionAvailable(_) => {
                PropertyId::WildcardSubscriptionAvailable
            }
            Property::SubscriptionIdentifierAvailable(_) => {
                PropertyId::SubscriptionIdentifierAvailable
            }
            Property::SharedSubscriptionAvailable(_) => PropertyId::SharedSubscriptionAvailable,
        }
    }

    /// Encoded size of the entry: one code byte plus the payload.
    pub fn size(&self) -> usize {
        1 + match self {
            Property::PayloadFormatIndicator(_)
            | Property::RequestProblemInformation(_)
            | Property::RequestResponseInformation(_)
            | Property::MaximumQos(_)
            | Property::RetainAvailable(_)
            | Property::WildcardSubscriptionAvailable(_)
            | Property::SubscriptionIdentifierAvailable(_)
            | Property::SharedSubscriptionAvailable(_) => 1,
            Property::ServerKeepAlive(_)
            | Property::ReceiveMaximum(_)
            | Property::TopicAliasMaximum(_)
            | Property::TopicAlias(_) => 2,
            Property::MessageExpiryInterval(_)
            | Property::SessionExpiryInterval(_)
            | Property::WillDelayInterval(_)
            | Property::MaximumPacketSize(_) => 4,
            Property::SubscriptionIdentifier(v) => v.size(),
            Property::ContentType(s)
            | Property::ResponseTopic(s)
            | Property::AssignedClientIdentifier(s)
            | Property::AuthenticationMethod(s)
            | Property::ResponseInformation(s)
            | Property::ServerReference(s)
            | Property::ReasonString(s) => s.size(),
            Property::CorrelationData(b) | Property::AuthenticationData(b) => b.size(),
            Property::UserProperty(k, v) => k.size() + v.size(),
        }
    }

    /// Appends the entry's encoding steps: the code byte, then the payload.
    pub(crate) fn push_steps<'a>(&'a self, steps: &mut Vec<EncodeStep<'a>>) {
        steps.push(EncodeStep::U8(self.id() as u8));
        match self {
            Property::PayloadFormatIndicator(v) => steps.push(EncodeStep::U8(*v as u8)),
            Property::RequestProblemInformation(v)
            | Property::RequestResponseInformation(v)
            | Property::MaximumQos(v)
            | Property::RetainAvailable(v)
            | Property::WildcardSubscriptionAvailable(v)
            | Property::SubscriptionIdentifierAvailable(v)
            | Property::SharedSubscriptionAvailable(v) => steps.push(EncodeStep::U8(*v)),
            Property::ServerKeepAlive(v)
            | Property::ReceiveMaximum(v)
            | Property::TopicAliasMaximum(v)
            | Property::TopicAlias(v) => steps.push(EncodeStep::U16(*v)),
            Property::MessageExpiryInterval(v)
            | Property::SessionExpiryInterval(v)
            | Property::WillDelayInterval(v)
            | Property::MaximumPacketSize(v) => steps.push(EncodeStep::U32(*v)),
            Property::SubscriptionIdentifier(v) => steps.push(EncodeStep::Vli(v.clone())),
            Property::ContentType(s)
            | Property::ResponseTopic(s)
            | Property::AssignedClientIdentifier(s)
            | Property::AuthenticationMethod(s)
            | Property::ResponseInformation(s)
            | Property::ServerReference(s)
            | Property::ReasonString(s) => steps.push(EncodeStep::Bytes(s.as_bytes())),
            Property::CorrelationData(b) | Property::AuthenticationData(b) => {
                steps.push(EncodeStep::Bytes(b.as_bytes()))
            }
            Property::UserProperty(k, v) => {
                steps.push(EncodeStep::Bytes(k.as_bytes()));
                steps.push(EncodeStep::Bytes(v.as_bytes()));
            }
        }
    }

    /// Parses the payload of a property whose code byte has already been
    /// consumed. Returns the entry and the payload bytes consumed.
    pub(crate) fn parse(id: PropertyId, data: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut cursor = 0usize;
        let prop = match id {
            PropertyId::PayloadFormatIndicator => {
                let b = read_u8(data, &mut cursor)?;
                let format =
                    PayloadFormat::try_from(b).map_err(|_| CodecError::MalformedPacket)?;
                Property::PayloadFormatIndicator(format)
            }
            PropertyId::RequestProblemInformation
            | PropertyId::RequestResponseInformation
            | PropertyId::MaximumQos
            | PropertyId::RetainAvailable
            | PropertyId::WildcardSubscriptionAvailable
            | PropertyId::SubscriptionIdentifierAvailable
            | PropertyId::SharedSubscriptionAvailable => {
                let b = read_u8(data, &mut cursor)?;
                if b > 1 {
                    return Err(CodecError::MalformedPacket);
                }
                match id {
                    PropertyId::RequestProblemInformation => {
                        Property::RequestProblemInformation(b)
                    }
                    PropertyId::RequestResponseInformation => {
                        Property::RequestResponseInformation(b)
                    }
                    PropertyId::MaximumQos => Property::MaximumQos(b),
                    PropertyId::RetainAvailable => Property::RetainAvailable(b),
                    PropertyId::WildcardSubscriptionAvailable => {
                        Property::WildcardSubscriptionAvailable(b)
                    }
                    PropertyId::SubscriptionIdentifierAvailable => {
                        Property::SubscriptionIdentifierAvailable(b)
                    }
                    _ => Property::SharedSubscriptionAvailable(b),
                }
            }
            PropertyId::ServerKeepAlive => {
                Property::ServerKeepAlive(read_u16(data, &mut cursor)?)
            }
            PropertyId::ReceiveMaximum => {
                let v = read_u16(data, &mut cursor)?;
                if v == 0 {
                    return Err(CodecError::MalformedPacket);
                }
                Property::ReceiveMaximum(v)
            }
            PropertyId::TopicAliasMaximum => {
                Property::TopicAliasMaximum(read_u16(data, &mut cursor)?)
            }
            PropertyId::TopicAlias => {
                let v = read_u16(data, &mut cursor)?;
                if v == 0 {
                    return Err(CodecError::MalformedPacket);
                }
                Property::TopicAlias(v)
            }
            PropertyId::MessageExpiryInterval => {
                Property::MessageExpiryInterval(read_u32(data, &mut cursor)?)
            }
            PropertyId::SessionExpiryInterval => {
                Property::SessionExpiryInterval(read_u32(data, &mut cursor)?)
            }
            PropertyId::WillDelayInterval => {
                Property::WillDelayInterval(read_u32(data, &mut cursor)?)
            }
            PropertyId::MaximumPacketSize => {
                let v = read_u32(data, &mut cursor)?;
                if v == 0 {
                    return Err(CodecError::MalformedPacket);
                }
                Property::MaximumPacketSize(v)
            }
            PropertyId::SubscriptionIdentifier => {
                let (v, consumed) = VariableByteInteger::decode(&data[cursor..])?;
                cursor += consumed;
                if v.to_u32() == 0 {
                    return Err(CodecError::MalformedPacket);
                }
                Property::SubscriptionIdentifier(v)
            }
            PropertyId::ContentType
            | PropertyId::ResponseTopic
            | PropertyId::AssignedClientIdentifier
            | PropertyId::AuthenticationMethod
            | PropertyId::ResponseInformation
            | PropertyId::ServerReference
            | PropertyId::ReasonString => {
                let (s, consumed) = MqttString::decode(&data[cursor..])?;
                cursor += consumed;
                match id {
                    PropertyId::ContentType => Property::ContentType(s),
                    PropertyId::ResponseTopic => Property::ResponseTopic(s),
                    PropertyId::AssignedClientIdentifier => {
                        Property::AssignedClientIdentifier(s)
                    }
                    PropertyId::AuthenticationMethod => Property::AuthenticationMethod(s),
                    PropertyId::ResponseInformation => Property::ResponseInformation(s),
                    PropertyId::ServerReference => Property::ServerReference(s),
                    _ => Property::ReasonString(s),
                }
            }
            PropertyId::CorrelationData | PropertyId::AuthenticationData => {
                let (b, consumed) = MqttBinary::decode(&data[cursor..])?;
                cursor += consumed;
                match id {
                    PropertyId::CorrelationData => Property::CorrelationData(b),
                    _ => Property::AuthenticationData(b),
                }
            }
            PropertyId::UserProperty => {
                let (k, consumed) = MqttString::decode(&data[cursor..])?;
                cursor += consumed;
                let (v, consumed) = MqttString::decode(&data[cursor..])?;
                cursor += consumed;
                Property::UserProperty(k, v)
            }
        };
        Ok((prop, cursor))
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Property::UserProperty(k, v) = self {
            let mut state = serializer.serialize_struct("property", 3)?;
            state.serialize_field("id", &self.id())?;
            state.serialize_field("key", k)?;
            state.serialize_field("val", v)?;
            return state.end();
        }

        let mut state = serializer.serialize_struct("property", 2)?;
        state.serialize_field("id", &self.id())?;
        match self {
            Property::PayloadFormatIndicator(v) => state.serialize_field("val", v)?,
            Property::MessageExpiryInterval(v)
            | Property::SessionExpiryInterval(v)
            | Property::WillDelayInterval(v)
            | Property::MaximumPacketSize(v) => state.serialize_field("val", v)?,
            Property::ServerKeepAlive(v)
            | Property::ReceiveMaximum(v)
            | Property::TopicAliasMaximum(v)
            | Property::TopicAlias(v) => state.serialize_field("val", v)?,
            Property::RequestProblemInformation(v)
            | Property::RequestResponseInformation(v)
            | Property::MaximumQos(v)
            | Property::RetainAvailable(v)
            | Property::WildcardSubscriptionAvailable(v)
            | Property::SubscriptionIdentifierAvailable(v)
            | Property::SharedSubscriptionAvailable(v) => state.serialize_field("val", v)?,
            Property::SubscriptionIdentifier(v) => state.serialize_field("val", v)?,
            Property::ContentType(s)
            | Property::ResponseTopic(s)
            | Property::AssignedClientIdentifier(s)
            | Property::AuthenticationMethod(s)
            | Property::ResponseInformation(s)
            | Property::ServerReference(s)
            | Property::ReasonString(s) => state.serialize_field("val", s)?,
            Property::CorrelationData(b) | Property::AuthenticationData(b) => {
                state.serialize_field("val", b)?
            }
            Property::UserProperty(_, _) => {}
        }
        state.end()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(e) => write!(f, "{{\"error\": \"{e}\"}}"),
        }
    }
}

/// A property section's entries, in canonical (emission) order.
pub type Properties = Vec<Property>;

/// Size calculations over a property list.
pub trait PropertiesSize {
    /// Total encoded size of the entries, without the leading length.
    fn size(&self) -> usize;
    /// Encoded size of the whole section: length VLI plus entries.
    fn section_size(&self) -> usize;
}

impl PropertiesSize for Properties {
    fn size(&self) -> usize {
        self.iter().map(Property::size).sum()
    }

    fn section_size(&self) -> usize {
        let size = self.size();
        let capped = size.min(VariableByteInteger::MAX as usize) as u32;
        // An oversized section is caught when the remaining length is built.
        size + VariableByteInteger::byte_length(capped).unwrap_or(4)
    }
}

/// Step emission over a property list.
pub(crate) trait PropertiesToSteps {
    /// Appends the section: the length VLI followed by every entry.
    fn push_section_steps<'a>(&'a self, steps: &mut Vec<EncodeStep<'a>>)
        -> Result<(), CodecError>;
}

impl PropertiesToSteps for Properties {
    fn push_section_steps<'a>(
        &'a self,
        steps: &mut Vec<EncodeStep<'a>>,
    ) -> Result<(), CodecError> {
        let size = u32::try_from(self.size()).map_err(|_| CodecError::ValueOutOfRange)?;
        steps.push(EncodeStep::Vli(VariableByteInteger::from_u32(size)?));
        for prop in self {
            prop.push_steps(steps);
        }
        Ok(())
    }
}

/// Decodes a property section from the front of `data`.
///
/// Reads the length VLI, then entries until the declared boundary. Returns
/// the entries and the total bytes consumed (the final offset: length VLI
/// plus declared length).
///
/// # Errors
///
/// - `CodecError::UnknownPropertyCode` for a code that is unknown or not
///   permitted in `section`
/// - `CodecError::PropertySectionOverflow` if an entry crosses the declared
///   boundary
/// - `CodecError::PropertySectionLengthMismatch` if the declared length runs
///   past the enclosing payload
/// - `CodecError::MalformedPacket` for an illegal duplicate or an illegal
///   property value
pub fn parse_properties(
    data: &[u8],
    section: PropertySection,
) -> Result<(Properties, usize), CodecError> {
    let (len_vli, vli_consumed) = VariableByteInteger::decode(data)?;
    let len = len_vli.to_u32() as usize;
    let bound = vli_consumed + len;
    if bound > data.len() {
        return Err(CodecError::PropertySectionLengthMismatch);
    }

    let mut props = Properties::new();
    let mut seen = 0u64;
    let mut pos = vli_consumed;
    while pos < bound {
        let code = data[pos];
        pos += 1;
        let id = PropertyId::try_from(code).map_err(|_| CodecError::UnknownPropertyCode)?;
        if !id.allowed_in(section) {
            return Err(CodecError::UnknownPropertyCode);
        }

        let (prop, consumed) = Property::parse(id, &data[pos..bound]).map_err(|e| match e {
            CodecError::ShortBuffer => CodecError::PropertySectionOverflow,
            other => other,
        })?;
        pos += consumed;

        if !id.repeatable_in(section) {
            let bit = 1u64 << (code & 63);
            if seen & bit != 0 {
                return Err(CodecError::MalformedPacket);
            }
            seen |= bit;
        }
        props.push(prop);
    }

    Ok((props, bound))
}

/// Checks caller-supplied properties against the permission and repetition
/// rules of `section`. The decode path enforces the same rules while
/// parsing.
pub(crate) fn validate_properties(
    props: &Properties,
    section: PropertySection,
) -> Result<(), CodecError> {
    let mut seen = 0u64;
    for prop in props {
        let id = prop.id();
        if !id.allowed_in(section) {
            return Err(CodecError::UnknownPropertyCode);
        }
        if !id.repeatable_in(section) {
            let bit = 1u64 << ((id as u8) & 63);
            if seen & bit != 0 {
                return Err(CodecError::MalformedPacket);
            }
            seen |= bit;
        }
        if let Property::SubscriptionIdentifier(v) = prop {
            if v.to_u32() == 0 {
                return Err(CodecError::MalformedPacket);
            }
        }
    }
    Ok(())
}

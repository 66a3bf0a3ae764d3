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

//! The MQTT packet data model and its building blocks.

use crate::mqtt::error::CodecError;

mod packet_type;
pub use packet_type::{FixedHeader, PacketType};

mod qos;
pub use qos::Qos;

mod retain_handling;
pub use retain_handling::RetainHandling;

mod variable_byte_integer;
pub use variable_byte_integer::VariableByteInteger;

mod mqtt_string;
pub use mqtt_string::MqttString;

mod mqtt_binary;
pub use mqtt_binary::MqttBinary;

mod property;
pub use property::{
    parse_properties, PayloadFormat, Properties, PropertiesSize, Property, PropertyId,
    PropertySection,
};
pub(crate) use property::{validate_properties, PropertiesToSteps};

mod sub_entry;
pub use sub_entry::{SubEntry, SubOpts};

mod connect;
pub use connect::{Connect, Will};

mod connack;
pub use connack::Connack;

mod publish;
pub use publish::Publish;

mod puback;
pub use puback::Puback;

mod subscribe;
pub use subscribe::Subscribe;

mod suback;
pub use suback::Suback;

mod unsubscribe;
pub use unsubscribe::Unsubscribe;

mod unsuback;
pub use unsuback::Unsuback;

mod pingreq;
pub use pingreq::Pingreq;

mod pingresp;
pub use pingresp::Pingresp;

mod disconnect;
pub use disconnect::Disconnect;

mod enum_packet;
pub use enum_packet::{Packet, PacketMeta};

/// Reads a big-endian `u8` at `*cursor`, advancing it.
pub(crate) fn read_u8(data: &[u8], cursor: &mut usize) -> Result<u8, CodecError> {
    let b = *data.get(*cursor).ok_or(CodecError::ShortBuffer)?;
    *cursor += 1;
    Ok(b)
}

/// Reads a big-endian `u16` at `*cursor`, advancing it.
pub(crate) fn read_u16(data: &[u8], cursor: &mut usize) -> Result<u16, CodecError> {
    if data.len() < *cursor + 2 {
        return Err(CodecError::ShortBuffer);
    }
    let v = u16::from_be_bytes([data[*cursor], data[*cursor + 1]]);
    *cursor += 2;
    Ok(v)
}

/// Reads a big-endian `u32` at `*cursor`, advancing it.
pub(crate) fn read_u32(data: &[u8], cursor: &mut usize) -> Result<u32, CodecError> {
    if data.len() < *cursor + 4 {
        return Err(CodecError::ShortBuffer);
    }
    let v = u32::from_be_bytes([
        data[*cursor],
        data[*cursor + 1],
        data[*cursor + 2],
        data[*cursor + 3],
    ]);
    *cursor += 4;
    Ok(v)
}

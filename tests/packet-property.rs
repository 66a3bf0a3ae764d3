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
mod common;
use common::mqtt;

use mqtt::packet::{
    parse_properties, PayloadFormat, PropertiesSize, Property, PropertySection,
};
use mqtt::CodecError;

/// Wraps raw entry bytes into a property section (length VLI + entries).
fn section(entries: &[u8]) -> Vec<u8> {
    assert!(entries.len() < 128);
    let mut out = vec![entries.len() as u8];
    out.extend_from_slice(entries);
    out
}

#[test]
fn parse_empty_section() {
    common::init_tracing();
    let (props, consumed) = parse_properties(&[0x00], PropertySection::Publish).unwrap();
    assert!(props.is_empty());
    assert_eq!(consumed, 1);
}

#[test]
fn parse_typed_entries() {
    common::init_tracing();
    // payload format indicator, message expiry, content type
    let bytes = section(&[
        0x01, 0x01, // payload format: string
        0x02, 0x00, 0x00, 0x00, 0x3C, // message expiry: 60
        0x03, 0x00, 0x04, b't', b'e', b'x', b't', // content type
    ]);
    let (props, consumed) = parse_properties(&bytes, PropertySection::Publish).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(props.len(), 3);
    assert_eq!(props[0], Property::PayloadFormatIndicator(PayloadFormat::String));
    assert_eq!(props[1], Property::MessageExpiryInterval(60));
    match &props[2] {
        Property::ContentType(s) => assert_eq!(s.as_str(), "text"),
        other => panic!("unexpected property {other:?}"),
    }
    assert_eq!(props.size(), bytes.len() - 1);
    assert_eq!(props.section_size(), bytes.len());
}

#[test]
fn parse_returns_final_offset_with_trailing_bytes() {
    common::init_tracing();
    let mut bytes = section(&[0x23, 0x00, 0x07]); // topic alias 7
    bytes.extend_from_slice(&[0xAA, 0xBB]); // unrelated packet bytes after the section
    let (props, consumed) = parse_properties(&bytes, PropertySection::Publish).unwrap();
    assert_eq!(props, vec![Property::TopicAlias(7)]);
    assert_eq!(consumed, 4);
}

#[test]
fn unknown_code_rejected() {
    common::init_tracing();
    let bytes = section(&[0x7B, 0x00]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::UnknownPropertyCode
    );
}

#[test]
fn code_not_permitted_in_section() {
    common::init_tracing();
    // topic alias is a PUBLISH property, not a CONNECT one
    let bytes = section(&[0x23, 0x00, 0x07]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Connect).unwrap_err(),
        CodecError::UnknownPropertyCode
    );
    // will delay interval only lives in the will section
    let bytes = section(&[0x18, 0x00, 0x00, 0x00, 0x05]);
    assert!(parse_properties(&bytes, PropertySection::Will).is_ok());
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::UnknownPropertyCode
    );
}

#[test]
fn declared_length_overruns_payload() {
    common::init_tracing();
    // section claims 10 bytes, only 3 follow
    let bytes = [0x0A, 0x01, 0x01, 0x02];
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::PropertySectionLengthMismatch
    );
}

#[test]
fn entry_crossing_boundary() {
    common::init_tracing();
    // declared length 3 cuts the message expiry's u32 in half
    let mut bytes = section(&[0x02, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x3C]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::PropertySectionOverflow
    );
}

#[test]
fn duplicate_entry_rejected() {
    common::init_tracing();
    let bytes = section(&[0x01, 0x01, 0x01, 0x00]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn user_property_repeats() {
    common::init_tracing();
    let entry: &[u8] = &[
        0x26, 0x00, 0x01, b'k', 0x00, 0x01, b'v', // user property k=v
    ];
    let mut entries = entry.to_vec();
    entries.extend_from_slice(entry);
    let bytes = section(&entries);
    let (props, _) = parse_properties(&bytes, PropertySection::Unsubscribe).unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0], props[1]);
}

#[test]
fn subscription_identifier_repeats_only_in_publish() {
    common::init_tracing();
    let entries = [0x0B, 0x01, 0x0B, 0x02];
    let bytes = section(&entries);
    let (props, _) = parse_properties(&bytes, PropertySection::Publish).unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Subscribe).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn illegal_values_rejected() {
    common::init_tracing();
    // topic alias zero
    let bytes = section(&[0x23, 0x00, 0x00]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::MalformedPacket
    );
    // payload format indicator 2
    let bytes = section(&[0x01, 0x02]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::MalformedPacket
    );
    // subscription identifier zero
    let bytes = section(&[0x0B, 0x00]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Publish).unwrap_err(),
        CodecError::MalformedPacket
    );
    // receive maximum zero
    let bytes = section(&[0x21, 0x00, 0x00]);
    assert_eq!(
        parse_properties(&bytes, PropertySection::Connect).unwrap_err(),
        CodecError::MalformedPacket
    );
}

#[test]
fn string_property_with_bad_utf8() {
    common::init_tracing();
    let bytes = section(&[0x1F, 0x00, 0x01, 0xFF]); // reason string
    assert_eq!(
        parse_properties(&bytes, PropertySection::Puback).unwrap_err(),
        CodecError::InvalidUtf8
    );
}

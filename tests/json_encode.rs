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

use mqtt::packet::{Packet, Pingreq, Puback, Publish, Qos};
use mqtt::result_code::PubackReasonCode;
use static_assertions::assert_impl_all;

assert_impl_all!(Packet: Send, Sync, Clone);
assert_impl_all!(mqtt::CodecError: Send, Sync, Copy);

#[test]
fn packets_display_as_tagged_json() {
    common::init_tracing();
    let publish = Publish::builder()
        .topic_name("t/1")
        .unwrap()
        .qos(Qos::AtLeastOnce)
        .packet_id(3)
        .payload(b"x")
        .build()
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&Packet::from(publish).to_string()).unwrap();
    assert_eq!(json["type"], "publish");
    assert_eq!(json["topic_name"], "t/1");
    assert_eq!(json["packet_id"], 3);
    assert_eq!(json["qos"], "AtLeastOnce");

    let json: serde_json::Value =
        serde_json::from_str(&Packet::from(Pingreq::new()).to_string()).unwrap();
    assert_eq!(json["type"], "pingreq");
}

#[test]
fn reason_codes_serialize_by_name() {
    common::init_tracing();
    let puback = Puback::builder()
        .packet_id(6)
        .reason_code(PubackReasonCode::QuotaExceeded)
        .build()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&puback.to_string()).unwrap();
    assert_eq!(json["reason_code"], "QuotaExceeded");
}

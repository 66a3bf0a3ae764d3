#![cfg_attr(not(feature = "std"), no_std)]

//! # MQTT Codec Core
//!
//! An incremental, Sans-I/O wire codec for MQTT v3.1.1 and v5.0.
//!
//! This library converts strongly typed packet values to and from the MQTT
//! wire format without performing any I/O of its own. Both directions are
//! incremental: the encoder serializes into caller-supplied write windows and
//! suspends when a window fills, and the decoder accepts arbitrary fragments
//! of the read stream and emits each completely decoded packet exactly once,
//! in order.
//!
//! ## Features
//!
//! - **Sans-I/O Design**: pure protocol logic, usable under any runtime
//! - **Dual Version Support**: one data model for both MQTT v3.1.1 and v5.0
//! - **Incremental Both Ways**: bounded write windows, fragmented reads
//! - **Round-Trip Stable**: `decode(encode(p)) == p` for every valid packet
//!
//! ## Quick Start
//!
//! ### Encoding
//!
//! ```rust,no_run
//! use mqtt_codec_core::mqtt::{
//!     codec::{encode, EncodeProgress, PacketEncoder},
//!     packet::{Connect, Packet},
//!     Role, Version,
//! };
//!
//! let connect = Connect::builder()
//!     .client_id("my-client")
//!     .unwrap()
//!     .clean_start(true)
//!     .build()
//!     .unwrap();
//! let packet = Packet::from(connect);
//!
//! // Single shot...
//! let bytes = encode(&packet, Version::V3_1_1).unwrap();
//!
//! // ...or driven against bounded write windows.
//! let mut encoder = PacketEncoder::new(&packet, Version::V3_1_1, Role::Client).unwrap();
//! let mut window = [0u8; 8];
//! loop {
//!     match encoder.service(&mut window) {
//!         EncodeProgress::Complete { written } => {
//!             // flush window[..written], done
//!             break;
//!         }
//!         EncodeProgress::InProgress { written } => {
//!             // flush window[..written], call service again
//!         }
//!     }
//! }
//! ```
//!
//! ### Decoding
//!
//! ```rust,no_run
//! use mqtt_codec_core::mqtt::{codec::PacketDecoder, Role, Version};
//!
//! let mut decoder = PacketDecoder::new(Version::V5_0, Role::Client);
//! let fragment: &[u8] = &[0xD0, 0x00]; // any slice read from the transport
//! for packet in decoder.feed(fragment).unwrap() {
//!     // handle packet
//! }
//! ```
//!
//! ## Scope
//!
//! The codec owns the wire format and nothing else. Connection lifecycle,
//! transport, authentication, retransmission, and topic matching belong to
//! the layers that drive it. Protocol errors on the read side are fatal: the
//! decoder reports the first one and refuses further input, and the caller is
//! expected to drop the connection.
//!
//! ## Feature Flags
//!
//! - **`std`** (default): standard library support
//! - **`tracing`**: diagnostics via the `tracing` crate; no-ops when disabled
//! - **`defmt`**: `defmt::Format` derives on the small wire enums

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

// Always use alloc types for consistency between std and no-std
#[macro_use]
extern crate alloc;

// Common prelude with alloc types
pub mod prelude {
    pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

    pub use crate::mqtt::packet::{PacketMeta, PropertiesSize};
}

pub mod mqtt;

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

use core::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

/// MQTT protocol version
///
/// Selected once per connection and never changed mid-stream. The numeric
/// value is the protocol level byte carried by the CONNECT packet.
///
/// # Examples
///
/// ```ignore
/// use mqtt_codec_core::mqtt::Version;
///
/// assert_eq!(Version::V3_1_1.protocol_level(), 4);
/// assert_eq!(Version::V5_0.protocol_level(), 5);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Version {
    /// MQTT version 3.1.1 (protocol level 4)
    V3_1_1 = 4,
    /// MQTT version 5.0 (protocol level 5)
    V5_0 = 5,
}

impl Version {
    /// The protocol level byte this version puts on the wire.
    pub fn protocol_level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Version::V3_1_1 => "v3.1.1",
            Version::V5_0 => "v5.0",
        };
        write!(f, "{s}")
    }
}

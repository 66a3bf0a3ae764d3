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

/// Retained-message handling for an MQTT v5.0 subscription
///
/// Carried in bits 5-4 of the subscription options byte and only meaningful
/// on the wire for v5.0; the value 3 is reserved and rejected.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TryFromPrimitive,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RetainHandling {
    /// Send retained messages at the time of the subscribe
    SendRetained = 0,
    /// Send retained messages only if the subscription does not currently exist
    SendRetainedIfNotExists = 1,
    /// Do not send retained messages at the time of the subscribe
    DoNotSendRetained = 2,
}

impl fmt::Display for RetainHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RetainHandling::SendRetained => "send_retained",
            RetainHandling::SendRetainedIfNotExists => "send_retained_if_not_exists",
            RetainHandling::DoNotSendRetained => "do_not_send_retained",
        };
        write!(f, "{s}")
    }
}

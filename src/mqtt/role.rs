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

use serde::{Deserialize, Serialize};

use crate::mqtt::packet::PacketType;

/// Endpoint role
///
/// Decides which packet types an endpoint encodes and which it decodes.
/// PUBLISH, PUBACK, and DISCONNECT travel in both directions and use the
/// same codec either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Connecting endpoint
    Client,
    /// Accepting endpoint
    Server,
}

impl Role {
    /// The role at the other end of the connection.
    pub fn peer(self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }

    /// Whether this role emits the given packet type.
    pub fn sends(self, packet_type: PacketType) -> bool {
        match self {
            Role::Client => matches!(
                packet_type,
                PacketType::Connect
                    | PacketType::Publish
                    | PacketType::Puback
                    | PacketType::Subscribe
                    | PacketType::Unsubscribe
                    | PacketType::Pingreq
                    | PacketType::Disconnect
            ),
            Role::Server => matches!(
                packet_type,
                PacketType::Connack
                    | PacketType::Publish
                    | PacketType::Puback
                    | PacketType::Suback
                    | PacketType::Unsuback
                    | PacketType::Pingresp
                    | PacketType::Disconnect
            ),
        }
    }

    /// Whether this role accepts the given packet type from its peer.
    pub fn receives(self, packet_type: PacketType) -> bool {
        self.peer().sends(packet_type)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Client => "client",
            Role::Server => "server",
        };
        write!(f, "{s}")
    }
}

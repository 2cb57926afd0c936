//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Wire-level byte constants for the Telnet command stream (RFC 854).

/// Carriage return.
#[cfg(test)]
pub const CR: u8 = b'\r';
/// Line feed.
#[cfg(test)]
pub const LF: u8 = b'\n';

/// Interpret As Command.
pub const IAC: u8 = 255;
/// End of subnegotiation parameters.
pub const SE: u8 = 240;
/// No operation.
pub const NOP: u8 = 241;
/// Data mark, the data portion of a Synch.
pub const DM: u8 = 242;
/// Operator pressed the Break key.
pub const BRK: u8 = 243;
/// Interrupt current process.
pub const IP: u8 = 244;
/// Abort output.
pub const AO: u8 = 245;
/// Are you there.
pub const AYT: u8 = 246;
/// Erase character.
pub const EC: u8 = 247;
/// Erase line.
pub const EL: u8 = 248;
/// Go ahead.
pub const GA: u8 = 249;
/// Begin subnegotiation.
pub const SB: u8 = 250;
/// Indicates the desire to begin performing an option.
pub const WILL: u8 = 251;
/// Indicates refusal to perform an option.
pub const WONT: u8 = 252;
/// Indicates the request that the other party perform an option.
pub const DO: u8 = 253;
/// Indicates the demand that the other party stop performing an option.
pub const DONT: u8 = 254;
/// Marks the end of a record (RFC 885).
pub const EOR: u8 = 239;

/// Telnet option byte codes this client negotiates or recognizes.
pub mod option {
    /// Transmit Binary (RFC 856).
    pub const BINARY: u8 = 0;
    /// Echo (RFC 857).
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead (RFC 858).
    pub const SUPPRESS_GO_AHEAD: u8 = 3;
    /// Com Port Control Option (RFC 2217).
    pub const CPCO: u8 = 44;
}

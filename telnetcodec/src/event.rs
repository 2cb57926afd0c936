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

use crate::options::{TelnetOption, TelnetSide};
use bytes::Bytes;

/// `TelnetEvent` represents user-facing events from the Telnet codec.
///
/// Unlike [`crate::TelnetFrame`] which includes low-level wire frames (DO/DONT/WILL/WONT),
/// `TelnetEvent` emits high-level events such as `OptionStatus` only when a negotiation
/// actually completes, not on every frame received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    /// Telnet data byte.
    Data(u8),
    /// No operation.
    NoOperation,
    /// End of urgent data stream.
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt the current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of record, marks the end of a prompt.
    EndOfRecord,
    /// A negotiation completed: `option` is now enabled or disabled on `side`.
    OptionStatus(TelnetOption, TelnetSide, bool),
    /// A complete subnegotiation payload for `option` arrived.
    Subnegotiate(TelnetOption, Bytes),
}

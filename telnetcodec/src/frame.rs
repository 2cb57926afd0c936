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

use crate::options::TelnetOption;
use bytes::Bytes;

/// A single Telnet wire frame, the unit the [`crate::TelnetCodec`] encoder accepts.
///
/// `TelnetFrame` is the outbound counterpart of [`crate::TelnetEvent`]: frames are what
/// get written to the wire, events are what the decoder yields to a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// A single data byte.
    Data(u8),
    /// No operation.
    NoOperation,
    /// Data mark, the data portion of a Synch.
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt the current process.
    InterruptProcess,
    /// Abort output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request the operator erase the previous character.
    EraseCharacter,
    /// Request the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of record.
    EndOfRecord,
    /// Request that the other party perform `option`.
    Do(TelnetOption),
    /// Demand that the other party stop performing `option`.
    Dont(TelnetOption),
    /// Offer to perform `option`.
    Will(TelnetOption),
    /// Refuse to perform `option`.
    Wont(TelnetOption),
    /// Subnegotiation payload for `option`, not including `IAC SB`/`IAC SE`.
    Subnegotiate(TelnetOption, Bytes),
}

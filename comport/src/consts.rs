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

//! RFC 2217 subcommand byte codes.
//!
//! Client-to-server subcommands are sent as-is; the server echoes each one back
//! offset by [`SERVER_BASE`].

/// Added to a client subcommand to get the server's reply subcommand.
pub const SERVER_BASE: u8 = 100;

/// Request/report the server's identity string.
pub const SIGNATURE: u8 = 0;
/// Set or request the baud rate.
pub const SET_BAUDRATE: u8 = 1;
/// Set or request the data size.
pub const SET_DATASIZE: u8 = 2;
/// Set or request the parity.
pub const SET_PARITY: u8 = 3;
/// Set or request the stop size.
pub const SET_STOPSIZE: u8 = 4;
/// Set or request flow control, break, DTR, or RTS.
pub const SET_CONTROL: u8 = 5;
/// Notify of a line-state change (unused here; mask is kept at zero).
pub const NOTIFY_LINESTATE: u8 = 6;
/// Notify of a modem-state change.
pub const NOTIFY_MODEMSTATE: u8 = 7;
/// Suspend flow control on the server.
pub const FLOWCONTROL_SUSPEND: u8 = 8;
/// Resume flow control on the server.
pub const FLOWCONTROL_RESUME: u8 = 9;
/// Set the line-state event mask.
pub const SET_LINESTATE_MASK: u8 = 10;
/// Set the modem-state event mask.
pub const SET_MODEMSTATE_MASK: u8 = 11;
/// Discard queued data.
pub const PURGE_DATA: u8 = 12;

/// `SET_CONTROL` shared value space (flow/break/DTR/RTS ride one suboption).
pub mod control {
    /// Ask the server to report the current flow-control setting.
    pub const FLOW_REQUEST: u8 = 0;
    /// No flow control.
    pub const FLOW_NONE: u8 = 1;
    /// XON/XOFF software flow control.
    pub const FLOW_XONXOFF: u8 = 2;
    /// RTS/CTS hardware flow control.
    pub const FLOW_HARDWARE: u8 = 3;
    /// Ask the server to report whether BREAK is currently asserted.
    pub const BREAK_REQUEST: u8 = 4;
    /// Assert BREAK.
    pub const BREAK_ON: u8 = 5;
    /// Release BREAK.
    pub const BREAK_OFF: u8 = 6;
    /// Ask the server to report the current DTR state.
    pub const DTR_REQUEST: u8 = 7;
    /// Assert DTR.
    pub const DTR_ON: u8 = 8;
    /// Release DTR.
    pub const DTR_OFF: u8 = 9;
    /// Ask the server to report the current RTS state.
    pub const RTS_REQUEST: u8 = 10;
    /// Assert RTS.
    pub const RTS_ON: u8 = 11;
    /// Release RTS.
    pub const RTS_OFF: u8 = 12;
}

/// `PURGE_DATA` selector values.
pub mod purge {
    /// Discard the receive buffer.
    pub const RX: u8 = 1;
    /// Discard the transmit buffer.
    pub const TX: u8 = 2;
    /// Discard both buffers.
    pub const BOTH: u8 = 3;
}

/// `NOTIFY_MODEMSTATE` bit positions, in the single status byte.
pub mod modemstate {
    /// Clear To Send.
    pub const CTS: u8 = 0x10;
    /// Data Set Ready.
    pub const DSR: u8 = 0x20;
    /// Ring Indicator.
    pub const RI: u8 = 0x40;
    /// Carrier Detect.
    pub const CD: u8 = 0x80;
    /// The subset of modem-state bits this client asks the server to report.
    pub const REQUESTED_MASK: u8 = CD | RI | DSR | CTS;
}

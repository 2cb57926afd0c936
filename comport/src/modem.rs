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

//! The remote modem-control lines, as predicted by the client.

/// A bitset over the serial modem control lines.
///
/// DTR and RTS are outputs: the client sets them and the server echoes the
/// acknowledged value back. CD, RI, DSR, and CTS are inputs: the client only
/// learns their state through `NOTIFY_MODEMSTATE`, masked to the bits it asked
/// the server to report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModemLines {
    /// Data Terminal Ready (output).
    pub dtr: bool,
    /// Request To Send (output).
    pub rts: bool,
    /// Carrier Detect (input).
    pub cd: bool,
    /// Ring Indicator (input).
    pub ri: bool,
    /// Data Set Ready (input).
    pub dsr: bool,
    /// Clear To Send (input).
    pub cts: bool,
}

/// A selection of lines to assert or release via `modem_bis`/`modem_bic`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModemMask {
    /// Data Terminal Ready.
    pub dtr: bool,
    /// Request To Send.
    pub rts: bool,
}

impl ModemLines {
    /// Applies `mask`'s bits as set (bitwise-or), per `modem_bis`.
    pub fn set(&mut self, mask: ModemMask) {
        self.dtr |= mask.dtr;
        self.rts |= mask.rts;
    }

    /// Clears `mask`'s bits (bitwise-and-complement), per `modem_bic`.
    pub fn clear(&mut self, mask: ModemMask) {
        if mask.dtr {
            self.dtr = false;
        }
        if mask.rts {
            self.rts = false;
        }
    }

    /// Updates CD/RI/DSR/CTS from a raw `NOTIFY_MODEMSTATE` payload byte,
    /// masked to the subset the client requested.
    pub fn apply_notification(&mut self, byte: u8) {
        use crate::consts::modemstate;
        let byte = byte & modemstate::REQUESTED_MASK;
        self.cd = byte & modemstate::CD != 0;
        self.ri = byte & modemstate::RI != 0;
        self.dsr = byte & modemstate::DSR != 0;
        self.cts = byte & modemstate::CTS != 0;
    }
}

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

use crate::consts::option;
use crate::frame::TelnetFrame;
use crate::result::{CodecError, CodecResult};

/// Which side of a negotiation an [`crate::TelnetEvent::OptionStatus`] describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TelnetSide {
    /// `us` — the option we perform.
    Local,
    /// `him` — the option the remote performs.
    Remote,
}

/// A Telnet option, per RFC 855's option registry.
///
/// Only the options this client negotiates are named; everything else round-trips
/// through [`TelnetOption::Unknown`] so negotiation bookkeeping still works for
/// options we always refuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TelnetOption {
    /// Transmit Binary (RFC 856).
    TransmitBinary,
    /// Echo (RFC 857).
    Echo,
    /// Suppress Go Ahead (RFC 858).
    SuppressGoAhead,
    /// Com Port Control Option (RFC 2217).
    ComPort,
    /// Any option this client does not name explicitly.
    Unknown(u8),
}

impl TelnetOption {
    /// The wire byte for this option.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => option::BINARY,
            TelnetOption::Echo => option::ECHO,
            TelnetOption::SuppressGoAhead => option::SUPPRESS_GO_AHEAD,
            TelnetOption::ComPort => option::CPCO,
            TelnetOption::Unknown(code) => code,
        }
    }

    /// Decode a wire byte into a `TelnetOption`.
    #[must_use]
    pub fn from_u8(code: u8) -> Self {
        match code {
            option::BINARY => TelnetOption::TransmitBinary,
            option::ECHO => TelnetOption::Echo,
            option::SUPPRESS_GO_AHEAD => TelnetOption::SuppressGoAhead,
            option::CPCO => TelnetOption::ComPort,
            other => TelnetOption::Unknown(other),
        }
    }

    /// Whether this client ever agrees to perform `self` locally (WILL).
    #[must_use]
    pub fn supported_local(self) -> bool {
        matches!(
            self,
            TelnetOption::TransmitBinary | TelnetOption::SuppressGoAhead | TelnetOption::ComPort
        )
    }

    /// Whether this client ever agrees to let the remote perform `self` (DO).
    ///
    /// Echo is observe-only: we accept the remote doing it, but never offer to do it
    /// ourselves (see [`TelnetOption::supported_local`]). COM-PORT is symmetric: a
    /// server offering it unprompted is accepted the same as us offering it.
    #[must_use]
    pub fn supported_remote(self) -> bool {
        matches!(
            self,
            TelnetOption::TransmitBinary
                | TelnetOption::SuppressGoAhead
                | TelnetOption::Echo
                | TelnetOption::ComPort
        )
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TRANSMIT-BINARY"),
            TelnetOption::Echo => write!(f, "ECHO"),
            TelnetOption::SuppressGoAhead => write!(f, "SUPPRESS-GO-AHEAD"),
            TelnetOption::ComPort => write!(f, "COM-PORT-OPTION"),
            TelnetOption::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

/// RFC 1143's per-side (state, queue) pair, flattened into one enum.
///
/// `No`/`Yes` carry an implicit empty queue; the `Want*` variants without
/// `Opposite` carry an empty queue, the `*Opposite` variants carry a queued
/// request for the opposite of what's currently being negotiated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum QState {
    #[default]
    No,
    WantNo,
    WantNoOpposite,
    Yes,
    WantYes,
    WantYesOpposite,
}

#[derive(Copy, Clone, Debug, Default)]
struct OptionEntry {
    us: QState,
    him: QState,
}

/// Per-option negotiation state for all 256 Telnet options.
///
/// Implements the Q method (RFC 1143): each option tracks an independent state for
/// `us` (do we perform it) and `him` (does the remote perform it), each with a
/// one-slot anti-loop queue, so that re-negotiation during an in-flight exchange
/// never oscillates.
pub struct TelnetOptions {
    entries: Box<[OptionEntry; 256]>,
}

impl Default for TelnetOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TelnetOptions {
    /// Create a fresh table with every option at `(NO, NO)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Box::new([OptionEntry::default(); 256]),
        }
    }

    fn entry(&self, option: TelnetOption) -> &OptionEntry {
        &self.entries[usize::from(option.to_u8())]
    }

    fn entry_mut(&mut self, option: TelnetOption) -> &mut OptionEntry {
        &mut self.entries[usize::from(option.to_u8())]
    }

    #[cfg(test)]
    pub(crate) fn local_qstate(&self, option: TelnetOption) -> QState {
        self.entry(option).us
    }

    #[cfg(test)]
    pub(crate) fn remote_qstate(&self, option: TelnetOption) -> QState {
        self.entry(option).him
    }

    /// Whether `option` is currently enabled on our side (`us == YES`).
    #[must_use]
    pub fn local_enabled(&self, option: TelnetOption) -> bool {
        self.entry(option).us == QState::Yes
    }

    /// Whether `option` is currently enabled on the remote side (`him == YES`).
    #[must_use]
    pub fn remote_enabled(&self, option: TelnetOption) -> bool {
        self.entry(option).him == QState::Yes
    }

    /// Begin offering to perform `option` locally, if not already enabled or in flight.
    ///
    /// Returns the `WILL` frame to send, if any.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.us {
            QState::No => {
                entry.us = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
            QState::WantNo => {
                entry.us = QState::WantNoOpposite;
                None
            }
            QState::WantYesOpposite => {
                entry.us = QState::WantYes;
                None
            }
            QState::Yes | QState::WantYes | QState::WantNoOpposite => None,
        }
    }

    /// Begin refusing to perform `option` locally, if not already disabled or in flight.
    ///
    /// Returns the `WONT` frame to send, if any.
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.us {
            QState::Yes => {
                entry.us = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantYes => {
                entry.us = QState::WantYesOpposite;
                None
            }
            QState::WantNoOpposite => {
                entry.us = QState::WantNo;
                None
            }
            QState::No | QState::WantNo | QState::WantYesOpposite => None,
        }
    }

    /// Begin asking the remote to perform `option`, if not already enabled or in flight.
    ///
    /// Returns the `DO` frame to send, if any.
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.him {
            QState::No => {
                entry.him = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
            QState::WantNo => {
                entry.him = QState::WantNoOpposite;
                None
            }
            QState::WantYesOpposite => {
                entry.him = QState::WantYes;
                None
            }
            QState::Yes | QState::WantYes | QState::WantNoOpposite => None,
        }
    }

    /// Begin asking the remote to stop performing `option`, if not already disabled or in flight.
    ///
    /// Returns the `DONT` frame to send, if any.
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.him {
            QState::Yes => {
                entry.him = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantYes => {
                entry.him = QState::WantYesOpposite;
                None
            }
            QState::WantNoOpposite => {
                entry.him = QState::WantNo;
                None
            }
            QState::No | QState::WantNo | QState::WantYesOpposite => None,
        }
    }

    /// Process a received negotiation frame, updating state and returning a reply frame
    /// (if the table calls for one).
    pub fn handle_received(&mut self, frame: &TelnetFrame) -> CodecResult<Option<TelnetFrame>> {
        match *frame {
            TelnetFrame::Will(option) => Ok(self.recv_will(option)),
            TelnetFrame::Wont(option) => Ok(self.recv_wont(option)),
            TelnetFrame::Do(option) => Ok(self.recv_do(option)),
            TelnetFrame::Dont(option) => Ok(self.recv_dont(option)),
            ref other => Err(CodecError::NegotiationError {
                reason: format!("{other:?} is not a negotiation frame"),
            }),
        }
    }

    fn recv_will(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.him {
            QState::No => {
                if option.supported_remote() {
                    entry.him = QState::Yes;
                    Some(TelnetFrame::Do(option))
                } else {
                    Some(TelnetFrame::Dont(option))
                }
            }
            QState::Yes => None,
            QState::WantYes => {
                entry.him = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                entry.him = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantNo => {
                entry.him = QState::No;
                None
            }
            QState::WantNoOpposite => {
                entry.him = QState::Yes;
                None
            }
        }
    }

    fn recv_wont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.him {
            QState::No => None,
            QState::Yes => {
                entry.him = QState::No;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantYes => {
                entry.him = QState::No;
                None
            }
            QState::WantYesOpposite => {
                entry.him = QState::No;
                None
            }
            QState::WantNo => {
                entry.him = QState::No;
                None
            }
            QState::WantNoOpposite => {
                entry.him = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
        }
    }

    fn recv_do(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.us {
            QState::No => {
                if option.supported_local() {
                    entry.us = QState::Yes;
                    Some(TelnetFrame::Will(option))
                } else {
                    Some(TelnetFrame::Wont(option))
                }
            }
            QState::Yes => None,
            QState::WantYes => {
                entry.us = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                entry.us = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantNo => {
                entry.us = QState::No;
                None
            }
            QState::WantNoOpposite => {
                entry.us = QState::Yes;
                None
            }
        }
    }

    fn recv_dont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let entry = self.entry_mut(option);
        match entry.us {
            QState::No => None,
            QState::Yes => {
                entry.us = QState::No;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantYes => {
                entry.us = QState::No;
                None
            }
            QState::WantYesOpposite => {
                entry.us = QState::No;
                None
            }
            QState::WantNo => {
                entry.us = QState::No;
                None
            }
            QState::WantNoOpposite => {
                entry.us = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
        }
    }
}

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

//! # RFC 2217 COM-PORT protocol engine
//!
//! This crate sits on top of [`rfc2217_telnetcodec`] and turns `TelnetOption::ComPort`
//! subnegotiations into a predicted [`SerialGeometry`]/[`ModemLines`] pair, the way
//! an RFC 2217 client drives a remote serial port. It knows nothing about sockets;
//! [`ComPortEngine`] only consumes option-status transitions and subnegotiation
//! payloads and produces the [`rfc2217_telnetcodec::TelnetFrame`]s the caller must send.
//!
//! ## Usage
//!
//! ```rust
//! use rfc2217_comport::{ComPortEngine, FlushSelector};
//! use rfc2217_telnetcodec::{TelnetOption, TelnetSide};
//!
//! let engine = ComPortEngine::new("rfc2217-client v0.1.0");
//! // Fires once local COM-PORT is enabled: SIGNATURE, masks, termios/modem requests, BREAK_REQUEST.
//! let frames = engine.on_option_status(TelnetOption::ComPort, TelnetSide::Local, true);
//! assert!(!frames.is_empty());
//! assert!(engine.can_comport());
//!
//! let flush = ComPortEngine::flush(FlushSelector::Both);
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::option_if_let_else, clippy::module_name_repetitions)]

pub mod consts;
mod engine;
mod geometry;
mod modem;
mod result;
mod wire;

pub use self::engine::{ComPortEngine, FlushSelector, BARRIER_TIMEOUT, BREAK_HOLD};
pub use self::geometry::SerialGeometry;
pub use self::modem::{ModemLines, ModemMask};
pub use self::result::{ComPortError, ComPortResult};
pub use self::wire::{ControlReply, FlowControl, Parity, StopBits};

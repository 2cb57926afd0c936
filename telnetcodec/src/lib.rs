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

//! # Telnet byte-stream codec and option negotiator
//!
//! This crate implements the Telnet sidechannel (RFC 854) framing — IAC escaping on
//! write, IAC frame extraction on read — plus the RFC 1143 Q-method option
//! negotiator, as a [`tokio_util::codec`] `Decoder`/`Encoder` pair.
//!
//! It names four options explicitly ([`TelnetOption::TransmitBinary`],
//! [`TelnetOption::Echo`], [`TelnetOption::SuppressGoAhead`],
//! [`TelnetOption::ComPort`]); everything else round-trips through
//! [`TelnetOption::Unknown`] so the negotiator can still refuse it correctly.
//!
//! ## Usage
//!
//! ```rust
//! use rfc2217_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! let mut codec = TelnetCodec::new();
//! let mut wire = BytesMut::new();
//! codec.encode(TelnetFrame::Will(TelnetOption::SuppressGoAhead), &mut wire).unwrap();
//!
//! let mut input = BytesMut::from(&b"Hello\xFF\xFD\x2C"[..]); // data + DO COM-PORT
//! while let Some(event) = codec.decode(&mut input).unwrap() {
//!     if let TelnetEvent::OptionStatus(option, side, enabled) = event {
//!         println!("{option} on {side:?} is now {enabled}");
//!     }
//! }
//! // The decoder queued a WILL COM-PORT reply; the caller is responsible for
//! // draining and sending it.
//! for reply in codec.take_pending_replies() {
//!     codec.encode(reply, &mut wire).unwrap();
//! }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::option_if_let_else, clippy::module_name_repetitions, clippy::match_same_arms)]

mod codec;
mod consts;
mod event;
mod frame;
mod options;
mod result;

pub use self::codec::TelnetCodec;
pub use self::event::TelnetEvent;
pub use self::frame::TelnetFrame;
pub use self::options::{TelnetOption, TelnetSide};
pub use self::result::{CodecError, CodecResult};

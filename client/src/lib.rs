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

//! # RFC 2217 COM-PORT client
//!
//! A terminal façade over one TELNET connection that drives a remote serial
//! port via the RFC 2217 COM-PORT option. There is no background task, no
//! internal thread, and no callback dispatcher: every operation is a plain
//! async method that pumps the socket itself.
//!
//! ```no_run
//! use rfc2217_client::{ClientConfig, SerialTerminal};
//!
//! # async fn example() -> rfc2217_client::Result<()> {
//! let mut terminal = SerialTerminal::connect("localhost,2217", ClientConfig::new()).await?;
//!
//! let mut buf = [0u8; 64];
//! let n = terminal.read(&mut buf).await?;
//! terminal.write(&buf[..n]).await?;
//!
//! terminal.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::cargo, missing_docs, clippy::pedantic, future_incompatible, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

mod config;
mod error;
mod terminal;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use terminal::SerialTerminal;

pub use rfc2217_comport::{
    ComPortError, FlowControl, FlushSelector, ModemLines, ModemMask, Parity, SerialGeometry, StopBits,
};

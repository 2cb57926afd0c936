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

//! Minimal stdin/stdout passthrough over an RFC 2217 COM-PORT connection.
//!
//! This is not a terminal emulator: no keymaps, no raw tty mode, no local
//! echo handling. It exists only to exercise connection bootstrap and the
//! barrier/wait helper end-to-end against a real RFC 2217 server.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p rfc2217-demo -- localhost,2217
//! ```

use rfc2217_client::{ClientConfig, SerialTerminal};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let endpoint = std::env::args().nth(1).unwrap_or_else(|| "localhost,2217".to_string());
    info!("connecting to {endpoint}");

    let terminal = SerialTerminal::connect(&endpoint, ClientConfig::new()).await?;
    let terminal = Arc::new(Mutex::new(terminal));

    let reader_handle = {
        let terminal = terminal.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 256];
            loop {
                let n = {
                    let mut terminal = terminal.lock().await;
                    match terminal.read(&mut buf).await {
                        Ok(n) => n,
                        Err(err) => {
                            error!("read failed: {err}");
                            return;
                        }
                    }
                };
                if n == 0 {
                    info!("peer closed the connection");
                    return;
                }
                io::stdout().write_all(&buf[..n]).ok();
                io::stdout().flush().ok();
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut terminal = terminal.lock().await;
        if let Err(err) = terminal.write(line.as_bytes()).await {
            error!("write failed: {err}");
            break;
        }
        if let Err(err) = terminal.write(b"\r\n").await {
            error!("write failed: {err}");
            break;
        }
    }

    reader_handle.abort();
    Ok(())
}

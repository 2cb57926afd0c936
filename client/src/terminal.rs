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

//! The TELNET/COM-PORT terminal façade (C5), connection bootstrap (C6), and
//! barrier/wait helper (C7).

use crate::{ClientConfig, ClientError, Result};
use futures::{SinkExt, StreamExt};
use rfc2217_comport::{ComPortEngine, FlushSelector, ModemLines, ModemMask, SerialGeometry};
use rfc2217_telnetcodec::{TelnetCodec, TelnetEvent, TelnetOption};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{info, warn};

/// A connected RFC 2217 COM-PORT terminal.
///
/// Wraps one non-blocking socket, the Telnet byte-stream codec, and the
/// COM-PORT protocol engine. There is no background task and no internal
/// thread: every operation drives the connection directly, the way the
/// scheduling model (single-threaded, cooperative around one socket)
/// requires. `read`/`write` block on the COM-PORT barriers themselves,
/// pumping frames off the wire as needed, unless the caller opted out via
/// [`ClientConfig::skip_initial_barriers`] or by never calling `tcsetattr`
/// on this connection (see [`ComPortEngine::termios_requested`]).
pub struct SerialTerminal {
    framed: Framed<TcpStream, TelnetCodec>,
    engine: ComPortEngine,
    barrier_timeout: Duration,
    skip_initial_barriers: bool,
}

enum Pumped {
    Data(u8),
    Protocol,
}

impl SerialTerminal {
    /// Resolves `endpoint` (`host[,service]`, service defaulting to `telnet`/23),
    /// tries each candidate address in turn, and on success runs the bootstrap
    /// negotiation (`BINARY`/`SGA` both ways, local `COM-PORT`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnresolvedEndpoint`] if no address could be
    /// resolved, or the last connection failure if every candidate was tried
    /// and refused.
    pub async fn connect(endpoint: &str, config: ClientConfig) -> Result<Self> {
        let (host, port) = parse_endpoint(endpoint)?;
        let lookup = format!("{host}:{port}");
        let mut last_err = None;
        let mut stream = None;
        for addr in tokio::net::lookup_host(&lookup).await?.collect::<Vec<_>>() {
            match tokio::time::timeout(config.connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(s)) => {
                    info!("connected to {addr}");
                    stream = Some(s);
                    break;
                }
                Ok(Err(err)) => {
                    warn!("connect to {addr} failed: {err}");
                    last_err = Some(ClientError::from(err));
                }
                Err(_) => {
                    warn!("connect to {addr} timed out");
                    last_err = Some(ClientError::ConnectionTimeout);
                }
            }
        }
        let stream =
            stream.ok_or_else(|| last_err.unwrap_or_else(|| ClientError::UnresolvedEndpoint(endpoint.to_string())))?;

        let mut codec = TelnetCodec::new();
        let mut bootstrap = Vec::new();
        bootstrap.extend(codec.enable_local(TelnetOption::TransmitBinary));
        bootstrap.extend(codec.enable_remote(TelnetOption::TransmitBinary));
        bootstrap.extend(codec.enable_local(TelnetOption::SuppressGoAhead));
        bootstrap.extend(codec.enable_remote(TelnetOption::SuppressGoAhead));
        bootstrap.extend(codec.enable_local(TelnetOption::ComPort));

        let mut framed = Framed::new(stream, codec);
        for frame in bootstrap {
            framed.send(frame).await?;
        }

        let signature = format!("rfc2217-client v{}", env!("CARGO_PKG_VERSION"));
        Ok(SerialTerminal {
            framed,
            engine: ComPortEngine::new(signature),
            barrier_timeout: config.barrier_timeout,
            skip_initial_barriers: config.skip_initial_barriers,
        })
    }

    /// Closes the connection with a plain socket shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown write fails.
    pub async fn close(mut self) -> Result<()> {
        self.framed.get_mut().shutdown().await.map_err(Into::into)
    }

    /// Closes the connection via a drained close: shuts down the write half,
    /// then reads and discards until the peer closes its side (or `timeout`
    /// elapses, if given). A drained close with no timeout can hang if the
    /// peer never closes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BarrierTimedOut`] if `timeout` elapses first.
    pub async fn close_drained(mut self, timeout: Option<Duration>) -> Result<()> {
        self.framed.get_mut().shutdown().await?;
        let drain = async {
            let mut buf = [0u8; 1024];
            loop {
                match self.framed.get_mut().read(&mut buf).await {
                    Ok(0) => return Ok(()),
                    Ok(_) => {}
                    Err(err) => return Err(ClientError::from(err)),
                }
            }
        };
        match timeout {
            Some(deadline) => tokio::time::timeout(deadline, drain)
                .await
                .map_err(|_| ClientError::BarrierTimedOut)?,
            None => drain.await,
        }
    }

    /// Returns the current predicted serial port configuration. Never blocks.
    #[must_use]
    pub fn tcgetattr(&self) -> SerialGeometry {
        self.engine.tcgetattr()
    }

    /// Sets the serial port configuration. Emits the five `SET_*` messages
    /// immediately if COM-PORT is already active, otherwise replays them once
    /// the start routine fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the frames could not be sent.
    pub async fn tcsetattr(&mut self, geometry: SerialGeometry) -> Result<()> {
        let frames = self.engine.tcsetattr(geometry);
        self.send_frames(frames).await
    }

    /// Returns the current predicted modem-line state. Never blocks.
    #[must_use]
    pub fn modem_get(&self) -> ModemLines {
        self.engine.modem_get()
    }

    /// Asserts the lines in `mask`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frames could not be sent.
    pub async fn modem_bis(&mut self, mask: ModemMask) -> Result<()> {
        let frames = self.engine.modem_bis(mask);
        self.send_frames(frames).await
    }

    /// Releases the lines in `mask`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frames could not be sent.
    pub async fn modem_bic(&mut self, mask: ModemMask) -> Result<()> {
        let frames = self.engine.modem_bic(mask);
        self.send_frames(frames).await
    }

    /// Asserts BREAK, holds it for the engine's configured duration, then
    /// releases it.
    ///
    /// # Errors
    ///
    /// Returns an error if either frame could not be sent.
    pub async fn send_break(&mut self) -> Result<()> {
        let (assert, hold, release) = ComPortEngine::break_sequence();
        self.framed.send(assert).await?;
        tokio::time::sleep(hold).await;
        self.framed.send(release).await?;
        Ok(())
    }

    /// Discards queued data per `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be sent.
    pub async fn flush(&mut self, selector: FlushSelector) -> Result<()> {
        self.framed.send(ComPortEngine::flush(selector)).await?;
        Ok(())
    }

    /// Reads into `buf`, blocking on the initial-configuration barrier first
    /// unless opted out. Returns the number of bytes read (at least 1 unless
    /// `buf` is empty), or `0` on EOF.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BarrierTimedOut`] if the barrier wait exceeds
    /// its deadline, or an I/O or codec error from the underlying stream.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.should_wait_for_barrier() {
            self.wait_until(Self::initial_configured).await?;
        }
        loop {
            match self.pump_one().await? {
                None => return Ok(0),
                Some(Pumped::Protocol) => {}
                Some(Pumped::Data(byte)) => {
                    buf[0] = byte;
                    return Ok(1);
                }
            }
        }
    }

    /// Writes `data`, blocking on the COM-PORT-start barrier first unless
    /// opted out. `IAC` bytes are doubled on the wire transparently.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BarrierTimedOut`] if the barrier wait exceeds
    /// its deadline, or an I/O or codec error from the underlying stream.
    pub async fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.should_wait_for_barrier() {
            self.wait_until(Self::can_comport).await?;
        }
        self.framed.send(data).await?;
        Ok(data.len())
    }

    /// Whether `read`/`write` should block on their barrier at all: skipped if
    /// the caller opted out via [`ClientConfig::skip_initial_barriers`], or if
    /// the caller never requested explicit configuration (no `tcsetattr`
    /// pending) in which case there is nothing to wait for.
    fn should_wait_for_barrier(&self) -> bool {
        !self.skip_initial_barriers && self.engine.termios_requested()
    }

    /// True once the remote has agreed to enable COM-PORT locally.
    #[must_use]
    pub fn can_comport(&self) -> bool {
        self.engine.can_comport()
    }

    /// True once the initial configuration round has completed at least once.
    #[must_use]
    pub fn initial_configured(&self) -> bool {
        self.engine.initial_configured()
    }

    /// The server's reported identity string, if it has sent one.
    #[must_use]
    pub fn peer_signature(&self) -> Option<String> {
        self.engine.peer_signature()
    }

    async fn send_frames(&mut self, frames: Vec<rfc2217_telnetcodec::TelnetFrame>) -> Result<()> {
        for frame in frames {
            self.framed.send(frame).await?;
        }
        Ok(())
    }

    async fn pump_one(&mut self) -> Result<Option<Pumped>> {
        let event = match self.framed.next().await {
            None => return Ok(None),
            Some(Err(err)) => return Err(err.into()),
            Some(Ok(event)) => event,
        };
        let outcome = match event {
            TelnetEvent::Data(byte) => Pumped::Data(byte),
            TelnetEvent::OptionStatus(option, side, enabled) => {
                let frames = self.engine.on_option_status(option, side, enabled);
                self.send_frames(frames).await?;
                Pumped::Protocol
            }
            TelnetEvent::Subnegotiate(option, payload) => {
                let frames = self.engine.on_subnegotiation(option, &payload)?;
                self.send_frames(frames).await?;
                Pumped::Protocol
            }
            _ => Pumped::Protocol,
        };
        let replies = self.framed.codec_mut().take_pending_replies();
        self.send_frames(replies).await?;
        Ok(Some(outcome))
    }

    /// The barrier/wait helper (C7): repeatedly pumps one frame off the wire
    /// and re-checks `predicate`, until it is true or `barrier_timeout` elapses.
    async fn wait_until(&mut self, predicate: impl Fn(&Self) -> bool) -> Result<()> {
        if predicate(self) {
            return Ok(());
        }
        let deadline = Instant::now() + self.barrier_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ClientError::BarrierTimedOut);
            }
            match tokio::time::timeout(remaining, self.pump_one()).await {
                Ok(Ok(None)) => return Err(ClientError::ConnectionClosed),
                Ok(Ok(Some(_))) => {
                    if predicate(self) {
                        return Ok(());
                    }
                }
                Ok(Err(err)) => return Err(err),
                Err(_) => return Err(ClientError::BarrierTimedOut),
            }
        }
    }
}

fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    let mut parts = endpoint.splitn(2, ',');
    let host = parts.next().unwrap_or_default().to_string();
    let service = parts.next().unwrap_or("telnet");
    let port = match service.parse::<u16>() {
        Ok(port) => port,
        Err(_) if service.eq_ignore_ascii_case("telnet") => 23,
        Err(_) => return Err(ClientError::UnresolvedEndpoint(endpoint.to_string())),
    };
    Ok((host, port))
}

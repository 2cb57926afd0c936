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

//! The COM-PORT protocol engine (C4): tracks predicted remote serial state,
//! decomposes caller requests into `SET_*` subnegotiations, and folds server
//! notifications back into that state.

use crate::consts::{
    control, modemstate, purge, NOTIFY_MODEMSTATE, PURGE_DATA, SERVER_BASE, SET_BAUDRATE,
    SET_CONTROL, SET_DATASIZE, SET_LINESTATE_MASK, SET_MODEMSTATE_MASK, SET_PARITY, SET_STOPSIZE,
    SIGNATURE,
};
use crate::geometry::SerialGeometry;
use crate::modem::{ModemLines, ModemMask};
use crate::result::{ComPortError, ComPortResult};
use crate::wire::{self, ControlReply};
use bytes::Bytes;
use rfc2217_telnetcodec::{TelnetFrame, TelnetOption, TelnetSide};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;

/// How long a caller-facing barrier wait may block before failing.
pub const BARRIER_TIMEOUT: Duration = Duration::from_secs(5);

/// How long `send_break` holds BREAK asserted before releasing it.
pub const BREAK_HOLD: Duration = Duration::from_millis(250);

/// Selects which buffer `flush` discards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlushSelector {
    /// Discard the receive buffer.
    Rx,
    /// Discard the transmit buffer.
    Tx,
    /// Discard both buffers.
    Both,
}

impl FlushSelector {
    fn wire_value(self) -> u8 {
        match self {
            FlushSelector::Rx => purge::RX,
            FlushSelector::Tx => purge::TX,
            FlushSelector::Both => purge::BOTH,
        }
    }
}

#[derive(Default)]
struct EngineState {
    geometry: SerialGeometry,
    modem: ModemLines,
    can_comport: bool,
    set_termios_pending: bool,
    set_modem_pending: bool,
    conf_pending: u32,
    initial_configured: bool,
    peer_signature: Option<String>,
    termios_requested: bool,
}

/// The COM-PORT protocol engine.
///
/// Owns the client's prediction of the remote port's configuration and modem
/// lines. Caller operations and incoming notifications both go through here;
/// the engine never touches the socket directly, it only produces the frames
/// the caller must send.
pub struct ComPortEngine {
    state: Mutex<EngineState>,
    comport_start: Notify,
    initial_conf_complete: Notify,
    signature: String,
}

fn subneg(mut payload: Vec<u8>, subcommand: u8) -> TelnetFrame {
    payload.insert(0, subcommand);
    TelnetFrame::Subnegotiate(TelnetOption::ComPort, Bytes::from(payload))
}

fn termios_frames(geometry: &SerialGeometry, request_current: bool) -> Vec<TelnetFrame> {
    let (baud, data_bits, parity, stop_bits, flow) = if request_current {
        (None, None, None, None, None)
    } else {
        (
            geometry.output_baud,
            Some(geometry.data_bits),
            Some(geometry.parity),
            Some(geometry.stop_bits),
            Some(geometry.flow),
        )
    };
    vec![
        subneg(wire::encode_baud(baud).to_vec(), SET_BAUDRATE),
        subneg(vec![wire::encode_datasize(data_bits)], SET_DATASIZE),
        subneg(vec![wire::encode_parity(parity)], SET_PARITY),
        subneg(vec![wire::encode_stopsize(stop_bits)], SET_STOPSIZE),
        subneg(vec![wire::encode_flow(flow)], SET_CONTROL),
    ]
}

fn modem_frames(modem: ModemLines, request_current: bool) -> Vec<TelnetFrame> {
    if request_current {
        vec![
            subneg(vec![control::DTR_REQUEST], SET_CONTROL),
            subneg(vec![control::RTS_REQUEST], SET_CONTROL),
        ]
    } else {
        vec![
            subneg(
                vec![if modem.dtr { control::DTR_ON } else { control::DTR_OFF }],
                SET_CONTROL,
            ),
            subneg(
                vec![if modem.rts { control::RTS_ON } else { control::RTS_OFF }],
                SET_CONTROL,
            ),
        ]
    }
}

impl ComPortEngine {
    /// Creates a fresh engine for a new connection, identifying itself to the
    /// server as `signature` when asked.
    #[must_use]
    pub fn new(signature: impl Into<String>) -> Self {
        ComPortEngine {
            state: Mutex::new(EngineState::default()),
            comport_start: Notify::new(),
            initial_conf_complete: Notify::new(),
            signature: signature.into(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().expect("comport engine mutex poisoned")
    }

    /// True once the remote has agreed to enable COM-PORT locally.
    #[must_use]
    pub fn can_comport(&self) -> bool {
        self.lock().can_comport
    }

    /// True once the initial configuration round has completed at least once.
    #[must_use]
    pub fn initial_configured(&self) -> bool {
        self.lock().initial_configured
    }

    /// The server's reported identity string, if it has sent one.
    #[must_use]
    pub fn peer_signature(&self) -> Option<String> {
        self.lock().peer_signature.clone()
    }

    /// True once the caller has called `tcsetattr` at least once on this
    /// connection. Unlike `set_termios_pending` (which is a one-shot flag
    /// cleared the moment the request is flushed by the start routine), this
    /// never resets — it is the initial-configuration opt-out: a caller that
    /// never requests explicit configuration sees this as `false` for the
    /// life of the connection, so `read`/`write` never block waiting for
    /// configuration the caller never asked for.
    #[must_use]
    pub fn termios_requested(&self) -> bool {
        self.lock().termios_requested
    }

    /// Called whenever the telnet layer reports an option status transition.
    /// Fires the COM-PORT start routine exactly once, the first time local
    /// COM-PORT reaches enabled.
    pub fn on_option_status(
        &self,
        option: TelnetOption,
        side: TelnetSide,
        enabled: bool,
    ) -> Vec<TelnetFrame> {
        if option != TelnetOption::ComPort || side != TelnetSide::Local || !enabled {
            return Vec::new();
        }
        let mut state = self.lock();
        if state.can_comport {
            return Vec::new();
        }
        state.can_comport = true;
        drop(state);
        self.comport_start.notify_waiters();
        self.start_routine()
    }

    fn start_routine(&self) -> Vec<TelnetFrame> {
        let mut frames = vec![
            subneg(Vec::new(), SIGNATURE),
            subneg(vec![0], SET_LINESTATE_MASK),
            subneg(vec![modemstate::REQUESTED_MASK], SET_MODEMSTATE_MASK),
        ];

        let mut state = self.lock();
        let request_termios = !state.set_termios_pending;
        frames.extend(termios_frames(&state.geometry, request_termios));
        state.conf_pending += 5;
        state.set_termios_pending = false;

        let request_modem = !state.set_modem_pending;
        frames.extend(modem_frames(state.modem, request_modem));
        state.set_modem_pending = false;
        drop(state);

        frames.push(subneg(vec![control::BREAK_REQUEST], SET_CONTROL));
        frames
    }

    /// Returns the current predicted port configuration.
    #[must_use]
    pub fn tcgetattr(&self) -> SerialGeometry {
        self.lock().geometry
    }

    /// Sets the port configuration. If COM-PORT is already active this emits
    /// the five `SET_*` messages immediately; otherwise the request is
    /// replayed once the start routine fires.
    pub fn tcsetattr(&self, new: SerialGeometry) -> Vec<TelnetFrame> {
        let mut state = self.lock();
        state.geometry = new;
        state.termios_requested = true;
        if state.can_comport {
            state.conf_pending += 5;
            termios_frames(&new, false)
        } else {
            state.set_termios_pending = true;
            Vec::new()
        }
    }

    /// Returns the current predicted modem-line state.
    #[must_use]
    pub fn modem_get(&self) -> ModemLines {
        self.lock().modem
    }

    /// Asserts the lines in `mask`.
    pub fn modem_bis(&self, mask: ModemMask) -> Vec<TelnetFrame> {
        self.modem_update(mask, true)
    }

    /// Releases the lines in `mask`.
    pub fn modem_bic(&self, mask: ModemMask) -> Vec<TelnetFrame> {
        self.modem_update(mask, false)
    }

    fn modem_update(&self, mask: ModemMask, assert: bool) -> Vec<TelnetFrame> {
        let mut state = self.lock();
        if assert {
            state.modem.set(mask);
        } else {
            state.modem.clear(mask);
        }
        if state.can_comport && (mask.dtr || mask.rts) {
            let mut frames = Vec::new();
            if mask.dtr {
                let value = if assert { control::DTR_ON } else { control::DTR_OFF };
                frames.push(subneg(vec![value], SET_CONTROL));
            }
            if mask.rts {
                let value = if assert { control::RTS_ON } else { control::RTS_OFF };
                frames.push(subneg(vec![value], SET_CONTROL));
            }
            frames
        } else {
            state.set_modem_pending = true;
            Vec::new()
        }
    }

    /// Produces the `BREAK_ON` / delay / `BREAK_OFF` sequence for `send_break`.
    /// The caller is responsible for sending the first frame, sleeping for
    /// the returned duration, then sending the second.
    #[must_use]
    pub fn break_sequence() -> (TelnetFrame, Duration, TelnetFrame) {
        (
            subneg(vec![control::BREAK_ON], SET_CONTROL),
            BREAK_HOLD,
            subneg(vec![control::BREAK_OFF], SET_CONTROL),
        )
    }

    /// Produces the `PURGE_DATA` frame for `flush`.
    #[must_use]
    pub fn flush(selector: FlushSelector) -> TelnetFrame {
        subneg(vec![selector.wire_value()], PURGE_DATA)
    }

    /// Handles a COM-PORT subnegotiation payload received from the server.
    /// Returns any frames the reply calls for (currently only the signature
    /// echo).
    ///
    /// # Errors
    ///
    /// Returns an error if a baud/data-size/parity/stop-size/control payload
    /// is missing bytes or carries a value outside RFC 2217's enumeration.
    pub fn on_subnegotiation(&self, option: TelnetOption, payload: &[u8]) -> ComPortResult<Vec<TelnetFrame>> {
        if option != TelnetOption::ComPort {
            return Ok(Vec::new());
        }
        let Some(&sub) = payload.first() else {
            debug!("empty COM-PORT subnegotiation payload");
            return Ok(Vec::new());
        };
        if sub < SERVER_BASE {
            // Our own request, echoed back by a server that loops options. Not a reply.
            return Ok(Vec::new());
        }
        let subcommand = sub - SERVER_BASE;
        let body = &payload[1..];
        match subcommand {
            SIGNATURE => Ok(self.handle_signature(body)),
            SET_BAUDRATE => {
                let baud = wire::decode_baud(body)?;
                let mut state = self.lock();
                state.geometry.output_baud = baud;
                self.ack_conf(&mut state);
                Ok(Vec::new())
            }
            SET_DATASIZE => {
                let byte = require_byte(body, subcommand)?;
                if let Some(bits) = wire::decode_datasize(byte)? {
                    let mut state = self.lock();
                    state.geometry.data_bits = bits;
                    self.ack_conf(&mut state);
                } else {
                    self.ack_conf(&mut self.lock());
                }
                Ok(Vec::new())
            }
            SET_PARITY => {
                let byte = require_byte(body, subcommand)?;
                let mut state = self.lock();
                if let Some(parity) = wire::decode_parity(byte)? {
                    state.geometry.parity = parity;
                }
                self.ack_conf(&mut state);
                Ok(Vec::new())
            }
            SET_STOPSIZE => {
                let byte = require_byte(body, subcommand)?;
                let mut state = self.lock();
                if let Some(stop) = wire::decode_stopsize(byte)? {
                    state.geometry.stop_bits = stop;
                }
                self.ack_conf(&mut state);
                Ok(Vec::new())
            }
            SET_CONTROL => {
                let byte = require_byte(body, subcommand)?;
                let mut state = self.lock();
                match wire::classify_control(byte) {
                    ControlReply::Flow(flow) => {
                        if let Some(flow) = flow {
                            state.geometry.flow = flow;
                        }
                        self.ack_conf(&mut state);
                    }
                    ControlReply::Break(_) => {}
                    ControlReply::Dtr(value) => state.modem.dtr = value,
                    ControlReply::Rts(value) => state.modem.rts = value,
                    ControlReply::Unrecognized(value) => {
                        debug!("unrecognized SET_CONTROL reply value {value:#04x}");
                    }
                }
                Ok(Vec::new())
            }
            NOTIFY_MODEMSTATE => {
                let byte = require_byte(body, subcommand)?;
                self.lock().modem.apply_notification(byte);
                Ok(Vec::new())
            }
            other => {
                debug!("ignoring COM-PORT subcommand {other}");
                Ok(Vec::new())
            }
        }
    }

    fn handle_signature(&self, body: &[u8]) -> Vec<TelnetFrame> {
        if body.is_empty() {
            vec![subneg(self.signature.clone().into_bytes(), SIGNATURE)]
        } else {
            self.lock().peer_signature = Some(String::from_utf8_lossy(body).into_owned());
            Vec::new()
        }
    }

    fn ack_conf(&self, state: &mut EngineState) {
        state.conf_pending = state.conf_pending.saturating_sub(1);
        if state.can_comport && state.conf_pending == 0 && !state.initial_configured {
            state.initial_configured = true;
            self.initial_conf_complete.notify_waiters();
        }
    }

    /// Blocks until COM-PORT is locally active, or `BARRIER_TIMEOUT` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ComPortError::TimedOut`] if the barrier does not clear in time.
    pub async fn wait_comport_start(&self) -> ComPortResult<()> {
        wait_for(&self.comport_start, || self.can_comport()).await
    }

    /// Blocks until the initial configuration round has completed, or
    /// `BARRIER_TIMEOUT` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ComPortError::TimedOut`] if the barrier does not clear in time.
    pub async fn wait_initial_conf_complete(&self) -> ComPortResult<()> {
        wait_for(&self.initial_conf_complete, || self.initial_configured()).await
    }
}

fn require_byte(body: &[u8], subcommand: u8) -> ComPortResult<u8> {
    body.first().copied().ok_or(ComPortError::ShortPayload {
        subcommand,
        required: 1,
        available: 0,
    })
}

async fn wait_for(notify: &Notify, condition: impl Fn() -> bool) -> ComPortResult<()> {
    if condition() {
        return Ok(());
    }
    let notified = notify.notified();
    if condition() {
        return Ok(());
    }
    tokio::time::timeout(BARRIER_TIMEOUT, notified)
        .await
        .map_err(|_| ComPortError::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{FlowControl, Parity, StopBits};

    fn enable(engine: &ComPortEngine) -> Vec<TelnetFrame> {
        engine.on_option_status(TelnetOption::ComPort, TelnetSide::Local, true)
    }

    #[test]
    fn start_routine_fires_once_and_requests_current_geometry_by_default() {
        let engine = ComPortEngine::new("test v1");
        let frames = enable(&engine);
        assert!(engine.can_comport());
        // SIGNATURE, LINESTATE_MASK, MODEMSTATE_MASK, 5x termios, 2x modem request, BREAK_REQUEST
        assert_eq!(frames.len(), 11);
        assert!(enable(&engine).is_empty(), "start routine must not refire");
    }

    #[test]
    fn tcsetattr_before_comport_defers_until_start_routine() {
        let engine = ComPortEngine::new("test v1");
        let geometry = SerialGeometry {
            output_baud: Some(115_200),
            input_baud: None,
            data_bits: 7,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
            flow: FlowControl::Hardware,
        };
        assert!(engine.tcsetattr(geometry).is_empty());
        assert_eq!(engine.tcgetattr(), geometry);
        let frames = enable(&engine);
        assert_eq!(frames.len(), 11);
    }

    #[test]
    fn tcsetattr_after_comport_emits_five_frames_immediately() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        let frames = engine.tcsetattr(SerialGeometry::default());
        assert_eq!(frames.len(), 5);
    }

    #[test]
    fn modem_bis_before_comport_is_deferred() {
        let engine = ComPortEngine::new("test v1");
        let frames = engine.modem_bis(ModemMask { dtr: true, rts: false });
        assert!(frames.is_empty());
        assert!(engine.modem_get().dtr);
    }

    #[test]
    fn modem_bis_after_comport_emits_set_control() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        let frames = engine.modem_bis(ModemMask { dtr: true, rts: true });
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn set_baudrate_notification_updates_geometry_and_acks_conf() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        assert!(!engine.initial_configured());
        let payload = {
            let mut v = vec![SET_BAUDRATE + SERVER_BASE];
            v.extend_from_slice(&wire::encode_baud(Some(57_600)));
            v
        };
        engine.on_subnegotiation(TelnetOption::ComPort, &payload).unwrap();
        assert_eq!(engine.tcgetattr().output_baud, Some(57_600));
    }

    #[test]
    fn fifth_ack_latches_initial_configured() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        let baud_payload = {
            let mut v = vec![SET_BAUDRATE + SERVER_BASE];
            v.extend_from_slice(&wire::encode_baud(Some(9600)));
            v
        };
        engine.on_subnegotiation(TelnetOption::ComPort, &baud_payload).unwrap();
        engine
            .on_subnegotiation(TelnetOption::ComPort, &[SET_DATASIZE + SERVER_BASE, 8])
            .unwrap();
        engine
            .on_subnegotiation(TelnetOption::ComPort, &[SET_PARITY + SERVER_BASE, 1])
            .unwrap();
        engine
            .on_subnegotiation(TelnetOption::ComPort, &[SET_STOPSIZE + SERVER_BASE, 1])
            .unwrap();
        assert!(!engine.initial_configured());
        engine
            .on_subnegotiation(
                TelnetOption::ComPort,
                &[SET_CONTROL + SERVER_BASE, control::FLOW_NONE],
            )
            .unwrap();
        assert!(engine.initial_configured());
    }

    #[test]
    fn client_echo_below_server_base_is_ignored() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        let frames = engine
            .on_subnegotiation(TelnetOption::ComPort, &[SET_BAUDRATE, 0, 0, 0x25, 0x80])
            .unwrap();
        assert!(frames.is_empty());
        assert_eq!(engine.tcgetattr().output_baud, Some(9600));
    }

    #[test]
    fn unrecognized_set_control_value_is_a_no_op() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        let before = engine.modem_get();
        engine
            .on_subnegotiation(TelnetOption::ComPort, &[SET_CONTROL + SERVER_BASE, 0xEE])
            .unwrap();
        assert_eq!(engine.modem_get(), before);
    }

    #[test]
    fn empty_signature_request_replies_with_our_signature() {
        let engine = ComPortEngine::new("test v9.9");
        let frames = engine.handle_signature(&[]);
        match &frames[0] {
            TelnetFrame::Subnegotiate(TelnetOption::ComPort, payload) => {
                assert_eq!(payload[0], SIGNATURE);
                assert_eq!(&payload[1..], b"test v9.9");
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[tokio::test]
    async fn wait_comport_start_returns_immediately_once_enabled() {
        let engine = ComPortEngine::new("test v1");
        enable(&engine);
        engine.wait_comport_start().await.unwrap();
    }
}

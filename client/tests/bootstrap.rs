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

//! End-to-end test against a minimal RFC 2217 server stub: negotiates
//! `BINARY`/`SGA`/`COM-PORT`, answers the initial configuration round, and
//! echoes data back so a full `connect` -> `write` -> `read` round trip can
//! be exercised through the real wire codec.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use rfc2217_client::{ClientConfig, SerialTerminal};
use rfc2217_comport::consts::{self, control};
use rfc2217_comport::SerialGeometry;
use rfc2217_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;

const IAC: u8 = 255;
const WILL: u8 = 251;
const DO: u8 = 253;

fn subneg(subcommand: u8, body: Vec<u8>) -> TelnetFrame {
    let mut payload = vec![subcommand + consts::SERVER_BASE];
    payload.extend(body);
    TelnetFrame::Subnegotiate(TelnetOption::ComPort, Bytes::from(payload))
}

/// Answers the five-frame bootstrap negotiation (`WILL`/`DO` `BINARY`, `SGA`,
/// local `COM-PORT`) by mirroring each command directly on the raw stream.
/// The shared wire codec's accept policy is written for the client side of
/// this exchange (it never offers `COM-PORT` remotely), so the stub cannot
/// reuse it to decide the server's replies here.
async fn answer_bootstrap_negotiation(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut triplets = [0u8; 15];
    stream.read_exact(&mut triplets).await?;
    let mut reply = Vec::with_capacity(15);
    for chunk in triplets.chunks_exact(3) {
        let [iac, cmd, opt] = [chunk[0], chunk[1], chunk[2]];
        debug_assert_eq!(iac, IAC);
        let mirrored = if cmd == WILL { DO } else { WILL };
        reply.extend_from_slice(&[IAC, mirrored, opt]);
    }
    stream.write_all(&reply).await
}

/// Plays the server side of the handshake: mirrors the bootstrap negotiation,
/// answers the five configuration requests the start routine issues, then
/// echoes any data bytes it receives.
async fn run_server_stub(mut stream: TcpStream) {
    answer_bootstrap_negotiation(&mut stream).await.expect("negotiation should succeed");
    let mut framed = Framed::new(stream, TelnetCodec::new());
    loop {
        let Some(event) = framed.next().await else {
            return;
        };
        let Ok(event) = event else {
            return;
        };
        match event {
            TelnetEvent::Subnegotiate(TelnetOption::ComPort, payload) => {
                let Some((&sub, body)) = payload.split_first() else {
                    continue;
                };
                let reply = match sub {
                    consts::SIGNATURE if body.is_empty() => {
                        Some(subneg(consts::SIGNATURE, b"mock-server".to_vec()))
                    }
                    consts::SET_BAUDRATE => Some(subneg(consts::SET_BAUDRATE, vec![0, 0, 0x25, 0x80])),
                    consts::SET_DATASIZE => Some(subneg(consts::SET_DATASIZE, vec![8])),
                    consts::SET_PARITY => Some(subneg(consts::SET_PARITY, vec![1])),
                    consts::SET_STOPSIZE => Some(subneg(consts::SET_STOPSIZE, vec![1])),
                    consts::SET_CONTROL => match body.first() {
                        Some(&control::FLOW_REQUEST | &control::FLOW_NONE | &control::FLOW_XONXOFF | &control::FLOW_HARDWARE) => {
                            Some(subneg(consts::SET_CONTROL, vec![control::FLOW_NONE]))
                        }
                        Some(&control::DTR_REQUEST) => Some(subneg(consts::SET_CONTROL, vec![control::DTR_OFF])),
                        Some(&control::RTS_REQUEST) => Some(subneg(consts::SET_CONTROL, vec![control::RTS_OFF])),
                        Some(&control::BREAK_REQUEST) => Some(subneg(consts::SET_CONTROL, vec![control::BREAK_OFF])),
                        _ => None,
                    },
                    _ => None,
                };
                if let Some(reply) = reply
                    && framed.send(reply).await.is_err()
                {
                    return;
                }
            }
            TelnetEvent::Data(byte) => {
                if framed.send(&[byte][..]).await.is_err() {
                    return;
                }
            }
            _ => {}
        }
        for reply in framed.codec_mut().take_pending_replies() {
            if framed.send(reply).await.is_err() {
                return;
            }
        }
    }
}

#[tokio::test]
async fn connect_negotiates_and_round_trips_data() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        run_server_stub(stream).await;
    });

    let config = ClientConfig::new()
        .with_connect_timeout(Duration::from_secs(2))
        .with_barrier_timeout(Duration::from_secs(2));
    let mut terminal = SerialTerminal::connect(&format!("127.0.0.1,{port}"), config)
        .await
        .expect("connect should succeed against the local stub");

    // Requesting explicit configuration opts this connection into the barrier wait
    // (termios_requested flips true, sticky for the connection's life); without
    // this call read/write would not block on COM-PORT/initial-config at all,
    // per the opt-out below.
    terminal.tcsetattr(SerialGeometry::default()).await.expect("tcsetattr should queue or send");

    terminal.write(b"ping").await.expect("write should clear the COM-PORT-start barrier");
    assert!(terminal.can_comport());

    let mut received = Vec::new();
    while received.len() < 4 {
        let mut buf = [0u8; 1];
        let n = terminal.read(&mut buf).await.expect("read should clear the initial-config barrier");
        assert_eq!(n, 1);
        received.push(buf[0]);
    }
    assert_eq!(received, b"ping");
    assert!(terminal.initial_configured());
    assert_eq!(terminal.peer_signature().as_deref(), Some("mock-server"));

    terminal.close().await.expect("close should succeed");
    server.await.expect("server task should not panic");
}

/// Mirrors the bootstrap negotiation, then sends one raw data byte and never
/// answers any COM-PORT subnegotiation — `initial_configured` can never become
/// true against this stub.
async fn run_server_stub_without_config_acks(mut stream: TcpStream) {
    answer_bootstrap_negotiation(&mut stream).await.expect("negotiation should succeed");
    stream.write_all(b"X").await.expect("data byte should send");
    // Keep the connection open but otherwise unresponsive until the client closes it.
    let mut discard = [0u8; 64];
    loop {
        match stream.read(&mut discard).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

#[tokio::test]
async fn read_without_prior_tcsetattr_skips_initial_config_barrier() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        run_server_stub_without_config_acks(stream).await;
    });

    let config = ClientConfig::new()
        .with_connect_timeout(Duration::from_secs(2))
        .with_barrier_timeout(Duration::from_secs(2));
    let mut terminal = SerialTerminal::connect(&format!("127.0.0.1,{port}"), config)
        .await
        .expect("connect should succeed against the local stub");

    // No tcsetattr call: termios_requested stays false, so this read must not
    // wait on initial_configured, which this stub never completes.
    let mut buf = [0u8; 1];
    let n = tokio::time::timeout(Duration::from_secs(2), terminal.read(&mut buf))
        .await
        .expect("read must not block on a barrier that can never clear")
        .expect("read should succeed");
    assert_eq!(n, 1);
    assert_eq!(buf[0], b'X');
    assert!(!terminal.initial_configured());

    drop(terminal);
    server.await.expect("server task should not panic");
}

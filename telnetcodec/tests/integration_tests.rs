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

//! Integration tests for telnetcodec
//!
//! These exercise the codec end-to-end across a client/server pair of
//! independent `TelnetCodec` instances, and the split-read boundary
//! behaviors a real socket read loop has to tolerate.

use bytes::{Bytes, BytesMut};
use rfc2217_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide};
use tokio_util::codec::{Decoder, Encoder};

const IAC: u8 = 255;
const WILL: u8 = 251;
const WONT: u8 = 252;
const DO: u8 = 253;
const DONT: u8 = 254;
const SB: u8 = 250;
const SE: u8 = 240;
const CPCO: u8 = 44;

// ============================================================================
// Helper Functions
// ============================================================================

fn create_client_server_pair() -> (TelnetCodec, TelnetCodec) {
    (TelnetCodec::new(), TelnetCodec::new())
}

fn encode_frames(codec: &mut TelnetCodec, frames: Vec<TelnetFrame>) -> BytesMut {
    let mut buffer = BytesMut::new();
    for frame in frames {
        codec.encode(frame, &mut buffer).unwrap();
    }
    buffer
}

fn decode_all(codec: &mut TelnetCodec, buffer: &mut BytesMut) -> Vec<TelnetEvent> {
    let mut events = Vec::new();
    while let Some(event) = codec.decode(buffer).unwrap() {
        events.push(event);
    }
    events
}

/// Feeds `whole` to a fresh codec one byte at a time, split at `split_at`,
/// and returns every event observed across both halves.
fn decode_split_at(whole: &[u8], split_at: usize) -> Vec<TelnetEvent> {
    let mut codec = TelnetCodec::new();
    let mut buffer = BytesMut::from(&whole[..split_at]);
    let mut events = decode_all(&mut codec, &mut buffer);
    buffer.extend_from_slice(&whole[split_at..]);
    events.extend(decode_all(&mut codec, &mut buffer));
    events
}

fn decode_whole(whole: &[u8]) -> Vec<TelnetEvent> {
    let mut codec = TelnetCodec::new();
    let mut buffer = BytesMut::from(whole);
    decode_all(&mut codec, &mut buffer)
}

// ============================================================================
// Client-Server Negotiation Tests
// ============================================================================

#[test]
fn client_server_binary_negotiation() {
    let (mut client, mut server) = create_client_server_pair();

    let mut wire = encode_frames(&mut client, vec![TelnetFrame::Will(TelnetOption::TransmitBinary)]);
    let events = decode_all(&mut server, &mut wire);
    assert_eq!(
        events,
        vec![TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Remote, true)]
    );
    assert!(server.is_enabled_remote(TelnetOption::TransmitBinary));
    // Unsolicited from the server's point of view: RFC 1143 requires acking it.
    assert_eq!(server.take_pending_replies(), vec![TelnetFrame::Do(TelnetOption::TransmitBinary)]);
}

#[test]
fn client_server_comport_offered_unprompted_is_accepted_with_do_reply() {
    let (mut client, mut server) = create_client_server_pair();

    // Server offers COM-PORT without the client ever asking.
    let mut wire = encode_frames(&mut server, vec![TelnetFrame::Will(TelnetOption::ComPort)]);
    let events = decode_all(&mut client, &mut wire);
    assert_eq!(
        events,
        vec![TelnetEvent::OptionStatus(TelnetOption::ComPort, TelnetSide::Remote, true)]
    );
    assert_eq!(client.take_pending_replies(), vec![TelnetFrame::Do(TelnetOption::ComPort)]);
    assert!(client.is_enabled_remote(TelnetOption::ComPort));
}

#[test]
fn client_server_unsupported_option_is_refused_both_ways() {
    let (mut client, mut server) = create_client_server_pair();

    let mut wire = encode_frames(&mut server, vec![TelnetFrame::Will(TelnetOption::Unknown(99))]);
    let events = decode_all(&mut client, &mut wire);
    assert_eq!(events, Vec::new());
    assert_eq!(client.take_pending_replies(), vec![TelnetFrame::Dont(TelnetOption::Unknown(99))]);
    assert!(!client.is_enabled_remote(TelnetOption::Unknown(99)));
}

// ============================================================================
// Data Transfer Tests
// ============================================================================

#[test]
fn client_server_binary_data_with_literal_iac() {
    let (mut client, mut server) = create_client_server_pair();

    let data = [b'H', b'i', IAC, b'!'];
    let mut wire = BytesMut::new();
    for byte in data {
        client.encode(TelnetFrame::Data(byte), &mut wire).unwrap();
    }
    assert_eq!(&wire[..], &[b'H', b'i', IAC, IAC, b'!'][..]);

    let events = decode_all(&mut server, &mut wire);
    assert_eq!(
        events,
        vec![
            TelnetEvent::Data(b'H'),
            TelnetEvent::Data(b'i'),
            TelnetEvent::Data(IAC),
            TelnetEvent::Data(b'!'),
        ]
    );
}

#[test]
fn client_server_data_with_interspersed_negotiation() {
    let (mut client, mut server) = create_client_server_pair();

    let mut wire = BytesMut::new();
    client.encode(TelnetFrame::Data(b'A'), &mut wire).unwrap();
    client.encode(TelnetFrame::Will(TelnetOption::SuppressGoAhead), &mut wire).unwrap();
    client.encode(TelnetFrame::Data(b'B'), &mut wire).unwrap();

    let events = decode_all(&mut server, &mut wire);
    assert_eq!(
        events,
        vec![
            TelnetEvent::Data(b'A'),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Remote, true),
            TelnetEvent::Data(b'B'),
        ]
    );
}

// ============================================================================
// Split-Read Boundary Tests (spec.md §8 "Boundary behaviors")
// ============================================================================

#[test]
fn split_between_the_two_bytes_of_a_literal_iac_matches_unsplit() {
    let whole = [b'X', IAC, IAC, b'Y'];
    let unsplit = decode_whole(&whole);
    // Split right between the two IAC bytes of the doubled pair.
    let split = decode_split_at(&whole, 2);
    assert_eq!(unsplit, split);
    assert_eq!(unsplit, vec![TelnetEvent::Data(b'X'), TelnetEvent::Data(IAC), TelnetEvent::Data(b'Y')]);
}

#[test]
fn split_at_the_option_byte_of_will_matches_unsplit() {
    let whole = [IAC, WILL, CPCO];
    let unsplit = decode_whole(&whole);
    let split = decode_split_at(&whole, 2);
    assert_eq!(unsplit, split);
}

#[test]
fn split_at_the_option_byte_of_wont_matches_unsplit() {
    let whole = [IAC, WONT, CPCO];
    let unsplit = decode_whole(&whole);
    let split = decode_split_at(&whole, 2);
    assert_eq!(unsplit, split);
}

#[test]
fn split_at_the_option_byte_of_do_matches_unsplit() {
    let whole = [IAC, DO, CPCO];
    let unsplit = decode_whole(&whole);
    let split = decode_split_at(&whole, 2);
    assert_eq!(unsplit, split);
}

#[test]
fn split_at_the_option_byte_of_dont_matches_unsplit() {
    let whole = [IAC, DONT, CPCO];
    let unsplit = decode_whole(&whole);
    let split = decode_split_at(&whole, 2);
    assert_eq!(unsplit, split);
}

#[test]
fn split_between_subnegotiation_body_iac_and_its_partner_matches_unsplit() {
    // SB COM-PORT <escaped IAC byte> SE
    let whole = [IAC, SB, CPCO, 0x01, IAC, IAC, 0x02, IAC, SE];
    let unsplit = decode_whole(&whole);
    // Split right between the body's two IAC bytes.
    let split = decode_split_at(&whole, 5);
    assert_eq!(unsplit, split);
    assert_eq!(
        unsplit,
        vec![TelnetEvent::Subnegotiate(TelnetOption::ComPort, Bytes::from_static(&[0x01, IAC, 0x02]))]
    );
}

#[test]
fn split_between_subnegotiation_closing_iac_and_se_matches_unsplit() {
    let whole = [IAC, SB, CPCO, 0x65, 0x00, 0x00, 0x25, 0x80, IAC, SE];
    let unsplit = decode_whole(&whole);
    let split = decode_split_at(&whole, whole.len() - 1);
    assert_eq!(unsplit, split);
}

#[test]
fn overlong_subnegotiation_is_discarded_and_next_frame_decodes_normally() {
    // One byte past the cap, matching the point the codec abandons the frame —
    // past this, trailing body bytes fall through to ordinary data decoding.
    const SUBNEGOTIATION_CAPACITY: usize = 256;
    let mut whole = vec![IAC, SB, CPCO];
    whole.extend(std::iter::repeat_n(0x41u8, SUBNEGOTIATION_CAPACITY + 1));
    whole.extend_from_slice(&[IAC, SE, b'X']);
    let events = decode_whole(&whole);
    // The abandoned frame produces no Subnegotiate event; the stray `IAC SE` is
    // reinterpreted as an unrecognized top-level command, then `X` decodes as data.
    assert_eq!(events, vec![TelnetEvent::NoOperation, TelnetEvent::Data(b'X')]);
}

// ============================================================================
// Session-Shaped Tests
// ============================================================================

#[test]
fn client_server_option_negotiation_then_data_session() {
    let (mut client, mut server) = create_client_server_pair();

    let bootstrap = vec![
        TelnetFrame::Will(TelnetOption::TransmitBinary),
        TelnetFrame::Do(TelnetOption::TransmitBinary),
        TelnetFrame::Will(TelnetOption::SuppressGoAhead),
        TelnetFrame::Do(TelnetOption::SuppressGoAhead),
        TelnetFrame::Will(TelnetOption::ComPort),
    ];
    let mut wire = encode_frames(&mut client, bootstrap);
    let events = decode_all(&mut server, &mut wire);
    assert_eq!(
        events,
        vec![
            TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Remote, true),
            TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Remote, true),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::ComPort, TelnetSide::Remote, true),
        ]
    );
    // Every frame here arrived at the server unsolicited (fresh No state), so
    // RFC 1143 requires an ack for each: WILL -> DO/DONT, DO -> WILL/WONT.
    let replies = server.take_pending_replies();
    assert_eq!(
        replies,
        vec![
            TelnetFrame::Do(TelnetOption::TransmitBinary),
            TelnetFrame::Will(TelnetOption::TransmitBinary),
            TelnetFrame::Do(TelnetOption::SuppressGoAhead),
            TelnetFrame::Will(TelnetOption::SuppressGoAhead),
            TelnetFrame::Do(TelnetOption::ComPort),
        ]
    );

    let mut reply_wire = encode_frames(&mut server, replies);
    let client_events = decode_all(&mut client, &mut reply_wire);
    assert_eq!(
        client_events,
        vec![
            TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Remote, true),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Local, true),
            TelnetEvent::OptionStatus(TelnetOption::SuppressGoAhead, TelnetSide::Remote, true),
            TelnetEvent::OptionStatus(TelnetOption::ComPort, TelnetSide::Local, true),
        ]
    );

    // Now ordinary data flows both ways.
    let mut data_wire = BytesMut::new();
    for byte in b"ok" {
        client.encode(TelnetFrame::Data(*byte), &mut data_wire).unwrap();
    }
    let data_events = decode_all(&mut server, &mut data_wire);
    assert_eq!(data_events, vec![TelnetEvent::Data(b'o'), TelnetEvent::Data(b'k')]);
}

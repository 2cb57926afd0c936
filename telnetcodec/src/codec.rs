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

use crate::consts;
use crate::event::TelnetEvent;
use crate::frame::TelnetFrame;
use crate::options::{TelnetOption, TelnetOptions, TelnetSide};
use crate::result::CodecError;
use bytes::{Buf, BufMut, BytesMut};
use std::collections::VecDeque;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// A subnegotiation body may not exceed this many bytes; longer bodies are abandoned
/// rather than grown without bound (RFC 2217 subnegotiations are a handful of bytes).
const SUBNEGOTIATION_CAPACITY: usize = 256;

/// Tokio codec implementing the Telnet byte-stream framing (RFC 854) plus the
/// RFC 1143 option negotiator.
///
/// `TelnetCodec` doubles IAC on the write path and extracts IAC command frames from
/// the read path, reassembling partial frames across read boundaries. Completed
/// option negotiations are surfaced as [`TelnetEvent::OptionStatus`]; everything else
/// the remote negotiates unprompted is refused automatically per
/// [`TelnetOption::supported_local`]/[`TelnetOption::supported_remote`].
///
/// Negotiation replies the Q method forces (e.g. a `DO` in answer to an unsolicited
/// `WILL`) cannot be handed back through [`Decoder::decode`]'s return value, since that
/// interface yields one inbound event at a time. They are queued instead; call
/// [`TelnetCodec::take_pending_replies`] after every `decode` call (or every
/// `Framed::next`) and encode each into the sink.
pub struct TelnetCodec {
    decoder_state: DecoderState,
    subneg_option: TelnetOption,
    subneg_buffer: BytesMut,
    options: TelnetOptions,
    pending_replies: VecDeque<TelnetFrame>,
}

impl Default for TelnetCodec {
    fn default() -> Self {
        Self {
            decoder_state: DecoderState::NormalData,
            subneg_option: TelnetOption::Unknown(0),
            subneg_buffer: BytesMut::with_capacity(SUBNEGOTIATION_CAPACITY),
            options: TelnetOptions::new(),
            pending_replies: VecDeque::new(),
        }
    }
}

impl TelnetCodec {
    /// Creates a new codec with every option at its initial `(NO, NO)` state.
    #[must_use]
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Whether `option` is currently enabled on our side.
    #[must_use]
    pub fn is_enabled_local(&self, option: TelnetOption) -> bool {
        self.options.local_enabled(option)
    }

    /// Whether `option` is currently enabled on the remote side.
    #[must_use]
    pub fn is_enabled_remote(&self, option: TelnetOption) -> bool {
        self.options.remote_enabled(option)
    }

    /// Begin offering `option` locally. Returns the `WILL` frame to send, if any.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_local(option)
    }

    /// Begin refusing `option` locally. Returns the `WONT` frame to send, if any.
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_local(option)
    }

    /// Begin asking the remote to perform `option`. Returns the `DO` frame to send, if any.
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_remote(option)
    }

    /// Begin asking the remote to stop performing `option`. Returns the `DONT` frame to send, if any.
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_remote(option)
    }

    /// Drains and returns any negotiation replies the decoder queued while processing
    /// the last batch of inbound bytes. Callers must encode and flush these after every
    /// decode/next call, or the remote will never see our side of the handshake.
    pub fn take_pending_replies(&mut self) -> Vec<TelnetFrame> {
        self.pending_replies.drain(..).collect()
    }

    fn abandon_subnegotiation(&mut self, reason: &str) {
        warn!("abandoning subnegotiation: {reason}");
        self.subneg_buffer.clear();
        self.decoder_state = DecoderState::NormalData;
    }

    fn finish_negotiation(
        &mut self,
        frame: &TelnetFrame,
        side: TelnetSide,
        option: TelnetOption,
    ) -> Result<Option<TelnetEvent>, CodecError> {
        let was_enabled = match side {
            TelnetSide::Local => self.options.local_enabled(option),
            TelnetSide::Remote => self.options.remote_enabled(option),
        };
        let reply = self.options.handle_received(frame)?;
        if let Some(reply) = reply {
            self.pending_replies.push_back(reply);
        }
        let is_enabled = match side {
            TelnetSide::Local => self.options.local_enabled(option),
            TelnetSide::Remote => self.options.remote_enabled(option),
        };
        Ok((was_enabled != is_enabled).then_some(TelnetEvent::OptionStatus(option, side, is_enabled)))
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.decoder_state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    return Ok(Some(TelnetEvent::Data(byte)));
                }

                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Data(consts::IAC)));
                }
                (DecoderState::InterpretAsCommand, consts::NOP) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::NoOperation));
                }
                (DecoderState::InterpretAsCommand, consts::DM) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::DataMark));
                }
                (DecoderState::InterpretAsCommand, consts::BRK) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Break));
                }
                (DecoderState::InterpretAsCommand, consts::IP) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::InterruptProcess));
                }
                (DecoderState::InterpretAsCommand, consts::AO) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::AbortOutput));
                }
                (DecoderState::InterpretAsCommand, consts::AYT) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::AreYouThere));
                }
                (DecoderState::InterpretAsCommand, consts::EC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EraseCharacter));
                }
                (DecoderState::InterpretAsCommand, consts::EL) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EraseLine));
                }
                (DecoderState::InterpretAsCommand, consts::GA) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::GoAhead));
                }
                (DecoderState::InterpretAsCommand, consts::EOR) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EndOfRecord));
                }
                (DecoderState::InterpretAsCommand, consts::DO) => {
                    self.decoder_state = DecoderState::NegotiateDo;
                }
                (DecoderState::InterpretAsCommand, consts::DONT) => {
                    self.decoder_state = DecoderState::NegotiateDont;
                }
                (DecoderState::InterpretAsCommand, consts::WILL) => {
                    self.decoder_state = DecoderState::NegotiateWill;
                }
                (DecoderState::InterpretAsCommand, consts::WONT) => {
                    self.decoder_state = DecoderState::NegotiateWont;
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.decoder_state = DecoderState::Subnegotiate;
                }
                (DecoderState::InterpretAsCommand, other) => {
                    warn!("received unknown command byte 0x{other:02X}, ignoring");
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::NoOperation));
                }

                (DecoderState::NegotiateDo, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = TelnetOption::from_u8(byte);
                    if let Some(event) =
                        self.finish_negotiation(&TelnetFrame::Do(option), TelnetSide::Local, option)?
                    {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateDont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = TelnetOption::from_u8(byte);
                    if let Some(event) =
                        self.finish_negotiation(&TelnetFrame::Dont(option), TelnetSide::Local, option)?
                    {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWill, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = TelnetOption::from_u8(byte);
                    if let Some(event) =
                        self.finish_negotiation(&TelnetFrame::Will(option), TelnetSide::Remote, option)?
                    {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = TelnetOption::from_u8(byte);
                    if let Some(event) =
                        self.finish_negotiation(&TelnetFrame::Wont(option), TelnetSide::Remote, option)?
                    {
                        return Ok(Some(event));
                    }
                }

                (DecoderState::Subnegotiate, _) => {
                    self.subneg_option = TelnetOption::from_u8(byte);
                    self.subneg_buffer.clear();
                    self.decoder_state = DecoderState::SubnegotiateArgument;
                }
                (DecoderState::SubnegotiateArgument, consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC;
                }
                (DecoderState::SubnegotiateArgument, _) => {
                    if self.subneg_buffer.len() >= SUBNEGOTIATION_CAPACITY {
                        self.abandon_subnegotiation("overlong subnegotiation body");
                        continue;
                    }
                    self.subneg_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIAC, consts::IAC) => {
                    if self.subneg_buffer.len() >= SUBNEGOTIATION_CAPACITY {
                        self.abandon_subnegotiation("overlong subnegotiation body");
                        continue;
                    }
                    self.subneg_buffer.put_u8(consts::IAC);
                    self.decoder_state = DecoderState::SubnegotiateArgument;
                }
                (DecoderState::SubnegotiateArgumentIAC, consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = self.subneg_option;
                    let payload = self.subneg_buffer.split().freeze();
                    return Ok(Some(TelnetEvent::Subnegotiate(option, payload)));
                }
                (DecoderState::SubnegotiateArgumentIAC, other) => {
                    self.abandon_subnegotiation(&format!(
                        "expected IAC or SE after IAC in subnegotiation body, got 0x{other:02X}"
                    ));
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(byte) => {
                dst.reserve(2);
                dst.put_u8(byte);
                if byte == consts::IAC {
                    dst.put_u8(consts::IAC);
                }
            }
            TelnetFrame::NoOperation => write_command(dst, consts::NOP),
            TelnetFrame::DataMark => write_command(dst, consts::DM),
            TelnetFrame::Break => write_command(dst, consts::BRK),
            TelnetFrame::InterruptProcess => write_command(dst, consts::IP),
            TelnetFrame::AbortOutput => write_command(dst, consts::AO),
            TelnetFrame::AreYouThere => write_command(dst, consts::AYT),
            TelnetFrame::EraseCharacter => write_command(dst, consts::EC),
            TelnetFrame::EraseLine => write_command(dst, consts::EL),
            TelnetFrame::GoAhead => write_command(dst, consts::GA),
            TelnetFrame::EndOfRecord => write_command(dst, consts::EOR),
            TelnetFrame::Do(option) => write_negotiation(dst, consts::DO, option),
            TelnetFrame::Dont(option) => write_negotiation(dst, consts::DONT, option),
            TelnetFrame::Will(option) => write_negotiation(dst, consts::WILL, option),
            TelnetFrame::Wont(option) => write_negotiation(dst, consts::WONT, option),
            TelnetFrame::Subnegotiate(option, payload) => {
                dst.reserve(5 + payload.len() * 2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(option.to_u8());
                for byte in payload {
                    dst.put_u8(byte);
                    if byte == consts::IAC {
                        dst.put_u8(consts::IAC);
                    }
                }
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(TelnetFrame::Data(item), dst)
    }
}

impl<'a> Encoder<&'a [u8]> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a raw byte buffer with IAC doubled, per the C1 write-path contract:
    /// every input byte appears in order, 0xFF duplicated, nothing else inserted.
    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        let mut start = 0;
        for (index, &byte) in item.iter().enumerate() {
            if byte == consts::IAC {
                dst.extend_from_slice(&item[start..=index]);
                dst.put_u8(consts::IAC);
                start = index + 1;
            }
        }
        dst.extend_from_slice(&item[start..]);
        Ok(())
    }
}

impl<'a> Encoder<&'a str> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &'a str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(item.as_bytes(), dst)
    }
}

fn write_command(dst: &mut BytesMut, command: u8) {
    dst.reserve(2);
    dst.put_u8(consts::IAC);
    dst.put_u8(command);
}

fn write_negotiation(dst: &mut BytesMut, verb: u8, option: TelnetOption) {
    dst.reserve(3);
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.to_u8());
}

/// Decoder state machine, one byte of lookahead at a time (RFC 854 framing).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum DecoderState {
    /// Outside any IAC frame; bytes are user data.
    #[default]
    NormalData,
    /// Just saw IAC; next byte selects the command.
    InterpretAsCommand,
    /// Saw `IAC DO`; next byte is the option.
    NegotiateDo,
    /// Saw `IAC DONT`; next byte is the option.
    NegotiateDont,
    /// Saw `IAC WILL`; next byte is the option.
    NegotiateWill,
    /// Saw `IAC WONT`; next byte is the option.
    NegotiateWont,
    /// Saw `IAC SB`; next byte is the option the subnegotiation is for.
    Subnegotiate,
    /// Accumulating subnegotiation body bytes.
    SubnegotiateArgument,
    /// Saw IAC inside a subnegotiation body; next byte disambiguates escape vs. SE.
    SubnegotiateArgumentIAC,
}

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

//! Pure mappings between `SerialGeometry`/`ModemLines` fields and the 1- or
//! 4-byte wire values RFC 2217 uses for them (C3).

use crate::consts::control;
use crate::result::{ComPortError, ComPortResult};
use byteorder::{BigEndian, ByteOrder};

/// Parity, as RFC 2217's `SET_PARITY` enumerates it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
    /// Parity bit always 1.
    Mark,
    /// Parity bit always 0.
    Space,
}

/// Stop bits, as RFC 2217's `SET_STOPSIZE` enumerates it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
    /// 1.5 stop bits. Only meaningful when the data size is 5.
    OnePointFive,
}

/// Flow control, as the `SET_CONTROL` value space enumerates it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlowControl {
    /// No flow control.
    None,
    /// XON/XOFF software flow control.
    XonXoff,
    /// RTS/CTS hardware flow control.
    Hardware,
}

/// Encodes a baud rate as a 4-byte big-endian wire value. `None` requests the
/// server's current value (wire value 0).
#[must_use]
pub fn encode_baud(baud: Option<u32>) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, baud.unwrap_or(0));
    buf
}

/// Decodes a 4-byte big-endian baud rate. Wire value 0 decodes to `None` ("unknown"/"same as output").
pub fn decode_baud(payload: &[u8]) -> ComPortResult<Option<u32>> {
    if payload.len() < 4 {
        return Err(ComPortError::ShortPayload {
            subcommand: crate::consts::SET_BAUDRATE,
            required: 4,
            available: payload.len(),
        });
    }
    let value = BigEndian::read_u32(payload);
    Ok(if value == 0 { None } else { Some(value) })
}

/// Encodes a data size. `None` requests the server's current value.
#[must_use]
pub fn encode_datasize(bits: Option<u8>) -> u8 {
    bits.unwrap_or(0)
}

/// Decodes a data size byte. 0 decodes to `None` ("request").
pub fn decode_datasize(byte: u8) -> ComPortResult<Option<u8>> {
    match byte {
        0 => Ok(None),
        5..=8 => Ok(Some(byte)),
        other => Err(ComPortError::InvalidWireValue {
            subcommand: crate::consts::SET_DATASIZE,
            value: other,
        }),
    }
}

/// Encodes a parity value. `None` requests the server's current value.
#[must_use]
pub fn encode_parity(parity: Option<Parity>) -> u8 {
    match parity {
        None => 0,
        Some(Parity::None) => 1,
        Some(Parity::Odd) => 2,
        Some(Parity::Even) => 3,
        Some(Parity::Mark) => 4,
        Some(Parity::Space) => 5,
    }
}

/// Decodes a parity byte. 0 decodes to `None` ("request").
pub fn decode_parity(byte: u8) -> ComPortResult<Option<Parity>> {
    match byte {
        0 => Ok(None),
        1 => Ok(Some(Parity::None)),
        2 => Ok(Some(Parity::Odd)),
        3 => Ok(Some(Parity::Even)),
        4 => Ok(Some(Parity::Mark)),
        5 => Ok(Some(Parity::Space)),
        other => Err(ComPortError::InvalidWireValue {
            subcommand: crate::consts::SET_PARITY,
            value: other,
        }),
    }
}

/// Encodes a stop-size value. `None` requests the server's current value.
#[must_use]
pub fn encode_stopsize(stop: Option<StopBits>) -> u8 {
    match stop {
        None => 0,
        Some(StopBits::One) => 1,
        Some(StopBits::Two) => 2,
        Some(StopBits::OnePointFive) => 3,
    }
}

/// Decodes a stop-size byte. 0 decodes to `None` ("request").
pub fn decode_stopsize(byte: u8) -> ComPortResult<Option<StopBits>> {
    match byte {
        0 => Ok(None),
        1 => Ok(Some(StopBits::One)),
        2 => Ok(Some(StopBits::Two)),
        3 => Ok(Some(StopBits::OnePointFive)),
        other => Err(ComPortError::InvalidWireValue {
            subcommand: crate::consts::SET_STOPSIZE,
            value: other,
        }),
    }
}

/// Encodes a flow-control setting for `SET_CONTROL`. `None` requests the current value.
#[must_use]
pub fn encode_flow(flow: Option<FlowControl>) -> u8 {
    match flow {
        None => control::FLOW_REQUEST,
        Some(FlowControl::None) => control::FLOW_NONE,
        Some(FlowControl::XonXoff) => control::FLOW_XONXOFF,
        Some(FlowControl::Hardware) => control::FLOW_HARDWARE,
    }
}

/// Classifies a `SET_CONTROL` reply value into the sub-channel it belongs to, so
/// the engine can tell flow-control acks apart from DTR/RTS acks without a separate
/// subcommand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlReply {
    /// A flow-control value: `SET_CONTROL`'s `conf_pending` counter applies.
    Flow(Option<FlowControl>),
    /// A BREAK state change: not counted against `conf_pending`.
    Break(bool),
    /// A DTR state change: not counted against `conf_pending`.
    Dtr(bool),
    /// An RTS state change: not counted against `conf_pending`.
    Rts(bool),
    /// A value outside the recognized enumeration: the caller leaves state unchanged.
    Unrecognized(u8),
}

/// Classifies a `SET_CONTROL` reply payload byte.
#[must_use]
pub fn classify_control(value: u8) -> ControlReply {
    match value {
        control::FLOW_REQUEST => ControlReply::Flow(None),
        control::FLOW_NONE => ControlReply::Flow(Some(FlowControl::None)),
        control::FLOW_XONXOFF => ControlReply::Flow(Some(FlowControl::XonXoff)),
        control::FLOW_HARDWARE => ControlReply::Flow(Some(FlowControl::Hardware)),
        control::BREAK_ON => ControlReply::Break(true),
        control::BREAK_OFF => ControlReply::Break(false),
        control::DTR_ON => ControlReply::Dtr(true),
        control::DTR_OFF => ControlReply::Dtr(false),
        control::RTS_ON => ControlReply::Rts(true),
        control::RTS_OFF => ControlReply::Rts(false),
        other => ControlReply::Unrecognized(other),
    }
}

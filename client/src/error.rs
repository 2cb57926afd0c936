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

//! Client error types

use std::fmt;
use std::io;

/// Client result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Read or write on the socket failed.
    Io(io::Error),

    /// `connect` did not finish within the configured connect timeout.
    ConnectionTimeout,

    /// The `cond_comport_start`/`cond_initial_conf_complete` barrier did not
    /// clear within its deadline.
    BarrierTimedOut,

    /// The peer closed the connection.
    ConnectionClosed,

    /// The underlying Telnet codec reported an error.
    Codec(rfc2217_telnetcodec::CodecError),

    /// The COM-PORT engine reported an error decoding a notification.
    ComPort(rfc2217_comport::ComPortError),

    /// No candidate address for the endpoint could be resolved.
    UnresolvedEndpoint(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Io(err) => write!(f, "I/O error: {err}"),
            ClientError::ConnectionTimeout => write!(f, "connection timed out"),
            ClientError::BarrierTimedOut => write!(f, "timed out waiting for protocol barrier"),
            ClientError::ConnectionClosed => write!(f, "connection closed by peer"),
            ClientError::Codec(err) => write!(f, "telnet codec error: {err}"),
            ClientError::ComPort(err) => write!(f, "COM-PORT error: {err}"),
            ClientError::UnresolvedEndpoint(endpoint) => {
                write!(f, "could not resolve endpoint {endpoint}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof => {
                ClientError::ConnectionClosed
            }
            io::ErrorKind::TimedOut => ClientError::ConnectionTimeout,
            _ => ClientError::Io(error),
        }
    }
}

impl From<rfc2217_telnetcodec::CodecError> for ClientError {
    fn from(error: rfc2217_telnetcodec::CodecError) -> Self {
        ClientError::Codec(error)
    }
}

impl From<rfc2217_comport::ComPortError> for ClientError {
    fn from(error: rfc2217_comport::ComPortError) -> Self {
        match error {
            rfc2217_comport::ComPortError::Codec(err) => ClientError::Codec(err),
            other => ClientError::ComPort(other),
        }
    }
}

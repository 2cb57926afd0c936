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

/// Result type for COM-PORT engine operations.
pub type ComPortResult<T> = Result<T, ComPortError>;

/// Errors the COM-PORT protocol engine can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComPortError {
    /// A wire value outside the enumeration RFC 2217 defines for this subcommand.
    InvalidWireValue {
        /// The subcommand whose payload failed to decode.
        subcommand: u8,
        /// The offending byte.
        value: u8,
    },
    /// A subnegotiation payload was shorter than the subcommand requires.
    ShortPayload {
        /// The subcommand whose payload was short.
        subcommand: u8,
        /// Bytes required.
        required: usize,
        /// Bytes available.
        available: usize,
    },
    /// The underlying Telnet codec reported an error.
    Codec(rfc2217_telnetcodec::CodecError),
    /// A barrier wait (`cond_comport_start`, `cond_initial_conf_complete`) did not
    /// resolve before its deadline.
    TimedOut,
}

impl std::error::Error for ComPortError {}

impl std::fmt::Display for ComPortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComPortError::InvalidWireValue { subcommand, value } => write!(
                f,
                "invalid value 0x{value:02X} for COM-PORT subcommand {subcommand}"
            ),
            ComPortError::ShortPayload {
                subcommand,
                required,
                available,
            } => write!(
                f,
                "COM-PORT subcommand {subcommand} needs {required} bytes, got {available}"
            ),
            ComPortError::Codec(err) => write!(f, "telnet codec error: {err}"),
            ComPortError::TimedOut => write!(f, "timed out waiting for COM-PORT engine barrier"),
        }
    }
}

impl From<rfc2217_telnetcodec::CodecError> for ComPortError {
    fn from(err: rfc2217_telnetcodec::CodecError) -> Self {
        ComPortError::Codec(err)
    }
}

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

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a Telnet byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    IOError {
        /// The kind of I/O error that occurred.
        kind: std::io::ErrorKind,
        /// Description of the operation that failed.
        operation: String,
    },
    /// An invalid or unsupported frame was encountered during negotiation.
    NegotiationError {
        /// Description of what went wrong during negotiation.
        reason: String,
    },
    /// An unknown or invalid Telnet command byte was encountered.
    UnknownCommand(u8),
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {operation}: {kind:?}")
            }
            CodecError::NegotiationError { reason } => {
                write!(f, "negotiation error: {reason}")
            }
            CodecError::UnknownCommand(cmd) => {
                write!(f, "unknown telnet command: 0x{cmd:02X}")
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

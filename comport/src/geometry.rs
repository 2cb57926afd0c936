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

//! The remote serial port's configuration, as predicted by the client.

use crate::wire::{FlowControl, Parity, StopBits};

/// Remote port configuration as predicted by the client: either the most recent
/// value the caller set, or the last value the server reported, whichever is
/// more recent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SerialGeometry {
    /// Output baud rate in bits/s. `None` means "unknown".
    pub output_baud: Option<u32>,
    /// Input baud rate in bits/s. `None` means "same as output".
    pub input_baud: Option<u32>,
    /// Data bits, one of 5, 6, 7, 8.
    pub data_bits: u8,
    /// Parity setting.
    pub parity: Parity,
    /// Stop bits setting.
    pub stop_bits: StopBits,
    /// Flow control setting.
    pub flow: FlowControl,
}

impl Default for SerialGeometry {
    /// 9600 8N1, no flow control — the conventional serial default.
    fn default() -> Self {
        SerialGeometry {
            output_baud: Some(9600),
            input_baud: None,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow: FlowControl::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_9600_8n1() {
        let g = SerialGeometry::default();
        assert_eq!(g.output_baud, Some(9600));
        assert_eq!(g.data_bits, 8);
        assert_eq!(g.parity, Parity::None);
        assert_eq!(g.stop_bits, StopBits::One);
    }
}

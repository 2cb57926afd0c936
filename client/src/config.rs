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

//! Client configuration

use rfc2217_comport::BARRIER_TIMEOUT;
use std::time::Duration;

/// RFC 2217 client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long `connect` waits for a single candidate address before moving
    /// on to the next one.
    pub connect_timeout: Duration,

    /// How long `read`/`write` block on the `cond_comport_start`/
    /// `cond_initial_conf_complete` barriers before failing.
    pub barrier_timeout: Duration,

    /// When set, `read`/`write` never wait on the initial-configuration or
    /// COM-PORT-start barriers; the caller is managing port setup itself.
    pub skip_initial_barriers: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            connect_timeout: Duration::from_secs(10),
            barrier_timeout: BARRIER_TIMEOUT,
            skip_initial_barriers: false,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-candidate-address connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the barrier timeout.
    #[must_use]
    pub fn with_barrier_timeout(mut self, timeout: Duration) -> Self {
        self.barrier_timeout = timeout;
        self
    }

    /// Opts out of blocking `read`/`write` on the initial-configuration barriers.
    #[must_use]
    pub fn with_skip_initial_barriers(mut self, skip: bool) -> Self {
        self.skip_initial_barriers = skip;
        self
    }
}

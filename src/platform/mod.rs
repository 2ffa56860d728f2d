// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Platform collaborators consumed by the provider
//!
//! The provider never talks to the OS directly. Everything it needs from
//! the platform goes through the traits in this module, so an embedder
//! can back them with NDK bindings and tests can back them with the
//! scriptable implementations in [`crate::mock`].
//!
//! ## Modules
//! - `traits`: gateway and host query traits
//! - `thermal`: thermal status codes and their warning levels
//! - `clock`: wall-clock time source

mod clock;
mod thermal;
mod traits;

use std::sync::Arc;

pub use clock::SystemClock;
pub use thermal::ThermalStatus;
pub use traits::{
    Clock, FrameTiming, FrameTimingSource, HintGateway, HostPlatform, ThermalGateway,
    WarningCallback, WorkDuration,
};

/// The full set of collaborators a provider instance is bound to.
#[derive(Clone)]
pub struct PlatformBindings {
    pub thermal: Arc<dyn ThermalGateway>,
    pub hint: Arc<dyn HintGateway>,
    pub frame_timing: Arc<dyn FrameTimingSource>,
    pub host: Arc<dyn HostPlatform>,
    pub clock: Arc<dyn Clock>,
}

impl PlatformBindings {
    /// Bind gateways using the system clock.
    pub fn new(
        thermal: Arc<dyn ThermalGateway>,
        hint: Arc<dyn HintGateway>,
        frame_timing: Arc<dyn FrameTimingSource>,
        host: Arc<dyn HostPlatform>,
    ) -> Self {
        Self {
            thermal,
            hint,
            frame_timing,
            host,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

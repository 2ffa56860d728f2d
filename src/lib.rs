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

//! Thermal and performance-hint coordination for adaptive performance
//! providers.
//!
//! The crate polls platform thermal state, keeps CPU/GPU performance hint
//! sessions fed with frame work durations, and publishes a change-flagged
//! [`PerformanceDataRecord`] to the engine once per tick.

pub mod error;
pub mod mock;
pub mod platform;
pub mod prelude;
pub mod provider;

pub mod common {
    pub mod config;
}

pub use common::config::{AppConfig, ProviderConfig};
pub use error::{Error, Result};
pub use platform::PlatformBindings;
pub use provider::{
    Feature, PerformanceDataRecord, PerformanceMode, PerformanceProvider, ProviderState,
    ProviderVersion, WarningLevel,
};

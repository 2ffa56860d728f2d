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

//! The adaptive-perf prelude.
//!
//! ```rust
//! use adaptive_perf::prelude::*;
//! ```

// Provider
pub use crate::provider::{PerformanceProvider, ProviderState, ProviderVersion};

// Configuration
pub use crate::common::config::{AppConfig, ProviderConfig};

// Error types
pub use crate::error::{Error, Result};

// Snapshot types
pub use crate::provider::{
    Feature, GameMode, HintSession, HintSessionKind, PerformanceDataRecord, PerformanceMode,
    WarningLevel,
};

// Platform collaborators for embedders
pub use crate::platform::{
    Clock, FrameTiming, FrameTimingSource, HintGateway, HostPlatform, PlatformBindings,
    SystemClock, ThermalGateway, ThermalStatus, WarningCallback, WorkDuration,
};

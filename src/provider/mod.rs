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

//! Adaptive performance provider
//!
//! ## Modules
//! - `record`: the published snapshot and feature flags
//! - `mode`: game mode to performance mode mapping
//! - `hint`: hint session bookkeeping and the duration headroom policy
//! - `coordinator`: lifecycle, polling and locking around the snapshot

pub mod coordinator;
pub mod hint;
pub mod mode;
pub mod record;

pub use coordinator::{PerformanceProvider, ProviderState, ProviderVersion};
pub use hint::{
    desired_duration_nanos, desired_total_duration, FrameWork, HintSession, HintSessionKind,
    HintSystem, INVALID_SESSION,
};
pub use mode::{
    game_mode_to_performance_mode, map_raw_game_mode, performance_mode_to_game_mode, GameMode,
};
pub use record::{round_temperature, Feature, PerformanceDataRecord, PerformanceMode, WarningLevel};

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

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;

/// Receives high-temperature warning levels pushed by the platform.
///
/// Levels are `0`, `1`, `2`, or `-1` when the platform reports an error.
/// Invoked from a platform thread, never from the engine tick.
pub type WarningCallback = Arc<dyn Fn(i32) + Send + Sync>;

/// Native thermal API.
pub trait ThermalGateway: Send + Sync {
    /// Bring up thermal monitoring and register the warning callback.
    fn setup(&self, on_warning: WarningCallback) -> Result<()>;
    /// Latest thermal status code, `-1` when invalid.
    fn latest_thermal_status(&self) -> i32;
    /// Thermal headroom forecast for `forecast_secs` ahead, NaN when unavailable.
    fn thermal_headroom(&self, forecast_secs: i32) -> f64;
    fn teardown(&self);
}

/// Actual work durations for one frame, in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkDuration {
    pub total_nanos: i64,
    pub cpu_nanos: i64,
    pub gpu_nanos: i64,
    pub work_start_timestamp: i64,
}

/// Native performance hint manager.
pub trait HintGateway: Send + Sync {
    /// Whether the render thread runs separately from the main thread.
    fn is_multithreaded(&self) -> bool;
    /// Create a hint session. A negative handle means the session was refused.
    fn create_session(
        &self,
        main_thread: bool,
        gfx_thread: bool,
        desired_duration_nanos: i64,
    ) -> Result<i32>;
    fn report_completion_times(&self, session: i32, work: WorkDuration);
    fn update_target_work_duration(&self, session: i32, duration_nanos: i64);
    /// Release every session created through this gateway.
    fn teardown(&self);
}

/// One frame of engine timing data, durations in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub cpu_main_thread_frame_time_ms: f64,
    pub cpu_render_thread_frame_time_ms: f64,
    pub gpu_frame_time_ms: f64,
    pub frame_start_timestamp: u64,
}

/// Engine frame timing manager.
pub trait FrameTimingSource: Send + Sync {
    /// Whether the engine collects frame timings at all.
    fn is_feature_enabled(&self) -> bool;
    /// Request a capture of the most recent frame timings.
    fn capture_frame_timings(&self);
    /// Copy up to `out.len()` captured timings into `out`, returning how many were written.
    fn latest_timings(&self, out: &mut [FrameTiming]) -> usize;
}

/// Host process and OS queries.
pub trait HostPlatform: Send + Sync {
    fn api_level(&self) -> i32;
    /// Configured target frame rate, `-1` when uncapped.
    fn target_frame_rate(&self) -> i32;
    /// Raw OS game mode.
    fn game_mode(&self) -> i32;
}

/// Monotonic time source for interval throttling.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

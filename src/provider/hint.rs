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

//! Performance hint session bookkeeping
//!
//! Two sessions are kept open against the platform hint manager:
//! - `Common`: main + render thread work plus GPU time
//! - `Cpu`: the slowest CPU thread only, never GPU time
//!
//! Each frame the latest timing sample is reported to both sessions and
//! the target durations are refreshed when the frame budget moves.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::config::AppConfig;
use crate::error::{Error, Result};
use crate::platform::{FrameTiming, FrameTimingSource, HintGateway, WorkDuration};

/// Session handle value for a session that was never created
pub const INVALID_SESSION: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintSessionKind {
    Common,
    Cpu,
}

impl fmt::Display for HintSessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintSessionKind::Common => write!(f, "Common"),
            HintSessionKind::Cpu => write!(f, "CPU"),
        }
    }
}

/// A native hint session and the last target duration pushed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintSession {
    pub kind: HintSessionKind,
    pub handle: i32,
    pub last_target_nanos: i64,
}

impl HintSession {
    fn closed(kind: HintSessionKind) -> Self {
        Self {
            kind,
            handle: INVALID_SESSION,
            last_target_nanos: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle >= 0
    }
}

/// Frame budget in nanoseconds for a target frame rate.
///
/// Non-positive frame rates (unset, `-1` uncapped) use `fallback_fps`.
pub fn desired_duration_nanos(target_frame_rate: i32, fallback_fps: i32) -> i64 {
    let fps = if target_frame_rate > 0 {
        target_frame_rate
    } else {
        fallback_fps.max(1)
    };
    AppConfig::NANOS_PER_SECOND / i64::from(fps)
}

/// Target total duration reported to the common session.
///
/// Slack grows in three discrete tiers as the observed duration overruns
/// the frame budget.
pub fn desired_total_duration(desired: i64, actual: i64) -> i64 {
    if actual < desired {
        desired
    } else if actual < 2 * desired {
        2 * desired
    } else {
        3 * desired
    }
}

fn millis_to_nanos(ms: f64) -> i64 {
    (ms * AppConfig::NANOS_PER_MILLI) as i64
}

/// Durations derived from one frame timing sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWork {
    pub main_thread_nanos: i64,
    pub render_thread_nanos: i64,
    pub gpu_nanos: i64,
    pub frame_start_timestamp: i64,
}

impl FrameWork {
    pub fn from_timing(timing: &FrameTiming) -> Self {
        Self {
            main_thread_nanos: millis_to_nanos(timing.cpu_main_thread_frame_time_ms),
            render_thread_nanos: millis_to_nanos(timing.cpu_render_thread_frame_time_ms),
            gpu_nanos: millis_to_nanos(timing.gpu_frame_time_ms),
            frame_start_timestamp: timing.frame_start_timestamp as i64,
        }
    }

    /// CPU time attributed to the common session.
    pub fn common_nanos(&self, multithreaded: bool) -> i64 {
        if multithreaded {
            self.main_thread_nanos.saturating_add(self.render_thread_nanos)
        } else {
            self.main_thread_nanos
        }
    }
}

/// Owns both hint sessions for the lifetime of a provider instance.
pub struct HintSystem {
    gateway: Arc<dyn HintGateway>,
    multithreaded: bool,
    fallback_fps: i32,
    logging: bool,
    common: HintSession,
    cpu: HintSession,
    timings: [FrameTiming; 1],
}

impl HintSystem {
    /// Open the hint sessions, common first.
    ///
    /// Fails without touching the gateway when the engine does not collect
    /// frame timings, and fails when the common session cannot be created.
    /// A refused CPU session is tolerated; its reports are skipped.
    pub fn setup(
        gateway: Arc<dyn HintGateway>,
        frame_timing: &dyn FrameTimingSource,
        target_frame_rate: i32,
        fallback_fps: i32,
        logging: bool,
    ) -> Result<Self> {
        if !frame_timing.is_feature_enabled() {
            return Err(Error::NotSupported(
                "frame timing collection is disabled".to_string(),
            ));
        }

        let desired = desired_duration_nanos(target_frame_rate, fallback_fps);

        let common_handle = match gateway.create_session(true, true, desired) {
            Ok(handle) if handle >= 0 => handle,
            Ok(handle) => {
                gateway.teardown();
                return Err(Error::gateway(
                    "hint",
                    format!("common session refused (handle {handle})"),
                ));
            }
            Err(e) => {
                gateway.teardown();
                return Err(e);
            }
        };

        let mut cpu = HintSession::closed(HintSessionKind::Cpu);
        match gateway.create_session(true, true, desired) {
            Ok(handle) if handle >= 0 => {
                cpu.handle = handle;
                cpu.last_target_nanos = desired;
            }
            Ok(handle) => warn!("CPU hint session refused (handle {handle})"),
            Err(e) => warn!("CPU hint session creation failed: {e}"),
        }

        let multithreaded = gateway.is_multithreaded();
        debug!(
            "Hint sessions created: common={common_handle}, cpu={}, multithreaded={multithreaded}, desired={desired}ns",
            cpu.handle
        );

        Ok(Self {
            gateway,
            multithreaded,
            fallback_fps,
            logging,
            common: HintSession {
                kind: HintSessionKind::Common,
                handle: common_handle,
                last_target_nanos: desired,
            },
            cpu,
            timings: [FrameTiming::default(); 1],
        })
    }

    pub fn session(&self, kind: HintSessionKind) -> &HintSession {
        match kind {
            HintSessionKind::Common => &self.common,
            HintSessionKind::Cpu => &self.cpu,
        }
    }

    pub fn is_multithreaded(&self) -> bool {
        self.multithreaded
    }

    /// Report the latest frame to both sessions and refresh their targets.
    ///
    /// Returns `false` when no timing sample was available this tick.
    pub fn update(&mut self, frame_timing: &dyn FrameTimingSource, target_frame_rate: i32) -> bool {
        frame_timing.capture_frame_timings();
        if frame_timing.latest_timings(&mut self.timings) == 0 {
            return false;
        }

        let work = FrameWork::from_timing(&self.timings[0]);
        let common_nanos = work.common_nanos(self.multithreaded);
        let actual_total = common_nanos.saturating_add(work.gpu_nanos);

        if self.common.is_open() {
            self.gateway.report_completion_times(
                self.common.handle,
                WorkDuration {
                    total_nanos: actual_total,
                    cpu_nanos: common_nanos,
                    gpu_nanos: work.gpu_nanos,
                    work_start_timestamp: work.frame_start_timestamp,
                },
            );
        }

        let slowest_cpu = work.main_thread_nanos.max(work.render_thread_nanos);
        if self.cpu.is_open() {
            self.gateway.report_completion_times(
                self.cpu.handle,
                WorkDuration {
                    total_nanos: slowest_cpu,
                    cpu_nanos: slowest_cpu,
                    gpu_nanos: 0,
                    work_start_timestamp: work.frame_start_timestamp,
                },
            );
        }

        let desired = desired_duration_nanos(target_frame_rate, self.fallback_fps);
        if self.cpu.is_open() && desired != self.cpu.last_target_nanos {
            self.gateway
                .update_target_work_duration(self.cpu.handle, desired);
            self.cpu.last_target_nanos = desired;
            if self.logging {
                debug!("CPU hint session target updated to {desired}ns");
            }
        }

        let desired_total = desired_total_duration(desired, actual_total);
        if self.common.is_open() && desired_total != self.common.last_target_nanos {
            self.gateway
                .update_target_work_duration(self.common.handle, desired_total);
            self.common.last_target_nanos = desired_total;
            if self.logging {
                debug!("Common hint session target updated to {desired_total}ns");
            }
        }

        true
    }

    /// Close both sessions.
    pub fn teardown(&mut self) {
        self.gateway.teardown();
        self.common = HintSession::closed(HintSessionKind::Common);
        self.cpu = HintSession::closed(HintSessionKind::Cpu);
    }
}

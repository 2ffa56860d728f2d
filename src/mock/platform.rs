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

//! Scriptable platform gateways
//!
//! Each mock records the calls made against it and returns whatever the
//! test or simulator last configured. All of them are shared through
//! `Arc`, so the script keeps a handle after the provider is bound.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::clock::ManualClock;
use crate::error::{Error, Result};
use crate::platform::{
    FrameTiming, FrameTimingSource, HintGateway, HostPlatform, PlatformBindings, ThermalGateway,
    WarningCallback, WorkDuration,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thermal gateway with a settable status and headroom.
pub struct MockThermal {
    status: AtomicI32,
    headroom: Mutex<f64>,
    setup_failure: Mutex<Option<String>>,
    callback: Mutex<Option<WarningCallback>>,
    setup_count: AtomicUsize,
    teardown_count: AtomicUsize,
}

impl MockThermal {
    pub fn new() -> Self {
        Self {
            status: AtomicI32::new(0),
            headroom: Mutex::new(0.0),
            setup_failure: Mutex::new(None),
            callback: Mutex::new(None),
            setup_count: AtomicUsize::new(0),
            teardown_count: AtomicUsize::new(0),
        }
    }

    pub fn set_status(&self, status: i32) {
        self.status.store(status, Ordering::Relaxed);
    }

    pub fn set_headroom(&self, headroom: f64) {
        *lock(&self.headroom) = headroom;
    }

    pub fn fail_setup(&self, reason: &str) {
        *lock(&self.setup_failure) = Some(reason.to_string());
    }

    pub fn clear_setup_failure(&self) {
        *lock(&self.setup_failure) = None;
    }

    /// Push a warning level through the registered callback.
    ///
    /// Returns `false` when no callback is registered.
    pub fn fire_warning(&self, level: i32) -> bool {
        let callback = lock(&self.callback).clone();
        match callback {
            Some(callback) => {
                callback(level);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        lock(&self.callback).is_some()
    }

    pub fn setup_count(&self) -> usize {
        self.setup_count.load(Ordering::Relaxed)
    }

    pub fn teardown_count(&self) -> usize {
        self.teardown_count.load(Ordering::Relaxed)
    }
}

impl Default for MockThermal {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalGateway for MockThermal {
    fn setup(&self, on_warning: WarningCallback) -> Result<()> {
        if let Some(reason) = lock(&self.setup_failure).clone() {
            return Err(Error::PlatformInit(reason));
        }
        self.setup_count.fetch_add(1, Ordering::Relaxed);
        *lock(&self.callback) = Some(on_warning);
        Ok(())
    }

    fn latest_thermal_status(&self) -> i32 {
        self.status.load(Ordering::Relaxed)
    }

    fn thermal_headroom(&self, _forecast_secs: i32) -> f64 {
        *lock(&self.headroom)
    }

    fn teardown(&self) {
        self.teardown_count.fetch_add(1, Ordering::Relaxed);
        *lock(&self.callback) = None;
    }
}

/// Arguments of one `create_session` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedSession {
    pub handle: i32,
    pub main_thread: bool,
    pub gfx_thread: bool,
    pub desired_duration_nanos: i64,
}

/// Hint gateway that records every report and target update.
pub struct MockHint {
    multithreaded: AtomicBool,
    next_handle: AtomicI32,
    session_limit: Mutex<Option<usize>>,
    refuse_next: AtomicUsize,
    session_failure: Mutex<Option<String>>,
    created: Mutex<Vec<CreatedSession>>,
    reports: Mutex<Vec<(i32, WorkDuration)>>,
    target_updates: Mutex<Vec<(i32, i64)>>,
    teardown_count: AtomicUsize,
}

impl MockHint {
    pub fn new(multithreaded: bool) -> Self {
        Self {
            multithreaded: AtomicBool::new(multithreaded),
            next_handle: AtomicI32::new(0),
            session_limit: Mutex::new(None),
            refuse_next: AtomicUsize::new(0),
            session_failure: Mutex::new(None),
            created: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            target_updates: Mutex::new(Vec::new()),
            teardown_count: AtomicUsize::new(0),
        }
    }

    pub fn set_multithreaded(&self, multithreaded: bool) {
        self.multithreaded.store(multithreaded, Ordering::Relaxed);
    }

    /// Hand out `-1` handles once `count` sessions have been created.
    pub fn refuse_sessions_after(&self, count: usize) {
        *lock(&self.session_limit) = Some(count);
    }

    /// Hand out `-1` handles for the next `count` session requests only.
    pub fn refuse_next_sessions(&self, count: usize) {
        self.refuse_next.store(count, Ordering::Relaxed);
    }

    /// Fail every session creation with an error.
    pub fn fail_sessions(&self, reason: &str) {
        *lock(&self.session_failure) = Some(reason.to_string());
    }

    pub fn created_sessions(&self) -> Vec<CreatedSession> {
        lock(&self.created).clone()
    }

    pub fn reports(&self) -> Vec<(i32, WorkDuration)> {
        lock(&self.reports).clone()
    }

    pub fn target_updates(&self) -> Vec<(i32, i64)> {
        lock(&self.target_updates).clone()
    }

    pub fn teardown_count(&self) -> usize {
        self.teardown_count.load(Ordering::Relaxed)
    }
}

impl Default for MockHint {
    fn default() -> Self {
        Self::new(false)
    }
}

impl HintGateway for MockHint {
    fn is_multithreaded(&self) -> bool {
        self.multithreaded.load(Ordering::Relaxed)
    }

    fn create_session(
        &self,
        main_thread: bool,
        gfx_thread: bool,
        desired_duration_nanos: i64,
    ) -> Result<i32> {
        if let Some(reason) = lock(&self.session_failure).clone() {
            return Err(Error::gateway("hint", reason));
        }

        let refused = self
            .refuse_next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Ok(-1);
        }

        let mut created = lock(&self.created);
        if let Some(limit) = *lock(&self.session_limit) {
            if created.len() >= limit {
                return Ok(-1);
            }
        }

        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        created.push(CreatedSession {
            handle,
            main_thread,
            gfx_thread,
            desired_duration_nanos,
        });
        Ok(handle)
    }

    fn report_completion_times(&self, session: i32, work: WorkDuration) {
        lock(&self.reports).push((session, work));
    }

    fn update_target_work_duration(&self, session: i32, duration_nanos: i64) {
        lock(&self.target_updates).push((session, duration_nanos));
    }

    fn teardown(&self) {
        self.teardown_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Frame timing source fed from a queue of samples.
///
/// Each capture moves at most one queued sample into the readable slot,
/// so a tick with nothing queued reports no timings.
pub struct MockFrameTiming {
    enabled: AtomicBool,
    pending: Mutex<VecDeque<FrameTiming>>,
    captured: Mutex<Option<FrameTiming>>,
    capture_count: AtomicUsize,
}

impl MockFrameTiming {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            pending: Mutex::new(VecDeque::new()),
            captured: Mutex::new(None),
            capture_count: AtomicUsize::new(0),
        }
    }

    /// Toggle whether the engine reports frame timing support.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn push(&self, timing: FrameTiming) {
        lock(&self.pending).push_back(timing);
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count.load(Ordering::Relaxed)
    }
}

impl Default for MockFrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimingSource for MockFrameTiming {
    fn is_feature_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn capture_frame_timings(&self) {
        self.capture_count.fetch_add(1, Ordering::Relaxed);
        let next = lock(&self.pending).pop_front();
        *lock(&self.captured) = next;
    }

    fn latest_timings(&self, out: &mut [FrameTiming]) -> usize {
        let Some(slot) = out.first_mut() else {
            return 0;
        };
        match lock(&self.captured).take() {
            Some(timing) => {
                *slot = timing;
                1
            }
            None => 0,
        }
    }
}

/// Host queries with settable answers.
pub struct MockHost {
    api_level: AtomicI32,
    target_frame_rate: AtomicI32,
    game_mode: AtomicI32,
}

impl MockHost {
    pub fn new(api_level: i32) -> Self {
        Self {
            api_level: AtomicI32::new(api_level),
            target_frame_rate: AtomicI32::new(-1),
            game_mode: AtomicI32::new(1),
        }
    }

    pub fn set_api_level(&self, api_level: i32) {
        self.api_level.store(api_level, Ordering::Relaxed);
    }

    pub fn set_target_frame_rate(&self, fps: i32) {
        self.target_frame_rate.store(fps, Ordering::Relaxed);
    }

    pub fn set_game_mode(&self, game_mode: i32) {
        self.game_mode.store(game_mode, Ordering::Relaxed);
    }
}

impl HostPlatform for MockHost {
    fn api_level(&self) -> i32 {
        self.api_level.load(Ordering::Relaxed)
    }

    fn target_frame_rate(&self) -> i32 {
        self.target_frame_rate.load(Ordering::Relaxed)
    }

    fn game_mode(&self) -> i32 {
        self.game_mode.load(Ordering::Relaxed)
    }
}

/// A complete mock platform with handles to every gateway.
#[derive(Clone)]
pub struct MockPlatform {
    pub thermal: Arc<MockThermal>,
    pub hint: Arc<MockHint>,
    pub frame_timing: Arc<MockFrameTiming>,
    pub host: Arc<MockHost>,
    pub clock: Arc<ManualClock>,
}

impl MockPlatform {
    /// Healthy platform at `api_level`: valid thermal status, zero headroom,
    /// standard game mode, uncapped frame rate, single-threaded rendering.
    pub fn new(api_level: i32) -> Self {
        Self {
            thermal: Arc::new(MockThermal::new()),
            hint: Arc::new(MockHint::new(false)),
            frame_timing: Arc::new(MockFrameTiming::new()),
            host: Arc::new(MockHost::new(api_level)),
            clock: Arc::new(ManualClock::new()),
        }
    }

    pub fn bindings(&self) -> PlatformBindings {
        PlatformBindings::new(
            self.thermal.clone(),
            self.hint.clone(),
            self.frame_timing.clone(),
            self.host.clone(),
        )
        .with_clock(self.clock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thermal_callback_registration() {
        let thermal = MockThermal::new();
        assert!(!thermal.fire_warning(1));

        let seen = Arc::new(AtomicI32::new(-5));
        let sink = seen.clone();
        thermal
            .setup(Arc::new(move |level| sink.store(level, Ordering::Relaxed)))
            .unwrap();

        assert!(thermal.is_registered());
        assert!(thermal.fire_warning(2));
        assert_eq!(seen.load(Ordering::Relaxed), 2);

        thermal.teardown();
        assert!(!thermal.is_registered());
    }

    #[test]
    fn test_thermal_setup_failure() {
        let thermal = MockThermal::new();
        thermal.fail_setup("no thermal service");
        let err = thermal.setup(Arc::new(|_: i32| {})).unwrap_err();
        assert!(matches!(err, Error::PlatformInit(_)));
        assert_eq!(thermal.setup_count(), 0);
    }

    #[test]
    fn test_hint_session_limit() {
        let hint = MockHint::new(true);
        hint.refuse_sessions_after(1);
        assert_eq!(hint.create_session(true, true, 10).unwrap(), 0);
        assert_eq!(hint.create_session(true, true, 10).unwrap(), -1);
        assert_eq!(hint.created_sessions().len(), 1);
    }

    #[test]
    fn test_frame_timing_queue() {
        let frames = MockFrameTiming::new();
        let mut out = [FrameTiming::default(); 1];

        frames.capture_frame_timings();
        assert_eq!(frames.latest_timings(&mut out), 0);

        frames.push(FrameTiming {
            cpu_main_thread_frame_time_ms: 12.0,
            ..Default::default()
        });
        frames.capture_frame_timings();
        assert_eq!(frames.latest_timings(&mut out), 1);
        assert_eq!(out[0].cpu_main_thread_frame_time_ms, 12.0);
        assert_eq!(frames.latest_timings(&mut out), 0);
        assert_eq!(frames.capture_count(), 2);
    }

    #[test]
    fn test_frame_timing_toggle() {
        let frames = MockFrameTiming::new();
        assert!(frames.is_feature_enabled());
        frames.set_enabled(false);
        assert!(!frames.is_feature_enabled());
    }
}

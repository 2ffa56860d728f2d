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

//! Thermal and performance-hint coordinator
//!
//! [`PerformanceProvider`] is the single owner of the performance snapshot.
//! The engine drives it through `try_initialize` / `start` / `update` /
//! `stop` / `destroy`; the platform pushes thermal warnings into it from
//! its own thread through the callback registered at setup.
//!
//! ## Locking
//! The snapshot lives behind one mutex shared with the warning callback.
//! Gateway calls always happen outside the lock; only the resulting value
//! is written back under it.
//!
//! ## Usage
//! ```ignore
//! let mut provider = PerformanceProvider::new(ProviderConfig::default(), bindings);
//! if provider.try_initialize() {
//!     provider.start();
//! }
//! loop {
//!     let record = provider.update();
//!     if record.change_flags.contains(Feature::WARNING_LEVEL) {
//!         // react to thermal pressure
//!     }
//! }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::hint::{HintSession, HintSessionKind, HintSystem};
use super::mode::map_raw_game_mode;
use super::record::{round_temperature, Feature, PerformanceDataRecord, WarningLevel};
use crate::common::config::{AppConfig, ProviderConfig};
use crate::platform::{PlatformBindings, ThermalStatus, WarningCallback};

type SharedRecord = Arc<Mutex<PerformanceDataRecord>>;

fn lock_record(data: &Mutex<PerformanceDataRecord>) -> MutexGuard<'_, PerformanceDataRecord> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish_warning(data: &Mutex<PerformanceDataRecord>, level: i32) {
    let warning_level = WarningLevel::from_raw(level);
    {
        let mut record = lock_record(data);
        record.warning_level = warning_level;
        record.change_flags |= Feature::WARNING_LEVEL;
    }
    info!("Thermal warning received: level {level} ({warning_level})");
}

/// Provider lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Uninitialized,
    Initialized,
    Running,
    Destroyed,
}

impl fmt::Display for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderState::Uninitialized => write!(f, "Uninitialized"),
            ProviderState::Initialized => write!(f, "Initialized"),
            ProviderState::Running => write!(f, "Running"),
            ProviderState::Destroyed => write!(f, "Destroyed"),
        }
    }
}

/// Provider version. The major component is the platform API level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderVersion {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl ProviderVersion {
    pub fn from_api_level(api_level: i32) -> Self {
        Self {
            major: api_level,
            minor: 0,
            patch: 0,
        }
    }
}

impl fmt::Display for ProviderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemperatureFlag {
    Always,
    OnChange,
}

/// Coordinates thermal polling, hint sessions and the published snapshot.
pub struct PerformanceProvider {
    config: ProviderConfig,
    platform: PlatformBindings,
    data: SharedRecord,
    state: ProviderState,
    version: Option<ProviderVersion>,
    capabilities: Feature,
    thermal_initialized: bool,
    hint: Option<HintSystem>,
    last_temperature_update: Option<Instant>,
    update_count: u64,
}

impl PerformanceProvider {
    pub fn new(config: ProviderConfig, platform: PlatformBindings) -> Self {
        Self {
            config,
            platform,
            data: Arc::new(Mutex::new(PerformanceDataRecord::default())),
            state: ProviderState::Uninitialized,
            version: None,
            capabilities: Feature::empty(),
            thermal_initialized: false,
            hint: None,
            last_temperature_update: None,
            update_count: 0,
        }
    }

    /// Platform version recorded by `try_initialize`, `None` before that.
    pub fn version(&self) -> Option<ProviderVersion> {
        self.version
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    pub fn capabilities(&self) -> Feature {
        self.capabilities
    }

    pub fn is_initialized(&self) -> bool {
        matches!(
            self.state,
            ProviderState::Initialized | ProviderState::Running
        )
    }

    pub fn is_running(&self) -> bool {
        self.state == ProviderState::Running
    }

    pub fn thermal_initialized(&self) -> bool {
        self.thermal_initialized
    }

    pub fn hint_initialized(&self) -> bool {
        self.hint.is_some()
    }

    /// Current state of a hint session, if the hint system is up.
    pub fn hint_session(&self, kind: HintSessionKind) -> Option<HintSession> {
        self.hint.as_ref().map(|hint| *hint.session(kind))
    }

    /// Bring up thermal monitoring and hint sessions.
    ///
    /// Returns `true` immediately when already initialized. Fails on
    /// platforms below the minimum thermal API level, or when neither
    /// thermal monitoring nor hint sessions could be set up. Individual
    /// feature failures only remove that feature from the capability set.
    pub fn try_initialize(&mut self) -> bool {
        match self.state {
            ProviderState::Initialized | ProviderState::Running => return true,
            ProviderState::Destroyed => {
                debug!("Provider already destroyed, refusing to initialize");
                return false;
            }
            ProviderState::Uninitialized => {}
        }

        let api_level = self.platform.host.api_level();
        if api_level < AppConfig::MIN_THERMAL_API_LEVEL {
            warn!(
                "API level {api_level} is below {}, adaptive performance is unavailable",
                AppConfig::MIN_THERMAL_API_LEVEL
            );
            return false;
        }
        self.version = Some(ProviderVersion::from_api_level(api_level));

        self.thermal_initialized = self.setup_thermal();
        if api_level >= AppConfig::MIN_HINT_API_LEVEL {
            self.hint = self.setup_hint();
        }

        let thermal_ok = self.thermal_initialized;
        let hint_ok = self.hint.is_some();
        if !(thermal_ok || hint_ok) {
            warn!("Neither thermal monitoring nor hint sessions are available");
            return false;
        }

        self.capabilities = self.detect_capabilities(api_level);
        self.state = ProviderState::Initialized;
        lock_record(&self.data).performance_level_control_available = true;

        info!(
            "Adaptive performance initialized (api level {api_level}, thermal: {thermal_ok}, hint: {hint_ok}, capabilities: {:?})",
            self.capabilities
        );
        true
    }

    fn setup_thermal(&self) -> bool {
        let data = Arc::clone(&self.data);
        let callback: WarningCallback = Arc::new(move |level| publish_warning(&data, level));

        match self.platform.thermal.setup(callback) {
            Ok(()) => true,
            Err(e) => {
                warn!("Thermal monitoring unavailable: {e}");
                false
            }
        }
    }

    fn setup_hint(&self) -> Option<HintSystem> {
        match HintSystem::setup(
            Arc::clone(&self.platform.hint),
            self.platform.frame_timing.as_ref(),
            self.platform.host.target_frame_rate(),
            self.config.fallback_frame_rate,
            self.config.logging,
        ) {
            Ok(hint) => Some(hint),
            Err(e) => {
                warn!("Performance hint sessions unavailable: {e}");
                None
            }
        }
    }

    fn detect_capabilities(&self, api_level: i32) -> Feature {
        let mut capabilities = Feature::empty();

        if self.thermal_initialized {
            capabilities |= Feature::CPU_PERFORMANCE_LEVEL | Feature::GPU_PERFORMANCE_LEVEL;
            if self.thermal_status_valid() {
                capabilities |= Feature::WARNING_LEVEL;
            }
            if api_level >= AppConfig::MIN_HEADROOM_API_LEVEL && self.headroom_available() {
                capabilities |= Feature::TEMPERATURE_LEVEL;
            }
        }

        if api_level >= AppConfig::MIN_GAME_MODE_API_LEVEL {
            capabilities |= Feature::PERFORMANCE_MODE;
        }

        if self.hint.is_some() {
            capabilities |= Feature::PERFORMANCE_LEVEL_CONTROL;
        }

        capabilities
    }

    fn thermal_status_valid(&self) -> bool {
        ThermalStatus::from_raw(self.platform.thermal.latest_thermal_status()).is_valid()
    }

    fn headroom_available(&self) -> bool {
        !self
            .platform
            .thermal
            .thermal_headroom(AppConfig::TEMPERATURE_FORECAST_SECS)
            .is_nan()
    }

    /// Start publishing. No-op unless initialized and not already running.
    pub fn start(&mut self) {
        if self.state != ProviderState::Initialized {
            return;
        }

        if self.capabilities.contains(Feature::WARNING_LEVEL) && !self.thermal_status_valid() {
            debug!("Thermal status is invalid, disabling warning level updates");
            self.capabilities.remove(Feature::WARNING_LEVEL);
        }
        if self.capabilities.contains(Feature::TEMPERATURE_LEVEL) && !self.headroom_available() {
            debug!("Thermal headroom is unavailable, disabling temperature updates");
            self.capabilities.remove(Feature::TEMPERATURE_LEVEL);
        }

        self.immediate_update_temperature();
        self.immediate_update_thermal_status();
        self.immediate_update_performance_mode();

        self.state = ProviderState::Running;
        info!("Adaptive performance provider started");
    }

    /// Stop publishing. Native resources stay up so the provider can restart.
    pub fn stop(&mut self) {
        if self.state == ProviderState::Running {
            self.state = ProviderState::Initialized;
            info!("Adaptive performance provider stopped");
        }
    }

    /// Release native resources. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.state == ProviderState::Destroyed {
            return;
        }
        if self.state == ProviderState::Running {
            self.stop();
        }

        if self.is_initialized() {
            if self.thermal_initialized {
                self.platform.thermal.teardown();
                self.thermal_initialized = false;
            }
            if let Some(mut hint) = self.hint.take() {
                hint.teardown();
            }
            info!("Adaptive performance provider destroyed");
        }

        self.capabilities = Feature::empty();
        self.state = ProviderState::Destroyed;
    }

    /// Advance one tick and return the snapshot, clearing its change flags.
    pub fn update(&mut self) -> PerformanceDataRecord {
        if self.capabilities.contains(Feature::PERFORMANCE_LEVEL_CONTROL) {
            if let Some(hint) = self.hint.as_mut() {
                let target_frame_rate = self.platform.host.target_frame_rate();
                hint.update(self.platform.frame_timing.as_ref(), target_frame_rate);
            }
        }

        self.timed_update_temperature();

        self.update_count += 1;
        let frequency = u64::from(self.config.stats_logging_frequency_in_frames);
        if self.config.logging && frequency > 0 && self.update_count % frequency == 0 {
            debug!("{}", self.stats());
        }

        let mut record = lock_record(&self.data);
        let snapshot = *record;
        record.change_flags = Feature::empty();
        snapshot
    }

    /// Platform warning entry point. Callable from any thread.
    pub fn on_high_temp_warning(&self, level: i32) {
        publish_warning(&self.data, level);
    }

    /// Copy of the current snapshot without clearing change flags.
    pub fn peek(&self) -> PerformanceDataRecord {
        *lock_record(&self.data)
    }

    fn read_temperature_level(&self) -> Option<f32> {
        let headroom = self
            .platform
            .thermal
            .thermal_headroom(AppConfig::TEMPERATURE_FORECAST_SECS);
        if headroom.is_nan() {
            None
        } else {
            Some(round_temperature(headroom))
        }
    }

    /// Store a fresh temperature level. NaN readings keep the previous value.
    fn update_temperature_level(&mut self, flag: TemperatureFlag) -> bool {
        if !self.capabilities.contains(Feature::TEMPERATURE_LEVEL) {
            return false;
        }

        self.last_temperature_update = Some(self.platform.clock.now());
        let Some(level) = self.read_temperature_level() else {
            return false;
        };

        let mut record = lock_record(&self.data);
        let changed = record.temperature_level != level;
        record.temperature_level = level;
        if flag == TemperatureFlag::Always || changed {
            record.change_flags |= Feature::TEMPERATURE_LEVEL;
        }
        true
    }

    pub fn immediate_update_temperature(&mut self) {
        self.update_temperature_level(TemperatureFlag::Always);
    }

    /// Refresh the temperature once the update interval has elapsed,
    /// flagging it only when the level actually moved.
    pub fn timed_update_temperature(&mut self) {
        if !self.capabilities.contains(Feature::TEMPERATURE_LEVEL) {
            return;
        }

        if let Some(last) = self.last_temperature_update {
            let elapsed = self.platform.clock.now().saturating_duration_since(last);
            if elapsed < self.config.temperature_update_interval_duration() {
                return;
            }
        }

        self.update_temperature_level(TemperatureFlag::OnChange);
    }

    pub fn immediate_update_thermal_status(&mut self) {
        if !self.capabilities.contains(Feature::WARNING_LEVEL) {
            return;
        }

        let status = ThermalStatus::from_raw(self.platform.thermal.latest_thermal_status());
        let mut record = lock_record(&self.data);
        record.warning_level = status.warning_level();
        record.change_flags |= Feature::WARNING_LEVEL;
    }

    pub fn immediate_update_performance_mode(&mut self) {
        if !self.capabilities.contains(Feature::PERFORMANCE_MODE) {
            return;
        }

        let mode = map_raw_game_mode(self.platform.host.game_mode());
        let mut record = lock_record(&self.data);
        if record.performance_mode != mode {
            record.performance_mode = mode;
            record.change_flags |= Feature::PERFORMANCE_MODE;
        }
    }

    /// Human-readable summary of the current state.
    pub fn stats(&self) -> String {
        let record = self.peek();
        let temperature = record.temperature_level;
        let warning = record.warning_level;
        let mode = record.performance_mode;
        let capabilities = self.capabilities;
        format!(
            "Temperature Level: {temperature:.2}\nWarning Level: {warning}\nPerformance Mode: {mode}\nCapabilities: {capabilities:?}\n"
        )
    }

    /// Performance levels cannot be requested on this platform.
    pub fn set_performance_level(&mut self, _cpu_level: i32, _gpu_level: i32) -> bool {
        false
    }

    pub fn enable_cpu_boost(&mut self) -> bool {
        false
    }

    pub fn enable_gpu_boost(&mut self) -> bool {
        false
    }
}

impl Drop for PerformanceProvider {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;
    use std::time::Duration;

    fn provider(platform: &MockPlatform) -> PerformanceProvider {
        PerformanceProvider::new(ProviderConfig::default(), platform.bindings())
    }

    #[test]
    fn test_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PerformanceProvider>();
    }

    #[test]
    fn test_initialize_full_capabilities() {
        let platform = MockPlatform::new(33);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert_eq!(provider.state(), ProviderState::Initialized);
        assert!(provider.thermal_initialized());
        assert!(provider.hint_initialized());
        assert!(provider.capabilities().contains(
            Feature::WARNING_LEVEL
                | Feature::TEMPERATURE_LEVEL
                | Feature::CPU_PERFORMANCE_LEVEL
                | Feature::GPU_PERFORMANCE_LEVEL
                | Feature::PERFORMANCE_MODE
                | Feature::PERFORMANCE_LEVEL_CONTROL
        ));
        assert_eq!(provider.capabilities().bits(), 4096 | 32 | 25 | 2);
        assert!(provider.peek().performance_level_control_available);
    }

    #[test]
    fn test_failed_hint_sessions_leave_no_hint_capability() {
        let platform = MockPlatform::new(31);
        platform.hint.fail_sessions("hint manager missing");
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider.hint_initialized());
        assert_eq!(provider.capabilities().bits(), 4123);
        assert!(!provider
            .capabilities()
            .contains(Feature::PERFORMANCE_LEVEL_CONTROL));
    }

    #[test]
    fn test_disabled_frame_timing_skips_hint_sessions() {
        let platform = MockPlatform::new(33);
        platform.frame_timing.set_enabled(false);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider.hint_initialized());
        assert!(platform.hint.created_sessions().is_empty());
        assert!(!provider
            .capabilities()
            .contains(Feature::PERFORMANCE_LEVEL_CONTROL));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let platform = MockPlatform::new(33);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(provider.try_initialize());
        assert_eq!(platform.thermal.setup_count(), 1);
        assert_eq!(platform.hint.created_sessions().len(), 2);
    }

    #[test]
    fn test_api_level_30_skips_hint_sessions() {
        let platform = MockPlatform::new(30);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider.hint_initialized());
        assert!(!provider
            .capabilities()
            .contains(Feature::PERFORMANCE_LEVEL_CONTROL));
        assert!(!provider.capabilities().contains(Feature::PERFORMANCE_MODE));
        assert!(platform.hint.created_sessions().is_empty());
    }

    #[test]
    fn test_api_level_30_has_no_temperature() {
        let platform = MockPlatform::new(30);
        platform.thermal.set_headroom(0.4);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider.capabilities().contains(Feature::TEMPERATURE_LEVEL));
        assert!(provider.capabilities().contains(Feature::WARNING_LEVEL));

        provider.start();
        let record = provider.update();
        assert!(!record.change_flags.contains(Feature::TEMPERATURE_LEVEL));
        assert_eq!(record.temperature_level, 0.0);

        platform.clock.advance(Duration::from_secs(11));
        let record = provider.update();
        assert!(!record.change_flags.contains(Feature::TEMPERATURE_LEVEL));
        assert_eq!(record.temperature_level, 0.0);
    }

    #[test]
    fn test_thermal_failure_keeps_hint_sessions() {
        let platform = MockPlatform::new(31);
        platform.thermal.fail_setup("thermal manager missing");
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider.thermal_initialized());
        let capabilities = provider.capabilities();
        assert!(capabilities.contains(Feature::PERFORMANCE_LEVEL_CONTROL));
        assert!(!capabilities.intersects(
            Feature::WARNING_LEVEL
                | Feature::TEMPERATURE_LEVEL
                | Feature::CPU_PERFORMANCE_LEVEL
                | Feature::GPU_PERFORMANCE_LEVEL
        ));
    }

    #[test]
    fn test_initialize_fails_when_nothing_is_available() {
        let platform = MockPlatform::new(31);
        platform.thermal.fail_setup("thermal manager missing");
        platform.hint.fail_sessions("hint manager missing");
        let mut provider = provider(&platform);

        assert!(!provider.try_initialize());
        assert_eq!(provider.state(), ProviderState::Uninitialized);
        assert!(provider.capabilities().is_empty());

        // Retryable once the platform recovers
        platform.thermal.clear_setup_failure();
        assert!(provider.try_initialize());
    }

    #[test]
    fn test_invalid_readings_mask_capabilities() {
        let platform = MockPlatform::new(33);
        platform.thermal.set_status(-1);
        platform.thermal.set_headroom(f64::NAN);
        let mut provider = provider(&platform);

        assert!(provider.try_initialize());
        assert!(!provider
            .capabilities()
            .intersects(Feature::WARNING_LEVEL | Feature::TEMPERATURE_LEVEL));
    }

    #[test]
    fn test_start_clears_capabilities_that_went_bad() {
        let platform = MockPlatform::new(33);
        let mut provider = provider(&platform);
        assert!(provider.try_initialize());

        platform.thermal.set_headroom(f64::NAN);
        provider.start();

        assert!(!provider.capabilities().contains(Feature::TEMPERATURE_LEVEL));
        assert!(provider.capabilities().contains(Feature::WARNING_LEVEL));
    }

    #[test]
    fn test_timed_update_respects_interval() {
        let platform = MockPlatform::new(33);
        platform.thermal.set_headroom(0.2);
        let mut provider = provider(&platform);
        assert!(provider.try_initialize());
        provider.start();
        provider.update();

        platform.thermal.set_headroom(0.6);
        platform.clock.advance(Duration::from_secs(9));
        let record = provider.update();
        assert!(!record.change_flags.contains(Feature::TEMPERATURE_LEVEL));
        assert!((record.temperature_level - 0.2).abs() < 1e-6);

        platform.clock.advance(Duration::from_secs(1));
        let record = provider.update();
        assert!(record.change_flags.contains(Feature::TEMPERATURE_LEVEL));
        assert!((record.temperature_level - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_stats_string() {
        let platform = MockPlatform::new(33);
        platform.thermal.set_headroom(0.42);
        platform.host.set_game_mode(3);
        let mut provider = provider(&platform);
        assert!(provider.try_initialize());
        provider.start();

        let stats = provider.stats();
        assert!(stats.contains("Temperature Level: 0.42"));
        assert!(stats.contains("Performance Mode: Battery"));
        assert!(stats.contains("Warning Level: Nominal"));
    }

    #[test]
    fn test_performance_control_stubs() {
        let platform = MockPlatform::new(33);
        let mut provider = provider(&platform);
        assert!(provider.try_initialize());

        assert!(!provider.set_performance_level(2, 2));
        assert!(!provider.enable_cpu_boost());
        assert!(!provider.enable_gpu_boost());
        assert_eq!(provider.peek().max_cpu_performance_level, -1);
    }

    #[test]
    fn test_version_follows_api_level() {
        let platform = MockPlatform::new(33);
        let mut provider = provider(&platform);
        assert_eq!(provider.version(), None);

        assert!(provider.try_initialize());
        let version = provider.version().unwrap();
        assert_eq!(version, ProviderVersion::from_api_level(33));
        assert_eq!(version.to_string(), "33.0.0");
    }

    #[test]
    fn test_version_unset_below_minimum_api_level() {
        let platform = MockPlatform::new(29);
        let mut provider = provider(&platform);

        assert!(!provider.try_initialize());
        assert_eq!(provider.version(), None);
    }

    #[test]
    fn test_drop_tears_down() {
        let platform = MockPlatform::new(33);
        {
            let mut provider = provider(&platform);
            assert!(provider.try_initialize());
            provider.start();
        }
        assert_eq!(platform.thermal.teardown_count(), 1);
        assert_eq!(platform.hint.teardown_count(), 1);
    }
}

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

//! Performance snapshot published to the engine on every update

use std::fmt;

use bitflags::bitflags;

use crate::common::config::AppConfig;

bitflags! {
    /// Provider features, used both as the capability set and as the
    /// per-update change flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Feature: u32 {
        const WARNING_LEVEL = 1;
        const TEMPERATURE_LEVEL = 1 << 1;
        const CPU_PERFORMANCE_LEVEL = 1 << 3;
        const GPU_PERFORMANCE_LEVEL = 1 << 4;
        /// Hint sessions are driven on every update.
        const PERFORMANCE_LEVEL_CONTROL = 1 << 5;
        const PERFORMANCE_MODE = 1 << 12;
    }
}

/// Thermal warning level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum WarningLevel {
    /// No thermal pressure, or the status is unknown
    #[default]
    Nominal = 0,
    /// Throttling is imminent
    Throttling = 1,
    /// The device is throttled
    Throttled = 2,
}

impl WarningLevel {
    /// Convert a warning callback level. `-1` (error) and unknown levels map to nominal.
    pub fn from_raw(level: i32) -> Self {
        match level {
            1 => WarningLevel::Throttling,
            2 => WarningLevel::Throttled,
            _ => WarningLevel::Nominal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::Nominal => "Nominal",
            WarningLevel::Throttling => "Throttling",
            WarningLevel::Throttled => "Throttled",
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine-facing performance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PerformanceMode {
    #[default]
    Unknown = 0,
    Standard = 1,
    Performance = 2,
    Cpu = 3,
    Gpu = 4,
    Battery = 5,
}

impl PerformanceMode {
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => PerformanceMode::Standard,
            2 => PerformanceMode::Performance,
            3 => PerformanceMode::Cpu,
            4 => PerformanceMode::Gpu,
            5 => PerformanceMode::Battery,
            _ => PerformanceMode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceMode::Unknown => "Unknown",
            PerformanceMode::Standard => "Standard",
            PerformanceMode::Performance => "Performance",
            PerformanceMode::Cpu => "CPU",
            PerformanceMode::Gpu => "GPU",
            PerformanceMode::Battery => "Battery",
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the provider's performance state.
///
/// Handed out by value; the provider only mutates its own copy while
/// holding its data lock, so a returned record is never torn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceDataRecord {
    /// Fields changed since the previous update.
    pub change_flags: Feature,
    /// Thermal headroom in `[0, 1]`, rounded to two decimals.
    pub temperature_level: f32,
    pub warning_level: WarningLevel,
    pub performance_mode: PerformanceMode,
    pub performance_level_control_available: bool,
    pub cpu_performance_level: i32,
    pub gpu_performance_level: i32,
    pub max_cpu_performance_level: i32,
    pub max_gpu_performance_level: i32,
}

impl Default for PerformanceDataRecord {
    fn default() -> Self {
        Self {
            change_flags: Feature::empty(),
            temperature_level: 0.0,
            warning_level: WarningLevel::Nominal,
            performance_mode: PerformanceMode::Unknown,
            performance_level_control_available: false,
            cpu_performance_level: AppConfig::UNSUPPORTED_PERFORMANCE_LEVEL,
            gpu_performance_level: AppConfig::UNSUPPORTED_PERFORMANCE_LEVEL,
            max_cpu_performance_level: AppConfig::UNSUPPORTED_PERFORMANCE_LEVEL,
            max_gpu_performance_level: AppConfig::UNSUPPORTED_PERFORMANCE_LEVEL,
        }
    }
}

/// Round a headroom reading to the published precision.
pub fn round_temperature(headroom: f64) -> f32 {
    let scale = 10f64.powi(AppConfig::TEMPERATURE_DECIMALS);
    ((headroom * scale).round() / scale) as f32
}

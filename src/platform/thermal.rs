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

//! Thermal status codes reported by the platform thermal gateway
//!
//! The gateway normalizes the OS thermal status into a small set of codes
//! shared by the status query and the warning callback.
//!
//! ## Thermal Status
//! - `-1`: Invalid (query failed or unsupported)
//! - `0`: No warning
//! - `1`: Throttling imminent
//! - `2`: Throttling
//!
//! Any other code is treated as no warning.

use std::fmt;

use crate::provider::record::WarningLevel;

/// Thermal status as reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalStatus {
    /// The status could not be read
    Invalid,
    /// No thermal pressure
    NoWarning,
    /// The device will start throttling soon
    ThrottlingImminent,
    /// The device is throttling
    Throttling,
}

impl ThermalStatus {
    pub const INVALID_CODE: i32 = -1;

    /// Convert from raw integer value
    pub fn from_raw(value: i32) -> Self {
        match value {
            Self::INVALID_CODE => ThermalStatus::Invalid,
            1 => ThermalStatus::ThrottlingImminent,
            2 => ThermalStatus::Throttling,
            _ => ThermalStatus::NoWarning,
        }
    }

    /// Whether the raw status is a usable reading
    pub fn is_valid(&self) -> bool {
        !matches!(self, ThermalStatus::Invalid)
    }

    /// Warning level published to consumers. Invalid readings collapse to nominal.
    pub fn warning_level(&self) -> WarningLevel {
        match self {
            ThermalStatus::ThrottlingImminent => WarningLevel::Throttling,
            ThermalStatus::Throttling => WarningLevel::Throttled,
            ThermalStatus::Invalid | ThermalStatus::NoWarning => WarningLevel::Nominal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThermalStatus::Invalid => "Invalid",
            ThermalStatus::NoWarning => "No Warning",
            ThermalStatus::ThrottlingImminent => "Throttling Imminent",
            ThermalStatus::Throttling => "Throttling",
        }
    }
}

impl fmt::Display for ThermalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

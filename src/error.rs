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

//! Unified error types for the adaptive-perf library.
//!
//! Errors only ever cross two boundaries: platform gateways report setup
//! failures to the provider (which absorbs them into its capability set),
//! and configuration loading reports bad input to the embedder.
//!
//! # Example
//!
//! ```rust,no_run
//! use adaptive_perf::{ProviderConfig, Result};
//!
//! fn load() -> Result<ProviderConfig> {
//!     ProviderConfig::from_json_file("adaptive-perf.json")
//! }
//! ```

use thiserror::Error;

/// The main error type for adaptive-perf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Platform initialization failed.
    ///
    /// Raised by gateways whose native backing could not be brought up
    /// (thermal manager missing, hint manager unavailable).
    #[error("Platform initialization failed: {0}")]
    PlatformInit(String),

    /// Feature not supported on this platform.
    #[error("Feature not supported on this platform: {0}")]
    NotSupported(String),

    /// A gateway call for a specific feature failed.
    #[error("{feature} gateway error: {reason}")]
    Gateway {
        feature: &'static str,
        reason: String,
    },

    /// Provider configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An I/O error occurred while reading configuration.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Gateway`] failure.
    pub fn gateway(feature: &'static str, reason: impl Into<String>) -> Self {
        Error::Gateway {
            feature,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for adaptive-perf operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PlatformInit("thermal manager missing".to_string());
        assert_eq!(
            err.to_string(),
            "Platform initialization failed: thermal manager missing"
        );

        let err = Error::NotSupported("performance hints".to_string());
        assert_eq!(
            err.to_string(),
            "Feature not supported on this platform: performance hints"
        );

        let err = Error::gateway("hint", "session rejected");
        assert_eq!(err.to_string(), "hint gateway error: session rejected");

        let err = Error::Config("interval must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: interval must be positive"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}

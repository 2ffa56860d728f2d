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

//! Game mode to performance mode mapping
//!
//! The OS reports the user-selected game mode; the engine consumes a
//! performance mode. The mapping is a fixed table and is lossy in the
//! reverse direction: every CPU/GPU flavoured performance mode folds back
//! into the single OS performance game mode.

use std::fmt;

use super::record::PerformanceMode;

/// OS game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum GameMode {
    #[default]
    Unsupported = 0,
    Standard = 1,
    Performance = 2,
    Battery = 3,
}

impl GameMode {
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => GameMode::Standard,
            2 => GameMode::Performance,
            3 => GameMode::Battery,
            _ => GameMode::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Unsupported => "Unsupported",
            GameMode::Standard => "Standard",
            GameMode::Performance => "Performance",
            GameMode::Battery => "Battery",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn game_mode_to_performance_mode(game_mode: GameMode) -> PerformanceMode {
    match game_mode {
        GameMode::Standard => PerformanceMode::Standard,
        GameMode::Performance => PerformanceMode::Performance,
        GameMode::Battery => PerformanceMode::Battery,
        GameMode::Unsupported => PerformanceMode::Unknown,
    }
}

pub fn performance_mode_to_game_mode(mode: PerformanceMode) -> GameMode {
    match mode {
        PerformanceMode::Standard => GameMode::Standard,
        PerformanceMode::Performance | PerformanceMode::Cpu | PerformanceMode::Gpu => {
            GameMode::Performance
        }
        PerformanceMode::Battery => GameMode::Battery,
        PerformanceMode::Unknown => GameMode::Unsupported,
    }
}

/// Map a raw OS game mode straight to the engine performance mode.
pub fn map_raw_game_mode(raw: i32) -> PerformanceMode {
    game_mode_to_performance_mode(GameMode::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_mode_table() {
        assert_eq!(map_raw_game_mode(0) as i32, 0);
        assert_eq!(map_raw_game_mode(1) as i32, 1);
        assert_eq!(map_raw_game_mode(2) as i32, 2);
        assert_eq!(map_raw_game_mode(3) as i32, 5);
        assert_eq!(map_raw_game_mode(4) as i32, 0);
        assert_eq!(map_raw_game_mode(-7) as i32, 0);
    }

    #[test]
    fn test_reverse_mapping_is_lossy() {
        for mode in [
            PerformanceMode::Performance,
            PerformanceMode::Cpu,
            PerformanceMode::Gpu,
        ] {
            assert_eq!(performance_mode_to_game_mode(mode), GameMode::Performance);
        }
        assert_eq!(
            game_mode_to_performance_mode(performance_mode_to_game_mode(PerformanceMode::Cpu)),
            PerformanceMode::Performance
        );
    }

    #[test]
    fn test_round_trip_from_game_mode() {
        for raw in 0..=3 {
            let game_mode = GameMode::from_raw(raw);
            let mode = game_mode_to_performance_mode(game_mode);
            assert_eq!(performance_mode_to_game_mode(mode), game_mode);
        }
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(GameMode::Battery.to_string(), "Battery");
        assert_eq!(GameMode::from_raw(99), GameMode::Unsupported);
    }
}

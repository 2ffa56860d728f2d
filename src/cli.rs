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

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive the provider against a simulated device. (default)
    Simulate(SimulateArgs),
    /// Print the game mode to performance mode table.
    Modes,
}

#[derive(Parser, Clone, Debug)]
pub struct SimulateArgs {
    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 1500)]
    pub frames: u64,
    /// Duration of one simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,
    /// Playback speed. Frames tick this many times faster than real time.
    #[arg(long, default_value_t = 1)]
    pub speed: u32,
    /// Platform API level reported by the simulated device.
    #[arg(long, default_value_t = 33)]
    pub api_level: i32,
    /// Target frame rate. Use -1 for uncapped.
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub target_frame_rate: i32,
    /// Raw game mode reported by the simulated device.
    #[arg(long, default_value_t = 1)]
    pub game_mode: i32,
    /// Render on a separate thread from the main thread.
    #[arg(long)]
    pub multithreaded: bool,
    /// Fire a thermal warning from a platform thread, as FRAME:LEVEL. Repeatable.
    #[arg(long = "warning-at", value_parser = parse_warning)]
    pub warnings: Vec<(u64, i32)>,
    /// Provider configuration file (JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Enable verbose provider logging.
    #[arg(long)]
    pub logging: bool,
    /// Seed for frame time jitter.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        SimulateArgs::parse_from(["simulate"])
    }
}

fn parse_warning(value: &str) -> Result<(u64, i32), String> {
    let (frame, level) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:LEVEL, got '{value}'"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;
    let level = level
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid level '{level}': {e}"))?;
    if !(-1..=2).contains(&level) {
        return Err(format!("warning level must be -1, 0, 1 or 2, got {level}"));
    }
    Ok((frame, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_warning() {
        assert_eq!(parse_warning("120:2"), Ok((120, 2)));
        assert_eq!(parse_warning("5:-1"), Ok((5, -1)));
        assert!(parse_warning("120").is_err());
        assert!(parse_warning("x:1").is_err());
        assert!(parse_warning("10:3").is_err());
    }

    #[test]
    fn test_simulate_defaults() {
        let args = SimulateArgs::default();
        assert_eq!(args.frames, 1500);
        assert_eq!(args.speed, 1);
        assert_eq!(args.api_level, 33);
        assert_eq!(args.target_frame_rate, -1);
        assert!(args.warnings.is_empty());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::parse_from([
            "adaptive-perf",
            "simulate",
            "--frames",
            "10",
            "--target-frame-rate",
            "60",
            "--warning-at",
            "3:2",
            "--warning-at",
            "6:0",
        ]);
        match cli.command {
            Some(Commands::Simulate(args)) => {
                assert_eq!(args.frames, 10);
                assert_eq!(args.target_frame_rate, 60);
                assert_eq!(args.warnings, vec![(3, 2), (6, 0)]);
            }
            _ => panic!("expected simulate command"),
        }
    }
}

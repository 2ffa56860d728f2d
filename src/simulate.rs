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

//! Simulated device run for the `simulate` command
//!
//! A simple heating model drives the mock thermal gateway: sustained load
//! above the frame budget raises thermal headroom usage, idle frames cool
//! it down. Thermal status follows the headroom and is re-read whenever it
//! moves, and scripted warnings are fired from a blocking-pool thread like
//! a platform callback would be.
//!
//! The provider clock advances by `--frame-ms` per frame regardless of
//! `--speed`, so the default run spans several temperature refresh intervals.

use std::time::Duration;

use adaptive_perf::mock::MockPlatform;
use adaptive_perf::platform::FrameTiming;
use adaptive_perf::provider::{desired_duration_nanos, map_raw_game_mode, HintSessionKind};
use adaptive_perf::{Feature, PerformanceProvider, ProviderConfig, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::cli::SimulateArgs;

const HEATING_RATE: f64 = 0.004;
const COOLING_RATE: f64 = 0.002;
const THROTTLING_HEADROOM: f64 = 0.7;
const THROTTLED_HEADROOM: f64 = 0.9;

/// Headroom usage that rises while frames overrun their budget.
struct ThermalModel {
    headroom: f64,
}

impl ThermalModel {
    fn new() -> Self {
        Self { headroom: 0.3 }
    }

    fn step(&mut self, load: f64) -> f64 {
        if load > 1.0 {
            self.headroom += HEATING_RATE * load;
        } else {
            self.headroom -= COOLING_RATE * (1.0 - load);
        }
        self.headroom = self.headroom.clamp(0.0, 1.2);
        self.headroom
    }

    fn status(&self) -> i32 {
        if self.headroom >= THROTTLED_HEADROOM {
            2
        } else if self.headroom >= THROTTLING_HEADROOM {
            1
        } else {
            0
        }
    }
}

/// Change counts observed over one simulated run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub frames: u64,
    pub temperature_changes: u64,
    pub warning_changes: u64,
    pub status_changes: u64,
}

fn load_config(args: &SimulateArgs) -> Result<ProviderConfig> {
    let config = match &args.config {
        Some(path) => ProviderConfig::from_json_file(path)?,
        None => ProviderConfig::default(),
    };
    Ok(if args.logging {
        config.logging(true)
    } else {
        config
    })
}

fn jittered(rng: &mut StdRng, base_ms: f64) -> f64 {
    (base_ms * (1.0 + rng.random_range(-0.15..0.15))).max(0.1)
}

pub async fn run_simulation(args: &SimulateArgs) -> Result<SimulationReport> {
    let config = load_config(args)?;
    config.validate()?;

    let platform = MockPlatform::new(args.api_level);
    platform.host.set_target_frame_rate(args.target_frame_rate);
    platform.host.set_game_mode(args.game_mode);
    platform.hint.set_multithreaded(args.multithreaded);

    let mut model = ThermalModel::new();
    platform.thermal.set_headroom(model.headroom);

    let mut provider = PerformanceProvider::new(config.clone(), platform.bindings());
    if !provider.try_initialize() {
        warn!("Provider failed to initialize at API level {}", args.api_level);
        println!("Adaptive performance is not available at API level {}", args.api_level);
        return Ok(SimulationReport::default());
    }
    provider.start();
    info!(
        "Simulating {} frames (capabilities: {:?}, mode: {})",
        args.frames,
        provider.capabilities(),
        map_raw_game_mode(args.game_mode)
    );

    let budget_ms = desired_duration_nanos(args.target_frame_rate, config.fallback_frame_rate)
        as f64
        / 1_000_000.0;
    let frame_duration = Duration::from_millis(args.frame_ms.max(1));
    let mut rng = StdRng::seed_from_u64(args.seed);
    let tick = (frame_duration / args.speed.max(1)).max(Duration::from_micros(100));
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut timestamp: u64 = 0;
    let mut status = model.status();
    let mut report = SimulationReport::default();

    for frame in 0..args.frames {
        ticker.tick().await;

        for &(at, level) in args.warnings.iter().filter(|(at, _)| *at == frame) {
            let thermal = platform.thermal.clone();
            let delivered = tokio::task::spawn_blocking(move || thermal.fire_warning(level))
                .await
                .unwrap_or(false);
            if !delivered {
                warn!("Warning at frame {at} dropped: no callback registered");
            }
        }

        // Load ramps up over the first half of the run, then eases off
        let progress = frame as f64 / args.frames.max(1) as f64;
        let intensity = if progress < 0.5 { 0.6 + progress * 1.4 } else { 1.3 - (progress - 0.5) };
        let main_ms = jittered(&mut rng, budget_ms * 0.6 * intensity);
        let render_ms = jittered(&mut rng, budget_ms * 0.3 * intensity);
        let gpu_ms = jittered(&mut rng, budget_ms * 0.5 * intensity);

        platform.frame_timing.push(FrameTiming {
            cpu_main_thread_frame_time_ms: main_ms,
            cpu_render_thread_frame_time_ms: render_ms,
            gpu_frame_time_ms: gpu_ms,
            frame_start_timestamp: timestamp,
        });
        timestamp += frame_duration.as_nanos() as u64;

        let load = (main_ms.max(render_ms) + gpu_ms) / budget_ms;
        platform.thermal.set_headroom(model.step(load));
        platform.clock.advance(frame_duration);
        if model.status() != status {
            status = model.status();
            platform.thermal.set_status(status);
            provider.immediate_update_thermal_status();
            report.status_changes += 1;
        }

        let record = provider.update();
        report.frames += 1;
        if record.change_flags.contains(Feature::TEMPERATURE_LEVEL) {
            report.temperature_changes += 1;
        }
        if !record.change_flags.is_empty() {
            println!(
                "frame {frame:>5}: {:?} temperature={:.2} warning={} mode={}",
                record.change_flags,
                record.temperature_level,
                record.warning_level,
                record.performance_mode
            );
        }
        if record.change_flags.contains(Feature::WARNING_LEVEL) {
            report.warning_changes += 1;
            info!("Warning level is now {}", record.warning_level);
        }
    }

    println!();
    print!("{}", provider.stats());
    if let Some(session) = provider.hint_session(HintSessionKind::Common) {
        println!(
            "Common session target: {:.2}ms",
            session.last_target_nanos as f64 / 1_000_000.0
        );
    }
    if let Some(session) = provider.hint_session(HintSessionKind::Cpu) {
        println!(
            "CPU session target: {:.2}ms",
            session.last_target_nanos as f64 / 1_000_000.0
        );
    }
    println!(
        "Hint reports: {}, target updates: {}",
        platform.hint.reports().len(),
        platform.hint.target_updates().len()
    );

    provider.stop();
    provider.destroy();
    Ok(report)
}

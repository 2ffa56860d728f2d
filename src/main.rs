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

mod cli;
mod simulate;

use adaptive_perf::provider::{game_mode_to_performance_mode, GameMode};
use clap::Parser;
use cli::{Cli, Commands, SimulateArgs};
use simulate::run_simulation;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adaptive_perf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_mode_table() {
    println!("{:<6} {:<12} {:<6} {:<12}", "raw", "game mode", "raw", "performance mode");
    for raw in 0..=3 {
        let game_mode = GameMode::from_raw(raw);
        let mode = game_mode_to_performance_mode(game_mode);
        println!(
            "{:<6} {:<12} {:<6} {:<12}",
            raw,
            game_mode.as_str(),
            mode as i32,
            mode.as_str()
        );
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Simulate(args)) => run_simulation(&args).await.map(|_| ()),
        Some(Commands::Modes) => {
            print_mode_table();
            Ok(())
        }
        None => run_simulation(&SimulateArgs::default()).await.map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

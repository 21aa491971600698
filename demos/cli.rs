//! Minimal CLI front-end: loads a config file, runs the engine to
//! completion (every task Terminated), and prints the execution log.
//!
//! Not part of the simulator core — a thin demonstration of wiring the
//! config loader to the engine, in place of the firmware entry point this
//! crate is descended from.

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use tickctl::config;
use tickctl::engine::Engine;
use tickctl::task::TaskState;

#[derive(Parser)]
#[command(name = "tickctl", about = "Deterministic tick-driven scheduler simulator")]
struct Args {
    /// Path to a config file in the line-oriented text format.
    config_path: String,

    /// Seed for the tie-break oracle's random source.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Safety cap on ticks, in case a workload never drains.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let text = match fs::read_to_string(&args.config_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error reading {}: {e}", args.config_path);
            return ExitCode::FAILURE;
        }
    };

    let parsed = match config::parse(&text) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let policy = parsed.policy.build(parsed.alpha);
    let mut engine = Engine::with_seed(parsed.tasks, policy, parsed.quantum, args.seed);

    let mut ticks = 0;
    while !all_terminated(&engine) && ticks < args.max_ticks {
        engine.tick();
        ticks += 1;
    }

    for entry in &engine.timelines().execution {
        println!(
            "{:>5}  {:<10}  {}",
            entry.tick,
            entry.task_id.as_deref().unwrap_or("idle"),
            if entry.lottery_used { "(lottery)" } else { "" }
        );
    }

    ExitCode::SUCCESS
}

fn all_terminated(engine: &Engine) -> bool {
    engine.tasks().iter().all(|t| t.state == TaskState::Terminated)
}

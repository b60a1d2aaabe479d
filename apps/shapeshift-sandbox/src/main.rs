//! Shapeshift Sandbox
//!
//! Loads a level of extrudable blocks, plays its scripted grow and shrink
//! commands at a fixed tick rate and logs what every block does.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p shapeshift-sandbox -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `-l, --level <PATH>`: Level file (default: built-in demo level)
//! - `-t, --ticks <N>`: Stop after N ticks (default: 1800)
//! - `--tick-rate <N>`: Ticks per second (default: 60)
//! - `--report-every <N>`: Log block sizes every N ticks, 0 to disable (default: 60)
//! - `--realtime`: Pace ticks to wall-clock time
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod level;

use shapeshift_app::{run_app, AppConfig};

use crate::app::Sandbox;

const DEFAULT_TICKS: u64 = 1800;
const DEFAULT_TICK_RATE: u32 = 60;

fn main() -> anyhow::Result<()> {
    // Check for help flag before starting the app
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    run_app::<Sandbox>(config_from_args())
}

/// Runner options; level options are parsed by the app itself.
fn config_from_args() -> AppConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut ticks = DEFAULT_TICKS;
    let mut tick_rate = DEFAULT_TICK_RATE;
    let mut realtime = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" | "-t" => {
                if i + 1 < args.len() {
                    if let Ok(v) = args[i + 1].parse() {
                        ticks = v;
                    }
                    i += 1;
                }
            }
            "--tick-rate" => {
                if i + 1 < args.len() {
                    if let Ok(v) = args[i + 1].parse() {
                        tick_rate = v;
                    }
                    i += 1;
                }
            }
            "--realtime" => realtime = true,
            _ => {}
        }
        i += 1;
    }

    AppConfig::new("Shapeshift Sandbox")
        .with_tick_rate(tick_rate)
        .with_max_ticks(ticks)
        .with_realtime(realtime)
}

fn print_help() {
    eprintln!(
        "Shapeshift Sandbox

USAGE:
    cargo run -p shapeshift-sandbox -- [OPTIONS]

OPTIONS:
    -l, --level <PATH>      Level file (default: built-in demo level)
    -t, --ticks <N>         Stop after N ticks (default: {DEFAULT_TICKS})
    --tick-rate <N>         Ticks per second (default: {DEFAULT_TICK_RATE})
    --report-every <N>      Log block sizes every N ticks, 0 to disable (default: 60)
    --realtime              Pace ticks to wall-clock time
    -h, --help              Print this help message

EXAMPLES:
    # Play the demo level
    cargo run -p shapeshift-sandbox

    # Play a custom level and watch every contact
    RUST_LOG=debug cargo run -p shapeshift-sandbox -- --level apps/shapeshift-sandbox/levels/demo.toml

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}

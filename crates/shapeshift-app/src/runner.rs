//! Application runner and tick loop.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::ensure;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::SimApp;
use crate::context::SimContext;
use crate::frame::FrameContext;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name used in log output.
    pub title: String,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Stop after this many ticks (None to run until the app finishes).
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to match wall-clock time.
    pub realtime: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapeshift".to_string(),
            tick_rate: 60,
            max_ticks: None,
            realtime: false,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the number of ticks per second.
    #[must_use]
    pub const fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Stop after a fixed number of ticks.
    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Enable or disable wall-clock pacing.
    #[must_use]
    pub const fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Fixed step in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Install the global `tracing` subscriber.
///
/// Reads `RUST_LOG`, defaulting to `info`. Does nothing if a subscriber is
/// already installed.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Run a [`SimApp`] with the given configuration.
///
/// Initializes logging, then ticks until the app finishes or the tick
/// limit is reached.
pub fn run_app<A: SimApp>(config: AppConfig) -> anyhow::Result<()> {
    init_logging();
    run_headless::<A>(config).map(|_| ())
}

/// Run a [`SimApp`] without touching global logging state.
///
/// Returns the final context so callers can inspect the world.
pub fn run_headless<A: SimApp>(config: AppConfig) -> anyhow::Result<SimContext> {
    ensure!(config.tick_rate > 0, "tick rate must be positive");

    let dt = config.dt();
    let tick_duration = Duration::from_secs_f32(dt);
    let mut ctx = SimContext::default();
    let mut app = A::init(&mut ctx)?;

    info!(
        title = %config.title,
        tick_rate = config.tick_rate,
        blocks = ctx.growth.len(),
        "{} starting...",
        config.title
    );

    loop {
        if config.max_ticks.is_some_and(|max| ctx.frame_count >= max) || app.is_finished(&ctx) {
            break;
        }

        let tick_start = Instant::now();
        let frame = FrameContext::new(dt, ctx.frame_count, ctx.elapsed);

        ctx.begin_tick();
        if let Err(e) = app.update(&mut ctx, &frame) {
            error!(frame = frame.frame_number, "update failed: {e:#}");
            app.cleanup(&mut ctx);
            return Err(e);
        }
        let summary = ctx.simulate(dt);
        app.after_tick(&ctx, &frame, &summary);

        if config.realtime {
            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                thread::sleep(tick_duration - elapsed);
            }
        }
    }

    app.cleanup(&mut ctx);
    info!(
        ticks = ctx.frame_count,
        seconds = ctx.elapsed,
        "{} finished",
        config.title
    );
    Ok(ctx)
}

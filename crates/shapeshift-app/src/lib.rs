//! Fixed-step simulation framework for shapeshift.
//!
//! Handles the per-tick boilerplate around the growth system:
//! - Logging setup
//! - Tick ordering (flag reset, commands, trajectory, contacts)
//! - Tick pacing and shutdown
//!
//! # Example
//!
//! ```no_run
//! use shapeshift_app::{run_app, AppConfig, FrameContext, SimApp, SimContext};
//!
//! struct MyApp;
//!
//! impl SimApp for MyApp {
//!     fn init(ctx: &mut SimContext) -> anyhow::Result<Self> {
//!         // Spawn geometry, the actor and blocks into ctx.world
//!         Ok(MyApp)
//!     }
//!
//!     fn update(&mut self, ctx: &mut SimContext, frame: &FrameContext) -> anyhow::Result<()> {
//!         // Issue grow/shrink commands
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     run_app::<MyApp>(AppConfig::new("demo").with_max_ticks(600))
//! }
//! ```

mod app;
mod context;
mod frame;
mod runner;

pub use app::SimApp;
pub use context::{SimContext, TickSummary, GRINDING_CUE};
pub use frame::FrameContext;
pub use runner::{init_logging, run_app, run_headless, AppConfig};

// Re-export commonly used types for convenience
pub use shapeshift_growth::{BlockConfig, GrowthSystem, Propagation};
pub use shapeshift_physics::{ContactEvent, ContactKind};

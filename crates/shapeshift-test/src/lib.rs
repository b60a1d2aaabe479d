//! Scenario harness for shapeshift.
//!
//! Builds small levels (floor, walls, ceiling, actor, named blocks) and
//! steps them through the same tick as the app runner.

pub mod harness;

pub use harness::{BlockSpec, Harness, Scenario, ACTOR_NAME};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("engine error: {0}")]
    Engine(#[from] shapeshift_core::Error),
    #[error("unknown block: {0}")]
    UnknownBlock(String),
    #[error("no actor in scenario")]
    NoActor,
    #[error("not settled after {0} ticks")]
    NotSettled(usize),
}

pub type Result<T> = std::result::Result<T, TestError>;

/// Scenario stepping configuration.
#[derive(Debug, Clone, Copy)]
pub struct HarnessConfig {
    /// Fixed step in seconds.
    pub dt: f32,
    /// Tick budget for [`Harness::settle`].
    pub settle_ticks: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            settle_ticks: 60 * 30,
        }
    }
}

//! `SimApp` trait definition.

use crate::context::{SimContext, TickSummary};
use crate::frame::FrameContext;

/// Trait for shapeshift simulations.
///
/// The runner owns the world and growth system; an app builds the scene in
/// [`init`](Self::init) and issues commands from [`update`](Self::update).
pub trait SimApp: Sized {
    /// Initialize the application.
    ///
    /// Called once with an empty world. Spawn geometry, the actor and blocks
    /// here.
    fn init(ctx: &mut SimContext) -> anyhow::Result<Self>;

    /// Issue commands for this tick.
    ///
    /// Called after per-tick flags are cleared and before any block moves.
    fn update(&mut self, ctx: &mut SimContext, frame: &FrameContext) -> anyhow::Result<()>;

    /// Inspect the result of a tick.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn after_tick(&mut self, ctx: &SimContext, frame: &FrameContext, summary: &TickSummary) {}

    /// Return `true` to stop before the next tick.
    ///
    /// Default implementation never stops; use
    /// [`AppConfig::with_max_ticks`](crate::AppConfig::with_max_ticks) instead.
    #[allow(unused_variables)]
    fn is_finished(&self, ctx: &SimContext) -> bool {
        false
    }

    /// Called once when the run ends.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn cleanup(&mut self, ctx: &mut SimContext) {}
}

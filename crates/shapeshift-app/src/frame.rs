//! Per-tick context.

/// Timing of the tick being simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Fixed step in seconds.
    pub dt: f32,
    /// Number of ticks completed before this one.
    pub frame_number: u64,
    /// Simulated seconds before this tick.
    pub elapsed: f32,
}

impl FrameContext {
    pub(crate) const fn new(dt: f32, frame_number: u64, elapsed: f32) -> Self {
        Self {
            dt,
            frame_number,
            elapsed,
        }
    }
}

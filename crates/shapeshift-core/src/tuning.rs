//! Growth thresholds shared by every block.

use serde::{Deserialize, Serialize};

/// Distances, in world units, that govern when growth is refused and how the
/// actor is moved out of the way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthTuning {
    /// Down-growing blocks refuse to grow when the gap between their lower
    /// face and the actor is at most this.
    pub floor_clearance: f32,
    /// Up-growing blocks refuse to grow when the obstacle above is at most
    /// this far above the actor.
    pub ceiling_clearance: f32,
    /// An obstacle this close in front of a lateral block means the actor
    /// cannot be pushed back.
    pub push_clearance: f32,
    /// How far the actor is pushed back along the block's outward axis.
    pub push_distance: f32,
    /// How far a block retracts when it cannot push the actor.
    pub retract_distance: f32,
    /// Nudge applied before rounding to the next cell boundary.
    pub step_epsilon: f32,
}

impl GrowthTuning {
    pub const DEFAULT_FLOOR_CLEARANCE: f32 = 3.2;
    pub const DEFAULT_CEILING_CLEARANCE: f32 = 3.5;
    pub const DEFAULT_PUSH_CLEARANCE: f32 = 3.0;
    pub const DEFAULT_PUSH_DISTANCE: f32 = 1.5;
    pub const DEFAULT_RETRACT_DISTANCE: f32 = 0.5;
    pub const DEFAULT_STEP_EPSILON: f32 = 0.001;
}

impl Default for GrowthTuning {
    fn default() -> Self {
        Self {
            floor_clearance: Self::DEFAULT_FLOOR_CLEARANCE,
            ceiling_clearance: Self::DEFAULT_CEILING_CLEARANCE,
            push_clearance: Self::DEFAULT_PUSH_CLEARANCE,
            push_distance: Self::DEFAULT_PUSH_DISTANCE,
            retract_distance: Self::DEFAULT_RETRACT_DISTANCE,
            step_epsilon: Self::DEFAULT_STEP_EPSILON,
        }
    }
}

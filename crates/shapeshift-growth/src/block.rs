//! Block configuration and mutable state.

use serde::{Deserialize, Serialize};
use shapeshift_core::{Error, GrowthTuning, Result};

/// Static per-block settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Whether the block may grow or shrink on its own.
    pub extrudable: bool,
    /// Whether the block still moves when commanded by a linked peer while
    /// not extrudable itself.
    pub linked: bool,
    /// Units per second.
    pub growth_rate: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub tuning: GrowthTuning,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            extrudable: true,
            linked: false,
            growth_rate: 1.0,
            min_size: 0.000_001,
            max_size: 10.0,
            tuning: GrowthTuning::default(),
        }
    }
}

impl BlockConfig {
    #[must_use]
    pub fn with_extrudable(mut self, extrudable: bool) -> Self {
        self.extrudable = extrudable;
        self
    }

    #[must_use]
    pub fn with_linked(mut self, linked: bool) -> Self {
        self.linked = linked;
        self
    }

    #[must_use]
    pub fn with_growth_rate(mut self, growth_rate: f32) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    #[must_use]
    pub fn with_size_range(mut self, min_size: f32, max_size: f32) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: GrowthTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Check the size range and growth rate.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_size < self.max_size) {
            return Err(Error::InvalidConfig(format!(
                "min_size ({}) must be below max_size ({})",
                self.min_size, self.max_size
            )));
        }
        if !(self.growth_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "growth_rate ({}) must be positive",
                self.growth_rate
            )));
        }
        Ok(())
    }

    /// Clamp a scale into `[min_size, max_size]`.
    #[inline]
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_size, self.max_size)
    }
}

/// Mutable state of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockState {
    /// Size along the growth axis, mirrored into the transform.
    pub current_scale: f32,
    /// Target the scale moves towards. Grow and shrink put it on whole
    /// cells; the complete variants put it on the size limits.
    pub desired_scale: f32,
    /// Trajectory is frozen until a qualifying collision exit.
    pub collision_held: bool,
    /// A grow was committed during the current tick.
    pub grew_this_tick: bool,
}

impl BlockState {
    /// State for a block whose transform currently has the given scale.
    ///
    /// The initial target is the scale truncated to a whole cell.
    pub fn from_scale(scale: f32) -> Self {
        Self {
            current_scale: scale,
            desired_scale: scale.trunc(),
            collision_held: false,
            grew_this_tick: false,
        }
    }
}

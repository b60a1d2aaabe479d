//! Growth direction derived from a block's static rotation.

use shapeshift_core::{Cardinal, Error, EulerAngles, Result};

/// Which way a block extends when it grows.
///
/// Computed once when the controller is created. Re-rotating a block at
/// runtime is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthAxis {
    /// Upright block: grows towards +Y and never pushes the actor.
    Up,
    /// Upside-down block: grows towards -Y.
    Down,
    /// Sideways block growing towards a cardinal direction.
    Lateral(Cardinal),
}

impl GrowthAxis {
    /// Classify a rotation after rounding it to whole degrees.
    ///
    /// Upright means zero pitch and roll; upside down means yaw and roll of
    /// 180. Anything else is lateral and must have a cardinal yaw, matched
    /// on the unrounded yaw so drift either side of the angle is accepted.
    #[allow(clippy::float_cmp)] // whole degrees after rounding
    pub fn classify(rotation: EulerAngles) -> Result<Self> {
        let rounded = rotation.rounded();

        if rounded.yaw == 180.0 && rounded.roll == 180.0 {
            return Ok(Self::Down);
        }
        if rounded.pitch == 0.0 && rounded.roll == 0.0 {
            return Ok(Self::Up);
        }

        Cardinal::from_yaw(rotation.normalized().yaw)
            .map(Self::Lateral)
            .ok_or(Error::UnsupportedOrientation { yaw: rotation.yaw })
    }

    #[inline]
    pub const fn grows_up(self) -> bool {
        matches!(self, Self::Up)
    }

    #[inline]
    pub const fn grows_down(self) -> bool {
        matches!(self, Self::Down)
    }

    /// Horizontal direction the actor is pushed in, if the block pushes at all.
    ///
    /// Down-growing blocks are authored with a yaw of 180 and push along it.
    #[inline]
    pub const fn facing(self) -> Option<Cardinal> {
        match self {
            Self::Up => None,
            Self::Down => Some(Cardinal::South),
            Self::Lateral(dir) => Some(dir),
        }
    }
}

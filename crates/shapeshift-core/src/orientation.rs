//! Static rotations and the cardinal directions blocks can face.
//!
//! Rotations are authored as Euler angles in degrees and applied in
//! Y-X-Z order (yaw, then pitch, then roll), so a block's local +Y axis is
//! the axis it grows along.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::approx_eq;

/// Euler rotation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about X
    #[serde(default)]
    pub pitch: f32,
    /// Rotation about Y
    #[serde(default)]
    pub yaw: f32,
    /// Rotation about Z
    #[serde(default)]
    pub roll: f32,
}

impl EulerAngles {
    /// No rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new rotation from pitch, yaw and roll in degrees
    #[inline]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Each component wrapped into `[0, 360)`.
    pub fn normalized(self) -> Self {
        Self {
            pitch: wrap_degrees(self.pitch),
            yaw: wrap_degrees(self.yaw),
            roll: wrap_degrees(self.roll),
        }
    }

    /// Round to whole degrees.
    ///
    /// Pitch and roll are truncated towards zero (ceiling when negative,
    /// floor otherwise); yaw is always rounded up. The result is wrapped
    /// into `[0, 360)` so a yaw of 359.5 reads as 0.
    pub fn rounded(self) -> Self {
        let n = self.normalized();
        let toward_zero = |v: f32| if v < 0.0 { v.ceil() } else { v.floor() };
        Self {
            pitch: wrap_degrees(toward_zero(n.pitch)),
            yaw: wrap_degrees(n.yaw.ceil()),
            roll: wrap_degrees(toward_zero(n.roll)),
        }
    }

    /// Convert to a quaternion.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }
}

#[inline]
fn wrap_degrees(v: f32) -> f32 {
    let wrapped = v.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Horizontal direction a lateral block extends towards.
///
/// The names follow the yaw they are authored with; the outward vector is
/// the world axis the block's growing face points along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    /// Yaw 0, grows towards -Z
    North,
    /// Yaw 90, grows towards -X
    West,
    /// Yaw 180, grows towards +Z
    South,
    /// Yaw 270, grows towards +X
    East,
}

impl Cardinal {
    /// All directions in yaw order.
    pub const ALL: [Self; 4] = [Self::North, Self::West, Self::South, Self::East];

    /// Degrees a stored yaw may drift from a cardinal angle and still
    /// classify as it.
    pub const YAW_TOLERANCE: f32 = 1e-3;

    /// Classify a yaw in degrees. Returns `None` unless the yaw is within
    /// [`YAW_TOLERANCE`](Self::YAW_TOLERANCE) of 0, 90, 180 or 270.
    pub fn from_yaw(yaw: f32) -> Option<Self> {
        let yaw = wrap_degrees(yaw);
        let near =
            |target: f32| approx_eq(yaw, target) || (yaw - target).abs() <= Self::YAW_TOLERANCE;
        // 360 wraps to 0 but values just below it need the extra check
        if near(0.0) || near(360.0) {
            return Some(Self::North);
        }
        Self::ALL.into_iter().find(|dir| near(dir.yaw()))
    }

    /// Yaw in degrees this direction is authored with
    #[inline]
    pub const fn yaw(self) -> f32 {
        match self {
            Self::North => 0.0,
            Self::West => 90.0,
            Self::South => 180.0,
            Self::East => 270.0,
        }
    }

    /// Unit vector pointing outward from the block's growing face
    #[inline]
    pub const fn outward(self) -> Vec3 {
        match self {
            Self::North => Vec3::NEG_Z,
            Self::West => Vec3::NEG_X,
            Self::South => Vec3::Z,
            Self::East => Vec3::X,
        }
    }

    /// Index of the world axis the outward vector lies on (0 = X, 2 = Z)
    #[inline]
    pub const fn axis_index(self) -> usize {
        match self {
            Self::North | Self::South => 2,
            Self::West | Self::East => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rounding_truncates_pitch_and_roll_and_ceils_yaw() {
        let r = EulerAngles::new(0.7, 179.2, 180.9).rounded();
        assert_eq!(r, EulerAngles::new(0.0, 180.0, 180.0));
    }

    #[test]
    fn rounding_wraps_negative_angles() {
        let r = EulerAngles::new(-90.0, -90.0, 0.0).rounded();
        assert_eq!(r, EulerAngles::new(270.0, 270.0, 0.0));
    }

    #[test]
    fn yaw_just_below_full_turn_rounds_to_zero() {
        let r = EulerAngles::new(0.0, 359.5, 0.0).rounded();
        assert_eq!(r.yaw, 0.0);
    }

    #[test]
    fn cardinal_from_yaw() {
        assert_eq!(Cardinal::from_yaw(0.0), Some(Cardinal::North));
        assert_eq!(Cardinal::from_yaw(90.0), Some(Cardinal::West));
        assert_eq!(Cardinal::from_yaw(180.000_01), Some(Cardinal::South));
        assert_eq!(Cardinal::from_yaw(-90.0), Some(Cardinal::East));
        assert_eq!(Cardinal::from_yaw(360.0), Some(Cardinal::North));
        assert_eq!(Cardinal::from_yaw(45.0), None);
    }

    #[test]
    fn cardinal_from_yaw_tolerates_float_drift() {
        assert_eq!(Cardinal::from_yaw(90.0001), Some(Cardinal::West));
        assert_eq!(Cardinal::from_yaw(89.9999), Some(Cardinal::West));
        assert_eq!(Cardinal::from_yaw(0.0001), Some(Cardinal::North));
        assert_eq!(Cardinal::from_yaw(359.9999), Some(Cardinal::North));
        assert_eq!(Cardinal::from_yaw(270.0005), Some(Cardinal::East));
        assert_eq!(Cardinal::from_yaw(90.5), None);
    }

    #[test]
    fn growth_axis_follows_rotation() {
        // Lateral: pitched forward, then yawed
        for dir in Cardinal::ALL {
            let q = EulerAngles::new(-90.0, dir.yaw(), 0.0).to_quat();
            let axis = q * Vec3::Y;
            assert_abs_diff_eq!(axis.x, dir.outward().x, epsilon = 1e-5);
            assert_abs_diff_eq!(axis.y, dir.outward().y, epsilon = 1e-5);
            assert_abs_diff_eq!(axis.z, dir.outward().z, epsilon = 1e-5);
        }

        // Upside down
        let q = EulerAngles::new(0.0, 180.0, 180.0).to_quat();
        let axis = q * Vec3::Y;
        assert_abs_diff_eq!(axis.y, -1.0, epsilon = 1e-5);
    }
}

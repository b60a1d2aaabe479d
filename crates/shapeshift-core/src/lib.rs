//! Core types, math, and tuning for shapeshift.
//!
//! This crate provides the foundational types used by the other crates:
//! - Ray and bounding box math with engine-style approximate comparisons
//! - Rotation rounding and cardinal facing directions
//! - Named tuning thresholds for block growth
//! - The shared error type

pub mod error;
pub mod math;
pub mod orientation;
pub mod tuning;

pub use error::{Error, Result};
pub use math::{approx_eq, move_towards, Aabb, Ray};
pub use orientation::{Cardinal, EulerAngles};
pub use tuning::GrowthTuning;

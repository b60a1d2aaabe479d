//! Ray casts and trigger contacts for shapeshift.
//!
//! Colliders are the world-space AABBs of entities carrying a
//! [`Transform`](shapeshift_entity::Transform) and a
//! [`Collider`](shapeshift_entity::Collider). There is no broad phase: levels
//! are small enough that every query walks all colliders.

mod raycast;
mod trigger;

pub use raycast::{raycast, RaycastHit};
pub use trigger::{ContactEvent, ContactKind, Trigger, TriggerTracker};

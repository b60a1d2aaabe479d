//! Extrudable block growth for shapeshift.
//!
//! A block grows or shrinks along its local Y axis one cell at a time,
//! forwards every command to the blocks linked to it, and refuses to grow
//! when that would crush the tracked actor against a floor or ceiling.
//!
//! # Core Types
//!
//! - [`GrowthController`]: per-block state machine (trajectory, safety gate,
//!   collision hold)
//! - [`GrowthSystem`]: owns every controller and fans commands out across links
//! - [`BlockEnvironment`]: what a controller needs from the world
//! - [`SceneEnvironment`]: [`BlockEnvironment`] over a hecs world
//!
//! # Tick order
//!
//! ```ignore
//! system.begin_tick();
//! system.grow(block, &env);              // commands from game logic
//! system.advance(dt, &mut env);          // move scales
//! for event in triggers.update(world) {  // collisions
//!     system.handle_contact(&event, &mut env);
//! }
//! ```

mod axis;
mod block;
mod controller;
mod environment;
mod scene;
mod system;

pub use axis::GrowthAxis;
pub use block::{BlockConfig, BlockState};
pub use controller::{GrowOutcome, GrowthController, Motion, Veto};
pub use environment::BlockEnvironment;
pub use scene::SceneEnvironment;
pub use system::{GrowthSystem, Propagation};

//! What a growing block needs from the world around it.

use glam::Vec3;
use shapeshift_core::{Aabb, Ray};
use shapeshift_entity::{ActorMessage, Entity, Tag, Transform};
use shapeshift_physics::RaycastHit;

/// Services a [`GrowthController`](crate::GrowthController) consumes.
///
/// Every query may come back empty; controllers treat a missing answer as
/// "nothing to check" rather than as a fault.
pub trait BlockEnvironment {
    /// World-space bounds of an entity's collider.
    fn bounds(&self, entity: Entity) -> Option<Aabb>;

    /// Nearest collider hit within `max_distance`, skipping `exclude`.
    fn raycast(&self, ray: &Ray, max_distance: f32, exclude: &[Entity]) -> Option<RaycastHit>;

    fn tag(&self, entity: Entity) -> Tag;

    /// The actor whose safety gates growth.
    fn tracked_actor(&self) -> Option<Entity>;

    fn transform(&self, entity: Entity) -> Option<Transform>;

    /// Write a block's size along its growth axis back to its transform.
    fn write_scale(&mut self, entity: Entity, scale: f32);

    fn set_position(&mut self, entity: Entity, position: Vec3);

    /// Deliver a message to the actor. Dropped if it cannot receive one.
    fn send_to_actor(&mut self, actor: Entity, message: ActorMessage);

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.transform(entity).map(|t| t.position)
    }
}

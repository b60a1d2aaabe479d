//! [`BlockEnvironment`] backed by a hecs world.

use glam::Vec3;
use shapeshift_core::{Aabb, Ray};
use shapeshift_entity::{
    find_by_name, tag_of, world_bounds, ActorMessage, Entity, Mailbox, Tag, Transform, World,
};
use shapeshift_physics::{raycast, RaycastHit};
use tracing::trace;

use crate::BlockEnvironment;

/// Borrowed view of a world, plus the tracked actor.
pub struct SceneEnvironment<'w> {
    world: &'w mut World,
    actor: Option<Entity>,
}

impl<'w> SceneEnvironment<'w> {
    pub fn new(world: &'w mut World, actor: Option<Entity>) -> Self {
        Self { world, actor }
    }

    /// Track the entity with the given name, if there is one.
    pub fn with_actor_named(world: &'w mut World, name: &str) -> Self {
        let actor = find_by_name(world, name);
        if actor.is_none() {
            trace!(name, "no tracked actor in scene");
        }
        Self { world, actor }
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }
}

impl BlockEnvironment for SceneEnvironment<'_> {
    fn bounds(&self, entity: Entity) -> Option<Aabb> {
        world_bounds(&*self.world, entity)
    }

    fn raycast(&self, ray: &Ray, max_distance: f32, exclude: &[Entity]) -> Option<RaycastHit> {
        raycast(&*self.world, ray, max_distance, exclude)
    }

    fn tag(&self, entity: Entity) -> Tag {
        tag_of(&*self.world, entity)
    }

    fn tracked_actor(&self) -> Option<Entity> {
        self.actor.filter(|actor| self.world.contains(*actor))
    }

    fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    fn write_scale(&mut self, entity: Entity, scale: f32) {
        if let Ok(mut transform) = self.world.get::<&mut Transform>(entity) {
            transform.scale.y = scale;
        }
    }

    fn set_position(&mut self, entity: Entity, position: Vec3) {
        if let Ok(mut transform) = self.world.get::<&mut Transform>(entity) {
            transform.position = position;
        }
    }

    fn send_to_actor(&mut self, actor: Entity, message: ActorMessage) {
        match self.world.get::<&mut Mailbox>(actor) {
            Ok(mut mailbox) => mailbox.push(message),
            Err(_) => trace!(?message, "actor has no mailbox, message dropped"),
        }
    }
}

//! Entity components for shapeshift.
//!
//! Uses hecs as the ECS backend. Blocks, the tracked actor and level
//! geometry are all plain entities carrying a [`Transform`], a [`Collider`]
//! and a [`Tag`].

use glam::{Quat, Vec3};
pub use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use shapeshift_core::{Aabb, EulerAngles};

/// Transform component.
///
/// Rotation is kept as the authored Euler angles; blocks classify their
/// growth direction from it once and never re-read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: EulerAngles,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: EulerAngles::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at a position with no rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_rotation(mut self, rotation: EulerAngles) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion.
    #[inline]
    pub fn quat(&self) -> Quat {
        self.rotation.to_quat()
    }
}

/// Where a collider's local box sits relative to the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// The position is the box center.
    #[default]
    Center,
    /// The position is the center of the box's local -Y face, so scaling Y
    /// extends the box away from the position. Used by growing blocks.
    Base,
}

/// Box collider in local space, before scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Full box size at unit scale.
    pub size: Vec3,
    pub pivot: Pivot,
}

impl Collider {
    /// Unit cube anchored at its base, the shape every block uses.
    pub const BLOCK: Self = Self {
        size: Vec3::ONE,
        pivot: Pivot::Base,
    };

    /// Box centered on the entity position.
    pub const fn centered(size: Vec3) -> Self {
        Self {
            size,
            pivot: Pivot::Center,
        }
    }

    /// World-space bounds under the given transform.
    pub fn world_bounds(&self, transform: &Transform) -> Aabb {
        let size = self.size * transform.scale;
        let half = size * 0.5;
        let (lo, hi) = match self.pivot {
            Pivot::Center => (-half, half),
            Pivot::Base => (
                Vec3::new(-half.x, 0.0, -half.z),
                Vec3::new(half.x, size.y, half.z),
            ),
        };

        let rotation = transform.quat();
        let corners = (0..8).map(|i| {
            let local = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            transform.position + rotation * local
        });
        Aabb::from_points(corners)
    }
}

/// What kind of thing an entity is, as far as collision handling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Always passed through: ignored by ray gates and collision handling.
    Terminal,
    /// The tracked actor whose safety gates growth.
    Actor,
    /// Generic level geometry; leaving one releases a collision hold.
    #[default]
    Obstacle,
    /// Another growing block.
    Block,
}

/// Unique identifier used to look entities up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fire-and-forget notifications delivered to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorMessage {
    /// A block could not push the actor and retracted instead.
    ReduceSpeed,
}

/// Inbox component for [`ActorMessage`]s.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    messages: Vec<ActorMessage>,
}

impl Mailbox {
    pub fn push(&mut self, message: ActorMessage) {
        self.messages.push(message);
    }

    /// Take every pending message.
    pub fn drain(&mut self) -> impl Iterator<Item = ActorMessage> + '_ {
        self.messages.drain(..)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Find the first entity with the given name.
pub fn find_by_name(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<&Name>()
        .iter()
        .find(|(_, n)| n.as_str() == name)
        .map(|(entity, _)| entity)
}

/// World-space bounds of an entity, if it has both a transform and a collider.
pub fn world_bounds(world: &World, entity: Entity) -> Option<Aabb> {
    let transform = world.get::<&Transform>(entity).ok()?;
    let collider = world.get::<&Collider>(entity).ok()?;
    Some(collider.world_bounds(&transform))
}

/// Tag of an entity, defaulting to [`Tag::Obstacle`] when it has none.
pub fn tag_of(world: &World, entity: Entity) -> Tag {
    world.get::<&Tag>(entity).map_or(Tag::default(), |tag| *tag)
}

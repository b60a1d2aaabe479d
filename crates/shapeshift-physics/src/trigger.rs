//! Trigger overlap tracking.
//!
//! Entities marked with [`Trigger`] report when another collider starts or
//! stops overlapping them. Events are produced once per [`TriggerTracker::update`]
//! call, enters before exits, each group ordered by entity.

use hashbrown::HashSet;
use shapeshift_core::Aabb;
use shapeshift_entity::{Collider, Entity, Transform, World};
use tracing::trace;

/// Marker component for entities that receive contact events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trigger;

/// Whether a contact began or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Enter,
    Exit,
}

/// A change in overlap between a trigger and another collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    /// The entity carrying the [`Trigger`].
    pub trigger: Entity,
    /// The entity that entered or left it.
    pub other: Entity,
}

/// Tracks which colliders overlap each trigger between updates.
#[derive(Debug, Default)]
pub struct TriggerTracker {
    contacts: HashSet<(Entity, Entity)>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlaps currently tracked.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Whether `other` currently overlaps `trigger`.
    pub fn is_touching(&self, trigger: Entity, other: Entity) -> bool {
        self.contacts.contains(&(trigger, other))
    }

    /// Recompute overlaps and return what changed since the last update.
    ///
    /// Despawned entities produce exit events.
    pub fn update(&mut self, world: &World) -> Vec<ContactEvent> {
        let colliders: Vec<(Entity, Aabb)> = world
            .query::<(&Transform, &Collider)>()
            .iter()
            .map(|(entity, (transform, collider))| (entity, collider.world_bounds(transform)))
            .collect();

        let mut current = HashSet::with_capacity(self.contacts.len());
        for (trigger, _) in world.query::<&Trigger>().iter() {
            let Some((_, trigger_bounds)) = colliders.iter().find(|(e, _)| *e == trigger) else {
                continue;
            };
            for (other, bounds) in &colliders {
                if *other != trigger && trigger_bounds.overlaps(bounds) {
                    current.insert((trigger, *other));
                }
            }
        }

        let mut entered: Vec<_> = current.difference(&self.contacts).copied().collect();
        let mut exited: Vec<_> = self.contacts.difference(&current).copied().collect();
        entered.sort_unstable();
        exited.sort_unstable();

        self.contacts = current;

        let events: Vec<ContactEvent> = entered
            .into_iter()
            .map(|(trigger, other)| ContactEvent {
                kind: ContactKind::Enter,
                trigger,
                other,
            })
            .chain(exited.into_iter().map(|(trigger, other)| ContactEvent {
                kind: ContactKind::Exit,
                trigger,
                other,
            }))
            .collect();

        if !events.is_empty() {
            trace!(count = events.len(), "trigger contacts changed");
        }
        events
    }
}

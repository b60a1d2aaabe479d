//! Owns every block controller and fans commands out across links.

use hashbrown::{HashMap, HashSet};
use shapeshift_core::{Error, Result};
use shapeshift_entity::Entity;
use shapeshift_physics::{ContactEvent, ContactKind};
use tracing::{debug, trace};

use crate::controller::{GrowOutcome, GrowthController, Motion, Veto};
use crate::environment::BlockEnvironment;

/// What one grow or shrink command did across a linked group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Blocks that ran their command, in the order they ran it.
    pub visited: Vec<Entity>,
    /// Blocks whose target actually moved.
    pub committed: Vec<Entity>,
    /// Blocks that refused to grow, and why.
    pub vetoed: Vec<(Entity, Veto)>,
}

/// Arena of growth controllers keyed by their block entity.
///
/// Links between blocks are entity handles, so a link to a removed block is
/// skipped rather than dangling. Each command visits a block at most once,
/// which keeps cyclic link graphs finite.
#[derive(Debug, Default)]
pub struct GrowthSystem {
    blocks: HashMap<Entity, GrowthController>,
    /// Insertion order, for deterministic ticking.
    order: Vec<Entity>,
}

impl GrowthSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a controller, replacing any existing one for the same entity.
    pub fn insert(&mut self, controller: GrowthController) -> Entity {
        let entity = controller.entity();
        if self.blocks.insert(entity, controller).is_none() {
            self.order.push(entity);
        }
        entity
    }

    pub fn remove(&mut self, entity: Entity) -> Option<GrowthController> {
        let removed = self.blocks.remove(&entity)?;
        self.order.retain(|e| *e != entity);
        Some(removed)
    }

    pub fn get(&self, entity: Entity) -> Option<&GrowthController> {
        self.blocks.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut GrowthController> {
        self.blocks.get_mut(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.blocks.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Controllers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GrowthController> {
        self.order.iter().filter_map(|e| self.blocks.get(e))
    }

    /// Forward `from`'s commands to `to`. The target does not have to be
    /// registered yet.
    pub fn link(&mut self, from: Entity, to: Entity) -> Result<()> {
        let block = self
            .blocks
            .get_mut(&from)
            .ok_or_else(|| Error::NotFound(format!("block {from:?}")))?;
        block.link(to);
        Ok(())
    }

    /// Start a tick: clears every block's grew-this-tick flag.
    pub fn begin_tick(&mut self) {
        for block in self.blocks.values_mut() {
            block.begin_tick();
        }
    }

    /// Step every block's trajectory. Returns how many are still moving.
    pub fn advance(&mut self, dt: f32, env: &mut impl BlockEnvironment) -> usize {
        let mut moving = 0;
        for entity in &self.order {
            if let Some(block) = self.blocks.get_mut(entity) {
                if block.advance(dt, env) == Motion::Moving {
                    moving += 1;
                }
            }
        }
        moving
    }

    /// Grow a block, after first growing everything it links to.
    ///
    /// Links grow even if this block then vetoes its own growth. A block that
    /// cannot act or is collision-held ignores the command and does not
    /// forward it.
    pub fn grow(&mut self, entity: Entity, env: &impl BlockEnvironment) -> Propagation {
        let mut visited = HashSet::new();
        let mut report = Propagation::default();
        self.grow_linked(entity, env, &mut visited, &mut report);
        debug!(
            ?entity,
            visited = report.visited.len(),
            committed = report.committed.len(),
            vetoed = report.vetoed.len(),
            "grow propagated"
        );
        report
    }

    /// Shrink everything a block links to, then the block itself.
    ///
    /// Links are always shrunk, even when this block cannot act.
    pub fn shrink(&mut self, entity: Entity) -> Propagation {
        let mut visited = HashSet::new();
        let mut report = Propagation::default();
        self.shrink_linked(entity, &mut visited, &mut report);
        debug!(
            ?entity,
            visited = report.visited.len(),
            committed = report.committed.len(),
            "shrink propagated"
        );
        report
    }

    /// Grow once, then send this block's target straight to its maximum.
    pub fn grow_completely(&mut self, entity: Entity, env: &impl BlockEnvironment) -> Propagation {
        let report = self.grow(entity, env);
        if let Some(block) = self.blocks.get_mut(&entity) {
            block.target_max();
        }
        report
    }

    /// Shrink once, then send this block's target straight to its minimum.
    pub fn shrink_completely(&mut self, entity: Entity) -> Propagation {
        let report = self.shrink(entity);
        if let Some(block) = self.blocks.get_mut(&entity) {
            block.target_min();
        }
        report
    }

    /// Overwrite a block's target. Not forwarded to links.
    pub fn set_desired_size(&mut self, entity: Entity, size: i32) {
        if let Some(block) = self.blocks.get_mut(&entity) {
            block.set_desired_size(size);
        }
    }

    pub fn set_extrudable(&mut self, entity: Entity, extrudable: bool) {
        if let Some(block) = self.blocks.get_mut(&entity) {
            block.set_extrudable(extrudable);
        }
    }

    /// Route a trigger contact to the block that owns the trigger.
    pub fn handle_contact(&mut self, event: &ContactEvent, env: &mut impl BlockEnvironment) {
        let Some(block) = self.blocks.get_mut(&event.trigger) else {
            return;
        };
        match event.kind {
            ContactKind::Enter => block.on_collision_enter(event.other, env),
            ContactKind::Exit => block.on_collision_exit(event.other, &*env),
        }
    }

    fn grow_linked(
        &mut self,
        entity: Entity,
        env: &impl BlockEnvironment,
        visited: &mut HashSet<Entity>,
        report: &mut Propagation,
    ) {
        if !visited.insert(entity) {
            trace!(?entity, "already grown this command");
            return;
        }
        let Some(block) = self.blocks.get(&entity) else {
            trace!(?entity, "linked block missing, skipped");
            return;
        };
        if !block.accepts_grow() {
            return;
        }

        report.visited.push(entity);
        let links = block.links().to_vec();
        for link in links {
            self.grow_linked(link, env, visited, report);
        }

        if let Some(block) = self.blocks.get_mut(&entity) {
            match block.commit_grow(env) {
                GrowOutcome::Committed => report.committed.push(entity),
                GrowOutcome::Vetoed(veto) => report.vetoed.push((entity, veto)),
            }
        }
    }

    fn shrink_linked(
        &mut self,
        entity: Entity,
        visited: &mut HashSet<Entity>,
        report: &mut Propagation,
    ) {
        if !visited.insert(entity) {
            return;
        }
        let Some(block) = self.blocks.get(&entity) else {
            trace!(?entity, "linked block missing, skipped");
            return;
        };

        report.visited.push(entity);
        let links = block.links().to_vec();
        for link in links {
            self.shrink_linked(link, visited, report);
        }

        if let Some(block) = self.blocks.get_mut(&entity) {
            if block.commit_shrink() {
                report.committed.push(entity);
            }
        }
    }
}

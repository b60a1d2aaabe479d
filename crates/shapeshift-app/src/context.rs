//! Simulation context.

use shapeshift_audio::LoopingCue;
use shapeshift_core::{Error, Result};
use shapeshift_entity::{find_by_name, Entity, World};
use shapeshift_growth::{
    BlockConfig, GrowthController, GrowthSystem, Propagation, SceneEnvironment,
};
use shapeshift_physics::{ContactEvent, Trigger, TriggerTracker};
use tracing::{debug, trace};

/// Name of the looping cue attached to every block.
pub const GRINDING_CUE: &str = "grinding";

/// What one simulated tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Blocks whose scale changed this tick.
    pub moving: usize,
    /// Contact changes dispatched to blocks, in dispatch order.
    pub contacts: Vec<ContactEvent>,
}

/// Everything a running simulation owns.
#[derive(Default)]
pub struct SimContext {
    pub world: World,
    pub growth: GrowthSystem,
    pub triggers: TriggerTracker,
    /// Entity the growth gate protects, if any.
    pub actor: Option<Entity>,
    /// Total ticks simulated.
    pub frame_count: u64,
    /// Total simulated seconds.
    pub elapsed: f32,
}

impl std::fmt::Debug for SimContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("entities", &self.world.len())
            .field("blocks", &self.growth.len())
            .field("actor", &self.actor)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl SimContext {
    pub fn new(world: World) -> Self {
        Self {
            world,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: Option<Entity>) -> Self {
        self.actor = actor;
        self
    }

    /// Track the entity with the given name. Clears tracking if none exists.
    pub fn track_actor_named(&mut self, name: &str) -> Option<Entity> {
        self.actor = find_by_name(&self.world, name);
        debug!(name, actor = ?self.actor, "tracking actor");
        self.actor
    }

    /// Borrow the world as a block environment.
    pub fn env(&mut self) -> SceneEnvironment<'_> {
        SceneEnvironment::new(&mut self.world, self.actor)
    }

    /// Turn an existing entity into a growing block.
    ///
    /// The entity gets a [`Trigger`] so it receives contacts, and its
    /// controller gets a looping grinding cue.
    pub fn add_block(&mut self, entity: Entity, config: BlockConfig) -> Result<Entity> {
        let controller = GrowthController::new(entity, config, &self.env())?
            .with_cue(Box::new(LoopingCue::new(GRINDING_CUE)));
        self.world
            .insert_one(entity, Trigger)
            .map_err(|_| Error::NotFound(format!("block {entity:?}")))?;
        Ok(self.growth.insert(controller))
    }

    pub fn link(&mut self, from: Entity, to: Entity) -> Result<()> {
        self.growth.link(from, to)
    }

    pub fn grow(&mut self, entity: Entity) -> Propagation {
        let env = SceneEnvironment::new(&mut self.world, self.actor);
        self.growth.grow(entity, &env)
    }

    pub fn shrink(&mut self, entity: Entity) -> Propagation {
        self.growth.shrink(entity)
    }

    pub fn grow_completely(&mut self, entity: Entity) -> Propagation {
        let env = SceneEnvironment::new(&mut self.world, self.actor);
        self.growth.grow_completely(entity, &env)
    }

    pub fn shrink_completely(&mut self, entity: Entity) -> Propagation {
        self.growth.shrink_completely(entity)
    }

    pub fn set_desired_size(&mut self, entity: Entity, size: i32) {
        self.growth.set_desired_size(entity, size);
    }

    pub fn set_extrudable(&mut self, entity: Entity, extrudable: bool) {
        self.growth.set_extrudable(entity, extrudable);
    }

    /// Clear per-tick flags. Commands for the tick come after this.
    pub fn begin_tick(&mut self) {
        self.growth.begin_tick();
    }

    /// Move every block, then dispatch the contacts that movement caused.
    pub fn simulate(&mut self, dt: f32) -> TickSummary {
        let mut env = SceneEnvironment::new(&mut self.world, self.actor);
        let moving = self.growth.advance(dt, &mut env);

        let contacts = self.triggers.update(env.world());
        for event in &contacts {
            trace!(?event, "dispatching contact");
            self.growth.handle_contact(event, &mut env);
        }

        self.frame_count += 1;
        self.elapsed += dt;
        TickSummary { moving, contacts }
    }

    /// Run a full tick with no commands.
    pub fn step(&mut self, dt: f32) -> TickSummary {
        self.begin_tick();
        self.simulate(dt)
    }
}

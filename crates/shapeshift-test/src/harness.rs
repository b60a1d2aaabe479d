//! Scenario building and stepping.

use glam::Vec3;
use hashbrown::HashMap;
use shapeshift_app::{SimContext, TickSummary};
use shapeshift_core::{Cardinal, EulerAngles};
use shapeshift_entity::{ActorMessage, Collider, Entity, Mailbox, Name, Tag, Transform};
use shapeshift_growth::{BlockConfig, GrowthController, Propagation};
use tracing::debug;

use crate::{HarnessConfig, Result, TestError};

/// Name given to the actor spawned by [`Scenario::actor`].
pub const ACTOR_NAME: &str = "player";

/// Actor collider: a standing capsule approximated by a box.
const ACTOR_SIZE: Vec3 = Vec3::new(0.6, 1.8, 0.6);

/// Horizontal extent of floors and ceilings.
const SLAB_EXTENT: f32 = 100.0;

/// How to place and configure one block.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    pub pivot: Vec3,
    pub rotation: EulerAngles,
    pub scale: f32,
    pub config: BlockConfig,
}

impl BlockSpec {
    /// Block standing on `pivot`, growing towards +Y.
    pub fn upright(pivot: Vec3, scale: f32) -> Self {
        Self {
            pivot,
            rotation: EulerAngles::IDENTITY,
            scale,
            config: BlockConfig::default(),
        }
    }

    /// Block hanging from `pivot`, growing towards -Y.
    pub fn hanging(pivot: Vec3, scale: f32) -> Self {
        Self {
            rotation: EulerAngles::new(0.0, 180.0, 180.0),
            ..Self::upright(pivot, scale)
        }
    }

    /// Block mounted on a wall at `pivot`, growing towards `facing`.
    pub fn lateral(pivot: Vec3, facing: Cardinal, scale: f32) -> Self {
        Self {
            rotation: EulerAngles::new(-90.0, facing.yaw(), 0.0),
            ..Self::upright(pivot, scale)
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: BlockConfig) -> Self {
        self.config = config;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Geometry {
    center: Vec3,
    size: Vec3,
    tag: Tag,
}

/// Builder for a level.
#[derive(Debug, Default)]
pub struct Scenario {
    config: HarnessConfig,
    geometry: Vec<Geometry>,
    actor: Option<Vec3>,
    blocks: Vec<(String, BlockSpec)>,
    links: Vec<(String, String)>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Solid slab whose top face is at `y`.
    #[must_use]
    pub fn floor(self, y: f32) -> Self {
        self.obstacle(
            Vec3::new(0.0, y - 0.5, 0.0),
            Vec3::new(SLAB_EXTENT, 1.0, SLAB_EXTENT),
        )
    }

    /// Solid slab whose bottom face is at `y`.
    #[must_use]
    pub fn ceiling(self, y: f32) -> Self {
        self.obstacle(
            Vec3::new(0.0, y + 0.5, 0.0),
            Vec3::new(SLAB_EXTENT, 1.0, SLAB_EXTENT),
        )
    }

    /// Any solid box.
    #[must_use]
    pub fn obstacle(self, center: Vec3, size: Vec3) -> Self {
        self.geometry(center, size, Tag::Obstacle)
    }

    /// A box that growth ignores entirely.
    #[must_use]
    pub fn terminal(self, center: Vec3, size: Vec3) -> Self {
        self.geometry(center, size, Tag::Terminal)
    }

    #[must_use]
    pub fn geometry(mut self, center: Vec3, size: Vec3, tag: Tag) -> Self {
        self.geometry.push(Geometry { center, size, tag });
        self
    }

    /// Actor whose feet rest at `feet`.
    #[must_use]
    pub fn actor(mut self, feet: Vec3) -> Self {
        self.actor = Some(feet + Vec3::Y * (ACTOR_SIZE.y * 0.5));
        self
    }

    #[must_use]
    pub fn block(mut self, name: impl Into<String>, spec: BlockSpec) -> Self {
        self.blocks.push((name.into(), spec));
        self
    }

    /// Forward commands from one named block to another.
    #[must_use]
    pub fn link(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.links.push((from.into(), to.into()));
        self
    }

    /// Spawn everything and register the blocks.
    pub fn build(self) -> Result<Harness> {
        let mut ctx = SimContext::default();

        for geometry in &self.geometry {
            ctx.world.spawn((
                Transform::from_position(geometry.center),
                Collider::centered(geometry.size),
                geometry.tag,
            ));
        }

        if let Some(position) = self.actor {
            ctx.world.spawn((
                Name::new(ACTOR_NAME),
                Transform::from_position(position),
                Collider::centered(ACTOR_SIZE),
                Tag::Actor,
                Mailbox::default(),
            ));
            ctx.track_actor_named(ACTOR_NAME);
        }

        let mut blocks = HashMap::with_capacity(self.blocks.len());
        for (name, spec) in self.blocks {
            let entity = ctx.world.spawn((
                Name::new(name.clone()),
                Transform::from_position(spec.pivot)
                    .with_rotation(spec.rotation)
                    .with_scale(Vec3::new(1.0, spec.scale, 1.0)),
                Collider::BLOCK,
                Tag::Block,
            ));
            ctx.add_block(entity, spec.config)?;
            blocks.insert(name, entity);
        }

        for (from, to) in &self.links {
            let from = lookup(&blocks, from)?;
            let to = lookup(&blocks, to)?;
            ctx.link(from, to)?;
        }

        debug!(
            blocks = blocks.len(),
            geometry = self.geometry.len(),
            actor = self.actor.is_some(),
            "scenario built"
        );

        // Prime contact tracking so pre-existing overlaps are not reported as new
        ctx.triggers.update(&ctx.world);

        Ok(Harness {
            ctx,
            blocks,
            config: self.config,
        })
    }
}

fn lookup(blocks: &HashMap<String, Entity>, name: &str) -> Result<Entity> {
    blocks
        .get(name)
        .copied()
        .ok_or_else(|| TestError::UnknownBlock(name.to_string()))
}

/// A built scenario that can be commanded and stepped.
#[derive(Debug)]
pub struct Harness {
    ctx: SimContext,
    blocks: HashMap<String, Entity>,
    config: HarnessConfig,
}

impl Harness {
    pub const fn ctx(&self) -> &SimContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    pub fn entity(&self, name: &str) -> Result<Entity> {
        lookup(&self.blocks, name)
    }

    pub fn controller(&self, name: &str) -> Result<&GrowthController> {
        let entity = self.entity(name)?;
        self.ctx
            .growth
            .get(entity)
            .ok_or_else(|| TestError::UnknownBlock(name.to_string()))
    }

    pub fn scale(&self, name: &str) -> Result<f32> {
        Ok(self.controller(name)?.current_scale())
    }

    pub fn desired(&self, name: &str) -> Result<f32> {
        Ok(self.controller(name)?.desired_scale())
    }

    pub fn is_held(&self, name: &str) -> Result<bool> {
        Ok(self.controller(name)?.is_collision_held())
    }

    pub fn actor(&self) -> Result<Entity> {
        self.ctx.actor.ok_or(TestError::NoActor)
    }

    pub fn actor_position(&self) -> Result<Vec3> {
        let actor = self.actor()?;
        self.ctx
            .world
            .get::<&Transform>(actor)
            .map(|t| t.position)
            .map_err(|_| TestError::NoActor)
    }

    /// Teleport the actor so its feet rest at `feet`.
    pub fn place_actor(&mut self, feet: Vec3) -> Result<()> {
        let actor = self.actor()?;
        let mut transform = self
            .ctx
            .world
            .get::<&mut Transform>(actor)
            .map_err(|_| TestError::NoActor)?;
        transform.position = feet + Vec3::Y * (ACTOR_SIZE.y * 0.5);
        Ok(())
    }

    /// Messages the blocks sent to the actor since the last call.
    pub fn take_actor_messages(&mut self) -> Result<Vec<ActorMessage>> {
        let actor = self.actor()?;
        let mut mailbox = self
            .ctx
            .world
            .get::<&mut Mailbox>(actor)
            .map_err(|_| TestError::NoActor)?;
        let messages = mailbox.drain().collect();
        Ok(messages)
    }

    /// Start a tick. Commands issued before the next [`simulate`](Self::simulate)
    /// count as this tick's commands.
    pub fn begin_tick(&mut self) {
        self.ctx.begin_tick();
    }

    pub fn simulate(&mut self) -> TickSummary {
        self.ctx.simulate(self.config.dt)
    }

    /// One full tick with no commands.
    pub fn step(&mut self) -> TickSummary {
        self.ctx.step(self.config.dt)
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Step until no block moves. Returns the ticks taken.
    pub fn settle(&mut self) -> Result<usize> {
        for tick in 1..=self.config.settle_ticks {
            if self.step().moving == 0 {
                return Ok(tick);
            }
        }
        Err(TestError::NotSettled(self.config.settle_ticks))
    }

    /// Begin a tick and issue a grow on the named block.
    pub fn grow(&mut self, name: &str) -> Result<Propagation> {
        let entity = self.entity(name)?;
        self.begin_tick();
        Ok(self.ctx.grow(entity))
    }

    pub fn shrink(&mut self, name: &str) -> Result<Propagation> {
        let entity = self.entity(name)?;
        self.begin_tick();
        Ok(self.ctx.shrink(entity))
    }

    pub fn grow_completely(&mut self, name: &str) -> Result<Propagation> {
        let entity = self.entity(name)?;
        self.begin_tick();
        Ok(self.ctx.grow_completely(entity))
    }

    pub fn shrink_completely(&mut self, name: &str) -> Result<Propagation> {
        let entity = self.entity(name)?;
        self.begin_tick();
        Ok(self.ctx.shrink_completely(entity))
    }

    pub fn set_desired_size(&mut self, name: &str, size: i32) -> Result<()> {
        let entity = self.entity(name)?;
        self.ctx.set_desired_size(entity, size);
        Ok(())
    }

    pub fn set_extrudable(&mut self, name: &str, extrudable: bool) -> Result<()> {
        let entity = self.entity(name)?;
        self.ctx.set_extrudable(entity, extrudable);
        Ok(())
    }
}

//! Per-block growth state machine.

use glam::Vec3;
use shapeshift_audio::AudioCue;
use shapeshift_core::{approx_eq, move_towards, Aabb, Error, Ray, Result};
use shapeshift_entity::{ActorMessage, Entity, Tag};
use tracing::{debug, trace};

use crate::axis::GrowthAxis;
use crate::block::{BlockConfig, BlockState};
use crate::environment::BlockEnvironment;

/// Result of one [`GrowthController::advance`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// The scale changed and has not reached a size limit.
    Moving,
    /// Held, already on target, or pinned at a size limit.
    Stopped,
}

/// Why a grow was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Veto {
    /// A down-growing block would crush the actor against the floor.
    Floor,
    /// An up-growing block would crush the actor against a ceiling.
    Ceiling,
}

/// What the local half of a grow did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowOutcome {
    /// The target moved to the next cell boundary.
    Committed,
    Vetoed(Veto),
}

/// Growth controller for a single block entity.
///
/// Owns the block's state exclusively. Links to other blocks are plain
/// entity handles; [`GrowthSystem`](crate::GrowthSystem) resolves them.
pub struct GrowthController {
    entity: Entity,
    config: BlockConfig,
    axis: GrowthAxis,
    state: BlockState,
    links: Vec<Entity>,
    cue: Option<Box<dyn AudioCue>>,
}

impl std::fmt::Debug for GrowthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowthController")
            .field("entity", &self.entity)
            .field("axis", &self.axis)
            .field("state", &self.state)
            .field("links", &self.links)
            .field("cue", &self.cue.is_some())
            .finish_non_exhaustive()
    }
}

impl GrowthController {
    /// Create a controller for `entity`, reading its rotation and scale.
    ///
    /// Fails if the configuration is invalid, the entity has no transform,
    /// or a lateral block is not facing a cardinal direction.
    pub fn new(entity: Entity, config: BlockConfig, env: &impl BlockEnvironment) -> Result<Self> {
        config.validate()?;
        let transform = env
            .transform(entity)
            .ok_or_else(|| Error::NotFound(format!("transform for block {entity:?}")))?;
        let axis = GrowthAxis::classify(transform.rotation)?;

        debug!(?entity, ?axis, scale = transform.scale.y, "block initialized");

        Ok(Self {
            entity,
            config,
            axis,
            state: BlockState::from_scale(transform.scale.y),
            links: Vec::new(),
            cue: None,
        })
    }

    /// Attach the looping cue played while the block moves.
    #[must_use]
    pub fn with_cue(mut self, cue: Box<dyn AudioCue>) -> Self {
        self.cue = Some(cue);
        self
    }

    /// Forward this block's grow and shrink commands to `other`.
    pub fn link(&mut self, other: Entity) {
        if other != self.entity && !self.links.contains(&other) {
            self.links.push(other);
        }
    }

    pub fn links(&self) -> &[Entity] {
        &self.links
    }

    pub const fn entity(&self) -> Entity {
        self.entity
    }

    pub const fn axis(&self) -> GrowthAxis {
        self.axis
    }

    pub const fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub const fn state(&self) -> &BlockState {
        &self.state
    }

    pub const fn current_scale(&self) -> f32 {
        self.state.current_scale
    }

    pub const fn desired_scale(&self) -> f32 {
        self.state.desired_scale
    }

    pub const fn is_collision_held(&self) -> bool {
        self.state.collision_held
    }

    pub const fn grew_this_tick(&self) -> bool {
        self.state.grew_this_tick
    }

    pub const fn is_extrudable(&self) -> bool {
        self.config.extrudable
    }

    pub fn cue(&self) -> Option<&dyn AudioCue> {
        self.cue.as_deref()
    }

    /// Whether the cue is currently playing. False without a cue.
    pub fn is_grinding(&self) -> bool {
        self.cue.as_ref().is_some_and(|cue| cue.is_playing())
    }

    /// Either extrudable on its own or driven by a linked peer.
    #[inline]
    pub const fn can_act(&self) -> bool {
        self.config.extrudable || self.config.linked
    }

    /// Whether a grow command is accepted at all (before any veto).
    #[inline]
    pub const fn accepts_grow(&self) -> bool {
        self.can_act() && !self.state.collision_held
    }

    pub fn set_extrudable(&mut self, extrudable: bool) {
        self.config.extrudable = extrudable;
    }

    /// Overwrite the target directly, with no checks.
    pub fn set_desired_size(&mut self, size: i32) {
        self.state.desired_scale = size as f32;
    }

    /// Force the target to the largest size.
    pub fn target_max(&mut self) {
        self.state.desired_scale = self.config.max_size;
    }

    /// Force the target to the smallest size.
    pub fn target_min(&mut self) {
        self.state.desired_scale = self.config.min_size;
    }

    /// Clear per-tick flags. Call once at the start of every tick.
    pub fn begin_tick(&mut self) {
        self.state.grew_this_tick = false;
    }

    /// Move the current scale towards the target by at most one tick's step.
    ///
    /// A scale within rounding noise of the target snaps onto it exactly.
    #[allow(clippy::float_cmp)] // snapping needs an exact comparison
    pub fn advance(&mut self, dt: f32, env: &mut impl BlockEnvironment) -> Motion {
        let target = self.config.clamp(self.state.desired_scale);
        let free = !self.state.collision_held && self.can_act();
        let moving = free && !approx_eq(target, self.state.current_scale);

        if free && !moving && self.state.current_scale != target {
            trace!(entity = ?self.entity, from = self.state.current_scale, to = target, "block snapped");
            self.state.current_scale = target;
            env.write_scale(self.entity, target);
        }

        if moving {
            let mut next = self.config.clamp(move_towards(
                self.state.current_scale,
                target,
                dt * self.config.growth_rate,
            ));
            if approx_eq(next, target) {
                next = target;
            }
            trace!(entity = ?self.entity, from = self.state.current_scale, to = next, "block moved");
            self.state.current_scale = next;
            env.write_scale(self.entity, next);
        } else {
            self.stop_cue();
        }

        let at_limit = approx_eq(self.state.current_scale, self.config.min_size)
            || approx_eq(self.state.current_scale, self.config.max_size);
        if at_limit {
            self.stop_cue();
        }

        if moving && !at_limit {
            Motion::Moving
        } else {
            Motion::Stopped
        }
    }

    /// Local half of a grow: run the safety gate, then step the target up to
    /// the next whole cell.
    ///
    /// Does not check [`accepts_grow`](Self::accepts_grow); the system does
    /// that before fanning out to links.
    pub fn commit_grow(&mut self, env: &impl BlockEnvironment) -> GrowOutcome {
        if let Some(veto) = self.check_veto(env) {
            debug!(entity = ?self.entity, ?veto, "grow vetoed");
            return GrowOutcome::Vetoed(veto);
        }

        self.state.grew_this_tick = true;
        let next = (self.state.current_scale + self.config.tuning.step_epsilon).ceil();
        self.state.desired_scale = self.config.clamp(next);
        self.start_cue();
        trace!(entity = ?self.entity, target = self.state.desired_scale, "grow committed");
        GrowOutcome::Committed
    }

    /// Local half of a shrink: release any hold and step the target down to
    /// the previous whole cell. Returns false when the block cannot act.
    pub fn commit_shrink(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }

        self.state.collision_held = false;
        let next = (self.state.current_scale - self.config.tuning.step_epsilon).floor();
        self.state.desired_scale = self.config.clamp(next);
        self.start_cue();
        trace!(entity = ?self.entity, target = self.state.desired_scale, "shrink committed");
        true
    }

    /// Safety gate for growth. `None` means growing is safe.
    ///
    /// Skips any check whose inputs are missing (no actor, no collider).
    pub fn check_veto(&self, env: &impl BlockEnvironment) -> Option<Veto> {
        if !self.axis.grows_up() && !self.axis.grows_down() {
            return None;
        }

        let Some(actor) = env.tracked_actor() else {
            trace!(entity = ?self.entity, "no tracked actor, growth unchecked");
            return None;
        };
        let actor_pos = env.position(actor)?;
        let bounds = env.bounds(self.entity)?;
        let tuning = &self.config.tuning;

        match self.axis {
            GrowthAxis::Down => {
                let pivot = env.position(self.entity)?;
                let gap = pivot.y - bounds.size().y - actor_pos.y;
                (gap <= tuning.floor_clearance && actor_within_footprint(&bounds, actor_pos))
                    .then_some(Veto::Floor)
            }
            GrowthAxis::Up => {
                let ray = Ray::new(bounds.center(), Vec3::Y);
                let hit = env.raycast(&ray, f32::INFINITY, &[self.entity, actor])?;
                if hit.tag == Tag::Terminal {
                    return None;
                }
                let obstacle = env.position(hit.entity)?;
                let gap = obstacle.y - actor_pos.y;
                (gap <= tuning.ceiling_clearance && actor_within_footprint(&bounds, actor_pos))
                    .then_some(Veto::Ceiling)
            }
            GrowthAxis::Lateral(_) => None,
        }
    }

    /// Whether pushing the actor back would shove it out of the level.
    ///
    /// Casts from the block's growing face outward along its facing; any
    /// hit within the push clearance means there is no room. Blocks that
    /// never push report false.
    pub fn would_push_actor_out_of_bounds(&self, env: &impl BlockEnvironment) -> bool {
        let Some(facing) = self.axis.facing() else {
            return false;
        };
        let (Some(bounds), Some(pivot)) = (env.bounds(self.entity), env.position(self.entity))
        else {
            return false;
        };

        let axis = facing.axis_index();
        let mut origin = bounds.center();
        origin[axis] = 2.0f32.mul_add(bounds.center()[axis], -pivot[axis]);

        let mut exclude = vec![self.entity];
        exclude.extend(env.tracked_actor());

        let ray = Ray::new(origin, facing.outward());
        env.raycast(&ray, self.config.tuning.push_clearance, &exclude)
            .is_some()
    }

    /// React to another collider entering this block.
    pub fn on_collision_enter(&mut self, other: Entity, env: &mut impl BlockEnvironment) {
        if env.tag(other) == Tag::Terminal {
            return;
        }

        if env.tracked_actor() == Some(other)
            && !self.axis.grows_up()
            && self.resolve_actor_contact(other, env)
        {
            return;
        }

        if self.state.grew_this_tick && !self.state.collision_held {
            debug!(entity = ?self.entity, ?other, "collision hold set");
            self.state.collision_held = true;
        }
    }

    /// React to a collider leaving this block.
    pub fn on_collision_exit(&mut self, other: Entity, env: &impl BlockEnvironment) {
        if env.tag(other) == Tag::Terminal {
            return;
        }

        let releases = if env.tracked_actor() == Some(other) {
            !self.would_push_actor_out_of_bounds(&*env)
        } else {
            true
        };

        if releases && self.state.collision_held {
            debug!(entity = ?self.entity, ?other, "collision hold cleared");
            self.state.collision_held = false;
        }
    }

    /// Push the actor out of the way, or retract if there is no room.
    ///
    /// Returns true when the actor had room and was handled by the push.
    fn resolve_actor_contact(&mut self, actor: Entity, env: &mut impl BlockEnvironment) -> bool {
        let tuning = self.config.tuning;

        if !self.would_push_actor_out_of_bounds(&*env) {
            if let (Some(facing), Some(position)) = (self.axis.facing(), env.position(actor)) {
                let pushed = position + facing.outward() * tuning.push_distance;
                debug!(entity = ?self.entity, ?facing, "actor pushed back");
                env.set_position(actor, pushed);
            }
            return true;
        }

        env.send_to_actor(actor, ActorMessage::ReduceSpeed);
        let retracted = self
            .config
            .clamp(self.state.desired_scale - tuning.retract_distance);
        debug!(entity = ?self.entity, scale = retracted, "no room to push actor, retracting");
        self.state.current_scale = retracted;
        env.write_scale(self.entity, retracted);
        false
    }

    fn start_cue(&mut self) {
        match self.cue.as_mut() {
            Some(cue) if !cue.is_playing() => cue.play(),
            Some(_) => {}
            None => trace!(entity = ?self.entity, "no cue configured"),
        }
    }

    fn stop_cue(&mut self) {
        if let Some(cue) = self.cue.as_mut() {
            if cue.is_playing() {
                cue.stop();
            }
        }
    }
}

/// Whether a point lies over or under the block, ignoring height.
#[inline]
pub(crate) fn actor_within_footprint(bounds: &Aabb, actor: Vec3) -> bool {
    bounds.contains_xz(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneEnvironment;
    use approx::assert_relative_eq;
    use shapeshift_audio::LoopingCue;
    use shapeshift_core::{Cardinal, EulerAngles, GrowthTuning};
    use shapeshift_entity::{Collider, Mailbox, Name, Transform, World};

    const LATERAL_NORTH: EulerAngles = EulerAngles::new(-90.0, 0.0, 0.0);
    const FLIPPED: EulerAngles = EulerAngles::new(0.0, 180.0, 180.0);

    fn spawn_block(world: &mut World, pivot: Vec3, rotation: EulerAngles, scale: f32) -> Entity {
        world.spawn((
            Transform::from_position(pivot)
                .with_rotation(rotation)
                .with_scale(Vec3::new(1.0, scale, 1.0)),
            Collider::BLOCK,
            Tag::Block,
        ))
    }

    fn spawn_actor(world: &mut World, position: Vec3) -> Entity {
        world.spawn((
            Name::new("player"),
            Transform::from_position(position),
            Collider::centered(Vec3::new(0.6, 1.8, 0.6)),
            Tag::Actor,
            Mailbox::default(),
        ))
    }

    fn spawn_box(world: &mut World, center: Vec3, size: Vec3, tag: Tag) -> Entity {
        world.spawn((Transform::from_position(center), Collider::centered(size), tag))
    }

    fn controller(env: &SceneEnvironment<'_>, block: Entity) -> GrowthController {
        GrowthController::new(block, BlockConfig::default(), env)
            .unwrap()
            .with_cue(Box::new(LoopingCue::new("grinding")))
    }

    #[test]
    fn grow_then_advance_reaches_next_cell() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 4.0);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
        assert_relative_eq!(ctrl.desired_scale(), 5.0);
        assert!(ctrl.is_grinding());

        ctrl.advance(1.0, &mut env);
        assert_relative_eq!(ctrl.current_scale(), 5.0);
        assert_relative_eq!(env.transform(block).unwrap().scale.y, 5.0);

        // On target: the cue is silenced
        assert_eq!(ctrl.advance(1.0, &mut env), Motion::Stopped);
        assert!(!ctrl.is_grinding());
    }

    #[test]
    fn advance_is_monotonic_without_overshoot() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 1.0);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);
        ctrl.set_desired_size(3);

        let mut previous = ctrl.current_scale();
        for _ in 0..10 {
            ctrl.advance(0.3, &mut env);
            let current = ctrl.current_scale();
            assert!(current >= previous);
            assert!(current - previous <= 0.3 + 1e-5);
            assert!(current <= 3.0);
            previous = current;
        }
        assert_relative_eq!(previous, 3.0);
    }

    #[test]
    fn target_outside_limits_is_clamped() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 9.5);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);
        ctrl.set_desired_size(40);

        ctrl.advance(5.0, &mut env);
        assert_relative_eq!(ctrl.current_scale(), 10.0);
        assert_eq!(ctrl.advance(1.0, &mut env), Motion::Stopped);
    }

    #[test]
    fn grow_from_whole_cell_moves_a_full_cell() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 5.0);
        let env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.commit_grow(&env);
        assert_relative_eq!(ctrl.desired_scale(), 6.0);
        assert!(ctrl.grew_this_tick());
        ctrl.begin_tick();
        assert!(!ctrl.grew_this_tick());
    }

    #[test]
    fn shrink_steps_down_and_stops_at_min() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 4.5);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        assert!(ctrl.commit_shrink());
        assert_relative_eq!(ctrl.desired_scale(), 4.0);

        ctrl.target_min();
        for _ in 0..10 {
            ctrl.advance(1.0, &mut env);
        }
        assert_relative_eq!(ctrl.current_scale(), 0.000_001);
        assert!(ctrl.commit_shrink());
        assert_relative_eq!(ctrl.desired_scale(), 0.000_001);
    }

    #[test]
    fn down_growth_vetoed_when_actor_below() {
        let mut world = World::new();
        // Pivot at 10, scale 3: lower face at 7
        let block = spawn_block(&mut world, Vec3::new(0.0, 10.0, 0.0), FLIPPED, 3.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.2, 4.0, -0.3));
        let mut env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);
        assert!(ctrl.axis().grows_down());

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Vetoed(Veto::Floor));
        assert_relative_eq!(ctrl.desired_scale(), 3.0);
        assert!(!ctrl.grew_this_tick());
        assert!(!ctrl.is_grinding());

        // Enough room below
        env.set_position(actor, Vec3::new(0.2, 3.0, -0.3));
        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
    }

    #[test]
    fn tuned_floor_clearance_moves_the_veto() {
        let mut world = World::new();
        // Lower face at 7, actor centre at 4: a gap of 3
        let block = spawn_block(&mut world, Vec3::new(0.0, 10.0, 0.0), FLIPPED, 3.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 4.0, 0.0));
        let env = SceneEnvironment::new(&mut world, Some(actor));

        let mut strict = controller(&env, block);
        assert_eq!(strict.check_veto(&env), Some(Veto::Floor));

        let tuning = GrowthTuning {
            floor_clearance: 2.5,
            ..GrowthTuning::default()
        };
        let config = BlockConfig::default().with_tuning(tuning);
        let mut relaxed = GrowthController::new(block, config, &env).unwrap();
        assert_eq!(relaxed.commit_grow(&env), GrowOutcome::Committed);
        assert_relative_eq!(relaxed.desired_scale(), 4.0);
        assert_eq!(strict.commit_grow(&env), GrowOutcome::Vetoed(Veto::Floor));
    }

    #[test]
    fn down_growth_allowed_when_actor_outside_footprint() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::new(0.0, 10.0, 0.0), FLIPPED, 3.0);
        let actor = spawn_actor(&mut world, Vec3::new(2.0, 4.0, 0.0));
        let env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
        assert_relative_eq!(ctrl.desired_scale(), 4.0);
    }

    #[test]
    fn up_growth_vetoed_under_low_ceiling() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 2.9, 0.0));
        let ceiling = spawn_box(
            &mut world,
            Vec3::new(0.0, 6.0, 0.0),
            Vec3::new(10.0, 1.0, 10.0),
            Tag::Obstacle,
        );
        let mut env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Vetoed(Veto::Ceiling));

        // Terminal geometry never blocks growth
        env.world_mut().insert_one(ceiling, Tag::Terminal).unwrap();
        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
    }

    #[test]
    fn up_growth_allowed_under_high_ceiling() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 2.9, 0.0));
        spawn_box(
            &mut world,
            Vec3::new(0.0, 7.0, 0.0),
            Vec3::new(10.0, 1.0, 10.0),
            Tag::Obstacle,
        );
        let env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
    }

    #[test]
    fn missing_actor_skips_the_gate() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::new(0.0, 10.0, 0.0), FLIPPED, 3.0);
        let env = SceneEnvironment::with_actor_named(&mut world, "player");
        let mut ctrl = GrowthController::new(block, BlockConfig::default(), &env).unwrap();

        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
        // No cue configured: nothing to play, nothing to fail
        assert!(!ctrl.is_grinding());
    }

    #[test]
    fn collision_during_growth_holds_trajectory() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let crate_box = spawn_box(&mut world, Vec3::new(0.0, 3.5, 0.0), Vec3::ONE, Tag::Obstacle);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.commit_grow(&env);
        ctrl.on_collision_enter(crate_box, &mut env);
        assert!(ctrl.is_collision_held());
        assert!(!ctrl.accepts_grow());

        assert_eq!(ctrl.advance(0.5, &mut env), Motion::Stopped);
        assert_relative_eq!(ctrl.current_scale(), 2.0);

        ctrl.on_collision_exit(crate_box, &env);
        assert!(!ctrl.is_collision_held());
        assert_eq!(ctrl.advance(0.5, &mut env), Motion::Moving);
        assert_relative_eq!(ctrl.current_scale(), 2.5);
    }

    #[test]
    fn collision_without_growth_does_not_hold() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let other = spawn_box(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, Tag::Block);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.on_collision_enter(other, &mut env);
        assert!(!ctrl.is_collision_held());
    }

    #[test]
    fn terminal_contacts_are_ignored() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let terminal = spawn_box(&mut world, Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, Tag::Terminal);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.commit_grow(&env);
        ctrl.on_collision_enter(terminal, &mut env);
        assert!(!ctrl.is_collision_held());
    }

    #[test]
    fn lateral_block_pushes_actor_back() {
        let mut world = World::new();
        // Grows towards -Z, growing face at z = -2
        let block = spawn_block(&mut world, Vec3::new(0.0, 1.0, 0.0), LATERAL_NORTH, 2.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 1.0, -2.3));
        let mut env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);
        assert_eq!(ctrl.axis(), GrowthAxis::Lateral(Cardinal::North));

        assert!(!ctrl.would_push_actor_out_of_bounds(&env));
        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
        ctrl.on_collision_enter(actor, &mut env);

        let pushed = env.position(actor).unwrap();
        assert_relative_eq!(pushed.z, -3.8);
        assert_relative_eq!(pushed.x, 0.0);
        assert_relative_eq!(ctrl.current_scale(), 2.0);
        // A successful push ends the contact: growth carries on
        assert!(!ctrl.is_collision_held());
        assert_eq!(ctrl.advance(0.5, &mut env), Motion::Moving);
        assert_relative_eq!(ctrl.current_scale(), 2.5);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn sixty_hertz_steps_land_exactly_on_target() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.commit_grow(&env);
        for _ in 0..240 {
            ctrl.advance(1.0 / 60.0, &mut env);
        }
        assert_eq!(ctrl.current_scale(), 3.0);
        assert_eq!(env.transform(block).unwrap().scale.y, 3.0);
        assert!(!ctrl.is_grinding());

        // The next cell starts from a whole value
        ctrl.commit_grow(&env);
        assert_eq!(ctrl.desired_scale(), 4.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn scale_near_target_snaps_without_a_step() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.999_999);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);
        ctrl.set_desired_size(3);

        assert_eq!(ctrl.advance(1.0 / 60.0, &mut env), Motion::Stopped);
        assert_eq!(ctrl.current_scale(), 3.0);
        assert_eq!(env.transform(block).unwrap().scale.y, 3.0);
    }

    #[test]
    fn lateral_block_retracts_when_actor_has_no_room() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::new(0.0, 1.0, 0.0), LATERAL_NORTH, 2.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 1.0, -2.3));
        // Wall face 1.5 in front of the growing face
        spawn_box(
            &mut world,
            Vec3::new(0.0, 1.0, -4.0),
            Vec3::new(6.0, 4.0, 1.0),
            Tag::Obstacle,
        );
        let mut env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);

        assert!(ctrl.would_push_actor_out_of_bounds(&env));
        assert_eq!(ctrl.commit_grow(&env), GrowOutcome::Committed);
        ctrl.on_collision_enter(actor, &mut env);

        assert_relative_eq!(ctrl.current_scale(), 2.5);
        assert_relative_eq!(env.transform(block).unwrap().scale.y, 2.5);
        assert_relative_eq!(env.position(actor).unwrap().z, -2.3);
        assert!(ctrl.is_collision_held());

        let messages: Vec<_> = env
            .world_mut()
            .get::<&mut Mailbox>(actor)
            .unwrap()
            .drain()
            .collect();
        assert_eq!(messages, vec![ActorMessage::ReduceSpeed]);

        // The actor leaving does not release the hold while boxed in
        ctrl.on_collision_exit(actor, &env);
        assert!(ctrl.is_collision_held());
    }

    #[test]
    fn upward_block_never_pushes_actor() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let actor = spawn_actor(&mut world, Vec3::new(0.0, 2.5, 0.0));
        let mut env = SceneEnvironment::new(&mut world, Some(actor));
        let mut ctrl = controller(&env, block);

        ctrl.commit_grow(&env);
        ctrl.on_collision_enter(actor, &mut env);
        assert_relative_eq!(env.position(actor).unwrap().y, 2.5);
        assert!(ctrl.is_collision_held());

        ctrl.on_collision_exit(actor, &env);
        assert!(!ctrl.is_collision_held());
    }

    #[test]
    fn blocks_that_cannot_act_stay_put() {
        let mut world = World::new();
        let block = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 2.0);
        let mut env = SceneEnvironment::new(&mut world, None);
        let mut ctrl = controller(&env, block);

        ctrl.set_extrudable(false);
        assert!(!ctrl.accepts_grow());
        assert!(!ctrl.commit_shrink());

        ctrl.set_desired_size(5);
        assert_relative_eq!(ctrl.desired_scale(), 5.0);
        assert_eq!(ctrl.advance(1.0, &mut env), Motion::Stopped);
        assert_relative_eq!(ctrl.current_scale(), 2.0);
    }

    #[test]
    fn construction_errors() {
        let mut world = World::new();
        let diagonal = spawn_block(
            &mut world,
            Vec3::ZERO,
            EulerAngles::new(-90.0, 45.0, 0.0),
            1.0,
        );
        let bare = world.spawn(());
        let upright = spawn_block(&mut world, Vec3::ZERO, EulerAngles::IDENTITY, 1.0);
        let env = SceneEnvironment::new(&mut world, None);

        assert!(matches!(
            GrowthController::new(diagonal, BlockConfig::default(), &env),
            Err(Error::UnsupportedOrientation { .. })
        ));
        assert!(matches!(
            GrowthController::new(bare, BlockConfig::default(), &env),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            GrowthController::new(
                upright,
                BlockConfig::default().with_size_range(2.0, 1.0),
                &env
            ),
            Err(Error::InvalidConfig(_))
        ));
    }
}

//! Sandbox application: spawns a level and plays its script.

use std::path::PathBuf;

use hashbrown::HashMap;
use shapeshift_app::{FrameContext, SimApp, SimContext, TickSummary};
use shapeshift_entity::{Entity, Mailbox};
use tracing::{debug, info, warn};

use crate::level::{Command, LevelDescription, ScriptStep};

/// Level used when no `--level` is given.
pub const DEMO_LEVEL: &str = include_str!("../levels/demo.toml");

/// Sandbox options (from CLI or defaults).
#[derive(Debug, Clone)]
pub struct SandboxParams {
    pub level: Option<PathBuf>,
    /// Log every block's size this often, in ticks. Zero disables it.
    pub report_every: u64,
}

impl Default for SandboxParams {
    fn default() -> Self {
        Self {
            level: None,
            report_every: 60,
        }
    }
}

impl SandboxParams {
    /// Parse sandbox parameters from command line arguments.
    pub fn from_args() -> Self {
        let mut params = Self::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--level" | "-l" => {
                    if i + 1 < args.len() {
                        params.level = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--report-every" => {
                    if i + 1 < args.len() {
                        if let Ok(v) = args[i + 1].parse() {
                            params.report_every = v;
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        params
    }
}

/// Runs a level's scripted commands against the growth system.
pub struct Sandbox {
    blocks: HashMap<String, Entity>,
    script: Vec<ScriptStep>,
    next_step: usize,
    report_every: u64,
    settled: bool,
}

impl Sandbox {
    /// Spawn `level` into `ctx` and queue its script.
    pub fn from_level(
        ctx: &mut SimContext,
        level: &LevelDescription,
        report_every: u64,
    ) -> anyhow::Result<Self> {
        let spawned = level.spawn(ctx)?;
        if spawned.actor.is_none() {
            warn!("level has no actor, growth gates are disabled");
        }

        let mut script = level.script.clone();
        script.sort_by_key(|step| step.tick);

        info!(
            title = %level.title,
            blocks = spawned.blocks.len(),
            steps = script.len(),
            "level loaded"
        );

        Ok(Self {
            blocks: spawned.blocks,
            script,
            next_step: 0,
            report_every,
            settled: false,
        })
    }

    /// Whether every scripted step has run.
    pub fn script_done(&self) -> bool {
        self.next_step >= self.script.len()
    }

    /// Run every step scheduled at or before `tick`.
    pub fn run_script(&mut self, ctx: &mut SimContext, tick: u64) {
        while let Some(step) = self.script.get(self.next_step) {
            if step.tick > tick {
                break;
            }
            self.next_step += 1;

            let Some(&entity) = self.blocks.get(&step.block) else {
                warn!(block = %step.block, "script targets unknown block");
                continue;
            };
            execute(ctx, entity, &step.block, step.command);
        }
    }

    fn report(&self, ctx: &SimContext, tick: u64) {
        let mut names: Vec<_> = self.blocks.keys().collect();
        names.sort();
        for name in names {
            if let Some(block) = self.blocks.get(name).and_then(|e| ctx.growth.get(*e)) {
                info!(
                    tick,
                    block = %name,
                    scale = block.current_scale(),
                    target = block.desired_scale(),
                    held = block.is_collision_held(),
                    "block"
                );
            }
        }
    }
}

fn execute(ctx: &mut SimContext, entity: Entity, name: &str, command: Command) {
    let report = match command {
        Command::Grow => ctx.grow(entity),
        Command::Shrink => ctx.shrink(entity),
        Command::GrowCompletely => ctx.grow_completely(entity),
        Command::ShrinkCompletely => ctx.shrink_completely(entity),
        Command::SetDesiredSize { size } => {
            ctx.set_desired_size(entity, size);
            info!(block = name, size, "desired size set");
            return;
        }
        Command::SetExtrudable { extrudable } => {
            ctx.set_extrudable(entity, extrudable);
            info!(block = name, extrudable, "extrudable set");
            return;
        }
    };

    info!(
        block = name,
        ?command,
        visited = report.visited.len(),
        committed = report.committed.len(),
        vetoed = report.vetoed.len(),
        "command"
    );
    for (blocked, veto) in &report.vetoed {
        info!(?blocked, ?veto, "growth vetoed");
    }
}

impl SimApp for Sandbox {
    fn init(ctx: &mut SimContext) -> anyhow::Result<Self> {
        let params = SandboxParams::from_args();
        let level = match &params.level {
            Some(path) => LevelDescription::load(path)?,
            None => LevelDescription::from_toml_str(DEMO_LEVEL)?,
        };
        Self::from_level(ctx, &level, params.report_every)
    }

    fn update(&mut self, ctx: &mut SimContext, frame: &FrameContext) -> anyhow::Result<()> {
        if let Some(actor) = ctx.actor {
            if let Ok(mut mailbox) = ctx.world.get::<&mut Mailbox>(actor) {
                for message in mailbox.drain() {
                    info!(frame = frame.frame_number, ?message, "actor message");
                }
            }
        }

        self.run_script(ctx, frame.frame_number);
        Ok(())
    }

    fn after_tick(&mut self, ctx: &SimContext, frame: &FrameContext, summary: &TickSummary) {
        for event in &summary.contacts {
            debug!(frame = frame.frame_number, ?event, "contact");
        }
        if self.report_every > 0 && frame.frame_number % self.report_every == 0 {
            self.report(ctx, frame.frame_number);
        }
        self.settled = summary.moving == 0;
    }

    fn is_finished(&self, _ctx: &SimContext) -> bool {
        self.script_done() && self.settled
    }

    fn cleanup(&mut self, ctx: &mut SimContext) {
        self.report(ctx, ctx.frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapeshift_entity::Transform;

    const DT: f32 = 1.0 / 60.0;

    fn run(ctx: &mut SimContext, app: &mut Sandbox, ticks: u64) {
        for tick in ctx.frame_count..ctx.frame_count + ticks {
            ctx.begin_tick();
            app.run_script(ctx, tick);
            ctx.simulate(DT);
        }
    }

    #[test]
    fn demo_level_plays_out() {
        let level = LevelDescription::from_toml_str(DEMO_LEVEL).unwrap();
        let mut ctx = SimContext::default();
        let mut app = Sandbox::from_level(&mut ctx, &level, 0).unwrap();
        run(&mut ctx, &mut app, 300);

        let block = |ctx: &SimContext, name: &str| {
            let controller = ctx.growth.get(app.blocks[name]).unwrap();
            (controller.current_scale(), controller.desired_scale())
        };

        // The piston shoved the player back and finished its cell
        let actor = ctx.actor.unwrap();
        let z = ctx.world.get::<&Transform>(actor).unwrap().position.z;
        assert_relative_eq!(z, -3.81, epsilon = 1e-5);
        assert_relative_eq!(block(&ctx, "piston").0, 3.0);

        // The crusher took one cell, then refused the second
        assert_relative_eq!(block(&ctx, "crusher").0, 4.0);
        assert_relative_eq!(block(&ctx, "crusher").1, 4.0);

        // The follower tracked its lever
        assert_relative_eq!(block(&ctx, "lift_b").0, 3.0);
        assert_relative_eq!(block(&ctx, "lift_a").1, 10.0);
        assert!(!app.script_done());
    }

    #[test]
    fn steps_run_in_tick_order() {
        let source = r#"
            [[blocks]]
            name = "a"
            pivot = [0.0, 0.0, 0.0]
            scale = 3.0

            [[script]]
            tick = 5
            block = "a"
            command = "shrink"

            [[script]]
            tick = 0
            block = "a"
            command = "grow"
        "#;
        let level = LevelDescription::from_toml_str(source).unwrap();
        let mut ctx = SimContext::default();
        let mut app = Sandbox::from_level(&mut ctx, &level, 0).unwrap();
        let a = app.blocks["a"];

        run(&mut ctx, &mut app, 1);
        assert_relative_eq!(ctx.growth.get(a).unwrap().desired_scale(), 4.0);

        run(&mut ctx, &mut app, 5);
        assert!(app.script_done());
        // Shrink from just above 3 steps back down to 3
        assert_relative_eq!(ctx.growth.get(a).unwrap().desired_scale(), 3.0);
    }
}

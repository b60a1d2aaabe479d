//! TOML level descriptions.

use std::fs;
use std::path::Path;

use glam::Vec3;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use shapeshift_app::SimContext;
use shapeshift_core::{Error, EulerAngles, Result};
use shapeshift_entity::{Collider, Entity, Mailbox, Name, Tag, Transform};
use shapeshift_growth::BlockConfig;
use tracing::debug;

/// Collider size of the actor.
const ACTOR_SIZE: Vec3 = Vec3::new(0.6, 1.8, 0.6);

fn default_title() -> String {
    "Untitled level".to_string()
}

fn default_actor_name() -> String {
    "player".to_string()
}

const fn default_scale() -> f32 {
    1.0
}

/// A whole level: geometry, actor, blocks and the command script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub actor: Option<ActorDescription>,
    #[serde(default)]
    pub geometry: Vec<GeometryDescription>,
    #[serde(default)]
    pub blocks: Vec<BlockDescription>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDescription {
    #[serde(default = "default_actor_name")]
    pub name: String,
    /// Where the actor's feet rest.
    pub feet: Vec3,
}

/// Static box in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub center: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub tag: Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescription {
    pub name: String,
    /// Base of the block, on the face opposite the growing one.
    pub pivot: Vec3,
    #[serde(default)]
    pub rotation: EulerAngles,
    /// Starting size along the growth axis.
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub config: BlockConfig,
    /// Blocks that receive this block's grow and shrink commands.
    #[serde(default)]
    pub links: Vec<String>,
}

/// A command sent to a block at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub tick: u64,
    pub block: String,
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Grow,
    Shrink,
    GrowCompletely,
    ShrinkCompletely,
    SetDesiredSize { size: i32 },
    SetExtrudable { extrudable: bool },
}

/// Entities spawned for a level.
#[derive(Debug, Default)]
pub struct SpawnedLevel {
    pub blocks: HashMap<String, Entity>,
    pub actor: Option<Entity>,
}

impl LevelDescription {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let level: Self = toml::from_str(source).map_err(|e| Error::Level(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| Error::Level(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Check that names are unique and every reference resolves.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !names.insert(block.name.as_str()) {
                return Err(Error::Level(format!("duplicate block name '{}'", block.name)));
            }
        }

        for block in &self.blocks {
            if let Some(missing) = block.links.iter().find(|l| !names.contains(l.as_str())) {
                return Err(Error::Level(format!(
                    "block '{}' links to unknown block '{missing}'",
                    block.name
                )));
            }
        }

        if let Some(step) = self.script.iter().find(|s| !names.contains(s.block.as_str())) {
            return Err(Error::Level(format!(
                "script step at tick {} targets unknown block '{}'",
                step.tick, step.block
            )));
        }

        Ok(())
    }

    /// Spawn the level into an empty context and register its blocks.
    pub fn spawn(&self, ctx: &mut SimContext) -> Result<SpawnedLevel> {
        let mut spawned = SpawnedLevel::default();

        for geometry in &self.geometry {
            ctx.world.spawn((
                Transform::from_position(geometry.center),
                Collider::centered(geometry.size),
                geometry.tag,
            ));
        }

        if let Some(actor) = &self.actor {
            ctx.world.spawn((
                Name::new(actor.name.clone()),
                Transform::from_position(actor.feet + Vec3::Y * (ACTOR_SIZE.y * 0.5)),
                Collider::centered(ACTOR_SIZE),
                Tag::Actor,
                Mailbox::default(),
            ));
            spawned.actor = ctx.track_actor_named(&actor.name);
        }

        for block in &self.blocks {
            let entity = ctx.world.spawn((
                Name::new(block.name.clone()),
                Transform::from_position(block.pivot)
                    .with_rotation(block.rotation)
                    .with_scale(Vec3::new(1.0, block.scale, 1.0)),
                Collider::BLOCK,
                Tag::Block,
            ));
            ctx.add_block(entity, block.config)
                .map_err(|e| Error::Level(format!("block '{}': {e}", block.name)))?;
            spawned.blocks.insert(block.name.clone(), entity);
        }

        for block in &self.blocks {
            let Some(&from) = spawned.blocks.get(&block.name) else {
                continue;
            };
            for link in &block.links {
                let to = spawned.blocks.get(link).copied().ok_or_else(|| {
                    Error::Level(format!("block '{}' links to unknown block '{link}'", block.name))
                })?;
                ctx.link(from, to)?;
            }
        }

        debug!(
            title = %self.title,
            blocks = spawned.blocks.len(),
            geometry = self.geometry.len(),
            "level spawned"
        );
        Ok(spawned)
    }
}

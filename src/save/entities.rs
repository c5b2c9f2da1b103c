//! Per-entity save payloads
//!
//! Each payload struct is the flat field mapping written into
//! `EntitySaveData::data`. Every field has a serde default, so a save written
//! by an older build (or edited by hand) still loads.

use super::saveable::{LoadContext, Saveable};
use super::types::{SaveData, SaveError, tags};
use crate::combat::Damageable;
use crate::entity::HasPosition;
use crate::experience_gem::ExperienceGem;
use crate::inventory::Inventory;
use crate::leveling::ExperienceTracker;
use crate::monster::Monster;
use crate::player::Player;
use crate::projectile::{AttackShape, Bullet};
use crate::stats::{MonsterStats, ProjectileStats};
use crate::weapon::Catalog;
use serde::{Deserialize, Serialize};

fn one_f32() -> f32 {
    1.0
}

fn one_i32() -> i32 {
    1
}

fn one_u32() -> u32 {
    1
}

fn default_monster_name() -> String {
    "green_slime".to_string()
}

fn default_monster_cooldown() -> f32 {
    1000.0
}

fn default_player_health() -> i32 {
    100
}

fn default_projectile_stats() -> ProjectileStats {
    ProjectileStats::base()
}

fn default_shape() -> AttackShape {
    AttackShape::Homing
}

fn default_weapons() -> Vec<OwnedItem> {
    vec![OwnedItem {
        name: Catalog::STARTING_WEAPON.to_string(),
        level: 1,
    }]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterData {
    #[serde(default = "default_monster_name")]
    pub name: String,
    #[serde(default = "one_f32")]
    pub pos_x: f32,
    #[serde(default = "one_f32")]
    pub pos_y: f32,
    #[serde(default = "one_f32")]
    pub speed: f32,
    /// Current health
    #[serde(default = "one_i32")]
    pub health: i32,
    /// Falls back to `health` when missing
    #[serde(default)]
    pub max_health: Option<i32>,
    #[serde(default = "one_i32")]
    pub damage: i32,
    #[serde(default = "default_monster_cooldown")]
    pub cooldown: f32,
    #[serde(default = "one_u32")]
    pub xp_drop: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletData {
    #[serde(default)]
    pub pos_x: f32,
    #[serde(default)]
    pub pos_y: f32,
    #[serde(default = "default_shape")]
    pub bullet_type: AttackShape,
    /// Effective stats frozen at fire time
    #[serde(default = "default_projectile_stats")]
    pub stats: ProjectileStats,
    #[serde(default = "one_i32")]
    pub pierce: i32,
    #[serde(default)]
    pub direction: Option<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemData {
    #[serde(default)]
    pub pos_x: f32,
    #[serde(default)]
    pub pos_y: f32,
    #[serde(default = "one_u32")]
    pub amount: u32,
}

/// An owned weapon or passive, rebuilt from the catalog on load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub name: String,
    #[serde(default = "one_u32")]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    /// Falls back to the configured size when missing
    #[serde(default)]
    pub max_size: Option<usize>,
    #[serde(default = "default_weapons")]
    pub weapons: Vec<OwnedItem>,
    #[serde(default)]
    pub passives: Vec<OwnedItem>,
}

impl Default for InventoryData {
    fn default() -> Self {
        InventoryData {
            max_size: None,
            weapons: default_weapons(),
            passives: Vec::new(),
        }
    }
}

impl From<&Inventory> for InventoryData {
    fn from(inventory: &Inventory) -> Self {
        InventoryData {
            max_size: Some(inventory.max_size()),
            weapons: inventory
                .weapons()
                .iter()
                .map(|weapon| OwnedItem {
                    name: weapon.name().to_string(),
                    level: weapon.level(),
                })
                .collect(),
            passives: inventory
                .passives()
                .iter()
                .map(|passive| OwnedItem {
                    name: passive.name().to_string(),
                    level: passive.level(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Missing coordinates put the player in the middle of the world
    #[serde(default)]
    pub pos_x: Option<f32>,
    #[serde(default)]
    pub pos_y: Option<f32>,
    #[serde(default = "default_player_health")]
    pub health: i32,
    #[serde(default = "one_u32")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub inventory: InventoryData,
}

impl Saveable for Monster {
    fn to_save_data(&self) -> Result<SaveData, SaveError> {
        let (pos_x, pos_y) = self.position();
        let stats = self.stats();
        SaveData::encode(
            tags::MONSTER,
            &MonsterData {
                name: self.name().to_string(),
                pos_x,
                pos_y,
                speed: stats.speed,
                health: self.health_points(),
                max_health: Some(stats.health),
                damage: stats.damage,
                cooldown: stats.attack_cooldown,
                xp_drop: stats.xp_drop,
            },
        )
    }

    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
        let monster: MonsterData = data.decode(tags::MONSTER)?;
        let max_health = monster.max_health.unwrap_or(monster.health).max(1);
        let stats = MonsterStats::new(monster.speed, max_health, monster.damage, monster.cooldown, monster.xp_drop);

        Ok(Monster::new(
            ctx.ids.allocate(),
            monster.name,
            monster.pos_x,
            monster.pos_y,
            stats,
            ctx.config.monster_sprite,
            ctx.clock,
        )
        .with_health(monster.health))
    }
}

impl Saveable for Bullet {
    fn to_save_data(&self) -> Result<SaveData, SaveError> {
        let (pos_x, pos_y) = self.position();
        SaveData::encode(
            tags::BULLET,
            &BulletData {
                pos_x,
                pos_y,
                bullet_type: self.shape(),
                stats: *self.stats(),
                pierce: self.pierce(),
                direction: self.direction(),
            },
        )
    }

    /// Orbit angle and area placement aren't saved; both restart
    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
        let bullet: BulletData = data.decode(tags::BULLET)?;
        let mut restored = Bullet::new(
            ctx.ids.allocate(),
            bullet.bullet_type,
            bullet.pos_x,
            bullet.pos_y,
            bullet.stats,
            ctx.clock,
            ctx.config,
            ctx.rng,
        )
        .with_pierce(bullet.pierce);
        if let Some(direction) = bullet.direction {
            restored = restored.with_direction(direction);
        }
        Ok(restored)
    }
}

impl Saveable for ExperienceGem {
    fn to_save_data(&self) -> Result<SaveData, SaveError> {
        let (pos_x, pos_y) = self.position();
        SaveData::encode(
            tags::EXPERIENCE_GEM,
            &GemData {
                pos_x,
                pos_y,
                amount: self.amount(),
            },
        )
    }

    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
        let gem: GemData = data.decode(tags::EXPERIENCE_GEM)?;
        Ok(ExperienceGem::new(ctx.ids.allocate(), gem.pos_x, gem.pos_y, gem.amount))
    }
}

impl Saveable for Inventory {
    fn to_save_data(&self) -> Result<SaveData, SaveError> {
        SaveData::encode(tags::INVENTORY, &InventoryData::from(self))
    }

    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
        let inventory: InventoryData = data.decode(tags::INVENTORY)?;
        Ok(rebuild_inventory(&inventory, ctx))
    }
}

/// Rebuilds owned items from the catalog
///
/// Items the catalog doesn't know, or that no longer fit, are skipped with a
/// warning rather than failing the whole load.
fn rebuild_inventory(data: &InventoryData, ctx: &LoadContext) -> Inventory {
    let mut inventory = Inventory::new(data.max_size.unwrap_or(ctx.config.inventory_max_size));

    for item in &data.weapons {
        let added = ctx
            .catalog
            .weapon_by_name(&item.name, item.level, ctx.clock)
            .and_then(|weapon| inventory.add_weapon(weapon));
        if let Err(e) = added {
            log::warn!("Skipping saved weapon '{}': {}", item.name, e);
        }
    }

    for item in &data.passives {
        let added = ctx
            .catalog
            .passive_by_name(&item.name, item.level)
            .and_then(|passive| inventory.add_passive(passive));
        if let Err(e) = added {
            log::warn!("Skipping saved passive '{}': {}", item.name, e);
        }
    }

    inventory
}

impl Saveable for Player {
    fn to_save_data(&self) -> Result<SaveData, SaveError> {
        let (pos_x, pos_y) = self.position();
        SaveData::encode(
            tags::PLAYER,
            &PlayerData {
                pos_x: Some(pos_x),
                pos_y: Some(pos_y),
                health: self.health_points(),
                level: self.level(),
                xp: self.experience().current_xp(),
                inventory: InventoryData::from(self.inventory()),
            },
        )
    }

    fn from_save_data(data: &SaveData, ctx: &mut LoadContext) -> Result<Self, SaveError> {
        let player: PlayerData = data.decode(tags::PLAYER)?;
        let world = ctx.config.world;
        let sprite = ctx.config.player_sprite;
        let x = player.pos_x.unwrap_or((world.width - sprite.width) / 2.0);
        let y = player.pos_y.unwrap_or((world.height - sprite.height) / 2.0);

        let inventory = rebuild_inventory(&player.inventory, ctx);
        let experience = ExperienceTracker::with_progress(player.level, player.xp);

        Ok(Player::new(ctx.ids.allocate(), x, y, inventory, sprite, ctx.clock)
            .with_progress(player.health, experience))
    }
}

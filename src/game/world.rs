// GameWorld struct and entity management
//
// This module contains the GameWorld struct which owns all game entities and world state.
// It runs the per-tick update order and provides methods for adding and removing
// entities, resetting the run, and converting the world to and from a save file.

use crate::clock::GameClock;
use crate::collision::Collidable;
use crate::combat::Damageable;
use crate::config::GameConfig;
use crate::entity::{EntityId, EntityIdAllocator, HasPosition};
use crate::experience_gem::ExperienceGem;
use crate::inventory::{Inventory, InventoryError, UpgradeAction};
use crate::monster::Monster;
use crate::player::Player;
use crate::projectile::{Bullet, BulletContext, BulletUpdate, FireContext};
use crate::save::{
    CURRENT_SAVE_VERSION, EntitySaveData, LoadContext, SaveData, SaveError, SaveFile, SaveMetadata, SaveType,
    Saveable, tags,
};
use crate::spawner::{MonsterSpawner, SpawnContext, SpawnSchedule};
use crate::stats::ProjectileStatsMultiplier;
use crate::weapon::Catalog;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::SystemTime;

use super::camera::Camera;
use super::collision_handler::CollisionHandler;
use super::death_handler::DeathHandler;
use super::types::{GameEvent, TickReport};

/// GameWorld encapsulates all game entities and world state
///
/// The world owns the clock, the id allocator and the random number generator,
/// and lends them to whatever needs them during a tick.
pub struct GameWorld {
    config: GameConfig,
    clock: GameClock,
    catalog: Catalog,
    ids: EntityIdAllocator,
    rng: StdRng,
    player: Player,
    monsters: Vec<Monster>,
    bullets: Vec<Bullet>,
    gems: Vec<ExperienceGem>,
    spawner: MonsterSpawner,
}

impl GameWorld {
    /// Create a fresh world with the player in the middle
    ///
    /// # Arguments
    /// * `config` - Sizes, fps and seed
    /// * `catalog` - Weapons and passives on offer
    /// * `schedule` - Monster rosters per minute
    pub fn new(config: GameConfig, catalog: Catalog, schedule: SpawnSchedule) -> Self {
        let clock = GameClock::new();
        let mut ids = EntityIdAllocator::new();
        let player = create_player(&config, &catalog, &clock, &mut ids);

        GameWorld {
            rng: StdRng::seed_from_u64(config.seed),
            spawner: MonsterSpawner::new(schedule, &clock),
            config,
            clock,
            catalog,
            ids,
            player,
            monsters: Vec::new(),
            bullets: Vec::new(),
            gems: Vec::new(),
        }
    }

    /// World with the built-in catalog and spawn schedule
    pub fn with_defaults(config: GameConfig) -> Self {
        Self::new(config, Catalog::create_default(), SpawnSchedule::create_default())
    }

    /// Advance the simulation by one tick
    ///
    /// Order: clock, player, monsters, bullets, spawner, collisions, deaths.
    /// Level-ups and player death come back as events in the report; the
    /// world itself keeps running until the caller stops ticking it.
    ///
    /// # Arguments
    /// * `direction` - Player movement per axis, each -1, 0 or 1
    pub fn tick(&mut self, direction: (i8, i8)) -> TickReport {
        self.clock.advance(self.config.tick_secs());

        let mut report = TickReport {
            bullets_fired: self.update_player(direction),
            ..TickReport::default()
        };
        self.update_monsters();
        let expired = self.update_bullets();
        report.monsters_spawned = self.update_spawner();
        for gem in self.gems.iter_mut() {
            gem.update();
        }

        let collisions = CollisionHandler::handle_collisions(
            &mut self.player,
            &mut self.monsters,
            &mut self.bullets,
            &mut self.gems,
            self.config.world,
        );
        let deaths = DeathHandler::check_deaths(
            &mut self.player,
            &mut self.monsters,
            &mut self.bullets,
            &mut self.gems,
            &mut self.ids,
            self.config.world,
        );

        report.gems_collected = collisions.gems_collected;
        report.xp_gained = collisions.xp_gained;
        report.monsters_killed = deaths.monsters_killed;
        report.bullets_removed = expired + deaths.bullets_removed;
        report
            .events
            .extend(collisions.levels.into_iter().map(|level| GameEvent::LevelUp { level }));
        if deaths.player_dead {
            report.events.push(GameEvent::PlayerDied);
        }

        report
    }

    /// Move the player and fire its weapons; returns how many bullets were fired
    fn update_player(&mut self, direction: (i8, i8)) -> usize {
        let mut fire = FireContext {
            origin: self.player.position(),
            multiplier: ProjectileStatsMultiplier::base(),
            clock: &self.clock,
            ids: &mut self.ids,
            rng: &mut self.rng,
            config: &self.config,
        };
        let fired = self.player.update(direction, &mut fire);
        let count = fired.len();
        self.bullets.extend(fired);
        count
    }

    /// Each monster chases the player, seeing every other monster as a neighbour
    fn update_monsters(&mut self) {
        let target = self.player.position();
        let dead_zone = self.config.monster_dead_zone;

        for index in 0..self.monsters.len() {
            let (before, rest) = self.monsters.split_at_mut(index);
            if let Some((monster, after)) = rest.split_first_mut() {
                monster.update(target, before.iter().chain(after.iter()), dead_zone);
            }
        }
    }

    /// Update every bullet, then drop the ones that expired
    ///
    /// Removal waits until the whole list has been updated.
    fn update_bullets(&mut self) -> usize {
        let targets: Vec<(f32, f32)> = self.monsters.iter().map(|monster| monster.position()).collect();
        let mut ctx = BulletContext {
            player_pos: self.player.position(),
            targets: &targets,
            camera: Camera::visible_bounds(&self.player.get_bounds(), &self.config),
            rng: &mut self.rng,
            config: &self.config,
        };

        let expired: Vec<EntityId> = self
            .bullets
            .iter_mut()
            .filter_map(|bullet| match bullet.update(&mut ctx) {
                BulletUpdate::Expired => Some(bullet.id()),
                BulletUpdate::Active => None,
            })
            .collect();

        if !expired.is_empty() {
            self.bullets.retain(|bullet| !expired.contains(&bullet.id()));
        }
        expired.len()
    }

    fn update_spawner(&mut self) -> usize {
        let mut ctx = SpawnContext {
            player_pos: self.player.position(),
            ids: &mut self.ids,
            rng: &mut self.rng,
            config: &self.config,
        };
        let spawned = self.spawner.update(&mut ctx);
        let count = spawned.len();
        self.monsters.extend(spawned);
        count
    }

    /// Hand out a fresh id for an entity built outside the world
    pub fn allocate_id(&mut self) -> EntityId {
        self.ids.allocate()
    }

    pub fn add_monster(&mut self, monster: Monster) {
        self.monsters.push(monster);
    }

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn add_experience_gem(&mut self, gem: ExperienceGem) {
        self.gems.push(gem);
    }

    /// Removes a monster and expires the player's cooldown entry for it
    pub fn remove_monster(&mut self, id: EntityId) -> Option<Monster> {
        let index = self.monsters.iter().position(|monster| monster.id() == id)?;
        self.player.forget_target(id);
        Some(self.monsters.remove(index))
    }

    pub fn remove_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let index = self.bullets.iter().position(|bullet| bullet.id() == id)?;
        Some(self.bullets.remove(index))
    }

    pub fn remove_experience_gem(&mut self, id: EntityId) -> Option<ExperienceGem> {
        let index = self.gems.iter().position(|gem| gem.id() == id)?;
        Some(self.gems.remove(index))
    }

    /// Carry out an upgrade offer against the player's inventory
    ///
    /// Player stats are refreshed right away so new passives count from the
    /// next tick.
    pub fn apply_upgrade(&mut self, action: &UpgradeAction) -> Result<(), InventoryError> {
        action.apply(self.player.inventory_mut(), &self.catalog, &self.clock)?;
        self.player.refresh_stats();
        Ok(())
    }

    /// Start over: clock at zero, empty world, new player, reseeded RNG
    pub fn reset(&mut self) {
        self.clock.reset();
        self.ids = EntityIdAllocator::new();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.monsters.clear();
        self.bullets.clear();
        self.gems.clear();
        self.spawner.reset();
        self.player = create_player(&self.config, &self.catalog, &self.clock, &mut self.ids);
        log::info!("World reset");
    }

    /// Capture the clock and every entity as a save file
    ///
    /// # Arguments
    /// * `save_type` - Manual, auto or quick save
    /// * `slot` - Slot number recorded in the metadata
    pub fn snapshot(&self, save_type: SaveType, slot: u8) -> Result<SaveFile, SaveError> {
        let mut entities = Vec::with_capacity(1 + self.monsters.len() + self.bullets.len() + self.gems.len());

        entities.push(entity_record(self.player.id(), self.player.position(), self.player.to_save_data()?));
        for monster in &self.monsters {
            entities.push(entity_record(monster.id(), monster.position(), monster.to_save_data()?));
        }
        for bullet in &self.bullets {
            entities.push(entity_record(bullet.id(), bullet.position(), bullet.to_save_data()?));
        }
        for gem in &self.gems {
            entities.push(entity_record(gem.id(), gem.position(), gem.to_save_data()?));
        }

        Ok(SaveFile {
            version: CURRENT_SAVE_VERSION,
            timestamp: SystemTime::now(),
            metadata: SaveMetadata {
                game_version: env!("CARGO_PKG_VERSION").to_string(),
                playtime_seconds: (self.clock.elapsed_ms() / 1000.0) as u64,
                save_type,
                save_slot: slot,
                player_level: self.player.level(),
            },
            clock_ms: self.clock.elapsed_ms(),
            entities,
        })
    }

    /// Replace the world's contents with a save file's
    ///
    /// Every rebuilt cooldown starts from the saved time. Entities get fresh
    /// ids. Unknown entity types are skipped, and a save without a player gets
    /// a new one.
    ///
    /// # Errors
    /// `InvalidVersion` for files newer than this build; decoding errors from
    /// individual entities are passed through. On any error the world, its
    /// clock and its id allocator are left as they were.
    pub fn restore(&mut self, save: &SaveFile) -> Result<(), SaveError> {
        if save.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::InvalidVersion(save.version));
        }

        // Rebuilt entities arm their cooldowns against the saved time, so the
        // shared clock moves first and is rolled back if any payload fails
        let mut ids = EntityIdAllocator::new();
        let mut rng = self.rng.clone();
        let clock = self.clock.clone();
        let restored = clock.try_at_ms(save.clock_ms.max(0.0), || {
            let mut ctx = LoadContext {
                clock: &self.clock,
                catalog: &self.catalog,
                config: &self.config,
                ids: &mut ids,
                rng: &mut rng,
            };
            decode_entities(&save.entities, &mut ctx)
        });
        let restored = match restored {
            Ok(restored) => restored,
            Err(e) => {
                log::warn!("Restore failed, keeping the current world: {}", e);
                return Err(e);
            }
        };

        self.player = match restored.player {
            Some(player) => player,
            None => {
                log::warn!("Save has no player, starting a new one");
                create_player(&self.config, &self.catalog, &self.clock, &mut ids)
            }
        };
        self.monsters = restored.monsters;
        self.bullets = restored.bullets;
        self.gems = restored.gems;
        self.ids = ids;
        self.rng = rng;
        self.spawner.reset();

        log::info!(
            "Restored world at {:.0} ms: {} monsters, {} bullets, {} gems",
            save.clock_ms,
            self.monsters.len(),
            self.bullets.len(),
            self.gems.len()
        );
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn gems(&self) -> &[ExperienceGem] {
        &self.gems
    }

    pub fn spawner(&self) -> &MonsterSpawner {
        &self.spawner
    }
}

/// New player in the middle of the world holding the starting weapon
fn create_player(config: &GameConfig, catalog: &Catalog, clock: &GameClock, ids: &mut EntityIdAllocator) -> Player {
    let mut inventory = Inventory::new(config.inventory_max_size);
    let starting = catalog
        .weapon_by_name(Catalog::STARTING_WEAPON, 1, clock)
        .and_then(|weapon| inventory.add_weapon(weapon));
    if let Err(e) = starting {
        log::warn!("Player starts without a weapon: {}", e);
    }

    let size = config.player_sprite;
    let x = (config.world.width - size.width) / 2.0;
    let y = (config.world.height - size.height) / 2.0;
    Player::new(ids.allocate(), x, y, inventory, size, clock)
}

/// Entities decoded from a save, not yet part of any world
struct RestoredEntities {
    player: Option<Player>,
    monsters: Vec<Monster>,
    bullets: Vec<Bullet>,
    gems: Vec<ExperienceGem>,
}

fn decode_entities(entities: &[EntitySaveData], ctx: &mut LoadContext) -> Result<RestoredEntities, SaveError> {
    let mut restored = RestoredEntities {
        player: None,
        monsters: Vec::new(),
        bullets: Vec::new(),
        gems: Vec::new(),
    };

    for entity in entities {
        let data = SaveData::from(entity);
        match entity.entity_type.as_str() {
            tags::PLAYER => restored.player = Some(Player::from_save_data(&data, ctx)?),
            tags::MONSTER => restored.monsters.push(Monster::from_save_data(&data, ctx)?),
            tags::BULLET => restored.bullets.push(Bullet::from_save_data(&data, ctx)?),
            tags::EXPERIENCE_GEM => restored.gems.push(ExperienceGem::from_save_data(&data, ctx)?),
            other => log::warn!("Skipping unknown entity type '{}' (#{})", other, entity.entity_id),
        }
    }

    Ok(restored)
}

fn entity_record(id: EntityId, position: (f32, f32), data: SaveData) -> EntitySaveData {
    EntitySaveData {
        entity_id: id.0,
        entity_type: data.data_type,
        position,
        data: data.json_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::AttackShape;
    use crate::stats::{MonsterStats, ProjectileStats};

    fn quiet_world() -> GameWorld {
        // No spawns, so tests control every monster
        GameWorld::new(GameConfig::default(), Catalog::create_default(), SpawnSchedule::default())
    }

    fn monster_at(world: &mut GameWorld, x: f32, y: f32, stats: MonsterStats) -> EntityId {
        let id = world.allocate_id();
        let monster = Monster::new(id, "green_slime", x, y, stats, world.config().monster_sprite, world.clock());
        world.add_monster(monster);
        id
    }

    #[test]
    fn test_new_world_starts_with_wand() {
        let world = quiet_world();

        assert_eq!(world.player().position(), (1576.0, 1576.0));
        assert!(world.player().inventory().has_item("Green Wand"));
        assert_eq!(world.clock().elapsed_ms(), 0.0);
    }

    #[test]
    fn test_tick_advances_clock_by_one_frame() {
        let mut world = quiet_world();
        world.tick((0, 0));
        world.tick((0, 0));

        let expected = 2.0 * 1000.0 / 60.0;
        assert!((world.clock().elapsed_ms() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_homing_without_targets_expires() {
        let mut world = quiet_world();
        let mut fired = 0;
        let mut removed = 0;

        // Green Wand reloads every 500 ms
        for _ in 0..40 {
            let report = world.tick((0, 0));
            fired += report.bullets_fired;
            removed += report.bullets_removed;
        }

        assert_eq!(fired, 1);
        assert_eq!(removed, 1);
        assert!(world.bullets().is_empty());
    }

    #[test]
    fn test_killing_monster_drops_gem_then_pickup_levels_up() {
        let mut world = quiet_world();
        let (px, py) = world.player().position();
        let stats = MonsterStats::new(0.0, 1, 0, 1000.0, 5);
        let id = monster_at(&mut world, px + 8.0, py + 8.0, stats);

        // Contact damage kills it on the first tick
        let report = world.tick((0, 0));
        assert_eq!(report.monsters_killed, vec![id]);
        assert!(world.monsters().is_empty());
        assert_eq!(world.gems().len(), 1);
        assert!(!world.player().attack_cooldowns().has_entry(id));

        // The gem sits under the player and is collected next tick
        let report = world.tick((0, 0));
        assert_eq!(report.gems_collected, 1);
        assert_eq!(report.level_ups().collect::<Vec<_>>(), vec![2]);
        assert!(world.gems().is_empty());
    }

    #[test]
    fn test_player_death_reported() {
        let mut world = quiet_world();
        world.player_mut().take_damage(1000);

        let report = world.tick((0, 0));
        assert!(report.player_died());
    }

    #[test]
    fn test_remove_apis() {
        let mut world = quiet_world();
        let monster = monster_at(&mut world, 10.0, 10.0, MonsterStats::default());
        let gem_id = world.allocate_id();
        world.add_experience_gem(ExperienceGem::new(gem_id, 5.0, 5.0, 2));

        assert!(world.remove_monster(monster).is_some());
        assert!(world.remove_monster(monster).is_none());
        assert_eq!(world.remove_experience_gem(gem_id).map(|gem| gem.amount()), Some(2));
        assert!(world.remove_bullet(EntityId(999)).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut world = quiet_world();
        monster_at(&mut world, 10.0, 10.0, MonsterStats::default());
        for _ in 0..10 {
            world.tick((1, 0));
        }

        world.reset();
        assert_eq!(world.clock().elapsed_ms(), 0.0);
        assert!(world.monsters().is_empty());
        assert!(world.bullets().is_empty());
        assert_eq!(world.player().position(), (1576.0, 1576.0));
    }

    #[test]
    fn test_snapshot_restore_keeps_world() {
        let mut world = quiet_world();
        monster_at(&mut world, 100.0, 200.0, MonsterStats::new(1.5, 30, 15, 1000.0, 3));
        let bullet_id = world.allocate_id();
        let bullet = Bullet::new(
            bullet_id,
            AttackShape::Orbiting,
            50.0,
            60.0,
            ProjectileStats::new(10.0, 3.0, 1.0, 3000.0, 10, 3000.0),
            world.clock(),
            world.config(),
            &mut StdRng::seed_from_u64(1),
        );
        world.add_bullet(bullet);
        let gem_id = world.allocate_id();
        world.add_experience_gem(ExperienceGem::new(gem_id, 7.0, 8.0, 4));
        world.player_mut().gain_experience(6);
        world.clock().advance(42.0);

        let save = world.snapshot(SaveType::Manual, 3).unwrap();
        assert_eq!(save.entities.len(), 4);
        assert_eq!(save.metadata.player_level, 2);

        let mut restored = quiet_world();
        restored.restore(&save).unwrap();

        assert_eq!(restored.clock().elapsed_ms(), 42_000.0);
        assert_eq!(restored.player().level(), 2);
        assert_eq!(restored.player().experience().current_xp(), 1);
        assert_eq!(restored.monsters()[0].position(), (100.0, 200.0));
        assert_eq!(restored.monsters()[0].name(), "green_slime");
        assert_eq!(restored.bullets()[0].shape(), AttackShape::Orbiting);
        assert_eq!(restored.gems()[0].amount(), 4);
    }

    #[test]
    fn test_restore_rejects_newer_version() {
        let mut world = quiet_world();
        let mut save = world.snapshot(SaveType::Auto, 1).unwrap();
        save.version = CURRENT_SAVE_VERSION + 1;

        assert!(matches!(world.restore(&save), Err(SaveError::InvalidVersion(_))));
    }

    #[test]
    fn test_failed_restore_keeps_clock_and_ids() {
        let mut world = quiet_world();
        let ids: Vec<EntityId> = (0..3)
            .map(|i| monster_at(&mut world, 40.0 * i as f32, 0.0, MonsterStats::default()))
            .collect();
        world.clock().advance(10.0);

        let mut save = world.snapshot(SaveType::Manual, 1).unwrap();
        save.clock_ms = 999_000.0;
        for entity in save.entities.iter_mut().filter(|e| e.entity_type == tags::MONSTER) {
            entity.data = "garbage".to_string();
        }

        assert!(world.restore(&save).is_err());
        assert_eq!(world.clock().elapsed_ms(), 10_000.0);
        let kept: Vec<EntityId> = world.monsters().iter().map(|m| m.id()).collect();
        assert_eq!(kept, ids);

        let next = world.allocate_id();
        assert!(ids.iter().all(|id| next > *id));
        assert!(next > world.player().id());
    }

    #[test]
    fn test_restore_without_player_creates_one() {
        let mut world = quiet_world();
        let mut save = world.snapshot(SaveType::Manual, 1).unwrap();
        save.entities.clear();
        save.entities.push(EntitySaveData {
            entity_id: 4,
            entity_type: "tile".to_string(),
            position: (0.0, 0.0),
            data: "{}".to_string(),
        });

        world.restore(&save).unwrap();
        assert_eq!(world.player().health_points(), 100);
    }
}

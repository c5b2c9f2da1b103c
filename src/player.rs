use crate::clock::GameClock;
use crate::collision::{Collidable, Rect};
use crate::combat::{AttackCooldowns, CanDealDamage, Damageable, apply_armor};
use crate::config::Size;
use crate::entity::{Body, EntityId, HasPosition, Movable};
use crate::inventory::Inventory;
use crate::leveling::ExperienceTracker;
use crate::projectile::{Bullet, FireContext};
use crate::sprite::Sprite;
use crate::stats::{DamageResult, Health, PlayerStats};

pub struct Player {
    id: EntityId,
    body: Body,
    health: Health,
    /// Stats before passive items
    base_stats: PlayerStats,
    /// `base_stats` plus the inventory's combined passives
    stats: PlayerStats,
    inventory: Inventory,
    experience: ExperienceTracker,
    attack_cooldowns: AttackCooldowns,
}

impl Player {
    /// Contact damage before the power multiplier
    pub const BASE_DAMAGE: i32 = 5;
    pub const ATTACK_COOLDOWN_MS: f64 = 1000.0;

    pub fn new(id: EntityId, x: f32, y: f32, inventory: Inventory, size: Size, clock: &GameClock) -> Self {
        let base_stats = PlayerStats::base();
        let mut player = Player {
            id,
            body: Body::new(x, y, base_stats.movement_speed, size.width, size.height),
            health: Health::new(base_stats.max_health),
            base_stats,
            stats: base_stats,
            inventory,
            experience: ExperienceTracker::new(),
            attack_cooldowns: AttackCooldowns::new(clock, Self::ATTACK_COOLDOWN_MS),
        };
        player.refresh_stats();
        player.health = Health::new(player.stats.max_health);
        log::debug!("Created player {} at ({:.0}, {:.0})", id, x, y);
        player
    }

    /// Restores saved health and experience
    pub fn with_progress(mut self, health: i32, experience: ExperienceTracker) -> Self {
        self.health = Health::with_current(health, self.stats.max_health);
        self.experience = experience;
        self
    }

    /// Runs one tick: movement, regen, weapons
    ///
    /// `fire.origin` and `fire.multiplier` are overwritten with the player's
    /// position and current multiplier before any weapon fires.
    ///
    /// # Returns
    /// Projectiles fired this tick, to be added to the world
    pub fn update(&mut self, direction: (i8, i8), fire: &mut FireContext) -> Vec<Bullet> {
        self.body.sprite.update();
        self.move_in_direction(f32::from(direction.0), f32::from(direction.1));
        self.health.heal(self.stats.recovery);

        fire.origin = self.position();
        fire.multiplier = self.stats.projectile_multiplier;
        let fired = self.inventory.update(fire);

        self.refresh_stats();
        fired
    }

    /// Recomputes stats from the base block and owned passive items
    ///
    /// Call after anything changes the inventory.
    pub fn refresh_stats(&mut self) {
        self.stats = self.base_stats + self.inventory.get_combined_stats();
        self.body.speed = self.stats.movement_speed;
        self.health.set_max(self.stats.max_health.max(1));
    }

    /// Adds experience and returns each level reached
    pub fn gain_experience(&mut self, amount: u32) -> Vec<u32> {
        let reached = self.experience.add_xp(amount);
        for level in &reached {
            log::info!("Player reached level {}", level);
        }
        reached
    }

    /// Keeps the whole sprite inside `[0, world - sprite]` on both axes
    pub fn clamp_to_world(&mut self, world: Size) {
        let max_x = (world.width - self.body.sprite.width()).max(0.0);
        let max_y = (world.height - self.body.sprite.height()).max(0.0);
        let (x, y) = self.position();
        let clamped = (x.max(0.0).min(max_x), y.max(0.0).min(max_y));
        if clamped != (x, y) {
            self.body.teleport(clamped.0, clamped.1);
        }
    }

    /// Drops the cooldown entry for a target that left the world
    pub fn forget_target(&mut self, target: EntityId) {
        self.attack_cooldowns.forget(target);
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn experience(&self) -> &ExperienceTracker {
        &self.experience
    }

    pub fn level(&self) -> u32 {
        self.experience.level()
    }

    pub fn attack_cooldowns(&self) -> &AttackCooldowns {
        &self.attack_cooldowns
    }

    pub fn sprite(&self) -> &Sprite {
        &self.body.sprite
    }
}

impl HasPosition for Player {
    fn position(&self) -> (f32, f32) {
        self.body.position()
    }
}

impl Movable for Player {
    fn speed(&self) -> f32 {
        self.body.speed
    }

    fn move_in_direction(&mut self, dx: f32, dy: f32) {
        self.body.move_in_direction(dx, dy);
    }

    fn teleport(&mut self, x: f32, y: f32) {
        self.body.teleport(x, y);
    }
}

impl Damageable for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn health_points(&self) -> i32 {
        self.health.current()
    }

    /// Armor is subtracted before the hit lands
    fn take_damage(&mut self, amount: i32) -> DamageResult {
        let result = self.health.take_damage(apply_armor(amount, self.stats.armor));
        self.body.sprite.take_damage();
        log::debug!(
            "Player took {} damage ({}/{})",
            result.damage_dealt,
            self.health.current(),
            self.health.max()
        );
        result
    }
}

impl CanDealDamage for Player {
    fn damage_amount(&self) -> i32 {
        Self::BASE_DAMAGE * self.stats.projectile_multiplier.power / 100
    }

    fn attack(&mut self, target: &mut dyn Damageable) -> Option<DamageResult> {
        if !self.attack_cooldowns.try_hit(target.id()) {
            return None;
        }
        Some(target.take_damage(self.damage_amount()))
    }
}

impl Collidable for Player {
    fn get_bounds(&self) -> Rect {
        self.body.sprite.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::EntityIdAllocator;
    use crate::stats::ProjectileStatsMultiplier;
    use crate::weapon::Catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SIZE: Size = Size::new(48.0, 48.0);

    fn player(clock: &GameClock) -> Player {
        Player::new(EntityId(1), 0.0, 0.0, Inventory::new(5), SIZE, clock)
    }

    #[test]
    fn test_damage_without_armor() {
        let clock = GameClock::new();
        let mut player = player(&clock);

        player.take_damage(25);
        assert_eq!(player.health_points(), 75);
    }

    #[test]
    fn test_armor_reduces_damage() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut player = player(&clock);
        player
            .inventory_mut()
            .add_passive(catalog.passive_by_name("Armor", 3).unwrap())
            .unwrap();
        player.refresh_stats();

        player.take_damage(10);
        assert_eq!(player.health_points(), 93);
        player.take_damage(2);
        assert_eq!(player.health_points(), 93);
    }

    #[test]
    fn test_update_moves_regens_and_fires() {
        let clock = GameClock::new();
        let config = GameConfig::default();
        let catalog = Catalog::create_default();
        let mut ids = EntityIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(0);

        let mut inventory = Inventory::new(5);
        inventory.add_weapon(catalog.weapon_by_name("Green Wand", 1, &clock).unwrap()).unwrap();
        inventory.add_passive(catalog.passive_by_name("Pummarola", 2).unwrap()).unwrap();
        let mut player = Player::new(EntityId(1), 100.0, 100.0, inventory, SIZE, &clock);
        player.take_damage(10);

        let mut fire = FireContext {
            origin: (0.0, 0.0),
            multiplier: ProjectileStatsMultiplier::base(),
            clock: &clock,
            ids: &mut ids,
            rng: &mut rng,
            config: &config,
        };

        let fired = player.update((1, 0), &mut fire);
        assert!(fired.is_empty());
        assert_eq!(player.position(), (105.0, 100.0));
        assert_eq!(player.health_points(), 92);

        clock.advance(0.5);
        let fired = player.update((0, 0), &mut fire);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].position(), (105.0, 100.0));
        // Regen never exceeds max
        player.update((0, 0), &mut fire);
        player.update((0, 0), &mut fire);
        assert_eq!(player.health_points(), 98);
        player.update((0, 0), &mut fire);
        assert_eq!(player.health_points(), 100);
    }

    #[test]
    fn test_clamp_to_world() {
        let clock = GameClock::new();
        let mut player = player(&clock);
        let world = Size::new(3200.0, 3200.0);

        player.teleport(-20.0, 5000.0);
        player.clamp_to_world(world);
        assert_eq!(player.position(), (0.0, 3152.0));
    }

    #[test]
    fn test_contact_damage_scales_with_power() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut player = player(&clock);
        assert_eq!(player.damage_amount(), 5);

        player
            .inventory_mut()
            .add_passive(catalog.passive_by_name("Spinach", 5).unwrap())
            .unwrap();
        player.refresh_stats();
        assert_eq!(player.damage_amount(), 7);
    }

    #[test]
    fn test_level_ups_reported_in_order() {
        let clock = GameClock::new();
        let mut player = player(&clock);

        assert_eq!(player.gain_experience(20), vec![2, 3]);
        assert_eq!(player.level(), 3);
    }
}

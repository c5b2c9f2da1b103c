// Post-collision sweep
//
// Order is monsters, then bullets, then the player, so a monster killed on the
// same tick as the player still drops its gem.

use crate::combat::Damageable;
use crate::config::Size;
use crate::entity::{EntityId, EntityIdAllocator, HasPosition};
use crate::experience_gem::ExperienceGem;
use crate::monster::Monster;
use crate::player::Player;
use crate::projectile::Bullet;

/// Everything the death sweep removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeathReport {
    /// Monsters removed this tick, in world order
    pub monsters_killed: Vec<EntityId>,
    pub bullets_removed: usize,
    pub player_dead: bool,
}

pub struct DeathHandler;

impl DeathHandler {
    /// Remove dead entities and drop loot
    ///
    /// # Arguments
    /// * `player` - Checked last; its cooldown entries for removed monsters expire
    /// * `monsters` - Monsters at zero health are replaced by gems
    /// * `bullets` - Spent or out-of-bounds projectiles are removed
    /// * `gems` - Receives one gem per dead monster
    /// * `ids` - Allocates ids for the new gems
    /// * `world` - Bounds for the projectile check
    pub fn check_deaths(
        player: &mut Player,
        monsters: &mut Vec<Monster>,
        bullets: &mut Vec<Bullet>,
        gems: &mut Vec<ExperienceGem>,
        ids: &mut EntityIdAllocator,
        world: Size,
    ) -> DeathReport {
        let mut report = DeathReport::default();

        monsters.retain(|monster| {
            if !monster.is_dead() {
                return true;
            }
            let (x, y) = monster.position();
            gems.push(ExperienceGem::new(ids.allocate(), x, y, monster.xp_drop()));
            report.monsters_killed.push(monster.id());
            log::debug!("{} '{}' died, dropped {} xp", monster.id(), monster.name(), monster.xp_drop());
            false
        });
        for &id in &report.monsters_killed {
            player.forget_target(id);
        }

        let before = bullets.len();
        bullets.retain(|bullet| !bullet.is_dead() && !bullet.is_out_of_bounds(world.width, world.height));
        report.bullets_removed = before - bullets.len();

        if player.is_dead() {
            log::info!("Player died at level {}", player.level());
            report.player_dead = true;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::config::GameConfig;
    use crate::inventory::Inventory;
    use crate::projectile::AttackShape;
    use crate::stats::{MonsterStats, ProjectileStats};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const WORLD: Size = Size::new(3200.0, 3200.0);

    fn player(clock: &GameClock) -> Player {
        Player::new(EntityId(1), 500.0, 500.0, Inventory::new(5), Size::new(48.0, 48.0), clock)
    }

    fn bullet(clock: &GameClock, id: u64, x: f32, y: f32, pierce: i32) -> Bullet {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let stats = ProjectileStats::new(10.0, 0.0, 1.0, 1000.0, pierce, 1000.0);
        Bullet::new(EntityId(id), AttackShape::Random, x, y, stats, clock, &config, &mut rng)
    }

    #[test]
    fn test_dead_monster_drops_gem_at_its_position() {
        let clock = GameClock::new();
        let mut player = player(&clock);
        let stats = MonsterStats::new(2.0, 10, 10, 1000.0, 3);
        let mut monsters = vec![
            Monster::new(EntityId(10), "green_slime", 40.0, 60.0, stats, Size::new(32.0, 32.0), &clock),
            Monster::new(EntityId(11), "green_slime", 90.0, 90.0, stats, Size::new(32.0, 32.0), &clock),
        ];
        let result = monsters[0].take_damage(15);
        assert_eq!(monsters[0].health_points(), 0);
        assert_eq!(result.overkill, 5);

        let mut gems = Vec::new();
        let mut ids = EntityIdAllocator::new();
        let report = DeathHandler::check_deaths(&mut player, &mut monsters, &mut Vec::new(), &mut gems, &mut ids, WORLD);

        assert_eq!(report.monsters_killed, vec![EntityId(10)]);
        assert_eq!(monsters.len(), 1);
        assert_eq!(gems.len(), 1);
        assert_eq!(gems[0].position(), (40.0, 60.0));
        assert_eq!(gems[0].amount(), 3);
        assert!(!report.player_dead);
    }

    #[test]
    fn test_spent_and_stray_bullets_removed() {
        let clock = GameClock::new();
        let mut player = player(&clock);
        let mut bullets = vec![
            bullet(&clock, 20, 100.0, 100.0, 1),
            bullet(&clock, 21, 100.0, 100.0, 0),
            bullet(&clock, 22, -5.0, 100.0, 3),
            bullet(&clock, 23, 3200.0, 3200.0, 3),
        ];
        let mut ids = EntityIdAllocator::new();

        let report = DeathHandler::check_deaths(&mut player, &mut Vec::new(), &mut bullets, &mut Vec::new(), &mut ids, WORLD);

        assert_eq!(report.bullets_removed, 2);
        let kept: Vec<EntityId> = bullets.iter().map(|b| b.id()).collect();
        assert_eq!(kept, vec![EntityId(20), EntityId(23)]);
    }

    #[test]
    fn test_loot_drops_even_when_player_dies() {
        let clock = GameClock::new();
        let mut player = player(&clock);
        player.take_damage(500);
        let mut monsters = vec![
            Monster::new(EntityId(10), "bat", 0.0, 0.0, MonsterStats::default(), Size::new(32.0, 32.0), &clock)
                .with_health(0),
        ];
        let mut gems = Vec::new();
        let mut ids = EntityIdAllocator::new();

        let report = DeathHandler::check_deaths(&mut player, &mut monsters, &mut Vec::new(), &mut gems, &mut ids, WORLD);

        assert!(report.player_dead);
        assert_eq!(gems.len(), 1);
    }

    #[test]
    fn test_player_forgets_removed_monster() {
        use crate::combat::CanDealDamage;

        let clock = GameClock::new();
        let mut player = player(&clock);
        let mut monsters = vec![Monster::new(
            EntityId(10),
            "green_slime",
            0.0,
            0.0,
            MonsterStats::new(2.0, 5, 10, 1000.0, 1),
            Size::new(32.0, 32.0),
            &clock,
        )];
        player.attack(&mut monsters[0]);
        assert!(player.attack_cooldowns().has_entry(EntityId(10)));

        let mut ids = EntityIdAllocator::new();
        DeathHandler::check_deaths(&mut player, &mut monsters, &mut Vec::new(), &mut Vec::new(), &mut ids, WORLD);

        assert!(monsters.is_empty());
        assert!(!player.attack_cooldowns().has_entry(EntityId(10)));
    }
}

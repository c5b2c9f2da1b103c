// Collision resolution, run once per tick after every entity has moved
//
// Masks are rebuilt from scratch on each call, so the handler keeps no state
// between ticks. Phases run in a fixed order: bullets hit monsters, the player
// and monsters trade contact damage, the player picks up gems, and finally the
// player is clamped into the world.

use crate::collision::{Collidable, CollisionMask};
use crate::combat::{CanDealDamage, Damageable};
use crate::config::Size;
use crate::experience_gem::ExperienceGem;
use crate::monster::Monster;
use crate::player::Player;
use crate::projectile::Bullet;

/// What the collision pass changed that the caller needs to know about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Levels reached from gem pickups, in order
    pub levels: Vec<u32>,
    pub gems_collected: usize,
    pub xp_gained: u32,
}

pub struct CollisionHandler;

impl CollisionHandler {
    /// Resolve every collision for this tick
    ///
    /// This method is the only place where entities of different kinds touch
    /// each other. Monsters killed here stay in the list (at zero health)
    /// until the death handler sweeps them.
    ///
    /// # Arguments
    /// * `player` - The player
    /// * `monsters` - All monsters, in world order
    /// * `bullets` - All live projectiles, in world order
    /// * `gems` - Gems on the ground; picked up gems are removed
    /// * `world` - World size used for the final clamp
    ///
    /// # Returns
    /// Experience gained and levels reached this tick
    pub fn handle_collisions(
        player: &mut Player,
        monsters: &mut [Monster],
        bullets: &mut [Bullet],
        gems: &mut Vec<ExperienceGem>,
        world: Size,
    ) -> CollisionReport {
        let monster_mask = CollisionMask::build(monsters);

        Self::bullets_against_monsters(bullets, monsters, &monster_mask);
        Self::player_against_monsters(player, monsters, &monster_mask);
        let report = Self::collect_gems(player, gems);
        player.clamp_to_world(world);

        report
    }

    fn bullets_against_monsters(bullets: &mut [Bullet], monsters: &mut [Monster], mask: &CollisionMask) {
        for bullet in bullets.iter_mut() {
            for index in mask.overlapping(&bullet.get_bounds()) {
                let monster = &mut monsters[index];
                // Already killed by an earlier bullet this tick
                if monster.is_dead() {
                    continue;
                }
                if let Some(result) = bullet.attack(monster) {
                    if result.is_fatal {
                        log::debug!("{} '{}' killed by {}", monster.id(), monster.name(), bullet.shape());
                    }
                }
            }
        }
    }

    fn player_against_monsters(player: &mut Player, monsters: &mut [Monster], mask: &CollisionMask) {
        for index in mask.overlapping(&player.get_bounds()) {
            let monster = &mut monsters[index];
            if monster.is_dead() {
                continue;
            }
            player.attack(monster);
            if monster.is_dead() {
                continue;
            }
            monster.attack(player);
        }
    }

    fn collect_gems(player: &mut Player, gems: &mut Vec<ExperienceGem>) -> CollisionReport {
        let gem_mask = CollisionMask::build(gems);
        let picked = gem_mask.overlapping(&player.get_bounds());

        let mut report = CollisionReport::default();
        for &index in &picked {
            let amount = gems[index].amount();
            report.xp_gained += amount;
            report.levels.extend(player.gain_experience(amount));
        }
        report.gems_collected = picked.len();

        // Indices are ascending; remove from the back so earlier ones stay valid
        for &index in picked.iter().rev() {
            gems.remove(index);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::config::GameConfig;
    use crate::entity::{EntityId, HasPosition, Movable};
    use crate::inventory::Inventory;
    use crate::projectile::AttackShape;
    use crate::stats::{MonsterStats, ProjectileStats};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const WORLD: Size = Size::new(3200.0, 3200.0);

    fn player(clock: &GameClock, x: f32, y: f32) -> Player {
        Player::new(EntityId(1), x, y, Inventory::new(5), Size::new(48.0, 48.0), clock)
    }

    fn monster(clock: &GameClock, id: u64, x: f32, y: f32, stats: MonsterStats) -> Monster {
        Monster::new(EntityId(id), "green_slime", x, y, stats, Size::new(32.0, 32.0), clock)
    }

    fn bullet(clock: &GameClock, id: u64, x: f32, y: f32, pierce: i32) -> Bullet {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let stats = ProjectileStats::new(10.0, 0.0, 1.0, 1000.0, pierce, 1000.0);
        Bullet::new(EntityId(id), AttackShape::Random, x, y, stats, clock, &config, &mut rng)
    }

    #[test]
    fn test_bullet_hits_each_overlapping_monster_within_pierce() {
        let clock = GameClock::new();
        let mut player = player(&clock, 2000.0, 2000.0);
        let stats = MonsterStats::new(0.0, 30, 0, 1000.0, 1);
        let mut monsters = vec![
            monster(&clock, 10, 100.0, 100.0, stats),
            monster(&clock, 11, 104.0, 104.0, stats),
            monster(&clock, 12, 108.0, 108.0, stats),
        ];
        let mut bullets = vec![bullet(&clock, 20, 110.0, 110.0, 2)];
        let mut gems = Vec::new();

        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut bullets, &mut gems, WORLD);

        let healths: Vec<i32> = monsters.iter().map(|m| m.health_points()).collect();
        assert_eq!(healths, vec![20, 20, 30]);
        assert_eq!(bullets[0].pierce(), 0);

        // Same overlap next tick: no re-hits
        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut bullets, &mut gems, WORLD);
        let healths: Vec<i32> = monsters.iter().map(|m| m.health_points()).collect();
        assert_eq!(healths, vec![20, 20, 30]);
    }

    #[test]
    fn test_contact_damage_is_mutual_and_gated() {
        let clock = GameClock::new();
        let mut player = player(&clock, 100.0, 100.0);
        let stats = MonsterStats::new(0.0, 30, 10, 1000.0, 1);
        let mut monsters = vec![monster(&clock, 10, 110.0, 110.0, stats)];
        let mut gems = Vec::new();

        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut [], &mut gems, WORLD);
        assert_eq!(player.health_points(), 90);
        assert_eq!(monsters[0].health_points(), 25);

        clock.advance(0.5);
        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut [], &mut gems, WORLD);
        assert_eq!(player.health_points(), 90);
        assert_eq!(monsters[0].health_points(), 25);

        clock.advance(0.5);
        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut [], &mut gems, WORLD);
        assert_eq!(player.health_points(), 80);
        assert_eq!(monsters[0].health_points(), 20);
    }

    #[test]
    fn test_monster_killed_by_bullet_deals_no_contact_damage() {
        let clock = GameClock::new();
        let mut player = player(&clock, 100.0, 100.0);
        let stats = MonsterStats::new(0.0, 10, 10, 1000.0, 1);
        let mut monsters = vec![monster(&clock, 10, 110.0, 110.0, stats)];
        let mut bullets = vec![bullet(&clock, 20, 115.0, 115.0, 1)];

        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut bullets, &mut Vec::new(), WORLD);

        assert!(monsters[0].is_dead());
        assert_eq!(player.health_points(), 100);
    }

    #[test]
    fn test_monster_killed_by_contact_does_not_hit_back() {
        let clock = GameClock::new();
        let mut player = player(&clock, 100.0, 100.0);
        let stats = MonsterStats::new(0.0, 5, 10, 1000.0, 1);
        let mut monsters = vec![monster(&clock, 10, 110.0, 110.0, stats)];

        CollisionHandler::handle_collisions(&mut player, &mut monsters, &mut [], &mut Vec::new(), WORLD);

        assert!(monsters[0].is_dead());
        assert_eq!(player.health_points(), 100);
    }

    #[test]
    fn test_gems_picked_up_and_removed() {
        let clock = GameClock::new();
        let mut player = player(&clock, 100.0, 100.0);
        let mut gems = vec![
            ExperienceGem::new(EntityId(30), 110.0, 110.0, 3),
            ExperienceGem::new(EntityId(31), 900.0, 900.0, 50),
            ExperienceGem::new(EntityId(32), 120.0, 120.0, 4),
        ];

        let report = CollisionHandler::handle_collisions(&mut player, &mut [], &mut [], &mut gems, WORLD);

        assert_eq!(report.gems_collected, 2);
        assert_eq!(report.xp_gained, 7);
        assert_eq!(report.levels, vec![2]);
        assert_eq!(gems.len(), 1);
        assert_eq!(gems[0].id(), EntityId(31));
    }

    #[test]
    fn test_player_clamped_after_combat() {
        let clock = GameClock::new();
        let mut player = player(&clock, 0.0, 0.0);
        player.teleport(-30.0, 3190.0);

        CollisionHandler::handle_collisions(&mut player, &mut [], &mut [], &mut Vec::new(), WORLD);
        assert_eq!(player.position(), (0.0, 3152.0));
    }
}

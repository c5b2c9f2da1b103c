use crate::clock::GameClock;
use crate::collision::{Collidable, Rect, aabb_intersect};
use crate::combat::{AttackCooldowns, CanDealDamage, Damageable};
use crate::config::Size;
use crate::entity::{Body, EntityId, HasPosition, Movable, distance_between};
use crate::sprite::Sprite;
use crate::stats::{DamageResult, Health, MonsterStats};

/// Shrink applied to the next-step rect so neighbours can brush past each other
const CROWD_MARGIN: f32 = -10.0;

pub struct Monster {
    id: EntityId,
    name: String,
    body: Body,
    health: Health,
    stats: MonsterStats,
    attack_cooldowns: AttackCooldowns,
}

impl Monster {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        x: f32,
        y: f32,
        stats: MonsterStats,
        size: Size,
        clock: &GameClock,
    ) -> Self {
        let name = name.into();
        log::debug!("Created monster {} '{}' at ({:.0}, {:.0})", id, name, x, y);
        Monster {
            id,
            name,
            body: Body::new(x, y, stats.speed, size.width, size.height),
            health: Health::new(stats.health),
            stats,
            attack_cooldowns: AttackCooldowns::new(clock, f64::from(stats.attack_cooldown)),
        }
    }

    /// Restores saved health (never below zero, never above the stat maximum)
    pub fn with_health(mut self, current: i32) -> Self {
        self.health = Health::with_current(current, self.stats.health.max(current));
        self
    }

    /// Chases `target`, waiting while a closer neighbour is in the way
    ///
    /// # Arguments
    /// * `target` - Position being chased (the player)
    /// * `neighbours` - Every other monster in the world
    /// * `dead_zone` - Axis distance under which the monster stops adjusting
    pub fn update<'a>(
        &mut self,
        target: (f32, f32),
        neighbours: impl IntoIterator<Item = &'a Monster>,
        dead_zone: f32,
    ) {
        self.body.sprite.update();

        let (dir_x, dir_y) = self.direction_towards(target, dead_zone);
        if (dir_x, dir_y) == (0.0, 0.0) {
            return;
        }

        let next_step = self
            .body
            .sprite
            .rect()
            .moved_by(dir_x * self.body.speed, dir_y * self.body.speed)
            .inflate(CROWD_MARGIN, CROWD_MARGIN);
        let priority = distance_between(self.position(), target);

        // A closer neighbour in the way has right of way
        let blocked = neighbours.into_iter().any(|other| {
            aabb_intersect(&other.get_bounds(), &next_step)
                && distance_between(other.position(), target) < priority
        });

        if !blocked {
            self.move_in_direction(dir_x, dir_y);
        }
    }

    /// Sign-only direction per axis, zero inside the dead zone
    fn direction_towards(&self, target: (f32, f32), dead_zone: f32) -> (f32, f32) {
        let axis = |delta: f32| {
            if delta.abs() <= dead_zone {
                0.0
            } else {
                delta.signum()
            }
        };
        let (x, y) = self.position();
        (axis(target.0 - x), axis(target.1 - y))
    }

    /// Drops the cooldown entry for a target that left the world
    pub fn forget_target(&mut self, target: EntityId) {
        self.attack_cooldowns.forget(target);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &MonsterStats {
        &self.stats
    }

    pub fn xp_drop(&self) -> u32 {
        self.stats.xp_drop
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn sprite(&self) -> &Sprite {
        &self.body.sprite
    }
}

impl HasPosition for Monster {
    fn position(&self) -> (f32, f32) {
        self.body.position()
    }
}

impl Movable for Monster {
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

impl Damageable for Monster {
    fn id(&self) -> EntityId {
        self.id
    }

    fn health_points(&self) -> i32 {
        self.health.current()
    }

    fn take_damage(&mut self, amount: i32) -> DamageResult {
        let result = self.health.take_damage(amount);
        self.body.sprite.take_damage();
        result
    }
}

impl CanDealDamage for Monster {
    fn damage_amount(&self) -> i32 {
        self.stats.damage
    }

    fn attack(&mut self, target: &mut dyn Damageable) -> Option<DamageResult> {
        if !self.attack_cooldowns.try_hit(target.id()) {
            return None;
        }
        Some(target.take_damage(self.damage_amount()))
    }
}

impl Collidable for Monster {
    fn get_bounds(&self) -> Rect {
        self.body.sprite.rect()
    }
}

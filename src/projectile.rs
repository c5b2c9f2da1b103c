//! Projectiles fired by weapons
//!
//! Every projectile shares the same bookkeeping (pierce budget, list of targets
//! already hit, damage on contact) and differs only in how it moves and when it
//! expires. The movement policy is the `Behavior` enum; which policy a weapon
//! produces is decided by its [`AttackShape`].
//!
//! # Rust Learning Notes
//!
//! - **Enum-based polymorphism**: `Behavior` replaces a class hierarchy of
//!   bullet subclasses; `match` dispatches per variant
//! - **Context structs**: `FireContext` / `BulletContext` bundle the borrowed
//!   world state a projectile needs, so no projectile ever holds a reference
//!   back into the world
//! - **Deferred removal**: `update` returns `BulletUpdate::Expired` instead of
//!   removing itself; the world drops expired bullets after the loop

use crate::clock::GameClock;
use crate::collision::{Collidable, Rect};
use crate::combat::{CanDealDamage, Damageable};
use crate::config::GameConfig;
use crate::cooldown::Cooldown;
use crate::entity::{Body, EntityId, EntityIdAllocator, HasPosition, Movable, distance_between};
use crate::sprite::Sprite;
use crate::stats::{DamageResult, ProjectileStats, ProjectileStatsMultiplier};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which projectile a weapon fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackShape {
    /// Locks onto the nearest monster once, then flies straight
    Homing,
    /// Flies straight in a random direction
    Random,
    /// Circles the player until its duration runs out
    Orbiting,
    /// Drops onto a random on-screen monster and stays there
    Area,
}

impl AttackShape {
    /// Default pierce handling for this shape
    pub fn pierce_policy(&self) -> PiercePolicy {
        match self {
            AttackShape::Homing | AttackShape::Random | AttackShape::Area => PiercePolicy {
                decrement_on_hit: true,
                decrement_when_damaged: false,
            },
            AttackShape::Orbiting => PiercePolicy {
                decrement_on_hit: false,
                decrement_when_damaged: false,
            },
        }
    }

    /// Builds a projectile of this shape at the context's origin
    ///
    /// `stats` must already include the player's multipliers.
    pub fn create_projectile(&self, stats: ProjectileStats, ctx: &mut FireContext) -> Bullet {
        let id = ctx.ids.allocate();
        let (x, y) = ctx.origin;
        Bullet::new(id, *self, x, y, stats, ctx.clock, ctx.config, ctx.rng)
    }
}

impl fmt::Display for AttackShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttackShape::Homing => "homing",
            AttackShape::Random => "random",
            AttackShape::Orbiting => "orbiting",
            AttackShape::Area => "area",
        };
        write!(f, "{}", name)
    }
}

/// When a projectile spends pierce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiercePolicy {
    /// Spend one pierce per distinct target hit
    pub decrement_on_hit: bool,
    /// Spend one pierce whenever the projectile itself takes damage
    pub decrement_when_damaged: bool,
}

/// Everything a weapon needs to create projectiles this tick
pub struct FireContext<'a> {
    /// Where projectiles spawn (the player's position)
    pub origin: (f32, f32),
    pub multiplier: ProjectileStatsMultiplier,
    pub clock: &'a GameClock,
    pub ids: &'a mut EntityIdAllocator,
    pub rng: &'a mut StdRng,
    pub config: &'a GameConfig,
}

/// World state a projectile may read during its update
pub struct BulletContext<'a> {
    pub player_pos: (f32, f32),
    /// Monster positions, in world order
    pub targets: &'a [(f32, f32)],
    /// Area currently visible on screen
    pub camera: Rect,
    pub rng: &'a mut StdRng,
    pub config: &'a GameConfig,
}

/// Outcome of one projectile update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletUpdate {
    Active,
    /// Lifetime over or no target available; remove after the update loop
    Expired,
}

#[derive(Debug, Clone)]
enum Behavior {
    Homing { direction: Option<(f32, f32)> },
    Random { direction: (f32, f32) },
    Orbiting { angle: f32, reset: Cooldown, lifetime: Cooldown },
    Area { placed: bool, lifetime: Cooldown },
}

#[derive(Debug, Clone)]
pub struct Bullet {
    id: EntityId,
    shape: AttackShape,
    body: Body,
    stats: ProjectileStats,
    pierce: i32,
    attacked: Vec<EntityId>,
    behavior: Behavior,
    policy: PiercePolicy,
}

impl Bullet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        shape: AttackShape,
        x: f32,
        y: f32,
        stats: ProjectileStats,
        clock: &GameClock,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Self {
        let size = config.bullet_sprite;
        let mut body = Body::new(x, y, stats.velocity, size.width, size.height);
        body.sprite.scale_image(stats.area_of_effect);

        let behavior = match shape {
            AttackShape::Homing => Behavior::Homing { direction: None },
            AttackShape::Random => {
                let angle: f32 = rng.gen_range(0.0..360.0);
                body.sprite.rotate(-angle);
                let radians = angle.to_radians();
                Behavior::Random {
                    direction: (radians.cos(), radians.sin()),
                }
            }
            AttackShape::Orbiting => {
                body.sprite.rotate(90.0);
                Behavior::Orbiting {
                    angle: 0.0,
                    reset: Cooldown::new(clock, config.orbit_reset_ms),
                    lifetime: Cooldown::new(clock, f64::from(stats.duration)),
                }
            }
            AttackShape::Area => Behavior::Area {
                placed: false,
                lifetime: Cooldown::new(clock, f64::from(stats.duration)),
            },
        };

        log::debug!("Created {} bullet {} at ({:.0}, {:.0})", shape, id, x, y);

        Bullet {
            id,
            shape,
            body,
            stats,
            pierce: stats.pierce.max(0),
            attacked: Vec::new(),
            behavior,
            policy: shape.pierce_policy(),
        }
    }

    /// Overrides the shape's default pierce handling
    pub fn with_pierce_policy(mut self, policy: PiercePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restores saved pierce (clamped at zero)
    pub fn with_pierce(mut self, pierce: i32) -> Self {
        self.pierce = pierce.max(0);
        self
    }

    /// Restores a saved travel direction for straight-flying shapes
    pub fn with_direction(mut self, direction: (f32, f32)) -> Self {
        match &mut self.behavior {
            Behavior::Homing { direction: locked } => *locked = Some(direction),
            Behavior::Random { direction: current } => *current = direction,
            _ => {}
        }
        self
    }

    pub fn update(&mut self, ctx: &mut BulletContext) -> BulletUpdate {
        self.body.sprite.update();

        match &mut self.behavior {
            Behavior::Homing { direction } => {
                let (dir_x, dir_y) = match *direction {
                    Some(locked) => locked,
                    None => {
                        let Some(locked) = lock_on_nearest(&mut self.body, ctx.targets) else {
                            log::debug!("Bullet {} found no target, expiring", self.id);
                            return BulletUpdate::Expired;
                        };
                        *direction = Some(locked);
                        locked
                    }
                };
                self.body.move_in_direction(dir_x, dir_y);
            }
            Behavior::Random { direction } => {
                let (dir_x, dir_y) = *direction;
                self.body.move_in_direction(dir_x, dir_y);
            }
            Behavior::Orbiting { angle, reset, lifetime } => {
                if lifetime.is_ready() {
                    return BulletUpdate::Expired;
                }
                if reset.is_ready() {
                    reset.trigger();
                    self.attacked.clear();
                }
                *angle += self.stats.velocity * ctx.config.orbit_step_per_velocity;

                let radius = ctx.config.orbit_radius;
                let (px, py) = ctx.player_pos;
                self.body.teleport(px + angle.cos() * radius, py + angle.sin() * radius);
            }
            Behavior::Area { placed, lifetime } => {
                if lifetime.is_ready() {
                    return BulletUpdate::Expired;
                }
                if !*placed {
                    let visible: Vec<(f32, f32)> = ctx
                        .targets
                        .iter()
                        .copied()
                        .filter(|&(x, y)| ctx.camera.contains_point(x, y))
                        .collect();
                    if visible.is_empty() {
                        log::debug!("Bullet {} has no visible target, expiring", self.id);
                        return BulletUpdate::Expired;
                    }
                    let (x, y) = visible[ctx.rng.gen_range(0..visible.len())];
                    self.body.teleport(x, y);
                    *placed = true;
                }
            }
        }

        BulletUpdate::Active
    }

    /// True when the bullet's position lies outside `[0, width] × [0, height]`
    pub fn is_out_of_bounds(&self, world_width: f32, world_height: f32) -> bool {
        let (x, y) = self.position();
        !(0.0..=world_width).contains(&x) || !(0.0..=world_height).contains(&y)
    }

    pub fn shape(&self) -> AttackShape {
        self.shape
    }

    pub fn stats(&self) -> &ProjectileStats {
        &self.stats
    }

    pub fn pierce(&self) -> i32 {
        self.pierce
    }

    pub fn pierce_policy(&self) -> PiercePolicy {
        self.policy
    }

    pub fn has_attacked(&self, target: EntityId) -> bool {
        self.attacked.contains(&target)
    }

    /// Locked or random travel direction, if the shape has one yet
    pub fn direction(&self) -> Option<(f32, f32)> {
        match self.behavior {
            Behavior::Homing { direction } => direction,
            Behavior::Random { direction } => Some(direction),
            _ => None,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.body.sprite
    }
}

/// Points the bullet at the nearest target and returns the unit direction
///
/// Ties keep the first target in world order.
fn lock_on_nearest(body: &mut Body, targets: &[(f32, f32)]) -> Option<(f32, f32)> {
    let origin = body.position();
    let &(tx, ty) = targets.iter().min_by(|a, b| {
        distance_between(origin, **a)
            .partial_cmp(&distance_between(origin, **b))
            .unwrap_or(Ordering::Equal)
    })?;

    let (dir_x, dir_y) = body.direction_to(tx, ty);
    let mut angle = dir_y.atan2(dir_x).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    body.sprite.rotate(-angle);
    Some((dir_x, dir_y))
}

impl HasPosition for Bullet {
    fn position(&self) -> (f32, f32) {
        self.body.position()
    }
}

impl Movable for Bullet {
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

/// A bullet's "health" is its remaining pierce
impl Damageable for Bullet {
    fn id(&self) -> EntityId {
        self.id
    }

    fn health_points(&self) -> i32 {
        self.pierce
    }

    fn take_damage(&mut self, _amount: i32) -> DamageResult {
        if !self.policy.decrement_when_damaged || self.pierce <= 0 {
            return DamageResult::no_damage();
        }
        self.pierce -= 1;
        DamageResult {
            damage_dealt: 1,
            is_fatal: self.pierce == 0,
            overkill: 0,
        }
    }
}

impl CanDealDamage for Bullet {
    fn damage_amount(&self) -> i32 {
        self.stats.damage_points()
    }

    /// Hits each target at most once (until an orbit reset) while pierce lasts
    fn attack(&mut self, target: &mut dyn Damageable) -> Option<DamageResult> {
        if self.pierce <= 0 || self.attacked.contains(&target.id()) {
            return None;
        }

        let result = target.take_damage(self.damage_amount());
        self.attacked.push(target.id());
        if self.policy.decrement_on_hit {
            self.pierce = (self.pierce - 1).max(0);
        }
        Some(result)
    }
}

impl Collidable for Bullet {
    fn get_bounds(&self) -> Rect {
        self.body.sprite.rect()
    }
}

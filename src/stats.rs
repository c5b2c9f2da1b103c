//! Health and stat blocks for the player, monsters and projectiles
//!
//! This module provides the value types the rest of the simulation composes:
//! - `Health`: integer hit points clamped at zero
//! - `ProjectileStatsMultiplier`: percentage modifiers coming from passive items
//! - `PlayerStats`: the player's stat block (with an embedded multiplier)
//! - `ProjectileStats`: concrete numbers of one weapon's projectiles
//! - `MonsterStats`: per-species monster numbers
//!
//! # Design Philosophy
//!
//! Stat blocks are small `Copy` values combined with operators. Passive items
//! each contribute a `PlayerStats`, and the inventory folds them together with
//! `+` starting from `PlayerStats::empty()`. Weapons multiply their stored
//! `ProjectileStats` by the player's multiplier at fire time.
//!
//! # Rust Learning Notes
//!
//! - **Operator overloading**: `impl Add`/`Sub`/`Mul` give the stat algebra
//!   a natural syntax (`base + bonus`, `stored * multiplier`)
//! - **Several `Add` impls for one type**: `PlayerStats + PlayerStats` and
//!   `PlayerStats + ProjectileStatsMultiplier` are both valid
//! - **NewType Pattern**: `Health` keeps the clamping rules in one place

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Represents an entity's hit points
///
/// # Example
///
/// ```rust
/// use horde_survivor::stats::Health;
///
/// let mut health = Health::new(100);
/// health.take_damage(30);
/// assert_eq!(health.current(), 70);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Creates a new Health instance with full health
    pub fn new(max: i32) -> Self {
        Health { current: max, max }
    }

    /// Creates health at an arbitrary value (loaded saves, tests)
    pub fn with_current(current: i32, max: i32) -> Self {
        Health {
            current: current.max(0),
            max,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns health as a percentage (0.0 to 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Applies damage, never going below zero
    ///
    /// # Example
    ///
    /// ```rust
    /// use horde_survivor::stats::Health;
    ///
    /// let mut health = Health::new(10);
    /// let result = health.take_damage(15);
    /// assert_eq!(result.damage_dealt, 10);
    /// assert!(result.is_fatal);
    /// assert_eq!(result.overkill, 5);
    /// ```
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        let amount = amount.max(0);
        let old_health = self.current;
        self.current = (self.current - amount).max(0);

        DamageResult {
            damage_dealt: old_health - self.current,
            is_fatal: self.current <= 0,
            overkill: if self.current <= 0 {
                amount - old_health
            } else {
                0
            },
        }
    }

    /// Heals, capped at max health
    ///
    /// Returns the amount actually healed. Health above max (e.g. right after
    /// a max-health penalty) is left alone rather than cut down.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old_health = self.current;
        if self.current < self.max {
            self.current = (self.current + amount.max(0)).min(self.max);
        }
        self.current - old_health
    }

    /// Sets the maximum health and adjusts current health if needed
    pub fn set_max(&mut self, new_max: i32) {
        self.max = new_max;
        if self.current > self.max {
            self.current = self.max.max(0);
        }
    }
}

/// Result of a damage operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    /// Actual damage dealt (may be less than requested if target had less health)
    pub damage_dealt: i32,
    /// Whether this damage left the target at zero
    pub is_fatal: bool,
    /// Excess damage beyond what was needed to kill (0 if not fatal)
    pub overkill: i32,
}

impl DamageResult {
    /// Creates a result representing no damage dealt
    pub fn no_damage() -> Self {
        DamageResult {
            damage_dealt: 0,
            is_fatal: false,
            overkill: 0,
        }
    }
}

/// Percentage modifiers applied to weapon stats at fire time
///
/// 100 means "unchanged". A player's multiplier is the base preset (all 100)
/// plus whatever passive items add on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectileStatsMultiplier {
    pub power: i32,
    pub velocity: i32,
    pub duration: i32,
    pub area_of_effect: i32,
    pub reload_time: i32,
}

impl ProjectileStatsMultiplier {
    pub fn new(power: i32, velocity: i32, duration: i32, area_of_effect: i32, reload_time: i32) -> Self {
        ProjectileStatsMultiplier {
            power,
            velocity,
            duration,
            area_of_effect,
            reload_time,
        }
    }

    /// Neutral multiplier: every field at 100%
    pub fn base() -> Self {
        Self::new(100, 100, 100, 100, 100)
    }

    /// All zero, used as the starting point when summing bonuses
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }
}

impl Add for ProjectileStatsMultiplier {
    type Output = ProjectileStatsMultiplier;

    fn add(self, other: ProjectileStatsMultiplier) -> Self::Output {
        ProjectileStatsMultiplier {
            power: self.power + other.power,
            velocity: self.velocity + other.velocity,
            duration: self.duration + other.duration,
            area_of_effect: self.area_of_effect + other.area_of_effect,
            reload_time: self.reload_time + other.reload_time,
        }
    }
}

impl Sub for ProjectileStatsMultiplier {
    type Output = ProjectileStatsMultiplier;

    fn sub(self, other: ProjectileStatsMultiplier) -> Self::Output {
        ProjectileStatsMultiplier {
            power: self.power - other.power,
            velocity: self.velocity - other.velocity,
            duration: self.duration - other.duration,
            area_of_effect: self.area_of_effect - other.area_of_effect,
            reload_time: self.reload_time - other.reload_time,
        }
    }
}

/// The player's stat block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health: i32,
    /// Health regenerated every tick
    pub recovery: i32,
    /// Flat damage reduction
    pub armor: i32,
    pub movement_speed: f32,
    pub lives: i32,
    pub projectile_multiplier: ProjectileStatsMultiplier,
}

impl PlayerStats {
    pub fn new(
        max_health: i32,
        recovery: i32,
        armor: i32,
        movement_speed: f32,
        lives: i32,
        projectile_multiplier: ProjectileStatsMultiplier,
    ) -> Self {
        PlayerStats {
            max_health,
            recovery,
            armor,
            movement_speed,
            lives,
            projectile_multiplier,
        }
    }

    /// Starting stats of a fresh player
    pub fn base() -> Self {
        Self::new(100, 0, 0, 5.0, 0, ProjectileStatsMultiplier::base())
    }

    /// All zero, the identity for `+`
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0.0, 0, ProjectileStatsMultiplier::empty())
    }
}

impl Add for PlayerStats {
    type Output = PlayerStats;

    fn add(self, other: PlayerStats) -> Self::Output {
        PlayerStats {
            max_health: self.max_health + other.max_health,
            recovery: self.recovery + other.recovery,
            armor: self.armor + other.armor,
            movement_speed: self.movement_speed + other.movement_speed,
            lives: self.lives + other.lives,
            projectile_multiplier: self.projectile_multiplier + other.projectile_multiplier,
        }
    }
}

impl Sub for PlayerStats {
    type Output = PlayerStats;

    fn sub(self, other: PlayerStats) -> Self::Output {
        PlayerStats {
            max_health: self.max_health - other.max_health,
            recovery: self.recovery - other.recovery,
            armor: self.armor - other.armor,
            movement_speed: self.movement_speed - other.movement_speed,
            lives: self.lives - other.lives,
            projectile_multiplier: self.projectile_multiplier - other.projectile_multiplier,
        }
    }
}

/// Adding a bare multiplier only touches the embedded multiplier
impl Add<ProjectileStatsMultiplier> for PlayerStats {
    type Output = PlayerStats;

    fn add(self, other: ProjectileStatsMultiplier) -> Self::Output {
        PlayerStats {
            projectile_multiplier: self.projectile_multiplier + other,
            ..self
        }
    }
}

impl Sub<ProjectileStatsMultiplier> for PlayerStats {
    type Output = PlayerStats;

    fn sub(self, other: ProjectileStatsMultiplier) -> Self::Output {
        PlayerStats {
            projectile_multiplier: self.projectile_multiplier - other,
            ..self
        }
    }
}

/// Concrete numbers for one weapon's projectiles
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectileStats {
    pub damage: f32,
    pub velocity: f32,
    /// Sprite scale factor
    pub area_of_effect: f32,
    /// Milliseconds between shots
    pub reload_time: f32,
    /// Distinct hits before the projectile is spent
    pub pierce: i32,
    /// Lifespan in milliseconds
    pub duration: f32,
}

impl ProjectileStats {
    pub fn new(damage: f32, velocity: f32, area_of_effect: f32, reload_time: f32, pierce: i32, duration: f32) -> Self {
        ProjectileStats {
            damage,
            velocity,
            area_of_effect,
            reload_time,
            pierce,
            duration,
        }
    }

    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0, 0.0)
    }

    pub fn base() -> Self {
        Self::new(5.0, 5.0, 1.0, 300.0, 1, 1000.0)
    }

    /// Damage rounded to whole hit points
    pub fn damage_points(&self) -> i32 {
        self.damage.round() as i32
    }
}

/// Applies the player's percentage modifiers
///
/// `effective.field = stored.field * (multiplier.field / 100)`; power scales
/// damage and pierce is never scaled.
///
/// # Example
///
/// ```rust
/// use horde_survivor::stats::{ProjectileStats, ProjectileStatsMultiplier};
///
/// let stored = ProjectileStats::new(10.0, 5.0, 1.0, 500.0, 2, 1000.0);
/// let multiplier = ProjectileStatsMultiplier::new(150, 100, 100, 100, 50);
/// let effective = stored * multiplier;
/// assert_eq!(effective.damage, 15.0);
/// assert_eq!(effective.reload_time, 250.0);
/// assert_eq!(effective.pierce, 2);
/// ```
impl Mul<ProjectileStatsMultiplier> for ProjectileStats {
    type Output = ProjectileStats;

    fn mul(self, multiplier: ProjectileStatsMultiplier) -> Self::Output {
        let scale = |value: f32, percent: i32| value * (percent as f32 / 100.0);

        ProjectileStats {
            damage: scale(self.damage, multiplier.power),
            velocity: scale(self.velocity, multiplier.velocity),
            area_of_effect: scale(self.area_of_effect, multiplier.area_of_effect),
            reload_time: scale(self.reload_time, multiplier.reload_time),
            pierce: self.pierce,
            duration: scale(self.duration, multiplier.duration),
        }
    }
}

/// Applies an upgrade delta field by field (pierce included)
impl Add for ProjectileStats {
    type Output = ProjectileStats;

    fn add(self, delta: ProjectileStats) -> Self::Output {
        ProjectileStats {
            damage: self.damage + delta.damage,
            velocity: self.velocity + delta.velocity,
            area_of_effect: self.area_of_effect + delta.area_of_effect,
            reload_time: self.reload_time + delta.reload_time,
            pierce: self.pierce + delta.pierce,
            duration: self.duration + delta.duration,
        }
    }
}

/// Per-species monster numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    pub speed: f32,
    pub health: i32,
    pub damage: i32,
    /// Milliseconds between contact hits on the same target
    pub attack_cooldown: f32,
    /// Experience dropped on death
    pub xp_drop: u32,
}

impl MonsterStats {
    pub fn new(speed: f32, health: i32, damage: i32, attack_cooldown: f32, xp_drop: u32) -> Self {
        MonsterStats {
            speed,
            health,
            damage,
            attack_cooldown,
            xp_drop,
        }
    }
}

impl Default for MonsterStats {
    fn default() -> Self {
        Self::new(2.0, 10, 10, 1000.0, 1)
    }
}

//! Combat capabilities and per-pair hit bookkeeping
//!
//! This module provides the combat layer on top of the stats system, including:
//! - `Damageable` / `CanDealDamage` capability traits
//! - Per-target attack cooldowns (`AttackCooldowns`)
//! - Flat armor reduction
//!
//! # Rust Learning Notes
//!
//! This module demonstrates:
//! - **Trait objects**: `attack(&mut self, target: &mut dyn Damageable)` lets a
//!   bullet hit a monster and a monster hit the player through one signature
//! - **HashMap keyed by handles**: cooldowns are keyed by `EntityId`, not by
//!   references, so the map never borrows the entities it tracks
//! - **Entry API**: `entries.entry(target)` inserts or updates in one lookup

use crate::clock::GameClock;
use crate::cooldown::Cooldown;
use crate::entity::EntityId;
use crate::stats::DamageResult;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Something that has hit points and can be hurt
///
/// Projectiles implement this too: their "health" is the remaining pierce
/// count, and whether taking damage decrements it depends on the projectile.
pub trait Damageable {
    fn id(&self) -> EntityId;

    /// Current health (or pierce, for projectiles); never negative
    fn health_points(&self) -> i32;

    /// Applies `amount` of raw damage, clamping health at zero
    fn take_damage(&mut self, amount: i32) -> DamageResult;

    fn is_dead(&self) -> bool {
        self.health_points() <= 0
    }
}

/// Something that can deal damage on contact
pub trait CanDealDamage {
    /// Raw damage this attacker deals per hit
    fn damage_amount(&self) -> i32;

    /// Tries to damage `target`
    ///
    /// Returns `None` when the hit was refused (cooldown running, target
    /// already hit, no pierce left).
    fn attack(&mut self, target: &mut dyn Damageable) -> Option<DamageResult>;
}

/// Flat armor reduction, floored at zero
///
/// # Example
///
/// ```rust
/// use horde_survivor::combat::apply_armor;
///
/// assert_eq!(apply_armor(25, 0), 25);
/// assert_eq!(apply_armor(25, 10), 15);
/// assert_eq!(apply_armor(5, 10), 0);
/// ```
pub fn apply_armor(damage: i32, armor: i32) -> i32 {
    (damage - armor.max(0)).max(0)
}

/// Per-target contact cooldowns for one attacker
///
/// An entry for a target exists only after the first successful hit on it.
/// The first hit on a new target always lands; later hits wait out the
/// cooldown measured on the game clock.
///
/// # Example
///
/// ```rust
/// use horde_survivor::clock::GameClock;
/// use horde_survivor::combat::AttackCooldowns;
/// use horde_survivor::entity::EntityId;
///
/// let clock = GameClock::new();
/// let mut cooldowns = AttackCooldowns::new(&clock, 1000.0);
/// let target = EntityId(7);
///
/// assert!(cooldowns.try_hit(target));
/// assert!(!cooldowns.try_hit(target));
///
/// clock.advance(1.0);
/// assert!(cooldowns.try_hit(target));
/// ```
#[derive(Debug, Clone)]
pub struct AttackCooldowns {
    clock: GameClock,
    cooldown_ms: f64,
    entries: HashMap<EntityId, Cooldown>,
}

impl AttackCooldowns {
    pub fn new(clock: &GameClock, cooldown_ms: f64) -> Self {
        AttackCooldowns {
            clock: clock.clone(),
            cooldown_ms,
            entries: HashMap::new(),
        }
    }

    /// Returns true (and re-arms the pair's timer) when `target` may be hit now
    pub fn try_hit(&mut self, target: EntityId) -> bool {
        match self.entries.entry(target) {
            Entry::Occupied(mut entry) => {
                let cooldown = entry.get_mut();
                if !cooldown.is_ready() {
                    return false;
                }
                cooldown.trigger();
                true
            }
            Entry::Vacant(entry) => {
                // A fresh Cooldown is already armed from the current time
                entry.insert(Cooldown::new(&self.clock, self.cooldown_ms));
                true
            }
        }
    }

    /// Drops the entry for a target that left the world
    pub fn forget(&mut self, target: EntityId) {
        self.entries.remove(&target);
    }

    pub fn has_entry(&self, target: EntityId) -> bool {
        self.entries.contains_key(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cooldown_ms(&self) -> f64 {
        self.cooldown_ms
    }
}

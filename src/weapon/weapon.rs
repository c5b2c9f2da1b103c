use super::upgrade::UpgradeTrack;
use crate::clock::GameClock;
use crate::cooldown::Cooldown;
use crate::inventory::InventoryError;
use crate::projectile::{AttackShape, Bullet, FireContext};
use crate::stats::ProjectileStats;

/// An owned weapon that fires on its own reload cooldown
///
/// The stored stats are the weapon's own numbers; the player's multipliers are
/// applied only at fire time, so passive items affect the very next shot.
#[derive(Debug, Clone)]
pub struct Weapon {
    name: String,
    shape: AttackShape,
    stats: ProjectileStats,
    track: UpgradeTrack,
    level: u32,
    cooldown: Cooldown,
}

impl Weapon {
    pub fn new(
        name: impl Into<String>,
        shape: AttackShape,
        stats: ProjectileStats,
        track: UpgradeTrack,
        clock: &GameClock,
    ) -> Self {
        Weapon {
            name: name.into(),
            shape,
            stats,
            track,
            level: 1,
            cooldown: Cooldown::new(clock, f64::from(stats.reload_time)),
        }
    }

    /// Fires one projectile if the reload cooldown has elapsed
    ///
    /// The cooldown is re-armed with the *effective* reload time, so reload
    /// bonuses shorten the next interval immediately.
    pub fn update(&mut self, ctx: &mut FireContext) -> Option<Bullet> {
        if !self.cooldown.is_ready() {
            return None;
        }

        let effective = self.stats * ctx.multiplier;
        self.cooldown.set_duration(f64::from(effective.reload_time.max(0.0)));
        self.cooldown.trigger();

        Some(self.shape.create_projectile(effective, ctx))
    }

    pub fn can_be_upgraded(&self) -> bool {
        self.level < self.max_level()
    }

    /// Applies the next tier of the upgrade track
    ///
    /// # Errors
    /// `InventoryError::InvalidLevelUp` when already at max level.
    pub fn upgrade(&mut self) -> Result<(), InventoryError> {
        let delta = match self.track.delta_from(self.level) {
            Some(delta) if self.can_be_upgraded() => *delta,
            _ => {
                return Err(InventoryError::InvalidLevelUp {
                    name: self.name.clone(),
                    level: self.level,
                    max_level: self.max_level(),
                });
            }
        };

        self.stats = self.stats + delta;
        self.level += 1;
        log::info!("{} upgraded to level {}", self.name, self.level);
        Ok(())
    }

    /// Description of what the next upgrade does
    pub fn upgrade_info(&self) -> String {
        self.track.describe(self.level)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> AttackShape {
        self.shape
    }

    pub fn stats(&self) -> &ProjectileStats {
        &self.stats
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.track.max_level()
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }
}

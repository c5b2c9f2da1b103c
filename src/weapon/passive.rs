use crate::inventory::InventoryError;
use crate::stats::{PlayerStats, ProjectileStatsMultiplier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single player stat a passive item raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveStat {
    Power,
    Armor,
    MaxHealth,
    Recovery,
    ReloadTime,
    AreaOfEffect,
    Velocity,
    Duration,
    MovementSpeed,
}

impl PassiveStat {
    /// Stat block with only this stat set to `amount`
    pub fn stats_for(&self, amount: i32) -> PlayerStats {
        let empty = PlayerStats::empty();
        let multiplier = |m: ProjectileStatsMultiplier| empty + m;
        let none = ProjectileStatsMultiplier::empty();

        match self {
            PassiveStat::Power => multiplier(ProjectileStatsMultiplier { power: amount, ..none }),
            PassiveStat::Velocity => multiplier(ProjectileStatsMultiplier { velocity: amount, ..none }),
            PassiveStat::Duration => multiplier(ProjectileStatsMultiplier { duration: amount, ..none }),
            PassiveStat::AreaOfEffect => multiplier(ProjectileStatsMultiplier {
                area_of_effect: amount,
                ..none
            }),
            PassiveStat::ReloadTime => multiplier(ProjectileStatsMultiplier {
                reload_time: amount,
                ..none
            }),
            PassiveStat::Armor => PlayerStats { armor: amount, ..empty },
            PassiveStat::MaxHealth => PlayerStats {
                max_health: amount,
                ..empty
            },
            PassiveStat::Recovery => PlayerStats {
                recovery: amount,
                ..empty
            },
            PassiveStat::MovementSpeed => PlayerStats {
                movement_speed: amount as f32,
                ..empty
            },
        }
    }
}

impl fmt::Display for PassiveStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassiveStat::Power => "power",
            PassiveStat::Armor => "armor",
            PassiveStat::MaxHealth => "max health",
            PassiveStat::Recovery => "recovery",
            PassiveStat::ReloadTime => "reload time",
            PassiveStat::AreaOfEffect => "area",
            PassiveStat::Velocity => "projectile speed",
            PassiveStat::Duration => "duration",
            PassiveStat::MovementSpeed => "movement speed",
        };
        write!(f, "{}", name)
    }
}

/// An owned passive item; contributes `level × increase` to one stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveItem {
    name: String,
    stat: PassiveStat,
    increase: i32,
    level: u32,
    max_level: u32,
}

impl PassiveItem {
    pub fn new(name: impl Into<String>, stat: PassiveStat, increase: i32, max_level: u32) -> Self {
        PassiveItem {
            name: name.into(),
            stat,
            increase,
            level: 1,
            max_level: max_level.max(1),
        }
    }

    /// This item's contribution to the player's stats at its current level
    ///
    /// # Example
    ///
    /// ```rust
    /// use horde_survivor::weapon::{PassiveItem, PassiveStat};
    ///
    /// let mut spinach = PassiveItem::new("Spinach", PassiveStat::Power, 10, 5);
    /// spinach.upgrade().unwrap();
    ///
    /// assert_eq!(spinach.stats().projectile_multiplier.power, 20);
    /// ```
    pub fn stats(&self) -> PlayerStats {
        self.stat.stats_for(self.increase * self.level as i32)
    }

    pub fn can_be_upgraded(&self) -> bool {
        self.level < self.max_level
    }

    /// # Errors
    /// `InventoryError::InvalidLevelUp` when already at max level.
    pub fn upgrade(&mut self) -> Result<(), InventoryError> {
        if !self.can_be_upgraded() {
            return Err(InventoryError::InvalidLevelUp {
                name: self.name.clone(),
                level: self.level,
                max_level: self.max_level,
            });
        }
        self.level += 1;
        log::info!("{} upgraded to level {}", self.name, self.level);
        Ok(())
    }

    pub fn upgrade_info(&self) -> String {
        if !self.can_be_upgraded() {
            return "Max level".to_string();
        }
        describe_increase(self.stat, self.increase)
    }

    /// Jumps straight to `level` (clamped to the item's range); used on load
    pub fn set_level(&mut self, level: u32) {
        self.level = level.clamp(1, self.max_level);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stat(&self) -> PassiveStat {
        self.stat
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }
}

pub fn describe_increase(stat: PassiveStat, increase: i32) -> String {
    let verb = if increase >= 0 { "Increases" } else { "Decreases" };
    format!("{} {} by {}", verb, stat, increase.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_scales_with_level() {
        let mut heart = PassiveItem::new("Hollow Heart", PassiveStat::MaxHealth, 20, 5);
        assert_eq!(heart.stats().max_health, 20);

        heart.upgrade().unwrap();
        heart.upgrade().unwrap();
        assert_eq!(heart.stats().max_health, 60);
        assert_eq!(heart.stats().armor, 0);
    }

    #[test]
    fn test_negative_increase_lowers_multiplier() {
        let tome = PassiveItem::new("Empty Tome", PassiveStat::ReloadTime, -8, 5);
        assert_eq!(tome.stats().projectile_multiplier.reload_time, -8);
        assert_eq!(tome.upgrade_info(), "Decreases reload time by 8");
    }

    #[test]
    fn test_upgrade_past_max_fails() {
        let mut wings = PassiveItem::new("Wings", PassiveStat::MovementSpeed, 1, 2);
        wings.upgrade().unwrap();
        assert!(matches!(wings.upgrade(), Err(InventoryError::InvalidLevelUp { level: 2, .. })));
        assert_eq!(wings.stats().movement_speed, 2.0);
    }
}

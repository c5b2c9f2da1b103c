//! The canonical list of weapons and passive items
//!
//! The catalog is what unlock offers are drawn from and what saved items are
//! rebuilt from. It is built in code by [`Catalog::create_default`] and can
//! also be read from JSON.

use super::passive::{PassiveItem, PassiveStat, describe_increase};
use super::upgrade::UpgradeTrack;
use super::weapon::Weapon;
use crate::clock::GameClock;
use crate::config::{ConfigError, load_json};
use crate::inventory::InventoryError;
use crate::projectile::AttackShape;
use crate::stats::ProjectileStats;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of levels for items without an explicit track
pub const DEFAULT_MAX_LEVEL: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponEntry {
    pub name: String,
    pub shape: AttackShape,
    pub stats: ProjectileStats,
    pub track: UpgradeTrack,
    pub unlock_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveEntry {
    pub name: String,
    pub stat: PassiveStat,
    pub increase: i32,
    pub max_level: u32,
    pub unlock_info: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub weapons: Vec<WeaponEntry>,
    pub passives: Vec<PassiveEntry>,
}

impl Catalog {
    /// Name of the weapon every new run starts with
    pub const STARTING_WEAPON: &'static str = "Green Wand";

    /// Builds the catalog with every base weapon and passive item
    pub fn create_default() -> Self {
        let mut catalog = Catalog::default();
        catalog.register_base_weapons();
        catalog.register_base_passives();
        catalog
    }

    /// Loads a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path)
    }

    fn register_base_weapons(&mut self) {
        let delta = |damage: f32, area: f32, reload: f32, pierce: i32, duration: f32| ProjectileStats {
            damage,
            area_of_effect: area,
            reload_time: reload,
            pierce,
            duration,
            ..ProjectileStats::empty()
        };

        // Homing: shoots at the nearest monster
        self.register_weapon(
            "Green Wand",
            AttackShape::Homing,
            ProjectileStats::new(5.0, 5.0, 1.0, 500.0, 1, 1000.0),
            vec![
                delta(5.0, 0.0, 0.0, 0, 0.0),
                delta(0.0, 0.0, -100.0, 0, 0.0),
                delta(0.0, 0.0, 0.0, 1, 0.0),
                delta(10.0, 0.0, 0.0, 0, 0.0),
            ],
            "Fires at the nearest enemy",
        );
        self.register_weapon(
            "Red Wand",
            AttackShape::Homing,
            ProjectileStats::new(10.0, 5.0, 1.5, 300.0, 2, 1000.0),
            vec![
                delta(5.0, 0.0, 0.0, 0, 0.0),
                delta(0.0, 0.0, 0.0, 1, 0.0),
                delta(0.0, 0.5, -50.0, 0, 0.0),
                delta(10.0, 0.0, 0.0, 1, 0.0),
            ],
            "Heavy bolts that pierce the nearest enemies",
        );

        // Random: direction picked at creation
        self.register_weapon(
            "Big Bow",
            AttackShape::Random,
            ProjectileStats::new(20.0, 3.0, 3.0, 3000.0, 10, 500.0),
            vec![
                delta(10.0, 0.0, 0.0, 0, 0.0),
                delta(0.0, 0.0, -500.0, 0, 0.0),
                delta(0.0, 1.0, 0.0, 5, 0.0),
                delta(20.0, 0.0, -500.0, 0, 0.0),
            ],
            "Huge arrows flying in random directions",
        );

        // Orbiting: circles the player
        self.register_weapon(
            "Bible",
            AttackShape::Orbiting,
            ProjectileStats::new(4.0, 20.0, 1.0, 400.0, 100, 2000.0),
            vec![
                delta(2.0, 0.0, 0.0, 0, 0.0),
                delta(0.0, 0.0, 0.0, 0, 500.0),
                delta(0.0, 0.5, 0.0, 0, 0.0),
                delta(4.0, 0.0, 0.0, 0, 1000.0),
            ],
            "Orbits around you",
        );

        // Area: lands on a random visible monster
        self.register_weapon(
            "Spectral Wand",
            AttackShape::Area,
            ProjectileStats::new(2.0, 0.0, 6.0, 700.0, 80, 300.0),
            vec![
                delta(1.0, 0.0, 0.0, 0, 0.0),
                delta(0.0, 1.0, 0.0, 0, 0.0),
                delta(0.0, 0.0, -100.0, 0, 100.0),
                delta(2.0, 1.0, 0.0, 0, 0.0),
            ],
            "Haunts a random enemy on screen",
        );
    }

    fn register_base_passives(&mut self) {
        let base = [
            ("Spinach", PassiveStat::Power, 10),
            ("Armor", PassiveStat::Armor, 1),
            ("Hollow Heart", PassiveStat::MaxHealth, 20),
            ("Pummarola", PassiveStat::Recovery, 1),
            ("Empty Tome", PassiveStat::ReloadTime, -8),
            ("Candelabrador", PassiveStat::AreaOfEffect, 10),
            ("Bracer", PassiveStat::Velocity, 10),
            ("Spellbinder", PassiveStat::Duration, 10),
            ("Wings", PassiveStat::MovementSpeed, 1),
        ];

        for (name, stat, increase) in base {
            self.passives.push(PassiveEntry {
                name: name.to_string(),
                stat,
                increase,
                max_level: DEFAULT_MAX_LEVEL,
                unlock_info: describe_increase(stat, increase),
            });
        }
    }

    fn register_weapon(
        &mut self,
        name: &str,
        shape: AttackShape,
        stats: ProjectileStats,
        levels: Vec<ProjectileStats>,
        unlock_info: &str,
    ) {
        self.weapons.push(WeaponEntry {
            name: name.to_string(),
            shape,
            stats,
            track: UpgradeTrack::new(levels),
            unlock_info: unlock_info.to_string(),
        });
    }

    pub fn weapon_entry(&self, name: &str) -> Option<&WeaponEntry> {
        self.weapons.iter().find(|entry| entry.name == name)
    }

    pub fn passive_entry(&self, name: &str) -> Option<&PassiveEntry> {
        self.passives.iter().find(|entry| entry.name == name)
    }

    /// Builds a weapon at `level`, applying every upgrade tier below it
    ///
    /// # Errors
    /// `InvalidItem` for unknown names, `InvalidLevelUp` if `level` is past
    /// the weapon's track.
    pub fn weapon_by_name(&self, name: &str, level: u32, clock: &GameClock) -> Result<Weapon, InventoryError> {
        let entry = self
            .weapon_entry(name)
            .ok_or_else(|| InventoryError::InvalidItem(name.to_string()))?;

        let mut weapon = Weapon::new(&entry.name, entry.shape, entry.stats, entry.track.clone(), clock);
        for _ in 1..level {
            weapon.upgrade()?;
        }
        Ok(weapon)
    }

    /// Builds a passive item at `level` (clamped to its range)
    pub fn passive_by_name(&self, name: &str, level: u32) -> Result<PassiveItem, InventoryError> {
        let entry = self
            .passive_entry(name)
            .ok_or_else(|| InventoryError::InvalidItem(name.to_string()))?;

        let mut item = PassiveItem::new(&entry.name, entry.stat, entry.increase, entry.max_level);
        item.set_level(level);
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_contents() {
        let catalog = Catalog::create_default();

        assert_eq!(catalog.weapons.len(), 5);
        assert_eq!(catalog.passives.len(), 9);
        assert!(catalog.weapon_entry(Catalog::STARTING_WEAPON).is_some());
        for entry in &catalog.weapons {
            assert_eq!(entry.track.max_level(), DEFAULT_MAX_LEVEL, "{}", entry.name);
        }
    }

    #[test]
    fn test_weapon_by_name_applies_levels() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();

        let wand = catalog.weapon_by_name("Green Wand", 2, &clock).unwrap();
        assert_eq!(wand.level(), 2);
        assert_eq!(wand.stats().damage, 10.0);

        let bible = catalog.weapon_by_name("Bible", 1, &clock).unwrap();
        assert_eq!(bible.shape(), AttackShape::Orbiting);
    }

    #[test]
    fn test_unknown_names_are_invalid_items() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();

        assert_eq!(
            catalog.weapon_by_name("Laser", 1, &clock).unwrap_err(),
            InventoryError::InvalidItem("Laser".to_string())
        );
        assert!(matches!(
            catalog.passive_by_name("Laser", 1),
            Err(InventoryError::InvalidItem(_))
        ));
    }

    #[test]
    fn test_weapon_past_track_is_rejected() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();

        assert!(matches!(
            catalog.weapon_by_name("Green Wand", 6, &clock),
            Err(InventoryError::InvalidLevelUp { .. })
        ));
    }

    #[test]
    fn test_catalog_json_round_trip() {
        let catalog = Catalog::create_default();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_passive_by_name_clamps_level() {
        let catalog = Catalog::create_default();
        let armor = catalog.passive_by_name("Armor", 9).unwrap();
        assert_eq!(armor.level(), DEFAULT_MAX_LEVEL);
        assert_eq!(armor.stats().armor, 5);
    }
}

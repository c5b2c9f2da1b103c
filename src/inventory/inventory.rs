use super::actions::{UpgradeAction, UpgradeActionKind};
use super::error::{InventoryError, ItemKind};
use crate::projectile::{Bullet, FireContext};
use crate::stats::PlayerStats;
use crate::weapon::{Catalog, PassiveItem, Weapon};

/// Anything the inventory can hold
#[derive(Debug, Clone)]
pub enum InventoryItem {
    Weapon(Weapon),
    Passive(PassiveItem),
}

impl InventoryItem {
    pub fn name(&self) -> &str {
        match self {
            InventoryItem::Weapon(weapon) => weapon.name(),
            InventoryItem::Passive(item) => item.name(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            InventoryItem::Weapon(_) => ItemKind::Weapon,
            InventoryItem::Passive(_) => ItemKind::Passive,
        }
    }
}

/// The player's weapons and passive items
///
/// Weapons and passives are two separate lists, each capped at `max_size`.
/// A full list rejects new items; nothing is ever truncated.
#[derive(Debug, Clone)]
pub struct Inventory {
    weapons: Vec<Weapon>,
    passives: Vec<PassiveItem>,
    max_size: usize,
}

impl Inventory {
    /// Creates an empty inventory with `max_size` slots per list
    pub fn new(max_size: usize) -> Self {
        Inventory {
            weapons: Vec::new(),
            passives: Vec::new(),
            max_size,
        }
    }

    /// Adds a weapon or passive item
    ///
    /// # Errors
    /// `InventoryFull` if the matching list is at capacity.
    pub fn add_item(&mut self, item: InventoryItem) -> Result<(), InventoryError> {
        let kind = item.kind();
        if self.is_full(kind) {
            log::warn!("Can't add {}: {} slots full", item.name(), kind);
            return Err(InventoryError::InventoryFull {
                kind,
                capacity: self.max_size,
            });
        }

        log::info!("Added {} '{}' to inventory", kind, item.name());
        match item {
            InventoryItem::Weapon(weapon) => self.weapons.push(weapon),
            InventoryItem::Passive(passive) => self.passives.push(passive),
        }
        Ok(())
    }

    pub fn add_weapon(&mut self, weapon: Weapon) -> Result<(), InventoryError> {
        self.add_item(InventoryItem::Weapon(weapon))
    }

    pub fn add_passive(&mut self, passive: PassiveItem) -> Result<(), InventoryError> {
        self.add_item(InventoryItem::Passive(passive))
    }

    /// Levels up the owned item called `name`
    ///
    /// # Errors
    /// `ItemNotFound` if nothing by that name is owned, `InvalidLevelUp` if it
    /// is already at max level.
    pub fn upgrade_item(&mut self, name: &str) -> Result<(), InventoryError> {
        if let Some(weapon) = self.weapons.iter_mut().find(|weapon| weapon.name() == name) {
            return weapon.upgrade();
        }
        if let Some(passive) = self.passives.iter_mut().find(|passive| passive.name() == name) {
            return passive.upgrade();
        }

        log::warn!("Tried to upgrade '{}', which isn't owned", name);
        Err(InventoryError::ItemNotFound(name.to_string()))
    }

    /// Sum of every passive item's contribution, starting from the empty block
    ///
    /// Recomputed on every call so it always reflects what is owned right now.
    pub fn get_combined_stats(&self) -> PlayerStats {
        self.passives
            .iter()
            .fold(PlayerStats::empty(), |total, passive| total + passive.stats())
    }

    /// Upgrade offers for owned items plus unlock offers for everything else
    pub fn get_possible_actions(&self, catalog: &Catalog) -> Vec<UpgradeAction> {
        let mut actions = Vec::new();

        for weapon in self.weapons.iter().filter(|weapon| weapon.can_be_upgraded()) {
            actions.push(UpgradeAction {
                description: format!("{} (level {}): {}", weapon.name(), weapon.level() + 1, weapon.upgrade_info()),
                kind: UpgradeActionKind::Upgrade(weapon.name().to_string()),
            });
        }
        for passive in self.passives.iter().filter(|passive| passive.can_be_upgraded()) {
            actions.push(UpgradeAction {
                description: format!("{} (level {}): {}", passive.name(), passive.level() + 1, passive.upgrade_info()),
                kind: UpgradeActionKind::Upgrade(passive.name().to_string()),
            });
        }

        for entry in catalog.weapons.iter().filter(|entry| !self.has_item(&entry.name)) {
            actions.push(UpgradeAction {
                description: format!("New weapon {}: {}", entry.name, entry.unlock_info),
                kind: UpgradeActionKind::UnlockWeapon(entry.name.clone()),
            });
        }
        for entry in catalog.passives.iter().filter(|entry| !self.has_item(&entry.name)) {
            actions.push(UpgradeAction {
                description: format!("New item {}: {}", entry.name, entry.unlock_info),
                kind: UpgradeActionKind::UnlockPassive(entry.name.clone()),
            });
        }

        actions
    }

    /// Ticks every owned weapon once and collects what they fired
    pub fn update(&mut self, ctx: &mut FireContext) -> Vec<Bullet> {
        self.weapons.iter_mut().filter_map(|weapon| weapon.update(ctx)).collect()
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.weapons.iter().any(|weapon| weapon.name() == name)
            || self.passives.iter().any(|passive| passive.name() == name)
    }

    pub fn is_full(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Weapon => self.weapons.len() >= self.max_size,
            ItemKind::Passive => self.passives.len() >= self.max_size,
        }
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn passives(&self) -> &[PassiveItem] {
        &self.passives
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty() && self.passives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::config::GameConfig;
    use crate::entity::EntityIdAllocator;
    use crate::stats::ProjectileStatsMultiplier;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog_weapon(name: &str, clock: &GameClock) -> Weapon {
        Catalog::create_default().weapon_by_name(name, 1, clock).unwrap()
    }

    #[test]
    fn test_full_weapon_list_rejects_sixth() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(5);

        for entry in &catalog.weapons {
            inventory.add_weapon(catalog_weapon(&entry.name, &clock)).unwrap();
        }
        assert_eq!(inventory.weapons().len(), 5);

        let result = inventory.add_weapon(catalog_weapon("Green Wand", &clock));
        assert_eq!(
            result,
            Err(InventoryError::InventoryFull {
                kind: ItemKind::Weapon,
                capacity: 5,
            })
        );
        assert_eq!(inventory.weapons().len(), 5);

        // The passive list has its own capacity
        let spinach = catalog.passive_by_name("Spinach", 1).unwrap();
        assert!(inventory.add_passive(spinach).is_ok());
    }

    #[test]
    fn test_upgrade_missing_item() {
        let mut inventory = Inventory::new(5);
        assert_eq!(
            inventory.upgrade_item("Bible"),
            Err(InventoryError::ItemNotFound("Bible".to_string()))
        );
    }

    #[test]
    fn test_upgrade_owned_items() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(5);
        inventory.add_weapon(catalog_weapon("Green Wand", &clock)).unwrap();
        inventory.add_passive(catalog.passive_by_name("Armor", 1).unwrap()).unwrap();

        inventory.upgrade_item("Green Wand").unwrap();
        inventory.upgrade_item("Armor").unwrap();

        assert_eq!(inventory.weapons()[0].level(), 2);
        assert_eq!(inventory.passives()[0].level(), 2);
    }

    #[test]
    fn test_combined_stats_fold_passives() {
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(5);
        assert_eq!(inventory.get_combined_stats(), PlayerStats::empty());

        inventory.add_passive(catalog.passive_by_name("Spinach", 2).unwrap()).unwrap();
        inventory.add_passive(catalog.passive_by_name("Hollow Heart", 1).unwrap()).unwrap();

        let combined = inventory.get_combined_stats();
        assert_eq!(combined.projectile_multiplier.power, 20);
        assert_eq!(combined.max_health, 20);
        assert_eq!(combined.armor, 0);
    }

    #[test]
    fn test_possible_actions_cover_upgrades_and_unlocks() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(5);
        inventory.add_weapon(catalog_weapon("Green Wand", &clock)).unwrap();

        let actions = inventory.get_possible_actions(&catalog);

        // 1 upgrade + 4 weapon unlocks + 9 passive unlocks
        assert_eq!(actions.len(), 14);
        assert_eq!(actions[0].kind, UpgradeActionKind::Upgrade("Green Wand".to_string()));
        assert!(!actions
            .iter()
            .any(|action| action.kind == UpgradeActionKind::UnlockWeapon("Green Wand".to_string())));
    }

    #[test]
    fn test_update_fires_every_ready_weapon() {
        let clock = GameClock::new();
        let config = GameConfig::default();
        let mut ids = EntityIdAllocator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut inventory = Inventory::new(5);
        inventory.add_weapon(catalog_weapon("Green Wand", &clock)).unwrap();
        inventory.add_weapon(catalog_weapon("Big Bow", &clock)).unwrap();

        let mut ctx = FireContext {
            origin: (0.0, 0.0),
            multiplier: ProjectileStatsMultiplier::base(),
            clock: &clock,
            ids: &mut ids,
            rng: &mut rng,
            config: &config,
        };

        // Green Wand reloads in 500 ms, Big Bow in 3000 ms
        clock.advance(0.5);
        assert_eq!(inventory.update(&mut ctx).len(), 1);
        clock.advance(2.5);
        assert_eq!(inventory.update(&mut ctx).len(), 2);
    }
}

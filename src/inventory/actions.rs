use super::error::{InventoryError, ItemKind};
use super::inventory::Inventory;
use crate::clock::GameClock;
use crate::weapon::Catalog;

/// What choosing an upgrade offer does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeActionKind {
    /// Level up an owned weapon or passive item
    Upgrade(String),
    /// Add a new weapon from the catalog
    UnlockWeapon(String),
    /// Add a new passive item from the catalog
    UnlockPassive(String),
}

/// One offer on the level-up screen
///
/// Offers are plain data; [`UpgradeAction::apply`] carries them out against
/// the inventory once the player picks one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeAction {
    pub description: String,
    pub kind: UpgradeActionKind,
}

impl UpgradeAction {
    /// False for unlocks into a list that is already full
    pub fn is_applicable(&self, inventory: &Inventory) -> bool {
        match &self.kind {
            UpgradeActionKind::Upgrade(_) => true,
            UpgradeActionKind::UnlockWeapon(_) => !inventory.is_full(ItemKind::Weapon),
            UpgradeActionKind::UnlockPassive(_) => !inventory.is_full(ItemKind::Passive),
        }
    }

    /// Carries out the offer
    ///
    /// # Errors
    /// Whatever the inventory rejects: a full list for unlocks, a missing item
    /// or max level for upgrades, an unknown catalog name.
    pub fn apply(&self, inventory: &mut Inventory, catalog: &Catalog, clock: &GameClock) -> Result<(), InventoryError> {
        match &self.kind {
            UpgradeActionKind::Upgrade(name) => inventory.upgrade_item(name),
            UpgradeActionKind::UnlockWeapon(name) => inventory.add_weapon(catalog.weapon_by_name(name, 1, clock)?),
            UpgradeActionKind::UnlockPassive(name) => inventory.add_passive(catalog.passive_by_name(name, 1)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_and_upgrade() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(5);

        let unlock = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::UnlockPassive("Wings".to_string()),
        };
        unlock.apply(&mut inventory, &catalog, &clock).unwrap();
        assert!(inventory.has_item("Wings"));

        let upgrade = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::Upgrade("Wings".to_string()),
        };
        upgrade.apply(&mut inventory, &catalog, &clock).unwrap();
        assert_eq!(inventory.passives()[0].level(), 2);
    }

    #[test]
    fn test_unlock_into_full_list_fails() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(1);
        inventory.add_weapon(catalog.weapon_by_name("Bible", 1, &clock).unwrap()).unwrap();

        let unlock = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::UnlockWeapon("Red Wand".to_string()),
        };
        assert_eq!(
            unlock.apply(&mut inventory, &catalog, &clock),
            Err(InventoryError::InventoryFull {
                kind: ItemKind::Weapon,
                capacity: 1,
            })
        );
    }

    #[test]
    fn test_unlocks_into_full_list_not_applicable() {
        let clock = GameClock::new();
        let catalog = Catalog::create_default();
        let mut inventory = Inventory::new(1);
        inventory.add_weapon(catalog.weapon_by_name("Bible", 1, &clock).unwrap()).unwrap();

        let weapon = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::UnlockWeapon("Red Wand".to_string()),
        };
        let passive = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::UnlockPassive("Wings".to_string()),
        };
        let upgrade = UpgradeAction {
            description: String::new(),
            kind: UpgradeActionKind::Upgrade("Bible".to_string()),
        };

        assert!(!weapon.is_applicable(&inventory));
        assert!(passive.is_applicable(&inventory));
        assert!(upgrade.is_applicable(&inventory));
    }
}

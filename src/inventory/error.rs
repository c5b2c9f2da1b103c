use std::fmt;

/// The two independently capped lists of the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Weapon,
    Passive,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ItemKind::Weapon => write!(f, "weapon"),
            ItemKind::Passive => write!(f, "passive item"),
        }
    }
}

/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryError {
    /// The list for this kind of item is at capacity
    InventoryFull { kind: ItemKind, capacity: usize },

    /// Name isn't a weapon or passive item the catalog knows
    InvalidItem(String),

    /// Tried to upgrade an item that isn't owned
    ItemNotFound(String),

    /// Item is already at its last level
    InvalidLevelUp {
        name: String,
        level: u32,
        max_level: u32,
    },
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InventoryError::InventoryFull { kind, capacity } => {
                write!(f, "Inventory is full ({} slots for {}s)", capacity, kind)
            }
            InventoryError::InvalidItem(name) => {
                write!(f, "Invalid item: {}", name)
            }
            InventoryError::ItemNotFound(name) => {
                write!(f, "Item not in inventory: {}", name)
            }
            InventoryError::InvalidLevelUp { name, level, max_level } => {
                write!(f, "{} can't level up (level {} of {})", name, level, max_level)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

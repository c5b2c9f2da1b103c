// Inventory system module
//
// This module provides the player's loadout, including:
// - Two capped lists, weapons and passive items
// - Combined passive stat bonuses
// - Upgrade / unlock offers for the level-up screen

pub mod actions;
pub mod error;
pub mod inventory;

// Re-export main types
pub use actions::{UpgradeAction, UpgradeActionKind};
pub use error::{InventoryError, ItemKind};
pub use inventory::{Inventory, InventoryItem};

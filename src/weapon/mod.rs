// Weapons and passive items
//
// This module contains:
// - weapon.rs: Weapon, fires projectiles on its reload cooldown
// - passive.rs: PassiveItem, a leveled bonus to one player stat
// - upgrade.rs: UpgradeTrack, per-level weapon stat deltas
// - catalog.rs: Catalog of every weapon and passive item in the game

pub mod catalog;
pub mod passive;
pub mod upgrade;
pub mod weapon;

// Re-export main types
pub use catalog::Catalog;
pub use passive::{PassiveItem, PassiveStat};
pub use upgrade::UpgradeTrack;
pub use weapon::Weapon;

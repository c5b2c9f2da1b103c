//! Saving and loading runs
//!
//! A save is one pretty-printed JSON file per slot. Each entity is stored as a
//! tagged payload, so a file written by an older build still loads: unknown
//! entity kinds are skipped and missing fields take their defaults.
//!
//! - `types`: the on-disk file layout and `SaveError`
//! - `saveable`: the `Saveable` trait and the `LoadContext` entities are rebuilt against
//! - `entities`: payload structs and `Saveable` impls for player, monsters, bullets and gems
//! - `manager`: slots, autosave timing and file housekeeping
//!
//! ```ignore
//! let mut manager = SaveManager::in_default_directory()?;
//! manager.save_game(&world.snapshot(SaveType::Manual, 1)?)?;
//!
//! let loaded = manager.load_game(1)?;
//! world.restore(&loaded)?;
//! ```

pub mod entities;
pub mod manager;
pub mod saveable;
pub mod types;

pub use manager::{SaveFileInfo, SaveManager};
pub use saveable::{LoadContext, Saveable};
pub use types::*;

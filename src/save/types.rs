//! Save data types
//!
//! This module defines the data structures used for saving and loading a run.
//! It uses Serde for serialization/deserialization to JSON format.

use crate::inventory::InventoryError;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// The root save file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub timestamp: SystemTime,
    pub metadata: SaveMetadata,
    /// Game clock at the moment of saving
    #[serde(default)]
    pub clock_ms: f64,
    #[serde(default)]
    pub entities: Vec<EntitySaveData>,
}

/// Metadata about the save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub game_version: String,
    pub playtime_seconds: u64,
    pub save_type: SaveType,
    pub save_slot: u8,
    #[serde(default = "default_level")]
    pub player_level: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SaveType {
    Manual,
    Auto,
    QuickSave,
}

/// Entity save data (polymorphic through entity_type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySaveData {
    pub entity_id: u64,
    pub entity_type: String, // "player", "monster", "bullet", "experience_gem"
    pub position: (f32, f32),
    pub data: String, // JSON for entity-specific data
}

/// Type tags stored in `EntitySaveData::entity_type` / `SaveData::data_type`
pub mod tags {
    pub const PLAYER: &str = "player";
    pub const MONSTER: &str = "monster";
    pub const BULLET: &str = "bullet";
    pub const EXPERIENCE_GEM: &str = "experience_gem";
    pub const INVENTORY: &str = "inventory";
}

/// Error types for save/load operations
#[derive(Debug)]
pub enum SaveError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    InvalidVersion(u32),
    CorruptedData(String),
    /// The platform has no per-user data directory
    NoSaveDirectory,
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::IoError(e) => write!(f, "IO error: {}", e),
            SaveError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            SaveError::InvalidVersion(v) => write!(f, "Invalid save version: {}", v),
            SaveError::CorruptedData(msg) => write!(f, "Corrupted save data: {}", msg),
            SaveError::NoSaveDirectory => write!(f, "No data directory available for saves"),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::IoError(err)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        SaveError::SerializationError(err)
    }
}

/// A saved item the current catalog can't rebuild
impl From<InventoryError> for SaveError {
    fn from(err: InventoryError) -> Self {
        SaveError::CorruptedData(err.to_string())
    }
}

/// Generic wrapper for saveable data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub data_type: String,
    pub json_data: String,
}

impl SaveData {
    /// Serializes `value` under the given type tag
    pub fn encode<T: Serialize>(data_type: &str, value: &T) -> Result<Self, SaveError> {
        Ok(SaveData {
            data_type: data_type.to_string(),
            json_data: serde_json::to_string(value)?,
        })
    }

    /// Deserializes the payload, checking the type tag first
    ///
    /// # Errors
    /// `CorruptedData` if the tag doesn't match, `SerializationError` if the
    /// payload isn't valid JSON. Missing fields are filled by the payload
    /// type's serde defaults.
    pub fn decode<T: serde::de::DeserializeOwned>(&self, expected_type: &str) -> Result<T, SaveError> {
        if self.data_type != expected_type {
            return Err(SaveError::CorruptedData(format!(
                "expected {} data, found {}",
                expected_type, self.data_type
            )));
        }
        Ok(serde_json::from_str(&self.json_data)?)
    }
}

impl From<&EntitySaveData> for SaveData {
    fn from(entity: &EntitySaveData) -> Self {
        SaveData {
            data_type: entity.entity_type.clone(),
            json_data: entity.data.clone(),
        }
    }
}

/// Current save file version
pub const CURRENT_SAVE_VERSION: u32 = 1;

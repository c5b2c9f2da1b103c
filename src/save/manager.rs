//! Save slots on disk
//!
//! Manual and quick saves overwrite `slot_<n>.json`. Autosaves are written
//! next to them as `autosave_slot<n>_<local time>.json` and pruned with
//! [`SaveManager::cleanup_autosaves`]. The autosave interval is measured on the
//! game clock, so time spent paused or choosing upgrades doesn't count.

use super::types::*;
use crate::clock::GameClock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Number of manual save slots
pub const SAVE_SLOTS: u8 = 5;
const DEFAULT_AUTOSAVE_MS: f64 = 5.0 * 60.0 * 1000.0;

pub struct SaveManager {
    save_directory: PathBuf,
    current_save_slot: u8,
    autosave_interval_ms: f64,
    /// Clock time of the last autosave written by this manager
    last_autosave_ms: Option<f64>,
}

impl SaveManager {
    /// Opens (and creates if needed) a save directory
    pub fn new(save_directory: impl AsRef<Path>) -> Result<Self, SaveError> {
        let save_directory = save_directory.as_ref().to_path_buf();
        fs::create_dir_all(&save_directory)?;

        Ok(SaveManager {
            save_directory,
            current_save_slot: 1,
            autosave_interval_ms: DEFAULT_AUTOSAVE_MS,
            last_autosave_ms: None,
        })
    }

    /// Uses `<data dir>/horde-survivor/saves`
    ///
    /// # Errors
    /// `NoSaveDirectory` if the platform has no data directory.
    pub fn in_default_directory() -> Result<Self, SaveError> {
        let data_dir = dirs::data_dir().ok_or(SaveError::NoSaveDirectory)?;
        Self::new(data_dir.join("horde-survivor").join("saves"))
    }

    pub fn with_autosave_interval_secs(mut self, secs: u64) -> Self {
        self.autosave_interval_ms = secs as f64 * 1000.0;
        self
    }

    /// Picks the slot later saves go to, clamped to `1..=SAVE_SLOTS`
    pub fn set_save_slot(&mut self, slot: u8) {
        self.current_save_slot = slot.clamp(1, SAVE_SLOTS);
    }

    pub fn get_save_slot(&self) -> u8 {
        self.current_save_slot
    }

    pub fn save_directory(&self) -> &Path {
        &self.save_directory
    }

    /// Writes `save_file` and returns where it went
    ///
    /// An autosave also restarts the autosave interval from the save's clock
    /// time.
    pub fn save_game(&mut self, save_file: &SaveFile) -> Result<PathBuf, SaveError> {
        let metadata = &save_file.metadata;
        let path = self.save_directory.join(file_name_for(metadata.save_type, metadata.save_slot));
        fs::write(&path, serde_json::to_string_pretty(save_file)?)?;

        if metadata.save_type == SaveType::Auto {
            self.last_autosave_ms = Some(save_file.clock_ms);
        }
        log::info!("Saved {:?} game to {}", metadata.save_type, path.display());
        Ok(path)
    }

    pub fn load_game(&self, slot: u8) -> Result<SaveFile, SaveError> {
        self.load_game_by_filename(&slot_filename(slot))
    }

    /// Reads any file in the save directory (autosaves included)
    ///
    /// # Errors
    /// `IoError` when the file is missing, `SerializationError` when it isn't a
    /// save, `InvalidVersion` when a newer build wrote it.
    pub fn load_game_by_filename(&self, filename: &str) -> Result<SaveFile, SaveError> {
        let save_file = read_save(&self.save_directory.join(filename))?;
        log::info!("Loaded save {} ({} entities)", filename, save_file.entities.len());
        Ok(save_file)
    }

    /// True once the interval has passed since the last autosave (or since zero)
    ///
    /// A clock behind the last autosave belongs to a restarted run and is
    /// measured from zero.
    pub fn should_autosave(&self, clock: &GameClock) -> bool {
        let now = clock.elapsed_ms();
        let since = match self.last_autosave_ms {
            Some(last) if last <= now => now - last,
            _ => now,
        };
        since >= self.autosave_interval_ms
    }

    /// Starts the autosave interval over from `clock_ms`, e.g. after a load
    pub fn reset_autosave_timer(&mut self, clock_ms: f64) {
        self.last_autosave_ms = Some(clock_ms);
    }

    /// Every readable save in the directory, newest first
    pub fn list_saves(&self) -> Result<Vec<SaveFileInfo>, SaveError> {
        let mut saves = Vec::new();

        for filename in self.json_files()? {
            match read_save(&self.save_directory.join(&filename)) {
                Ok(save_file) => saves.push(SaveFileInfo {
                    filename,
                    timestamp: save_file.timestamp,
                    metadata: save_file.metadata,
                }),
                Err(e) => log::warn!("Ignoring unreadable save {}: {}", filename, e),
            }
        }

        saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(saves)
    }

    /// Keeps only the `keep_count` newest autosaves of each slot
    pub fn cleanup_autosaves(&self, keep_count: usize) -> Result<(), SaveError> {
        let files = self.json_files()?;

        for slot in 1..=SAVE_SLOTS {
            let prefix = format!("autosave_slot{}_", slot);
            let mut autosaves: Vec<&String> = files.iter().filter(|name| name.starts_with(&prefix)).collect();
            // The timestamp suffix sorts chronologically
            autosaves.sort_unstable_by(|a, b| b.cmp(a));

            for stale in autosaves.into_iter().skip(keep_count) {
                fs::remove_file(self.save_directory.join(stale))?;
                log::debug!("Removed old autosave {}", stale);
            }
        }

        Ok(())
    }

    pub fn save_exists(&self, slot: u8) -> bool {
        self.save_directory.join(slot_filename(slot)).is_file()
    }

    /// Removes a slot's save file
    ///
    /// Returns `false` if there was nothing to delete.
    pub fn delete_save(&self, slot: u8) -> Result<bool, SaveError> {
        let path = self.save_directory.join(slot_filename(slot));
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted save {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn json_files(&self) -> Result<Vec<String>, SaveError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.save_directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

fn read_save(path: &Path) -> Result<SaveFile, SaveError> {
    let save_file: SaveFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    if save_file.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::InvalidVersion(save_file.version));
    }
    Ok(save_file)
}

fn slot_filename(slot: u8) -> String {
    format!("slot_{}.json", slot)
}

fn file_name_for(save_type: SaveType, slot: u8) -> String {
    match save_type {
        SaveType::Manual | SaveType::QuickSave => slot_filename(slot),
        SaveType::Auto => format!(
            "autosave_slot{}_{}.json",
            slot,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ),
    }
}

/// Summary of one save file for a load menu
pub struct SaveFileInfo {
    pub filename: String,
    pub timestamp: SystemTime,
    pub metadata: SaveMetadata,
}

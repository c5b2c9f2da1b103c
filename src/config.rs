//! Tunable game settings
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Missing fields fall back to [`GameConfig::default`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Errors that can occur while loading configuration data
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// Reads any JSON data table (config, catalog, spawn schedule)
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let json = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: Size,
    pub world: Size,
    /// Simulation ticks per second; one tick advances the clock by `1 / fps`
    pub fps: u32,
    pub inventory_max_size: usize,
    pub player_sprite: Size,
    pub monster_sprite: Size,
    pub bullet_sprite: Size,
    /// Distance below which a monster stops chasing along an axis
    pub monster_dead_zone: f32,
    pub orbit_radius: f32,
    /// Radians an orbiting projectile turns per tick, per unit of velocity
    pub orbit_step_per_velocity: f32,
    /// How often orbiting projectiles forget the targets they already hit
    pub orbit_reset_ms: f64,
    pub autosave_interval_secs: u64,
    pub seed: u64,
}

impl GameConfig {
    /// Loads a JSON config file
    ///
    /// # Errors
    /// `ConfigError::IoError` if the file can't be read,
    /// `ConfigError::ParseError` if it isn't valid JSON for this struct.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: GameConfig = load_json(path.as_ref())?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Simulation seconds covered by one tick
    pub fn tick_secs(&self) -> f64 {
        1.0 / f64::from(self.fps.max(1))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen: Size::new(1280.0, 720.0),
            world: Size::new(3200.0, 3200.0),
            fps: 60,
            inventory_max_size: 5,
            player_sprite: Size::new(48.0, 48.0),
            monster_sprite: Size::new(32.0, 32.0),
            bullet_sprite: Size::new(16.0, 16.0),
            monster_dead_zone: 2.0,
            orbit_radius: 60.0,
            orbit_step_per_velocity: 0.0025,
            orbit_reset_ms: 500.0,
            autosave_interval_secs: 300,
            seed: 0,
        }
    }
}

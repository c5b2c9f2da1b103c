//! Simulation core for a top-down survival arcade game
//!
//! The player wanders a bounded world while monster waves close in. Weapons
//! fire on their own, dead monsters drop experience gems, and every level-up
//! offers a weapon or passive-item upgrade.
//!
//! Nothing here renders, plays sound or reads devices. A front end drives a
//! [`game::GameSession`] with one [`input::InputState`] per frame and draws
//! whatever the world exposes.
//!
//! # Example
//!
//! ```rust
//! use horde_survivor::config::GameConfig;
//! use horde_survivor::game::{GameSession, GameState, GameWorld};
//! use horde_survivor::input::InputState;
//!
//! let mut session = GameSession::new(GameWorld::with_defaults(GameConfig::default()));
//! session.start();
//! for _ in 0..60 {
//!     session.step(&InputState::moving(1, 0));
//! }
//! assert_eq!(session.state(), GameState::Running);
//! ```

pub mod clock;
pub mod collision;
pub mod combat;
pub mod config;
pub mod cooldown;
pub mod entity;
pub mod experience_gem;
pub mod game;
pub mod input;
pub mod inventory;
pub mod leveling;
pub mod monster;
pub mod player;
pub mod projectile;
pub mod save;
pub mod spawner;
pub mod sprite;
pub mod stats;
pub mod weapon;

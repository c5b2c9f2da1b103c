// Game module - the simulation loop and its state management
//
// This module contains:
// - world.rs: GameWorld struct, entity management and the per-tick update order
// - collision_handler.rs: Collision resolution between entity kinds
// - death_handler.rs: Post-collision sweep, loot drops and player death
// - camera.rs: Visible area used for on-screen targeting
// - session.rs: GameSession, the world plus its game state
// - types.rs: Shared enums and helper structs

// Module declarations
pub mod camera;
pub mod collision_handler;
pub mod death_handler;
pub mod session;
pub mod types;
pub mod world;

// Re-export types for convenience
pub use camera::Camera;
pub use collision_handler::{CollisionHandler, CollisionReport};
pub use death_handler::{DeathHandler, DeathReport};
pub use session::GameSession;
pub use types::*;
pub use world::GameWorld;

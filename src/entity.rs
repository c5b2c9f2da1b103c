//! Identity and movement shared by every actor in the world
//!
//! # Rust Learning Notes
//!
//! - **Capability traits**: instead of one deep base class, each entity picks
//!   the traits it needs (`HasPosition`, `Movable`, plus the combat traits in
//!   `combat`)
//! - **Composition**: `Body` holds the data every moving entity shares, and the
//!   entities delegate to it
//! - **Integer handles**: `EntityId` replaces object identity as a map key

use crate::sprite::Sprite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for an entity, unique within one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing ids; ids are never reused within a world
#[derive(Debug, Clone, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        EntityIdAllocator { next: 1 }
    }

    pub fn allocate(&mut self) -> EntityId {
        // Default-constructed allocators start at 0; skip it so 0 is never handed out
        if self.next == 0 {
            self.next = 1;
        }
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Scales `(dx, dy)` to unit length
///
/// Returns `None` for the zero vector.
pub fn normalize(dx: f32, dy: f32) -> Option<(f32, f32)> {
    let magnitude = dx.hypot(dy);
    if magnitude > 0.0 {
        Some((dx / magnitude, dy / magnitude))
    } else {
        None
    }
}

pub fn distance_between(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Anything with a world position
pub trait HasPosition {
    fn position(&self) -> (f32, f32);
}

/// Entities that move by direction and speed
pub trait Movable: HasPosition {
    fn speed(&self) -> f32;

    /// Moves `speed` units along the normalized direction; no-op for `(0, 0)`
    fn move_in_direction(&mut self, dx: f32, dy: f32);

    /// Sets the position directly, skipping speed scaling
    fn teleport(&mut self, x: f32, y: f32);
}

/// Position, speed and sprite of a moving entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub sprite: Sprite,
}

impl Body {
    pub fn new(x: f32, y: f32, speed: f32, width: f32, height: f32) -> Self {
        Body {
            x,
            y,
            speed,
            sprite: Sprite::new(x, y, width, height),
        }
    }

    pub fn move_in_direction(&mut self, dx: f32, dy: f32) {
        let Some((ux, uy)) = normalize(dx, dy) else {
            return;
        };
        self.x += ux * self.speed;
        self.y += uy * self.speed;
        self.sprite.update_pos(self.x, self.y);
    }

    pub fn teleport(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.sprite.update_pos(x, y);
    }

    /// Unit vector towards `(x, y)`, or `(0, 0)` when already there
    pub fn direction_to(&self, x: f32, y: f32) -> (f32, f32) {
        normalize(x - self.x, y - self.y).unwrap_or((0.0, 0.0))
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_move_displacement_equals_speed() {
        for (dx, dy) in [(3.0, 4.0), (0.0, 10.0), (-1.0, 0.0), (1.0, 1.0), (-250.0, 0.5)] {
            let mut body = Body::new(0.0, 0.0, 7.0, 10.0, 10.0);
            body.move_in_direction(dx, dy);

            let travelled = body.x.hypot(body.y);
            assert!((travelled - 7.0).abs() < EPSILON, "({dx}, {dy}) travelled {travelled}");
        }
    }

    #[test]
    fn test_move_zero_direction_is_noop() {
        let mut body = Body::new(5.0, 5.0, 7.0, 10.0, 10.0);
        body.move_in_direction(0.0, 0.0);
        assert_eq!(body.position(), (5.0, 5.0));
    }

    #[test]
    fn test_move_keeps_direction() {
        let mut body = Body::new(0.0, 0.0, 1.0, 10.0, 10.0);
        body.move_in_direction(3.0, 4.0);

        assert!((body.x - 0.6).abs() < EPSILON);
        assert!((body.y - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_move_and_teleport_sync_sprite() {
        let mut body = Body::new(0.0, 0.0, 2.0, 10.0, 10.0);
        body.move_in_direction(1.0, 0.0);
        assert_eq!((body.sprite.x, body.sprite.y), (2.0, 0.0));

        body.teleport(100.0, 50.0);
        assert_eq!(body.position(), (100.0, 50.0));
        assert_eq!((body.sprite.x, body.sprite.y), (100.0, 50.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = EntityIdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        assert_eq!(a, EntityId(1));

        let mut defaulted = EntityIdAllocator::default();
        assert_eq!(defaulted.allocate(), EntityId(1));
    }
}

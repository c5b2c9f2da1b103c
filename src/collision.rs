//! Bounding-box geometry and collision queries
//!
//! Bounding boxes are the only part of the sprite layer the simulation reads
//! back. Each tick the collision handler snapshots them into one
//! [`CollisionMask`] per entity kind and queries the masks while it mutates
//! the entities themselves.
//!
//! # Rust Learning Notes
//!
//! - **Snapshot then mutate**: a mask owns plain `Rect`s, so holding it never
//!   borrows the entity slice it was built from
//! - **Generics over slices**: `CollisionMask::build` works for any
//!   `T: Collidable`

/// Axis-aligned rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns a copy shifted by `(dx, dy)`
    pub fn moved_by(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grows (or shrinks, for negative values) the rect around its centre
    ///
    /// A shrink larger than the rect collapses it to zero size.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        let width = (self.width + dw).max(0.0);
        let height = (self.height + dh).max(0.0);
        Rect::new(
            self.x - (width - self.width) / 2.0,
            self.y - (height - self.height) / 2.0,
            width,
            height,
        )
    }

    /// Point containment with inclusive edges
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Anything with a bounding box in the collision pipeline
///
/// # Example
///
/// ```rust
/// use horde_survivor::collision::{Collidable, CollisionMask, Rect};
///
/// struct Crate {
///     x: f32,
///     y: f32,
/// }
///
/// impl Collidable for Crate {
///     fn get_bounds(&self) -> Rect {
///         Rect::new(self.x, self.y, 16.0, 16.0)
///     }
/// }
///
/// let crates = [Crate { x: 0.0, y: 0.0 }, Crate { x: 40.0, y: 0.0 }];
/// let mask = CollisionMask::build(&crates);
/// assert_eq!(mask.overlapping(&Rect::new(45.0, 5.0, 4.0, 4.0)), vec![1]);
/// ```
pub trait Collidable {
    /// Returns the bounding box matching the entity's sprite.
    fn get_bounds(&self) -> Rect;
}

/// Checks if two axis-aligned bounding boxes intersect.
///
/// Two rectangles intersect if they overlap on both the X and Y axes.
/// Rectangles that only touch along an edge do not intersect.
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.right() && a.right() > b.x;
    let y_overlap = a.y < b.bottom() && a.bottom() > b.y;

    x_overlap && y_overlap
}

/// Snapshot of one entity kind's bounding boxes, rebuilt every tick
///
/// Holding plain rects lets the collision handler test overlaps while it
/// mutates the entities the rects came from.
#[derive(Debug, Clone)]
pub struct CollisionMask {
    rects: Vec<Rect>,
}

impl CollisionMask {
    pub fn build<T: Collidable>(entities: &[T]) -> Self {
        CollisionMask {
            rects: entities.iter().map(|entity| entity.get_bounds()).collect(),
        }
    }

    /// Indices whose rect overlaps `bounds`
    pub fn overlapping(&self, bounds: &Rect) -> Vec<usize> {
        self.rects
            .iter()
            .enumerate()
            .filter(|(_, rect)| aabb_intersect(bounds, rect))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

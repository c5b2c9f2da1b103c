use crate::collision::{Collidable, Rect};
use crate::config::Size;
use crate::entity::{EntityId, HasPosition};
use crate::sprite::Sprite;

/// Experience dropped by a dead monster, waiting to be picked up
#[derive(Debug, Clone)]
pub struct ExperienceGem {
    id: EntityId,
    x: f32,
    y: f32,
    amount: u32,
    sprite: Sprite,
}

impl ExperienceGem {
    /// Gem sprite size; gems aren't scaled by config
    pub const SIZE: Size = Size::new(16.0, 16.0);

    pub fn new(id: EntityId, x: f32, y: f32, amount: u32) -> Self {
        ExperienceGem {
            id,
            x,
            y,
            amount,
            sprite: Sprite::new(x, y, Self::SIZE.width, Self::SIZE.height),
        }
    }

    /// Cosmetic only; gems have no simulation behavior
    pub fn update(&mut self) {
        self.sprite.update();
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

impl HasPosition for ExperienceGem {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Collidable for ExperienceGem {
    fn get_bounds(&self) -> Rect {
        self.sprite.rect()
    }
}

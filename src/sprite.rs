use crate::collision::Rect;

/// Visual state of one entity, read by whatever renders the game
///
/// The simulation writes to it (position sync, rotation, scale, hit flashes)
/// and reads back only the bounding box. Drawing happens elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    base_width: f32,
    base_height: f32,
    scale: f32,
    rotation_deg: f32,
    /// Hits received, so the renderer can flash once per new hit
    damage_flashes: u32,
    /// Animation frames advanced; cosmetic only
    frame: u64,
}

impl Sprite {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Sprite {
            x,
            y,
            base_width: width,
            base_height: height,
            scale: 1.0,
            rotation_deg: 0.0,
            damage_flashes: 0,
            frame: 0,
        }
    }

    pub fn update_pos(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Sets the facing angle in degrees (counter-clockwise positive)
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_deg = degrees.rem_euclid(360.0);
    }

    /// Scales the sprite (and therefore its hitbox) by `factor`
    pub fn scale_image(&mut self, factor: f32) {
        self.scale = factor.max(0.0);
    }

    pub fn take_damage(&mut self) {
        self.damage_flashes += 1;
    }

    /// Advances the cosmetic animation by one frame
    pub fn update(&mut self) {
        self.frame += 1;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), self.height())
    }

    pub fn width(&self) -> f32 {
        self.base_width * self.scale
    }

    pub fn height(&self) -> f32 {
        self.base_height * self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation_deg
    }

    pub fn damage_flashes(&self) -> u32 {
        self.damage_flashes
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

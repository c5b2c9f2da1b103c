// Camera bounds used by on-screen targeting
//
// The simulation has no renderer, but area weapons still need to know which
// monsters the player could see.

use crate::collision::Rect;
use crate::config::GameConfig;

pub struct Camera;

impl Camera {
    /// Screen-sized rect centred on the player's sprite, kept inside the world
    ///
    /// # Arguments
    /// * `player_bounds` - The player's bounding box
    /// * `config` - Supplies screen and world sizes
    pub fn visible_bounds(player_bounds: &Rect, config: &GameConfig) -> Rect {
        let screen = config.screen;
        let centre_x = player_bounds.x + player_bounds.width / 2.0;
        let centre_y = player_bounds.y + player_bounds.height / 2.0;

        let max_x = (config.world.width - screen.width).max(0.0);
        let max_y = (config.world.height - screen.height).max(0.0);
        let x = (centre_x - screen.width / 2.0).max(0.0).min(max_x);
        let y = (centre_y - screen.height / 2.0).max(0.0).min(max_y);

        Rect::new(x, y, screen.width, screen.height)
    }
}

// Shared enums and helper structs used throughout the game loop

use crate::entity::EntityId;

/// Game state enum for tracking the current mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Before the first tick
    Starting,
    /// Simulation advancing every tick
    Running,
    Paused,
    /// Waiting for the player to pick an upgrade
    Upgrading,
    GameOver,
}

/// Control signals raised by the world, the input layer, or the menus
///
/// None of these are errors; they drive the [`GameState`] transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Start,
    PauseToggled,
    LevelUp { level: u32 },
    PlayerDied,
    UpgradeChosen,
    Restart,
}

impl GameState {
    /// State + event → next state
    ///
    /// Pairs not listed leave the state unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use horde_survivor::game::{GameEvent, GameState};
    ///
    /// let state = GameState::Starting.next(GameEvent::Start);
    /// assert_eq!(state, GameState::Running);
    /// assert_eq!(state.next(GameEvent::LevelUp { level: 2 }), GameState::Upgrading);
    /// assert_eq!(GameState::Paused.next(GameEvent::PlayerDied), GameState::Paused);
    /// ```
    pub fn next(self, event: GameEvent) -> GameState {
        match (self, event) {
            (GameState::Starting, GameEvent::Start) => GameState::Running,
            (GameState::Running, GameEvent::PauseToggled) => GameState::Paused,
            (GameState::Paused, GameEvent::PauseToggled) => GameState::Running,
            (GameState::Running, GameEvent::LevelUp { .. }) => GameState::Upgrading,
            (GameState::Upgrading, GameEvent::UpgradeChosen) => GameState::Running,
            (GameState::Running, GameEvent::PlayerDied) => GameState::GameOver,
            (GameState::GameOver, GameEvent::Restart) => GameState::Running,
            (state, _) => state,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, GameState::Running)
    }
}

/// What happened during one world tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Control events in the order they were raised
    pub events: Vec<GameEvent>,
    pub monsters_spawned: usize,
    pub monsters_killed: Vec<EntityId>,
    pub bullets_fired: usize,
    pub bullets_removed: usize,
    pub gems_collected: usize,
    pub xp_gained: u32,
}

impl TickReport {
    pub fn player_died(&self) -> bool {
        self.events.contains(&GameEvent::PlayerDied)
    }

    /// Levels reached this tick, in order
    pub fn level_ups(&self) -> impl Iterator<Item = u32> + '_ {
        self.events.iter().filter_map(|event| match event {
            GameEvent::LevelUp { level } => Some(*level),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use GameEvent::*;
        use GameState::*;

        let cases = [
            (Starting, Start, Running),
            (Running, PauseToggled, Paused),
            (Paused, PauseToggled, Running),
            (Running, LevelUp { level: 2 }, Upgrading),
            (Upgrading, UpgradeChosen, Running),
            (Running, PlayerDied, GameOver),
            (GameOver, Restart, Running),
            // Everything else is ignored
            (Paused, LevelUp { level: 2 }, Paused),
            (Upgrading, PauseToggled, Upgrading),
            (GameOver, PauseToggled, GameOver),
            (Starting, PlayerDied, Starting),
        ];

        for (state, event, expected) in cases {
            assert_eq!(state.next(event), expected, "{:?} + {:?}", state, event);
        }
    }

    #[test]
    fn test_report_level_ups_in_order() {
        let report = TickReport {
            events: vec![
                GameEvent::LevelUp { level: 2 },
                GameEvent::LevelUp { level: 3 },
                GameEvent::PlayerDied,
            ],
            ..TickReport::default()
        };

        assert_eq!(report.level_ups().collect::<Vec<_>>(), vec![2, 3]);
        assert!(report.player_died());
    }
}

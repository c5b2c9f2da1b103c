//! Per-tick input handed to the simulation
//!
//! The simulation never polls devices. Whatever captures input (keyboard,
//! gamepad, a replay file, a test script) turns it into an [`InputState`] once
//! per tick through the [`InputSource`] trait.

use std::collections::VecDeque;

/// Discrete menu navigation signals, used while the game is not running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSignal {
    Up,
    Down,
    /// Pick the highlighted option (upgrade choice, restart)
    Confirm,
    /// Pick option `n` directly
    Select(usize),
}

/// Input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    /// Movement per axis, each -1, 0 or 1
    pub direction: (i8, i8),
    pub pause_pressed: bool,
    pub menu: Option<MenuSignal>,
}

impl InputState {
    pub fn moving(dx: i8, dy: i8) -> Self {
        InputState {
            direction: (dx.signum(), dy.signum()),
            ..Self::default()
        }
    }

    pub fn pause() -> Self {
        InputState {
            pause_pressed: true,
            ..Self::default()
        }
    }

    pub fn menu(signal: MenuSignal) -> Self {
        InputState {
            menu: Some(signal),
            ..Self::default()
        }
    }
}

/// Anything that can supply input once per tick
pub trait InputSource {
    fn poll(&mut self) -> InputState;
}

/// Replays a fixed list of inputs, then idles (or loops if asked to)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputState>,
    original: Vec<InputState>,
    looping: bool,
}

impl ScriptedInput {
    pub fn new(script: Vec<InputState>) -> Self {
        ScriptedInput {
            script: script.iter().copied().collect(),
            original: script,
            looping: false,
        }
    }

    /// Restarts the script from the top once it runs out
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        if self.script.is_empty() && self.looping {
            self.script.extend(self.original.iter().copied());
        }
        self.script.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_normalizes_to_sign() {
        assert_eq!(InputState::moving(5, -3).direction, (1, -1));
    }

    #[test]
    fn test_script_idles_when_done() {
        let mut input = ScriptedInput::new(vec![InputState::moving(1, 0), InputState::pause()]);

        assert_eq!(input.poll().direction, (1, 0));
        assert!(input.poll().pause_pressed);
        assert_eq!(input.poll(), InputState::default());
    }

    #[test]
    fn test_looping_script_restarts() {
        let mut input = ScriptedInput::new(vec![InputState::moving(0, 1)]).looping();

        for _ in 0..3 {
            assert_eq!(input.poll().direction, (0, 1));
        }
    }
}

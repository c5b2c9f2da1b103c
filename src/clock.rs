//! In-game clock shared by every timed system
//!
//! The clock only moves when the simulation ticks. Pausing the game simply stops
//! calling [`GameClock::advance`], which freezes every cooldown and the spawn
//! schedule at the same instant.
//!
//! # Rust Learning Notes
//!
//! - **Shared handle**: `GameClock` wraps an `Rc<Cell<f64>>`. Cloning the clock
//!   clones the handle, not the time, so every cooldown built from a clone reads
//!   the same counter. The simulation is single-threaded, so `Rc`/`Cell` is enough.
//! - **Constructor injection**: components receive a clock when they are built
//!   instead of reaching for a global.

use std::cell::Cell;
use std::rc::Rc;

const MS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Handle to the single elapsed-time counter of a game session
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    elapsed_secs: Rc<Cell<f64>>,
}

impl GameClock {
    /// Creates a clock at time zero
    pub fn new() -> Self {
        GameClock {
            elapsed_secs: Rc::new(Cell::new(0.0)),
        }
    }

    /// Creates a clock that resumes from a saved elapsed time
    pub fn starting_at_ms(elapsed_ms: f64) -> Self {
        let clock = GameClock::new();
        clock.set_elapsed_ms(elapsed_ms);
        clock
    }

    /// Adds `delta_secs` of simulation time
    ///
    /// Called exactly once per simulation tick, never while paused.
    pub fn advance(&self, delta_secs: f64) {
        self.elapsed_secs.set(self.elapsed_secs.get() + delta_secs);
    }

    /// Total simulation time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs.get() * MS_PER_SECOND
    }

    /// Whole in-game minutes elapsed (`floor(ms / 1000 / 60)`)
    pub fn elapsed_minute(&self) -> u32 {
        (self.elapsed_ms() / MS_PER_SECOND / SECONDS_PER_MINUTE).floor() as u32
    }

    /// Overwrites the elapsed time (used when loading a save)
    pub fn set_elapsed_ms(&self, elapsed_ms: f64) {
        self.elapsed_secs.set(elapsed_ms.max(0.0) / MS_PER_SECOND);
    }

    /// Moves the clock to `elapsed_ms` while `f` runs
    ///
    /// The new time is kept only if `f` succeeds. On error the clock is put
    /// back exactly where it was.
    pub fn try_at_ms<T, E>(&self, elapsed_ms: f64, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let previous_secs = self.elapsed_secs.get();
        self.set_elapsed_ms(elapsed_ms);
        let result = f();
        if result.is_err() {
            self.elapsed_secs.set(previous_secs);
        }
        result
    }

    /// Back to zero for a fresh run
    pub fn reset(&self) {
        self.elapsed_secs.set(0.0);
    }
}

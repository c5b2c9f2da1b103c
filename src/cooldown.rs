use crate::clock::GameClock;

/// A fixed-duration timer measured against the game clock
///
/// A new cooldown captures the current clock time as its last trigger, so it
/// is not ready until `duration_ms` of simulation time has passed (unless the
/// duration is zero).
#[derive(Debug, Clone)]
pub struct Cooldown {
    clock: GameClock,
    last_trigger_ms: f64,
    duration_ms: f64,
}

impl Cooldown {
    pub fn new(clock: &GameClock, duration_ms: f64) -> Self {
        Cooldown {
            clock: clock.clone(),
            last_trigger_ms: clock.elapsed_ms(),
            duration_ms,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.clock.elapsed_ms() - self.last_trigger_ms >= self.duration_ms
    }

    /// Restarts the timer from the current clock time
    pub fn trigger(&mut self) {
        self.last_trigger_ms = self.clock.elapsed_ms();
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Changes the duration without touching the last trigger time
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.duration_ms - (self.clock.elapsed_ms() - self.last_trigger_ms)).max(0.0)
    }
}

use serde::{Deserialize, Serialize};

/// Experience needed to advance from `level` to `level + 1`
///
/// Grows by 10 per level up to level 20, by 13 up to level 40 and by 16
/// after that.
pub fn xp_threshold(level: u32) -> u32 {
    match level {
        0 | 1 => 5,
        2..=20 => 5 + 10 * (level - 1),
        21..=40 => 5 + 10 * 19 + 13 * (level - 20),
        _ => 5 + 10 * 19 + 13 * 20 + 16 * (level - 40),
    }
}

/// Level and experience progress of the player
///
/// # Example
///
/// ```rust
/// use horde_survivor::leveling::ExperienceTracker;
///
/// let mut tracker = ExperienceTracker::with_progress(1, 8);
/// let reached = tracker.add_xp(12);
///
/// assert_eq!(reached, vec![2, 3]);
/// assert_eq!(tracker.current_xp(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceTracker {
    level: u32,
    current_xp: u32,
}

impl ExperienceTracker {
    pub fn new() -> Self {
        Self::with_progress(1, 0)
    }

    /// Restores a saved level/xp pair; level is at least 1
    pub fn with_progress(level: u32, current_xp: u32) -> Self {
        ExperienceTracker {
            level: level.max(1),
            current_xp,
        }
    }

    /// Adds experience and returns every level reached, in order
    ///
    /// Each entry is one level-up signal; an empty vector means no level-up.
    pub fn add_xp(&mut self, amount: u32) -> Vec<u32> {
        self.current_xp += amount;

        let mut reached = Vec::new();
        while self.current_xp >= self.xp_to_next_level() {
            self.current_xp -= self.xp_to_next_level();
            self.level += 1;
            reached.push(self.level);
        }
        reached
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_xp(&self) -> u32 {
        self.current_xp
    }

    pub fn xp_to_next_level(&self) -> u32 {
        xp_threshold(self.level)
    }
}

impl Default for ExperienceTracker {
    fn default() -> Self {
        Self::new()
    }
}

use crate::stats::ProjectileStats;
use serde::{Deserialize, Serialize};

/// Per-level stat deltas for a weapon
///
/// `levels[0]` is applied when going from level 1 to 2, `levels[1]` from 2 to
/// 3, and so on. A track with four entries gives a weapon five levels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpgradeTrack {
    pub levels: Vec<ProjectileStats>,
}

impl UpgradeTrack {
    pub fn new(levels: Vec<ProjectileStats>) -> Self {
        UpgradeTrack { levels }
    }

    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32 + 1
    }

    /// Delta for moving from `level` to `level + 1`
    pub fn delta_from(&self, level: u32) -> Option<&ProjectileStats> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.levels.get(index)
    }

    /// Human-readable text for the upgrade out of `level`
    ///
    /// # Example
    ///
    /// ```rust
    /// use horde_survivor::stats::ProjectileStats;
    /// use horde_survivor::weapon::UpgradeTrack;
    ///
    /// let track = UpgradeTrack::new(vec![
    ///     ProjectileStats { damage: 5.0, ..ProjectileStats::empty() },
    ///     ProjectileStats { pierce: 1, reload_time: -100.0, ..ProjectileStats::empty() },
    /// ]);
    ///
    /// assert_eq!(track.describe(1), "Increases damage by 5");
    /// assert_eq!(track.describe(2), "Decreases reload time by 100, increases pierce by 1");
    /// assert_eq!(track.describe(3), "Max level");
    /// ```
    pub fn describe(&self, level: u32) -> String {
        let Some(delta) = self.delta_from(level) else {
            return "Max level".to_string();
        };

        let changes: Vec<String> = [
            ("damage", delta.damage),
            ("velocity", delta.velocity),
            ("area", delta.area_of_effect),
            ("reload time", delta.reload_time),
            ("pierce", delta.pierce as f32),
            ("duration", delta.duration),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(stat, amount)| {
            let verb = if amount > 0.0 { "increases" } else { "decreases" };
            format!("{} {} by {}", verb, stat, amount.abs())
        })
        .collect();

        if changes.is_empty() {
            return "No stat changes".to_string();
        }

        let text = changes.join(", ");
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        }
    }
}

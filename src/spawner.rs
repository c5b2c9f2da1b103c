//! Time-keyed monster spawning
//!
//! The schedule maps each in-game minute to a roster of monster types. When
//! the minute changes, the spawner throws away the old roster and arms one
//! fresh cooldown per entry of the new one; every ready entry then spawns a
//! single monster just off screen and re-arms.
//!
//! Minutes past the end of the table keep using the last row.

use crate::clock::GameClock;
use crate::config::{ConfigError, GameConfig, load_json};
use crate::cooldown::Cooldown;
use crate::entity::EntityIdAllocator;
use crate::monster::Monster;
use crate::stats::MonsterStats;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One monster type eligible to spawn during a minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub stats: MonsterStats,
    /// Milliseconds between spawns of this type
    pub spawn_cooldown_ms: f64,
}

impl RosterEntry {
    pub fn new(name: &str, stats: MonsterStats, spawn_cooldown_ms: f64) -> Self {
        RosterEntry {
            name: name.to_string(),
            stats,
            spawn_cooldown_ms,
        }
    }
}

/// Rosters indexed by in-game minute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub minutes: Vec<Vec<RosterEntry>>,
}

impl SpawnSchedule {
    pub fn create_default() -> Self {
        let green_slime = MonsterStats::new(2.0, 10, 10, 1000.0, 1);
        let bat = MonsterStats::new(3.0, 5, 5, 800.0, 1);
        let skeleton = MonsterStats::new(1.5, 30, 15, 1000.0, 3);
        let red_slime = MonsterStats::new(2.5, 25, 12, 1000.0, 2);
        let ghost = MonsterStats::new(3.5, 20, 20, 1200.0, 4);
        let golem = MonsterStats::new(1.0, 150, 30, 1500.0, 15);

        SpawnSchedule {
            minutes: vec![
                vec![RosterEntry::new("green_slime", green_slime, 1500.0)],
                vec![
                    RosterEntry::new("green_slime", green_slime, 1000.0),
                    RosterEntry::new("bat", bat, 2000.0),
                ],
                vec![
                    RosterEntry::new("bat", bat, 800.0),
                    RosterEntry::new("skeleton", skeleton, 2500.0),
                ],
                vec![
                    RosterEntry::new("red_slime", red_slime, 1000.0),
                    RosterEntry::new("skeleton", skeleton, 1500.0),
                ],
                vec![
                    RosterEntry::new("red_slime", red_slime, 700.0),
                    RosterEntry::new("ghost", ghost, 1500.0),
                ],
                vec![
                    RosterEntry::new("ghost", ghost, 800.0),
                    RosterEntry::new("skeleton", skeleton, 1000.0),
                    RosterEntry::new("golem", golem, 10000.0),
                ],
            ],
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// Roster for `minute`; past the table the last row repeats
    pub fn roster_for(&self, minute: u32) -> &[RosterEntry] {
        let index = (minute as usize).min(self.minutes.len().saturating_sub(1));
        self.minutes.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Borrowed world state the spawner needs
pub struct SpawnContext<'a> {
    pub player_pos: (f32, f32),
    pub ids: &'a mut EntityIdAllocator,
    pub rng: &'a mut StdRng,
    pub config: &'a GameConfig,
}

pub struct MonsterSpawner {
    schedule: SpawnSchedule,
    clock: GameClock,
    current_minute: Option<u32>,
    active: Vec<(RosterEntry, Cooldown)>,
}

impl MonsterSpawner {
    pub fn new(schedule: SpawnSchedule, clock: &GameClock) -> Self {
        MonsterSpawner {
            schedule,
            clock: clock.clone(),
            current_minute: None,
            active: Vec::new(),
        }
    }

    /// Spawns every roster entry whose cooldown is ready
    ///
    /// # Returns
    /// The new monsters, to be appended to the world
    pub fn update(&mut self, ctx: &mut SpawnContext) -> Vec<Monster> {
        let minute = self.clock.elapsed_minute();
        if self.current_minute != Some(minute) {
            self.enter_minute(minute);
        }

        let mut spawned = Vec::new();
        for (entry, cooldown) in self.active.iter_mut() {
            if !cooldown.is_ready() {
                continue;
            }
            cooldown.trigger();

            let (x, y) = spawn_position(ctx.player_pos, ctx.config, ctx.rng);
            log::debug!("Spawning {} at ({:.0}, {:.0})", entry.name, x, y);
            spawned.push(Monster::new(
                ctx.ids.allocate(),
                entry.name.clone(),
                x,
                y,
                entry.stats,
                ctx.config.monster_sprite,
                &self.clock,
            ));
        }
        spawned
    }

    fn enter_minute(&mut self, minute: u32) {
        let roster = self.schedule.roster_for(minute);
        log::info!("Minute {}: roster of {} monster types", minute, roster.len());

        self.active = roster
            .iter()
            .map(|entry| (entry.clone(), Cooldown::new(&self.clock, entry.spawn_cooldown_ms)))
            .collect();
        self.current_minute = Some(minute);
    }

    /// Forgets the current roster so the next update starts over
    pub fn reset(&mut self) {
        self.current_minute = None;
        self.active.clear();
    }

    pub fn current_minute(&self) -> Option<u32> {
        self.current_minute
    }

    pub fn active_roster(&self) -> impl Iterator<Item = &RosterEntry> {
        self.active.iter().map(|(entry, _)| entry)
    }
}

/// Half a screen away from the player on a random side
///
/// The coordinate along that side is spread over the full screen span.
fn spawn_position(player: (f32, f32), config: &GameConfig, rng: &mut StdRng) -> (f32, f32) {
    let half_w = config.screen.width / 2.0;
    let half_h = config.screen.height / 2.0;
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    if rng.gen_range(1..=2) == 1 {
        let y = player.1 - half_h + rng.gen_range(0.0..=config.screen.height);
        (player.0 + sign * half_w, y)
    } else {
        let x = player.0 - half_w + rng.gen_range(0.0..=config.screen.width);
        (x, player.1 + sign * half_h)
    }
}

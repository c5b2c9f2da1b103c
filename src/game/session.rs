// Game session: the world plus the mode it is in
//
// The session feeds input into the world while running and turns the world's
// events into state transitions. Menus (upgrade choice, game over) are driven
// through the same per-tick input.

use crate::input::{InputState, MenuSignal};
use crate::inventory::{InventoryError, UpgradeAction};
use crate::save::{SaveError, SaveManager, SaveType};
use std::collections::VecDeque;
use std::path::PathBuf;

use super::types::{GameEvent, GameState, TickReport};
use super::world::GameWorld;

pub struct GameSession {
    world: GameWorld,
    state: GameState,
    /// Levels still waiting for an upgrade choice, oldest first
    pending_levels: VecDeque<u32>,
    offers: Vec<UpgradeAction>,
    highlighted: usize,
}

impl GameSession {
    pub fn new(world: GameWorld) -> Self {
        GameSession {
            world,
            state: GameState::Starting,
            pending_levels: VecDeque::new(),
            offers: Vec::new(),
            highlighted: 0,
        }
    }

    pub fn start(&mut self) {
        self.dispatch(GameEvent::Start);
    }

    /// Handle one frame of input
    ///
    /// The world only ticks (and the clock only advances) in `Running`.
    ///
    /// # Returns
    /// The tick report when the world ticked, `None` otherwise
    pub fn step(&mut self, input: &InputState) -> Option<TickReport> {
        match self.state {
            GameState::Starting => {
                if input.menu == Some(MenuSignal::Confirm) {
                    self.start();
                }
                None
            }
            GameState::Running => {
                if input.pause_pressed {
                    self.dispatch(GameEvent::PauseToggled);
                    return None;
                }
                let report = self.world.tick(input.direction);
                self.handle_report(&report);
                Some(report)
            }
            GameState::Paused => {
                if input.pause_pressed {
                    self.world.player_mut().refresh_stats();
                    self.dispatch(GameEvent::PauseToggled);
                }
                None
            }
            GameState::Upgrading => {
                if let Some(signal) = input.menu {
                    self.navigate_offers(signal);
                }
                None
            }
            GameState::GameOver => {
                if input.menu == Some(MenuSignal::Confirm) {
                    self.restart();
                }
                None
            }
        }
    }

    fn handle_report(&mut self, report: &TickReport) {
        // Death wins over any level-up from the same tick
        if report.player_died() {
            self.pending_levels.clear();
            self.dispatch(GameEvent::PlayerDied);
            return;
        }

        self.pending_levels.extend(report.level_ups());
        self.open_next_upgrade();
    }

    /// Present offers for the oldest queued level, or go back to running
    ///
    /// Unlocks into a full list are not offered. A level with nothing left to
    /// offer is consumed silently.
    fn open_next_upgrade(&mut self) {
        while let Some(level) = self.pending_levels.pop_front() {
            let inventory = self.world.player().inventory();
            let offers: Vec<UpgradeAction> = inventory
                .get_possible_actions(self.world.catalog())
                .into_iter()
                .filter(|offer| offer.is_applicable(inventory))
                .collect();
            if offers.is_empty() {
                log::info!("Level {}: nothing left to upgrade", level);
                continue;
            }

            self.offers = offers;
            self.highlighted = 0;
            // Already upgrading when a queued level follows an earlier choice
            if self.state == GameState::Running {
                self.dispatch(GameEvent::LevelUp { level });
            }
            return;
        }

        if self.state == GameState::Upgrading {
            self.dispatch(GameEvent::UpgradeChosen);
        }
    }

    fn navigate_offers(&mut self, signal: MenuSignal) {
        let count = self.offers.len();
        if count == 0 {
            return;
        }

        let choice = match signal {
            MenuSignal::Up => {
                self.highlighted = (self.highlighted + count - 1) % count;
                None
            }
            MenuSignal::Down => {
                self.highlighted = (self.highlighted + 1) % count;
                None
            }
            MenuSignal::Confirm => Some(self.highlighted),
            MenuSignal::Select(index) => Some(index),
        };

        if let Some(index) = choice {
            if let Err(e) = self.choose_upgrade(index) {
                log::warn!("Upgrade rejected: {}", e);
            }
        }
    }

    /// Apply one of the current offers
    ///
    /// On success the next queued level gets its offers, or the game resumes.
    /// On failure the offers stay up so another one can be picked.
    ///
    /// # Errors
    /// `InvalidItem` when no upgrade is pending or `index` is out of range;
    /// otherwise whatever the inventory rejects.
    pub fn choose_upgrade(&mut self, index: usize) -> Result<(), InventoryError> {
        if self.state != GameState::Upgrading {
            return Err(InventoryError::InvalidItem("no upgrade pending".to_string()));
        }
        let action = self
            .offers
            .get(index)
            .cloned()
            .ok_or_else(|| InventoryError::InvalidItem(format!("upgrade offer {}", index)))?;

        self.world.apply_upgrade(&action)?;
        log::info!("Upgrade chosen: {}", action.description);

        self.offers.clear();
        self.open_next_upgrade();
        Ok(())
    }

    /// New run from any state: fresh world, clock at zero, running
    pub fn restart(&mut self) {
        self.world.reset();
        self.pending_levels.clear();
        self.offers.clear();
        self.highlighted = 0;
        if self.state == GameState::GameOver {
            self.dispatch(GameEvent::Restart);
        } else {
            self.state = GameState::Running;
        }
    }

    /// Write the world to the manager's current slot
    pub fn save(&self, manager: &mut SaveManager, save_type: SaveType) -> Result<PathBuf, SaveError> {
        let save_file = self.world.snapshot(save_type, manager.get_save_slot())?;
        manager.save_game(&save_file)
    }

    /// Autosave while running, once the manager's interval has passed on the game clock
    pub fn autosave_if_due(&self, manager: &mut SaveManager) -> Result<Option<PathBuf>, SaveError> {
        if !self.state.is_running() || !manager.should_autosave(self.world.clock()) {
            return Ok(None);
        }
        self.save(manager, SaveType::Auto).map(Some)
    }

    /// Load a slot and resume running
    pub fn load(&mut self, manager: &mut SaveManager, slot: u8) -> Result<(), SaveError> {
        let save_file = manager.load_game(slot)?;
        self.world.restore(&save_file)?;
        manager.reset_autosave_timer(self.world.clock().elapsed_ms());
        self.pending_levels.clear();
        self.offers.clear();
        self.highlighted = 0;
        self.state = GameState::Running;
        Ok(())
    }

    fn dispatch(&mut self, event: GameEvent) {
        let next = self.state.next(event);
        if next != self.state {
            log::info!("{:?} -> {:?} ({:?})", self.state, next, event);
        }
        self.state = next;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    /// Offers on screen while upgrading
    pub fn offers(&self) -> &[UpgradeAction] {
        &self.offers
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Level-ups queued behind the current choice
    pub fn pending_level_ups(&self) -> usize {
        self.pending_levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Damageable;
    use crate::config::GameConfig;
    use crate::entity::HasPosition;
    use crate::experience_gem::ExperienceGem;
    use crate::inventory::{ItemKind, UpgradeActionKind};
    use crate::spawner::SpawnSchedule;
    use crate::weapon::Catalog;

    fn running_session() -> GameSession {
        let world = GameWorld::new(GameConfig::default(), Catalog::create_default(), SpawnSchedule::default());
        let mut session = GameSession::new(world);
        session.start();
        session
    }

    /// Drops a gem worth `amount` under the player
    fn drop_gem(session: &mut GameSession, amount: u32) {
        let (x, y) = session.world().player().position();
        let id = session.world_mut().allocate_id();
        session.world_mut().add_experience_gem(ExperienceGem::new(id, x, y, amount));
    }

    #[test]
    fn test_starts_on_confirm() {
        let world = GameWorld::with_defaults(GameConfig::default());
        let mut session = GameSession::new(world);

        assert!(session.step(&InputState::default()).is_none());
        assert_eq!(session.state(), GameState::Starting);
        session.step(&InputState::menu(MenuSignal::Confirm));
        assert_eq!(session.state(), GameState::Running);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut session = running_session();
        session.step(&InputState::default());
        let frozen = session.world().clock().elapsed_ms();

        session.step(&InputState::pause());
        assert_eq!(session.state(), GameState::Paused);
        for _ in 0..5 {
            assert!(session.step(&InputState::moving(1, 0)).is_none());
        }
        assert_eq!(session.world().clock().elapsed_ms(), frozen);

        session.step(&InputState::pause());
        assert_eq!(session.state(), GameState::Running);
    }

    #[test]
    fn test_level_up_waits_for_choice() {
        let mut session = running_session();
        drop_gem(&mut session, 5);

        session.step(&InputState::default());
        assert_eq!(session.state(), GameState::Upgrading);
        assert!(!session.offers().is_empty());

        let frozen = session.world().clock().elapsed_ms();
        session.step(&InputState::default());
        assert_eq!(session.world().clock().elapsed_ms(), frozen);

        // Green Wand upgrade comes first
        assert_eq!(session.offers()[0].kind, UpgradeActionKind::Upgrade("Green Wand".to_string()));
        session.step(&InputState::menu(MenuSignal::Confirm));
        assert_eq!(session.state(), GameState::Running);
        assert_eq!(session.world().player().inventory().weapons()[0].level(), 2);
    }

    #[test]
    fn test_level_up_with_everything_maxed_keeps_running() {
        let mut session = running_session();
        let catalog = session.world().catalog().clone();
        let clock = session.world().clock().clone();
        let player = session.world_mut().player_mut();
        let inventory = player.inventory_mut();
        while inventory.upgrade_item("Green Wand").is_ok() {}
        for entry in &catalog.weapons {
            if !inventory.has_item(&entry.name) && !inventory.is_full(ItemKind::Weapon) {
                inventory.add_weapon(catalog.weapon_by_name(&entry.name, entry.track.max_level(), &clock).unwrap()).unwrap();
            }
        }
        for entry in &catalog.passives {
            if !inventory.is_full(ItemKind::Passive) {
                inventory.add_passive(catalog.passive_by_name(&entry.name, entry.max_level).unwrap()).unwrap();
            }
        }
        player.refresh_stats();
        let offers = player.inventory().get_possible_actions(&catalog);
        assert!(offers.iter().all(|offer| !matches!(offer.kind, UpgradeActionKind::Upgrade(_))));

        drop_gem(&mut session, 5);
        let report = session.step(&InputState::default()).unwrap();

        assert_eq!(report.level_ups().count(), 1);
        assert_eq!(session.state(), GameState::Running);
        assert!(session.offers().is_empty());
        assert_eq!(session.pending_level_ups(), 0);
    }

    #[test]
    fn test_load_restarts_autosave_interval() {
        let dir = std::env::temp_dir().join(format!("horde-session-load-{}", std::process::id()));
        let mut manager = SaveManager::new(&dir).unwrap().with_autosave_interval_secs(10);
        let mut session = running_session();

        session.world().clock().advance(30.0);
        session.save(&mut manager, SaveType::Manual).unwrap();
        session.world().clock().advance(15.0);
        assert!(session.autosave_if_due(&mut manager).unwrap().is_some());

        let slot = manager.get_save_slot();
        session.load(&mut manager, slot).unwrap();
        assert_eq!(session.world().clock().elapsed_ms(), 30_000.0);
        session.world().clock().advance(9.0);
        assert!(session.autosave_if_due(&mut manager).unwrap().is_none());
        session.world().clock().advance(1.0);
        assert!(session.autosave_if_due(&mut manager).unwrap().is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_each_level_gets_its_own_choice() {
        let mut session = running_session();
        // 5 + 15 xp: two level-ups in one pickup
        drop_gem(&mut session, 20);

        session.step(&InputState::default());
        assert_eq!(session.state(), GameState::Upgrading);
        assert_eq!(session.pending_level_ups(), 1);

        let wings = session
            .offers()
            .iter()
            .position(|offer| offer.kind == UpgradeActionKind::UnlockPassive("Wings".to_string()))
            .unwrap();
        session.choose_upgrade(wings).unwrap();
        assert_eq!(session.state(), GameState::Upgrading);
        assert_eq!(session.pending_level_ups(), 0);

        session.choose_upgrade(0).unwrap();
        assert_eq!(session.state(), GameState::Running);
        assert!(session.world().player().inventory().has_item("Wings"));
        assert_eq!(session.world().player().stats().movement_speed, 6.0);
    }

    #[test]
    fn test_bad_choice_keeps_offers_up() {
        let mut session = running_session();
        assert!(session.choose_upgrade(0).is_err());

        drop_gem(&mut session, 5);
        session.step(&InputState::default());
        let count = session.offers().len();

        assert!(matches!(session.choose_upgrade(count), Err(InventoryError::InvalidItem(_))));
        assert_eq!(session.state(), GameState::Upgrading);
        assert_eq!(session.offers().len(), count);
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut session = running_session();
        drop_gem(&mut session, 5);
        session.step(&InputState::default());
        let count = session.offers().len();

        session.step(&InputState::menu(MenuSignal::Up));
        assert_eq!(session.highlighted(), count - 1);
        session.step(&InputState::menu(MenuSignal::Down));
        assert_eq!(session.highlighted(), 0);
    }

    #[test]
    fn test_death_then_restart() {
        let mut session = running_session();
        drop_gem(&mut session, 5);
        session.world_mut().player_mut().take_damage(1000);

        let report = session.step(&InputState::default()).unwrap();
        assert!(report.player_died());
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.pending_level_ups(), 0);

        session.step(&InputState::menu(MenuSignal::Confirm));
        assert_eq!(session.state(), GameState::Running);
        assert_eq!(session.world().clock().elapsed_ms(), 0.0);
        assert_eq!(session.world().player().health_points(), 100);
    }
}

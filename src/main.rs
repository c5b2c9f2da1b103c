// Headless runner
//
// Usage: horde-survivor [TICKS] [CONFIG_JSON] [--save]
//
// Plays a scripted run (the player walks a square) for TICKS frames and prints
// a summary. Level-ups always take the first offer. With --save the run
// autosaves on the configured interval and the final world is written to save
// slot 1 in the user's data directory.

use horde_survivor::config::GameConfig;
use horde_survivor::game::{GameSession, GameState, GameWorld};
use horde_survivor::input::{InputSource, InputState, MenuSignal, ScriptedInput};
use horde_survivor::save::{SaveManager, SaveType};
use std::process::ExitCode;

const DEFAULT_TICKS: u64 = 60 * 60 * 3;
/// Frames spent walking each side of the square
const SIDE_FRAMES: usize = 90;
const KEEP_AUTOSAVES: usize = 3;

struct RunArgs {
    ticks: u64,
    config_path: Option<String>,
    save: bool,
}

fn parse_args() -> Result<RunArgs, String> {
    let mut run = RunArgs {
        ticks: DEFAULT_TICKS,
        config_path: None,
        save: false,
    };
    let mut positional = 0;

    for arg in std::env::args().skip(1) {
        if arg == "--save" {
            run.save = true;
            continue;
        }
        match positional {
            0 => run.ticks = arg.parse().map_err(|_| format!("TICKS must be a number, got '{}'", arg))?,
            1 => run.config_path = Some(arg),
            _ => return Err(format!("Unexpected argument '{}'", arg)),
        }
        positional += 1;
    }

    Ok(run)
}

fn square_walk() -> ScriptedInput {
    let mut script = Vec::with_capacity(SIDE_FRAMES * 4);
    for (dx, dy) in [(1, 0), (0, 1), (-1, 0), (0, -1)] {
        script.extend(std::iter::repeat_n(InputState::moving(dx, dy), SIDE_FRAMES));
    }
    ScriptedInput::new(script).looping()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: horde-survivor [TICKS] [CONFIG_JSON] [--save]");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config_path {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut saves = if args.save {
        match SaveManager::in_default_directory() {
            Ok(manager) => Some(manager.with_autosave_interval_secs(config.autosave_interval_secs)),
            Err(e) => {
                eprintln!("Can't open save directory: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let mut session = GameSession::new(GameWorld::with_defaults(config));
    session.start();

    let mut input = square_walk();
    let mut kills = 0;
    let mut level_ups = 0;
    let mut frames = 0;

    while frames < args.ticks {
        frames += 1;
        match session.state() {
            GameState::Upgrading => {
                session.step(&InputState::menu(MenuSignal::Confirm));
            }
            GameState::GameOver => break,
            _ => {
                if let Some(report) = session.step(&input.poll()) {
                    kills += report.monsters_killed.len();
                    level_ups += report.level_ups().count();
                }
            }
        }

        if let Some(manager) = saves.as_mut() {
            if let Err(e) = session.autosave_if_due(manager) {
                log::warn!("Autosave failed: {}", e);
            }
        }
    }

    let world = session.world();
    let player = world.player();
    println!("=== Run summary ===");
    println!("Frames:        {}", frames);
    println!("Game time:     {:.1} s", world.clock().elapsed_ms() / 1000.0);
    println!("State:         {:?}", session.state());
    println!("Level:         {} ({} level-ups)", player.level(), level_ups);
    println!("Health:        {}/{}", player.health().current(), player.health().max());
    println!("Monsters:      {} killed, {} alive", kills, world.monsters().len());
    println!("Bullets alive: {}", world.bullets().len());
    println!("Gems on floor: {}", world.gems().len());
    for weapon in player.inventory().weapons() {
        println!("  weapon  {} lv{}", weapon.name(), weapon.level());
    }
    for passive in player.inventory().passives() {
        println!("  passive {} lv{}", passive.name(), passive.level());
    }

    if let Some(manager) = saves.as_mut() {
        match session.save(manager, SaveType::Manual) {
            Ok(path) => println!("Saved to {}", path.display()),
            Err(e) => {
                eprintln!("Save failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
        if let Err(e) = manager.cleanup_autosaves(KEEP_AUTOSAVES) {
            log::warn!("Couldn't prune old autosaves: {}", e);
        }
    }

    ExitCode::SUCCESS
}

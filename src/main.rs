//! Star Skirmish entry point
//!
//! Runs a headless session: a scripted pilot flies the ship at the fixed
//! tick while HUD updates go to the log. Pass a tuning JSON path as the
//! first argument to override the default balance.

use star_skirmish::Game;
use star_skirmish::consts::TICK_MS;
use star_skirmish::platform::{DisplaySink, Key};
use star_skirmish::sim::{GamePhase, SkillAssignment};
use star_skirmish::tuning::Tuning;

/// Ten minutes of play at 60 Hz
const SESSION_FRAMES: u64 = 36_000;
const SEED: u64 = 0x5eed;

/// Display that writes HUD updates to the log
#[derive(Default)]
struct LogDisplay {
    round: u32,
}

impl DisplaySink for LogDisplay {
    fn death_count(&mut self, deaths: u32) {
        log::info!("Deaths: {}", deaths);
    }
    fn kill_count(&mut self, kills: u32) {
        log::debug!("Kills: {}", kills);
    }
    fn weapon(&mut self, name: &str) {
        log::debug!("Weapon: {}", name);
    }
    fn health(&mut self, health: i32, max_health: i32) {
        log::debug!("Health: {}/{}", health, max_health);
    }
    fn round(&mut self, round: u32) {
        self.round = round;
        log::info!("Round {}", round);
    }
    fn countdown(&mut self, secs: Option<u32>) {
        if let Some(secs) = secs {
            log::debug!("Round {} starts in {}s", self.round + 1, secs);
        }
    }
    fn game_over_screen(&mut self, visible: bool) {
        if visible {
            log::info!("GAME OVER");
        }
    }
    fn skill_menu(&mut self, visible: bool, assignment: &SkillAssignment) {
        if visible {
            let names: Vec<&str> = assignment.slots().iter().map(|s| s.as_str()).collect();
            log::info!("Skill menu open: {}", names.join(", "));
        }
    }
}

/// Key presses for a given frame: circle-strafe, cycle weapons and fire
/// every skill slot on a fixed rhythm
fn autopilot(frame: u64) -> (Vec<Key>, Vec<Key>) {
    let mut down = vec![Key::W, Key::A];
    let mut up = Vec::new();
    if frame % 600 == 0 {
        down.push(Key::Space);
    }
    if frame % 900 == 450 {
        down.push(Key::Tab);
    }
    for (slot, key) in [Key::Shift, Key::F, Key::G].into_iter().enumerate() {
        if frame % 180 == 60 * slot as u64 {
            down.push(key);
        } else {
            up.push(key);
        }
    }
    up.push(Key::Space);
    up.push(Key::Tab);
    (down, up)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Skirmish (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let mut game = Game::new(SEED, tuning).with_display(Box::new(LogDisplay::default()));

    let mut now_ms = 0.0_f64;
    for frame in 0..SESSION_FRAMES {
        let (down, up) = autopilot(frame);
        for key in up {
            game.key_up(key);
        }
        for key in down {
            game.key_down(key);
        }
        game.frame(now_ms);
        now_ms += f64::from(TICK_MS);
    }

    let director = &game.state.director;
    log::info!(
        "Session over after {} frames: round {}, {} kills, {} deaths{}",
        game.frames(),
        director.round_number,
        director.kill_count,
        director.death_count,
        if game.state.phase() == GamePhase::GameOver {
            " (on game over screen)"
        } else {
            ""
        }
    );

    if log::log_enabled!(log::Level::Trace) {
        match serde_json::to_string(&game.snapshot()) {
            Ok(json) => log::trace!("Final snapshot: {}", json),
            Err(e) => log::warn!("Could not serialize snapshot: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds embed the library and drive `Game::frame` from the host
}

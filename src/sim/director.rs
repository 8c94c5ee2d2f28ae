//! Round/wave director
//!
//! Owns the phase machine, the live enemy roster and the run counters:
//!
//! ```text
//! Start -> Playing <-> BetweenRounds -> Playing (next round)
//! Playing -> GameOver -> Playing (restart)
//! Playing | BetweenRounds <-> Paused (skill menu)
//! ```

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GamePhase, SimulationState};
use crate::distance;
use crate::platform::DisplaySink;
use crate::tuning::Tuning;

/// Rejection-sampling budget for one enemy spawn
const MAX_SPAWN_ATTEMPTS: usize = 1000;

/// Phase, counters and enemies for the current run
#[derive(Debug, Clone)]
pub struct RoundDirector {
    pub phase: GamePhase,
    /// Phase to return to when the skill menu closes
    pub phase_before_pause: GamePhase,
    /// 1-based round number
    pub round_number: u32,
    pub kill_count: u32,
    /// Survives restarts
    pub death_count: u32,
    /// Seconds left before the next round
    pub countdown: u32,
    /// Wall-clock time the countdown last ticked
    pub countdown_anchor_ms: Option<f64>,
    /// Pending automatic restart after game over (at most one)
    pub restart_deadline_ms: Option<f64>,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    countdown_secs: u32,
}

impl RoundDirector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Start,
            phase_before_pause: GamePhase::Playing,
            round_number: 1,
            kill_count: 0,
            death_count: 0,
            countdown: tuning.countdown_secs,
            countdown_anchor_ms: None,
            restart_deadline_ms: None,
            enemies: Vec::new(),
            countdown_secs: tuning.countdown_secs,
        }
    }

    /// Enter the between-rounds countdown. Only fires from `Playing`, so a
    /// second trigger while already counting down is ignored.
    pub fn begin_between_rounds(&mut self, display: &mut dyn DisplaySink) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::BetweenRounds;
        self.countdown = self.countdown_secs;
        self.countdown_anchor_ms = None;
        display.countdown(Some(self.countdown));
        log::info!(
            "Round {} cleared ({} kills), next round in {}s",
            self.round_number,
            self.kill_count,
            self.countdown
        );
    }

    /// Advance the countdown on wall-clock time. Returns true once it has
    /// run out and the next round should start.
    pub fn advance_countdown(&mut self, now_ms: f64, display: &mut dyn DisplaySink) -> bool {
        if self.countdown == 0 {
            return true;
        }
        let anchor = *self.countdown_anchor_ms.get_or_insert(now_ms);
        if now_ms - anchor >= 1000.0 {
            self.countdown -= 1;
            self.countdown_anchor_ms = Some(now_ms);
            display.countdown(Some(self.countdown));
        }
        false
    }
}

impl SimulationState {
    /// Leave the title screen and begin round 1
    pub fn start_game(&mut self, display: &mut dyn DisplaySink) {
        if self.director.phase != GamePhase::Start {
            return;
        }
        display.start_screen(false);
        self.director.phase = GamePhase::Playing;
        log::info!("Game started (seed {})", self.seed);
        self.init_game(display);
    }

    /// Reset ship, counters and entities, then spawn round 1. Deaths persist.
    pub fn init_game(&mut self, display: &mut dyn DisplaySink) {
        self.ship.reset();
        self.director.round_number = 1;
        self.director.kill_count = 0;
        self.director.countdown_anchor_ms = None;

        self.bullets.clear();
        self.missiles.clear();
        self.explosions.clear();
        self.aoe_rings.clear();

        display.kill_count(0);
        display.health(self.ship.health, self.ship.max_health);
        display.weapon(self.ship.weapon().kind.as_str());
        display.countdown(None);

        self.spawn_round(display);
    }

    /// Replace the roster with a fresh wave sized for the current round
    pub fn spawn_round(&mut self, display: &mut dyn DisplaySink) {
        let count = self.tuning.enemies_for_round(self.director.round_number);
        self.director.enemies.clear();
        for _ in 0..count {
            let enemy = self.spawn_enemy();
            self.director.enemies.push(enemy);
        }
        display.round(self.director.round_number);
        log::info!(
            "Round {}: spawned {} enemies",
            self.director.round_number,
            count
        );
    }

    /// Random enemy placed in a square around the ship, outside the minimum
    /// spawn distance
    pub fn spawn_enemy(&mut self) -> Enemy {
        let center = self.ship.pos;
        let extent = self.tuning.spawn_extent;
        let min_dist = self.tuning.min_spawn_distance;
        let mut pos = None;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = center
                + Vec2::new(
                    (self.rng.random::<f32>() - 0.5) * extent,
                    (self.rng.random::<f32>() - 0.5) * extent,
                );
            if distance(center, candidate) >= min_dist {
                pos = Some(candidate);
                break;
            }
        }
        // Unvalidated tuning can make the area unreachable
        let pos = pos.unwrap_or_else(|| {
            log::warn!(
                "No spawn point found in a {} area at distance {}, spawning on the ring",
                extent,
                min_dist
            );
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            center + Vec2::from_angle(angle) * min_dist.max(0.0)
        });
        let kind = EnemyKind::ALL[self.rng.random_range(0..EnemyKind::ALL.len())];
        let id = self.next_entity_id();
        Enemy::new(id, kind, pos, self.ship.max_speed)
    }

    /// Ship destroyed: count the death and arm the auto-restart
    pub fn game_over(&mut self, now_ms: f64, display: &mut dyn DisplaySink) {
        let director = &mut self.director;
        if director.phase == GamePhase::GameOver {
            return;
        }
        director.phase = GamePhase::GameOver;
        director.death_count += 1;
        display.death_count(director.death_count);
        display.countdown(None);
        display.game_over_screen(true);
        if director.restart_deadline_ms.is_none() {
            director.restart_deadline_ms = Some(now_ms + self.tuning.auto_restart_ms);
        }
        log::info!(
            "Game over in round {} after {} kills (deaths: {})",
            director.round_number,
            director.kill_count,
            director.death_count
        );
    }

    /// Start a new run from the game-over screen, cancelling the pending
    /// auto-restart
    pub fn restart(&mut self, display: &mut dyn DisplaySink) {
        if self.director.phase != GamePhase::GameOver {
            return;
        }
        self.director.restart_deadline_ms = None;
        display.game_over_screen(false);
        self.director.phase = GamePhase::Playing;
        log::info!("Restarting");
        self.init_game(display);
    }

    /// Open or close the skill menu
    pub fn toggle_menu(&mut self, display: &mut dyn DisplaySink) {
        let director = &mut self.director;
        match director.phase {
            GamePhase::Playing | GamePhase::BetweenRounds => {
                director.phase_before_pause = director.phase;
                director.phase = GamePhase::Paused;
                display.skill_menu(true, &self.skills);
            }
            GamePhase::Paused => {
                director.phase = director.phase_before_pause;
                display.skill_menu(false, &self.skills);
            }
            GamePhase::Start | GamePhase::GameOver => {}
        }
    }

    /// Wall-clock driven transitions: the between-rounds countdown and the
    /// game-over auto-restart
    pub fn advance_round_timers(&mut self, now_ms: f64, display: &mut dyn DisplaySink) {
        match self.director.phase {
            GamePhase::BetweenRounds => {
                if self.director.advance_countdown(now_ms, display) {
                    display.countdown(None);
                    self.director.phase = GamePhase::Playing;
                    self.director.round_number += 1;
                    self.spawn_round(display);
                }
            }
            GamePhase::GameOver => {
                if self
                    .director
                    .restart_deadline_ms
                    .is_some_and(|deadline| now_ms >= deadline)
                {
                    self.restart(display);
                }
            }
            _ => {}
        }
    }
}

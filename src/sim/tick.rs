//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one step in a fixed order:
//! triggers, ship, weapon, collisions, game-over check, round timers.

use super::collision;
use super::skills;
use super::state::{Controls, GamePhase, SimulationState};
use super::weapon;
use crate::consts::*;
use crate::platform::DisplaySink;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement inputs
    pub controls: Controls,
    /// Start (title screen) or restart (game over)
    pub start: bool,
    pub switch_weapon: bool,
    /// Skill slot triggers, in slot order
    pub skills: [bool; SKILL_SLOTS],
    pub toggle_menu: bool,
    /// Wall-clock time for shield, weapon, countdown and restart timers
    pub now_ms: f64,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimulationState, input: &TickInput, display: &mut dyn DisplaySink) {
    let now = input.now_ms;

    if input.toggle_menu {
        state.toggle_menu(display);
    }

    match state.phase() {
        GamePhase::Paused => return,
        GamePhase::Start => {
            if input.start {
                state.start_game(display);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.start {
                state.restart(display);
            } else {
                state.advance_round_timers(now, display);
            }
            return;
        }
        GamePhase::Playing | GamePhase::BetweenRounds => {}
    }

    state.time_ticks += 1;
    let health_before = state.ship.health;

    // Weapon and skill triggers only act mid-round
    if state.phase() == GamePhase::Playing {
        if input.switch_weapon {
            let kind = state.ship.switch_weapon();
            display.weapon(kind.as_str());
            log::debug!("Switched to {}", kind.as_str());
        }
        for (slot, _) in input.skills.iter().enumerate().filter(|(_, pressed)| **pressed) {
            if let Some(skill) = state.skills.get(slot) {
                skills::activate(state, skill, now, display);
            }
        }
    }

    state.ship.advance(&input.controls, TICK_MS, now);

    if state.phase() == GamePhase::Playing {
        weapon::fire(&mut state.ship, &mut state.bullets, &state.tuning, now);
    }

    collision::resolve(state, display);

    if state.ship.health != health_before {
        display.health(state.ship.health, state.ship.max_health);
    }

    if state.ship.is_destroyed() {
        state.game_over(now, display);
        return;
    }

    state.advance_round_timers(now, display);
}

//! Star Skirmish - A top-down arcade space combat loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, combat, waves, game state)
//! - `platform`: Input tracking and the display/render sink boundaries
//! - `game`: Frame driver tying input, simulation and sinks together
//! - `backdrop`: Pure background decoration sampling
//! - `tuning`: Data-driven game balance

pub mod backdrop;
pub mod error;
pub mod game;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use game::Game;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: f32 = 16.67;

    /// Default viewport extent used for the camera origin
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Number of weapons carried by the ship
    pub const WEAPON_COUNT: usize = 3;
    /// Number of skill trigger slots
    pub const SKILL_SLOTS: usize = 3;
}

/// Straight-line distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector pointing from `from` to `to`, or `None` when the points coincide
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 { Some(delta / dist) } else { None }
}

/// Unit vector for a facing angle (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_unit_toward_degenerate() {
        assert!(unit_toward(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0)).is_none());
        let dir = unit_toward(Vec2::ZERO, Vec2::new(0.0, 10.0)).unwrap();
        assert!((dir - Vec2::Y).length() < 1e-6);
    }
}

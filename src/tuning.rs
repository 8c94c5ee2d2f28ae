//! Game balance tuning
//!
//! Every gameplay constant lives here so a run can be rebalanced from JSON
//! without touching the simulation. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    pub ship_radius: f32,
    /// Acceleration per tick per active movement input
    pub ship_acceleration: f32,
    /// Speed cap (units per tick)
    pub ship_max_speed: f32,
    /// Radians per tick while a turn input is held
    pub ship_rotation_speed: f32,
    /// Per-tick thruster fade when no movement input is held
    pub thruster_decay: f32,
    pub ship_max_health: i32,

    // === Skills ===
    pub dash_speed: f32,
    pub dash_cooldown_ms: f32,
    /// Wall-clock duration of an active shield
    pub shield_duration_ms: f64,
    pub shield_cooldown_ms: f32,
    pub aoe_radius: f32,
    pub aoe_cooldown_ms: f32,
    pub missile_speed: f32,
    pub missile_radius: f32,
    pub missile_cooldown_ms: f32,
    pub missile_explosion_radius: f32,

    // === Bullets ===
    /// Speed added on top of the ship's forward velocity
    pub muzzle_speed: f32,
    pub bullet_radius: f32,
    pub bullet_range: f32,

    // === Rounds ===
    pub base_enemies: u32,
    pub enemies_per_round: u32,
    /// Side of the square spawn area centered on the ship
    pub spawn_extent: f32,
    pub min_spawn_distance: f32,
    pub countdown_secs: u32,
    pub auto_restart_ms: f64,

    // === Effects ===
    pub explosion_particles: usize,
    pub explosion_lifetime: u32,
    pub aoe_ring_growth: f32,
    pub aoe_ring_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_radius: 15.0,
            ship_acceleration: 0.2,
            ship_max_speed: 5.0,
            ship_rotation_speed: 0.05,
            thruster_decay: 0.02,
            ship_max_health: 3,

            dash_speed: 15.0,
            dash_cooldown_ms: 1000.0,
            shield_duration_ms: 3000.0,
            shield_cooldown_ms: 5000.0,
            aoe_radius: 200.0,
            aoe_cooldown_ms: 5000.0,
            missile_speed: 6.0,
            missile_radius: 5.0,
            missile_cooldown_ms: 3000.0,
            missile_explosion_radius: 100.0,

            muzzle_speed: 10.0,
            bullet_radius: 5.0,
            bullet_range: 500.0,

            base_enemies: 5,
            enemies_per_round: 2,
            spawn_extent: 2000.0,
            min_spawn_distance: 500.0,
            countdown_secs: 5,
            auto_restart_ms: 5000.0,

            explosion_particles: 20,
            explosion_lifetime: 30,
            aoe_ring_growth: 10.0,
            aoe_ring_fade: 0.05,
        }
    }
}

impl Tuning {
    /// Enemy population for a 1-based round number
    pub fn enemies_for_round(&self, round: u32) -> u32 {
        self.base_enemies + round.saturating_sub(1) * self.enemies_per_round
    }

    /// Parse tuning from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with. Spawning needs room
    /// between the minimum distance and the edge of the spawn square, and
    /// every speed and size must be a finite positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ship_radius", self.ship_radius),
            ("ship_acceleration", self.ship_acceleration),
            ("ship_max_speed", self.ship_max_speed),
            ("ship_rotation_speed", self.ship_rotation_speed),
            ("dash_speed", self.dash_speed),
            ("aoe_radius", self.aoe_radius),
            ("missile_speed", self.missile_speed),
            ("missile_radius", self.missile_radius),
            ("missile_explosion_radius", self.missile_explosion_radius),
            ("muzzle_speed", self.muzzle_speed),
            ("bullet_radius", self.bullet_radius),
            ("bullet_range", self.bullet_range),
            ("spawn_extent", self.spawn_extent),
            ("min_spawn_distance", self.min_spawn_distance),
            ("aoe_ring_growth", self.aoe_ring_growth),
            ("aoe_ring_fade", self.aoe_ring_fade),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTuning(format!(
                    "{} must be a finite positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("thruster_decay", self.thruster_decay),
            ("dash_cooldown_ms", self.dash_cooldown_ms),
            ("shield_cooldown_ms", self.shield_cooldown_ms),
            ("aoe_cooldown_ms", self.aoe_cooldown_ms),
            ("missile_cooldown_ms", self.missile_cooldown_ms),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidTuning(format!(
                    "{} must be finite and not negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("shield_duration_ms", self.shield_duration_ms),
            ("auto_restart_ms", self.auto_restart_ms),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidTuning(format!(
                    "{} must be finite and not negative, got {}",
                    name, value
                )));
            }
        }

        if self.ship_max_health <= 0 {
            return Err(ConfigError::InvalidTuning(format!(
                "ship_max_health must be positive, got {}",
                self.ship_max_health
            )));
        }
        if self.min_spawn_distance >= self.spawn_extent / 2.0 {
            return Err(ConfigError::InvalidTuning(format!(
                "min_spawn_distance {} leaves no room in a spawn area of {}",
                self.min_spawn_distance, self.spawn_extent
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemies_for_round() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemies_for_round(1), 5);
        assert_eq!(tuning.enemies_for_round(4), 11);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "ship_max_speed": 8.0 }"#).unwrap();
        assert_eq!(tuning.ship_max_speed, 8.0);
        assert_eq!(tuning.aoe_radius, 200.0);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_unreachable_spawn_distance_is_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "min_spawn_distance": 1500.0 }"#),
            Err(ConfigError::InvalidTuning(msg)) if msg.contains("min_spawn_distance")
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_spawn_distance": 1000.0 }"#),
            Err(ConfigError::InvalidTuning(_))
        ));
    }

    #[test]
    fn test_non_positive_sizes_are_rejected() {
        for json in [
            r#"{ "spawn_extent": 0.0 }"#,
            r#"{ "spawn_extent": -2000.0 }"#,
            r#"{ "ship_max_speed": 0.0 }"#,
            r#"{ "bullet_radius": -1.0 }"#,
            r#"{ "ship_max_health": 0 }"#,
            r#"{ "dash_cooldown_ms": -5.0 }"#,
        ] {
            assert!(
                matches!(Tuning::from_json(json), Err(ConfigError::InvalidTuning(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let tuning = Tuning {
            min_spawn_distance: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidTuning(_))));

        let tuning = Tuning {
            spawn_extent: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let tuning = Tuning {
            aoe_radius: 321.0,
            ..Default::default()
        };
        let parsed = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(parsed, tuning);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/nonexistent/star-skirmish/tuning.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

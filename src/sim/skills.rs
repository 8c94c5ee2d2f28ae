//! Cooldown-gated special actions bound to the three skill slots

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{AoeRing, Missile, SimulationState};
use crate::consts::SKILL_SLOTS;
use crate::error::ConfigError;
use crate::platform::DisplaySink;
use crate::{distance, heading, unit_toward};

/// Skills available for slot assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    MissileAttack,
    AoeAttack,
    Shield,
    Dash,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::MissileAttack,
        Skill::AoeAttack,
        Skill::Shield,
        Skill::Dash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::MissileAttack => "Missile Attack",
            Skill::AoeAttack => "AoE Attack",
            Skill::Shield => "Shield",
            Skill::Dash => "Dash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name.trim())
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which skill each trigger slot fires. Always three distinct skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAssignment {
    slots: [Skill; SKILL_SLOTS],
}

impl Default for SkillAssignment {
    fn default() -> Self {
        Self {
            slots: [Skill::MissileAttack, Skill::Dash, Skill::Shield],
        }
    }
}

impl SkillAssignment {
    pub fn new(slots: [Skill; SKILL_SLOTS]) -> Result<Self, ConfigError> {
        for (i, skill) in slots.iter().enumerate() {
            if slots[..i].contains(skill) {
                return Err(ConfigError::DuplicateSkill(*skill));
            }
        }
        Ok(Self { slots })
    }

    /// Build from the names submitted by the skill menu
    pub fn from_names(names: [&str; SKILL_SLOTS]) -> Result<Self, ConfigError> {
        let mut slots = [Skill::MissileAttack; SKILL_SLOTS];
        for (slot, name) in slots.iter_mut().zip(names) {
            *slot = Skill::from_name(name).ok_or_else(|| ConfigError::UnknownSkill(name.to_string()))?;
        }
        Self::new(slots)
    }

    pub fn slots(&self) -> &[Skill; SKILL_SLOTS] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<Skill> {
        self.slots.get(slot).copied()
    }
}

/// Try to fire a skill. Returns true if it activated.
pub fn activate(
    state: &mut SimulationState,
    skill: Skill,
    now_ms: f64,
    display: &mut dyn DisplaySink,
) -> bool {
    let activated = match skill {
        Skill::Dash => dash(state),
        Skill::Shield => shield(state, now_ms),
        Skill::AoeAttack => aoe_attack(state, display),
        Skill::MissileAttack => launch_missile(state),
    };
    if activated {
        log::debug!("{} activated", skill);
    }
    activated
}

fn dash(state: &mut SimulationState) -> bool {
    let ship = &mut state.ship;
    if ship.dash_cooldown > 0.0 {
        return false;
    }
    ship.is_dashing = true;
    ship.dash_cooldown = state.tuning.dash_cooldown_ms;
    ship.vel += heading(ship.angle) * state.tuning.dash_speed;
    true
}

fn shield(state: &mut SimulationState, now_ms: f64) -> bool {
    let ship = &mut state.ship;
    if ship.shield_cooldown > 0.0 {
        return false;
    }
    ship.shield_active = true;
    ship.shield_started_ms = now_ms;
    ship.shield_cooldown = state.tuning.shield_cooldown_ms;
    true
}

fn aoe_attack(state: &mut SimulationState, display: &mut dyn DisplaySink) -> bool {
    if state.ship.aoe_cooldown > 0.0 {
        return false;
    }
    state.ship.aoe_cooldown = state.tuning.aoe_cooldown_ms;

    let center = state.ship.pos;
    let radius = state.tuning.aoe_radius;
    for i in (0..state.director.enemies.len()).rev() {
        if distance(center, state.director.enemies[i].pos) < radius {
            state.destroy_enemy(i, display);
        }
    }

    state.aoe_rings.push(AoeRing::new(center, radius));
    state.check_round_clear(display);
    true
}

fn launch_missile(state: &mut SimulationState) -> bool {
    if state.ship.missile_cooldown > 0.0 || !state.missiles.is_empty() {
        return false;
    }

    let origin = state.ship.pos;
    // Strict less-than keeps the first enemy found at the minimal distance
    let mut nearest = None;
    let mut best = f32::INFINITY;
    for enemy in &state.director.enemies {
        let d = distance(origin, enemy.pos);
        if d < best {
            best = d;
            nearest = Some(enemy);
        }
    }
    let Some(target) = nearest else {
        return false;
    };
    let Some(dir) = unit_toward(origin, target.pos) else {
        return false;
    };

    let speed = state.tuning.missile_speed;
    state.missiles.push(Missile {
        pos: origin,
        vel: dir * speed,
        speed,
        radius: state.tuning.missile_radius,
        target: target.id,
    });
    state.ship.missile_cooldown = state.tuning.missile_cooldown_ms;
    true
}

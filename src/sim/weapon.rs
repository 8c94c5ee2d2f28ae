//! Weapons: fire-rate gating and bullet spawn patterns
//!
//! Each weapon gates on wall-clock time since its own last shot, so switching
//! weapons never resets or shares a cooldown.

use serde::{Deserialize, Serialize};

use super::state::{Bullet, Ship};
use crate::heading;
use crate::tuning::Tuning;

/// Weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Basic,
    RapidFire,
    SpreadShot,
}

impl WeaponKind {
    /// Cycle order used by weapon switching
    pub const ALL: [WeaponKind; 3] = [
        WeaponKind::Basic,
        WeaponKind::RapidFire,
        WeaponKind::SpreadShot,
    ];

    /// Minimum wall-clock gap between shots
    pub fn interval_ms(&self) -> f64 {
        match self {
            WeaponKind::Basic => 500.0,
            WeaponKind::RapidFire => 200.0,
            WeaponKind::SpreadShot => 500.0,
        }
    }

    /// Angular offsets (radians) of each bullet relative to ship facing
    pub fn spread(&self) -> &'static [f32] {
        match self {
            WeaponKind::Basic | WeaponKind::RapidFire => &[0.0],
            WeaponKind::SpreadShot => &[-0.1, 0.0, 0.1],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Basic => "Basic",
            WeaponKind::RapidFire => "Rapid Fire",
            WeaponKind::SpreadShot => "Spread Shot",
        }
    }
}

/// A weapon mounted on the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Wall-clock time of the last shot (`None` = never fired)
    pub last_shot_ms: Option<f64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            last_shot_ms: None,
        }
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last > self.kind.interval_ms(),
            None => true,
        }
    }
}

/// Build one bullet fired along `angle`, inheriting the ship's momentum
pub fn spawn_bullet(ship: &Ship, angle: f32, tuning: &Tuning) -> Bullet {
    let dir = heading(angle);
    let speed = ship.vel.dot(dir) + tuning.muzzle_speed;
    Bullet {
        pos: ship.pos,
        vel: dir * speed,
        speed,
        radius: tuning.bullet_radius,
        traveled: 0.0,
        max_distance: tuning.bullet_range,
    }
}

/// Fire the equipped weapon if its interval has elapsed.
///
/// Returns the number of bullets spawned (0 when still cooling down).
pub fn fire(ship: &mut Ship, bullets: &mut Vec<Bullet>, tuning: &Tuning, now_ms: f64) -> usize {
    if !ship.weapon().ready(now_ms) {
        return 0;
    }
    ship.weapon_mut().last_shot_ms = Some(now_ms);

    let kind = ship.weapon().kind;
    for offset in kind.spread() {
        bullets.push(spawn_bullet(ship, ship.angle + offset, tuning));
    }
    kind.spread().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_basic_fires_once_per_interval() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        let mut bullets = Vec::new();

        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 0.0), 1);
        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 400.0), 0);
        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 500.0), 0);
        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 501.0), 1);
        assert_eq!(bullets.len(), 2);
    }

    #[test]
    fn test_rapid_fire_interval() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.switch_weapon();
        let mut bullets = Vec::new();

        let mut now = 0.0;
        while now <= 1000.0 {
            fire(&mut ship, &mut bullets, &tuning, now);
            now += 16.67;
        }
        // Shots at ~0, ~216, ~433, ~650, ~867
        assert_eq!(bullets.len(), 5);
    }

    #[test]
    fn test_spread_shot_pattern() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.weapon_index = 2;
        let mut bullets = Vec::new();

        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 0.0), 3);
        let angles: Vec<f32> = bullets.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
        assert!((angles[0] + 0.1).abs() < 1e-5);
        assert!(angles[1].abs() < 1e-5);
        assert!((angles[2] - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_bullets_inherit_forward_momentum() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        ship.vel = Vec2::new(4.0, 3.0);
        let bullet = spawn_bullet(&ship, 0.0, &tuning);
        assert!((bullet.speed - 14.0).abs() < 1e-6);
        assert!((bullet.vel - Vec2::new(14.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_weapons_keep_independent_timers() {
        let tuning = Tuning::default();
        let mut ship = Ship::new(&tuning);
        let mut bullets = Vec::new();
        fire(&mut ship, &mut bullets, &tuning, 0.0);
        ship.switch_weapon();
        assert_eq!(fire(&mut ship, &mut bullets, &tuning, 10.0), 1);
    }
}

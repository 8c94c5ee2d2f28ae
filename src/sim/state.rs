//! Game state and core simulation types
//!
//! Every entity the tick touches lives here, folded into one `SimulationState`
//! owned by the frame driver.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::RoundDirector;
use super::skills::SkillAssignment;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::heading;
use crate::platform::DisplaySink;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    Start,
    /// Active gameplay
    Playing,
    /// Round cleared, counting down to the next one
    BetweenRounds,
    /// Skill menu open, simulation suspended
    Paused,
    /// Ship destroyed, waiting for restart
    GameOver,
}

/// Movement inputs held during a tick. Any subset may be active at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
}

impl Controls {
    pub fn any_thrust(&self) -> bool {
        self.forward || self.back || self.strafe_left || self.strafe_right
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    pub radius: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub rotation_speed: f32,
    /// Cosmetic thruster glow (0-1)
    pub thruster: f32,
    thruster_decay: f32,
    pub health: i32,
    pub max_health: i32,
    pub weapons: [Weapon; WEAPON_COUNT],
    pub weapon_index: usize,
    /// Cooldowns in ms remaining; ready at <= 0
    pub dash_cooldown: f32,
    pub shield_cooldown: f32,
    pub aoe_cooldown: f32,
    pub missile_cooldown: f32,
    pub is_dashing: bool,
    pub shield_active: bool,
    /// Wall-clock time the shield went up
    pub shield_started_ms: f64,
    shield_duration_ms: f64,
}

impl Ship {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius: tuning.ship_radius,
            acceleration: tuning.ship_acceleration,
            max_speed: tuning.ship_max_speed,
            rotation_speed: tuning.ship_rotation_speed,
            thruster: 0.0,
            thruster_decay: tuning.thruster_decay,
            health: tuning.ship_max_health,
            max_health: tuning.ship_max_health,
            weapons: WeaponKind::ALL.map(Weapon::new),
            weapon_index: 0,
            dash_cooldown: 0.0,
            shield_cooldown: 0.0,
            aoe_cooldown: 0.0,
            missile_cooldown: 0.0,
            is_dashing: false,
            shield_active: false,
            shield_started_ms: 0.0,
            shield_duration_ms: tuning.shield_duration_ms,
        }
    }

    /// Back to a fresh life. The equipped weapon survives the reset.
    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
        self.thruster = 0.0;
        self.health = self.max_health;
        self.is_dashing = false;
        self.shield_active = false;
        self.dash_cooldown = 0.0;
        self.shield_cooldown = 0.0;
        self.aoe_cooldown = 0.0;
        self.missile_cooldown = 0.0;
    }

    /// Integrate one tick of steering, thrust and cooldowns
    pub fn advance(&mut self, controls: &Controls, dt_ms: f32, now_ms: f64) {
        if controls.turn_left {
            self.angle -= self.rotation_speed;
        }
        if controls.turn_right {
            self.angle += self.rotation_speed;
        }

        let facing = heading(self.angle);
        // Perpendicular to facing, pointing left in screen space (y down)
        let port = Vec2::new(facing.y, -facing.x);

        let mut accel = Vec2::ZERO;
        if controls.forward {
            accel += facing * self.acceleration;
        }
        if controls.back {
            accel -= facing * self.acceleration;
        }
        if controls.strafe_left {
            accel += port * self.acceleration;
        }
        if controls.strafe_right {
            accel -= port * self.acceleration;
        }

        self.vel += accel;

        // Uniform rescale so direction is preserved
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel = self.vel / speed * self.max_speed;
        }

        self.pos += self.vel;

        if controls.any_thrust() {
            self.thruster = 1.0;
        } else {
            self.thruster = (self.thruster - self.thruster_decay).max(0.0);
        }

        for cooldown in [
            &mut self.dash_cooldown,
            &mut self.shield_cooldown,
            &mut self.aoe_cooldown,
            &mut self.missile_cooldown,
        ] {
            if *cooldown > 0.0 {
                *cooldown -= dt_ms;
            }
        }

        if self.shield_active && now_ms - self.shield_started_ms > self.shield_duration_ms {
            self.shield_active = false;
        }
    }

    /// Apply incoming damage. An active shield absorbs all of it.
    pub fn take_damage(&mut self, amount: i32) {
        if self.shield_active {
            return;
        }
        self.health = (self.health - amount).max(0);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.weapon_index]
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.weapon_index]
    }

    /// Cycle forward to the next weapon, returning the newly equipped kind
    pub fn switch_weapon(&mut self) -> WeaponKind {
        self.weapon_index = (self.weapon_index + 1) % self.weapons.len();
        self.weapon().kind
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    /// Pursuit speed as a fraction of the ship's max speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyKind::Basic => 0.75,
            EnemyKind::Fast => 1.2,
            EnemyKind::Tank => 0.5,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            EnemyKind::Basic => 10.0,
            EnemyKind::Fast => 8.0,
            EnemyKind::Tank => 15.0,
        }
    }

    pub fn health(&self) -> i32 {
        match self {
            EnemyKind::Tank => 3,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "Basic",
            EnemyKind::Fast => "Fast",
            EnemyKind::Tank => "Tank",
        }
    }
}

/// A pursuing opponent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: i32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, ship_max_speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: kind.radius(),
            speed: ship_max_speed * kind.speed_multiplier(),
            health: kind.health(),
        }
    }

    /// Step toward the target at full speed. Stays put if already on it.
    pub fn pursue(&mut self, target: Vec2) {
        if let Some(dir) = crate::unit_toward(self.pos, target) {
            self.pos += dir * self.speed;
        }
    }
}

/// A straight-flying projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Scalar speed along the firing angle (distance per tick)
    pub speed: f32,
    pub radius: f32,
    pub traveled: f32,
    pub max_distance: f32,
}

impl Bullet {
    /// Move one tick. Returns false once the bullet has outlived its range.
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        self.traveled += self.speed;
        self.traveled <= self.max_distance
    }
}

/// A homing projectile locked onto one enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Id of the enemy being tracked
    pub target: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A burst of particles spawned on every destruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub particles: Vec<Particle>,
    /// Ticks remaining
    pub lifetime: u32,
}

impl Explosion {
    pub fn new(pos: Vec2, count: usize, lifetime: u32, rng: &mut Pcg32) -> Self {
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let speed = rng.random::<f32>() * 2.0 + 1.0;
                Particle {
                    pos,
                    vel: heading(angle) * speed,
                }
            })
            .collect();
        Self {
            particles,
            lifetime,
        }
    }

    /// Integrate particles. Returns false once the burst has expired.
    pub fn advance(&mut self) -> bool {
        self.lifetime = self.lifetime.saturating_sub(1);
        for particle in &mut self.particles {
            particle.pos += particle.vel;
        }
        self.lifetime > 0
    }
}

/// Expanding ring drawn for an AoE attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AoeRing {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
}

impl AoeRing {
    pub fn new(center: Vec2, max_radius: f32) -> Self {
        Self {
            center,
            radius: 0.0,
            max_radius,
            alpha: 1.0,
        }
    }

    /// Grow and fade. Returns false once fully transparent.
    pub fn advance(&mut self, growth: f32, fade: f32) -> bool {
        self.radius += growth;
        self.alpha -= fade;
        self.alpha > 0.0
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub ship: Ship,
    /// Phase, counters and the live enemy roster
    pub director: RoundDirector,
    pub bullets: Vec<Bullet>,
    pub missiles: Vec<Missile>,
    pub explosions: Vec<Explosion>,
    pub aoe_rings: Vec<AoeRing>,
    pub skills: SkillAssignment,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Create a new simulation on the start screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship: Ship::new(&tuning),
            director: RoundDirector::new(&tuning),
            tuning,
            bullets: Vec::new(),
            missiles: Vec::new(),
            explosions: Vec::new(),
            aoe_rings: Vec::new(),
            skills: SkillAssignment::default(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.director.phase
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.director.enemies
    }

    pub fn spawn_explosion(&mut self, pos: Vec2) {
        let explosion = Explosion::new(
            pos,
            self.tuning.explosion_particles,
            self.tuning.explosion_lifetime,
            &mut self.rng,
        );
        self.explosions.push(explosion);
    }

    /// Remove the enemy at `index`, crediting a kill. Order of the remaining
    /// roster is preserved. Does not run the round-clear check.
    pub fn destroy_enemy(&mut self, index: usize, display: &mut dyn DisplaySink) -> Enemy {
        let enemy = self.director.enemies.remove(index);
        self.spawn_explosion(enemy.pos);
        self.director.kill_count += 1;
        display.kill_count(self.director.kill_count);
        enemy
    }

    /// Fire the round-clear transition if the roster just emptied
    pub fn check_round_clear(&mut self, display: &mut dyn DisplaySink) {
        if self.director.enemies.is_empty() {
            self.director.begin_between_rounds(display);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forward() -> Controls {
        Controls {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_thrust_clamps_to_max_speed() {
        let mut ship = Ship::new(&Tuning::default());
        for _ in 0..30 {
            ship.advance(&forward(), TICK_MS, 0.0);
        }
        assert!((ship.vel.length() - 5.0).abs() < 1e-4);
        assert!(ship.vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let mut ship = Ship::new(&Tuning::default());
        ship.vel = Vec2::new(30.0, 40.0);
        ship.advance(&Controls::default(), TICK_MS, 0.0);
        assert!((ship.vel - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_strafe_is_perpendicular_to_facing() {
        let mut ship = Ship::new(&Tuning::default());
        let strafe = Controls {
            strafe_left: true,
            ..Default::default()
        };
        ship.advance(&strafe, TICK_MS, 0.0);
        assert!(ship.vel.x.abs() < 1e-6);
        assert!((ship.vel.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_thruster_snaps_then_decays() {
        let mut ship = Ship::new(&Tuning::default());
        ship.advance(&forward(), TICK_MS, 0.0);
        assert_eq!(ship.thruster, 1.0);
        ship.advance(&Controls::default(), TICK_MS, 0.0);
        assert!((ship.thruster - 0.98).abs() < 1e-6);
        for _ in 0..100 {
            ship.advance(&Controls::default(), TICK_MS, 0.0);
        }
        assert_eq!(ship.thruster, 0.0);
    }

    #[test]
    fn test_cooldowns_tick_down_and_may_go_negative() {
        let mut ship = Ship::new(&Tuning::default());
        ship.dash_cooldown = 20.0;
        ship.advance(&Controls::default(), TICK_MS, 0.0);
        assert!((ship.dash_cooldown - 3.33).abs() < 1e-3);
        ship.advance(&Controls::default(), TICK_MS, 0.0);
        assert!(ship.dash_cooldown < 0.0);
        let settled = ship.dash_cooldown;
        ship.advance(&Controls::default(), TICK_MS, 0.0);
        assert_eq!(ship.dash_cooldown, settled);
    }

    #[test]
    fn test_shield_expires_on_wall_clock() {
        let mut ship = Ship::new(&Tuning::default());
        ship.shield_active = true;
        ship.shield_started_ms = 1000.0;
        ship.advance(&Controls::default(), TICK_MS, 4000.0);
        assert!(ship.shield_active);
        ship.advance(&Controls::default(), TICK_MS, 4000.5);
        assert!(!ship.shield_active);
    }

    #[test]
    fn test_shield_absorbs_damage() {
        let mut ship = Ship::new(&Tuning::default());
        ship.shield_active = true;
        ship.take_damage(5);
        assert_eq!(ship.health, 3);
        ship.shield_active = false;
        ship.take_damage(5);
        assert_eq!(ship.health, 0);
        assert!(ship.is_destroyed());
    }

    #[test]
    fn test_switch_weapon_cycles() {
        let mut ship = Ship::new(&Tuning::default());
        assert_eq!(ship.switch_weapon(), WeaponKind::RapidFire);
        assert_eq!(ship.switch_weapon(), WeaponKind::SpreadShot);
        assert_eq!(ship.switch_weapon(), WeaponKind::Basic);
    }

    #[test]
    fn test_enemy_variants() {
        let tank = Enemy::new(1, EnemyKind::Tank, Vec2::ZERO, 5.0);
        assert_eq!(tank.health, 3);
        assert_eq!(tank.radius, 15.0);
        assert!((tank.speed - 2.5).abs() < 1e-6);
        let fast = Enemy::new(2, EnemyKind::Fast, Vec2::ZERO, 5.0);
        assert!((fast.speed - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_pursuit_on_target_is_noop() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, Vec2::new(4.0, 4.0), 5.0);
        enemy.pursue(Vec2::new(4.0, 4.0));
        assert_eq!(enemy.pos, Vec2::new(4.0, 4.0));
        enemy.pursue(Vec2::new(104.0, 4.0));
        assert!((enemy.pos.x - 7.75).abs() < 1e-6);
    }

    #[test]
    fn test_bullet_expires_past_range() {
        let mut bullet = Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            speed: 10.0,
            radius: 5.0,
            traveled: 0.0,
            max_distance: 500.0,
        };
        for _ in 0..50 {
            assert!(bullet.advance());
        }
        assert!(!bullet.advance());
    }

    #[test]
    fn test_explosion_lifetime() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut explosion = Explosion::new(Vec2::ZERO, 20, 30, &mut rng);
        assert_eq!(explosion.particles.len(), 20);
        for p in &explosion.particles {
            let speed = p.vel.length();
            assert!(speed > 1.0 - 1e-4 && speed < 3.0 + 1e-4);
        }
        for _ in 0..29 {
            assert!(explosion.advance());
        }
        assert!(!explosion.advance());
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(inputs in proptest::collection::vec(0u8..64, 1..200)) {
            let mut ship = Ship::new(&Tuning::default());
            for bits in inputs {
                let controls = Controls {
                    forward: bits & 1 != 0,
                    back: bits & 2 != 0,
                    turn_left: bits & 4 != 0,
                    turn_right: bits & 8 != 0,
                    strafe_left: bits & 16 != 0,
                    strafe_right: bits & 32 != 0,
                };
                ship.advance(&controls, TICK_MS, 0.0);
                prop_assert!(ship.vel.length() <= ship.max_speed + 1e-4);
            }
        }
    }
}

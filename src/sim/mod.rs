//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies beyond the display sink

pub mod collision;
pub mod director;
pub mod skills;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{circles_overlap, resolve};
pub use director::RoundDirector;
pub use skills::{Skill, SkillAssignment, activate};
pub use state::{
    AoeRing, Bullet, Controls, Enemy, EnemyKind, Explosion, GamePhase, Missile, Particle, Ship,
    SimulationState,
};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponKind};

//! Display and render boundaries
//!
//! The core calls these synchronously at well-defined points. Every display
//! method defaults to a no-op so a sink only implements what it shows.

use glam::Vec2;
use serde::Serialize;

use crate::backdrop::{self, CELESTIAL_CELL, Decoration, STAR_CELL};
use crate::sim::{
    AoeRing, Bullet, Enemy, Explosion, GamePhase, Missile, Ship, SimulationState,
    SkillAssignment,
};

/// HUD counters and overlay screens
pub trait DisplaySink {
    fn death_count(&mut self, _deaths: u32) {}
    fn kill_count(&mut self, _kills: u32) {}
    fn weapon(&mut self, _name: &str) {}
    fn health(&mut self, _health: i32, _max_health: i32) {}
    fn round(&mut self, _round: u32) {}
    /// Seconds until the next round, or `None` to hide the countdown
    fn countdown(&mut self, _secs: Option<u32>) {}
    fn start_screen(&mut self, _visible: bool) {}
    fn game_over_screen(&mut self, _visible: bool) {}
    fn skill_menu(&mut self, _visible: bool, _assignment: &SkillAssignment) {}
}

/// Discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {}

/// Stand-in used when no display is attached. Warns on the first update,
/// then drops the rest.
#[derive(Debug, Default)]
pub struct DetachedDisplay {
    warned: bool,
}

impl DetachedDisplay {
    fn skip(&mut self, what: &str) {
        if !self.warned {
            log::warn!("No display attached, dropping {} update", what);
            self.warned = true;
        }
    }
}

impl DisplaySink for DetachedDisplay {
    fn death_count(&mut self, _deaths: u32) {
        self.skip("death count");
    }
    fn kill_count(&mut self, _kills: u32) {
        self.skip("kill count");
    }
    fn weapon(&mut self, _name: &str) {
        self.skip("weapon");
    }
    fn health(&mut self, _health: i32, _max_health: i32) {
        self.skip("health");
    }
    fn round(&mut self, _round: u32) {
        self.skip("round");
    }
    fn countdown(&mut self, _secs: Option<u32>) {
        self.skip("countdown");
    }
    fn start_screen(&mut self, _visible: bool) {
        self.skip("start screen");
    }
    fn game_over_screen(&mut self, _visible: bool) {
        self.skip("game over screen");
    }
    fn skill_menu(&mut self, _visible: bool, _assignment: &SkillAssignment) {
        self.skip("skill menu");
    }
}

/// Read-only view of the world handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub ship: &'a Ship,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub missiles: &'a [Missile],
    pub explosions: &'a [Explosion],
    pub aoe_rings: &'a [AoeRing],
    /// World position of the viewport's top-left corner
    pub camera: Vec2,
    pub viewport: Vec2,
    /// Pure per-cell sampler for background decoration
    #[serde(skip)]
    pub backdrop: fn(i32, i32) -> f32,
}

impl<'a> Snapshot<'a> {
    /// Capture the state with the camera centered on the ship while a run is
    /// in progress, and at the origin on the title and game-over screens
    pub fn capture(state: &'a SimulationState, viewport: Vec2) -> Self {
        let camera = match state.phase() {
            GamePhase::Start | GamePhase::GameOver => Vec2::ZERO,
            _ => state.ship.pos - viewport / 2.0,
        };
        Self {
            phase: state.phase(),
            ship: &state.ship,
            enemies: state.enemies(),
            bullets: &state.bullets,
            missiles: &state.missiles,
            explosions: &state.explosions,
            aoe_rings: &state.aoe_rings,
            camera,
            viewport,
            backdrop: backdrop::pseudo_random,
        }
    }

    /// World positions of the stars inside the viewport
    pub fn stars(&self) -> Vec<Vec2> {
        let end = self.camera + self.viewport;
        let columns = backdrop::cells_covering(self.camera.x, end.x, STAR_CELL);
        let rows = backdrop::cells_covering(self.camera.y, end.y, STAR_CELL);
        columns
            .flat_map(|x| rows.clone().filter_map(move |y| backdrop::star_at(x, y)))
            .collect()
    }

    /// Celestial objects near the viewport, with half a viewport of margin
    /// on every side so large bodies slide in rather than pop
    pub fn celestials(&self) -> Vec<(Vec2, Decoration)> {
        let start = self.camera - self.viewport / 2.0;
        let end = self.camera + self.viewport * 1.5;
        let columns = backdrop::cells_covering(start.x, end.x, CELESTIAL_CELL);
        let rows = backdrop::cells_covering(start.y, end.y, CELESTIAL_CELL);
        columns
            .flat_map(|i| rows.clone().filter_map(move |j| backdrop::celestial_at(i, j)))
            .collect()
    }
}

/// Frame renderer
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

/// Stand-in used when no renderer is attached
#[derive(Debug, Default)]
pub struct DetachedRender {
    warned: bool,
}

impl RenderSink for DetachedRender {
    fn render(&mut self, _snapshot: &Snapshot<'_>) {
        if !self.warned {
            log::warn!("No renderer attached, skipping frames");
            self.warned = true;
        }
    }
}

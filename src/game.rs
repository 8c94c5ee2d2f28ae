//! Frame driver
//!
//! Owns the simulation, the input tracker and the two sinks. Each animation
//! frame runs one fixed tick followed by one render, and nothing is drawn
//! while the skill menu has the game paused.

use glam::Vec2;

use crate::consts::{SKILL_SLOTS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::ConfigError;
use crate::platform::{
    DetachedDisplay, DetachedRender, DisplaySink, InputState, Key, KeyResponse, RenderSink,
    Snapshot,
};
use crate::sim::{GamePhase, SimulationState, SkillAssignment, tick};
use crate::tuning::Tuning;

/// Game instance holding all state
pub struct Game {
    pub state: SimulationState,
    input: InputState,
    display: Box<dyn DisplaySink>,
    render: Box<dyn RenderSink>,
    viewport: Vec2,
    frames: u64,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut game = Self {
            state: SimulationState::new(seed, tuning),
            input: InputState::new(),
            display: Box::new(DetachedDisplay::default()),
            render: Box::new(DetachedRender::default()),
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            frames: 0,
        };
        game.display.start_screen(true);
        game
    }

    /// Attach a display and bring it up to date with the current state
    pub fn with_display(mut self, display: Box<dyn DisplaySink>) -> Self {
        self.display = display;
        let ship = &self.state.ship;
        let director = &self.state.director;
        self.display.start_screen(director.phase == GamePhase::Start);
        self.display.death_count(director.death_count);
        self.display.kill_count(director.kill_count);
        self.display.weapon(ship.weapon().kind.as_str());
        self.display.health(ship.health, ship.max_health);
        self.display.round(director.round_number);
        self
    }

    pub fn with_render(mut self, render: Box<dyn RenderSink>) -> Self {
        self.render = render;
        self
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn key_down(&mut self, key: Key) -> KeyResponse {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Window lost focus: release held keys so the ship doesn't keep thrusting
    pub fn focus_lost(&mut self) {
        self.input.clear();
    }

    /// Run one tick and draw the result
    pub fn frame(&mut self, now_ms: f64) {
        let input = self.input.take_tick_input(now_ms);
        // The tick itself returns early while paused, after handling the menu toggle
        tick(&mut self.state, &input, self.display.as_mut());
        self.frames += 1;

        if self.state.phase() != GamePhase::Paused {
            let snapshot = Snapshot::capture(&self.state, self.viewport);
            self.render.render(&snapshot);
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state, self.viewport)
    }

    /// Apply a skill assignment from the menu. A rejected submission keeps
    /// the previous assignment and leaves the menu open for another try.
    pub fn submit_skill_assignment(
        &mut self,
        names: [&str; SKILL_SLOTS],
    ) -> Result<(), ConfigError> {
        let assignment = match SkillAssignment::from_names(names) {
            Ok(assignment) => assignment,
            Err(e) => {
                log::warn!("Rejected skill assignment {:?}: {}", names, e);
                return Err(e);
            }
        };
        self.state.skills = assignment;
        log::info!("Skills assigned: {}, {}, {}", names[0], names[1], names[2]);

        if self.state.phase() == GamePhase::Paused {
            self.state.toggle_menu(self.display.as_mut());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Skill;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        frames: usize,
        menu: Vec<bool>,
        start_screen: Vec<bool>,
    }

    struct Shared(Rc<RefCell<Log>>);

    impl DisplaySink for Shared {
        fn skill_menu(&mut self, visible: bool, _assignment: &SkillAssignment) {
            self.0.borrow_mut().menu.push(visible);
        }
        fn start_screen(&mut self, visible: bool) {
            self.0.borrow_mut().start_screen.push(visible);
        }
    }

    impl RenderSink for Shared {
        fn render(&mut self, _snapshot: &Snapshot<'_>) {
            self.0.borrow_mut().frames += 1;
        }
    }

    fn game() -> (Game, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let game = Game::new(42, Tuning::default())
            .with_display(Box::new(Shared(log.clone())))
            .with_render(Box::new(Shared(log.clone())));
        (game, log)
    }

    #[test]
    fn test_space_starts_game() {
        let (mut game, log) = game();
        assert_eq!(log.borrow().start_screen, vec![true]);

        game.key_down(Key::Space);
        game.frame(0.0);
        assert_eq!(game.state.phase(), GamePhase::Playing);
        assert_eq!(game.state.enemies().len(), 5);
        assert_eq!(log.borrow().start_screen, vec![true, false]);
    }

    #[test]
    fn test_no_render_while_paused() {
        let (mut game, log) = game();
        game.key_down(Key::Space);
        game.frame(0.0);
        assert_eq!(log.borrow().frames, 1);

        game.key_down(Key::T);
        game.frame(16.67);
        assert_eq!(game.state.phase(), GamePhase::Paused);
        game.frame(33.34);
        assert_eq!(log.borrow().frames, 1);
        assert_eq!(game.frames(), 3);

        game.key_down(Key::T);
        game.frame(50.0);
        assert_eq!(game.state.phase(), GamePhase::Playing);
        assert_eq!(log.borrow().frames, 2);
    }

    #[test]
    fn test_valid_assignment_closes_menu() {
        let (mut game, log) = game();
        game.key_down(Key::Space);
        game.frame(0.0);
        game.key_down(Key::T);
        game.frame(16.67);

        game.submit_skill_assignment(["AoE Attack", "Shield", "Dash"]).unwrap();
        assert_eq!(
            game.state.skills.slots(),
            &[Skill::AoeAttack, Skill::Shield, Skill::Dash]
        );
        assert_eq!(game.state.phase(), GamePhase::Playing);
        assert_eq!(log.borrow().menu, vec![true, false]);
    }

    #[test]
    fn test_duplicate_assignment_keeps_previous() {
        let (mut game, _log) = game();
        let before = *game.state.skills.slots();
        let result = game.submit_skill_assignment(["Dash", "Shield", "Dash"]);
        assert!(matches!(result, Err(ConfigError::DuplicateSkill(Skill::Dash))));
        assert_eq!(game.state.skills.slots(), &before);
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let (mut game, _log) = game();
        game.key_down(Key::Space);
        game.frame(0.0);
        game.key_down(Key::W);
        game.focus_lost();
        game.frame(16.67);
        assert_eq!(game.state.ship.thruster, 0.0);
    }

    #[test]
    fn test_camera_uses_viewport() {
        let (mut game, _log) = game();
        game.set_viewport(800.0, 600.0);
        game.key_down(Key::Space);
        game.frame(0.0);
        assert_eq!(game.snapshot().camera, game.state.ship.pos - Vec2::new(400.0, 300.0));
    }
}

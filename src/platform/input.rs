//! Keyboard input tracking
//!
//! Held keys drive movement; key presses queue discrete triggers that are
//! drained once per frame into a `TickInput`.

use crate::consts::SKILL_SLOTS;
use crate::sim::{Controls, TickInput};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Q,
    E,
    Space,
    Tab,
    Shift,
    F,
    G,
    T,
}

impl Key {
    const COUNT: usize = 16;

    /// Map a lowercased DOM-style key name (`"arrowup"`, `" "`, `"tab"`)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "arrowup" => Key::Up,
            "arrowdown" => Key::Down,
            "arrowleft" => Key::Left,
            "arrowright" => Key::Right,
            "q" => Key::Q,
            "e" => Key::E,
            " " | "space" => Key::Space,
            "tab" => Key::Tab,
            "shift" => Key::Shift,
            "f" => Key::F,
            "g" => Key::G,
            "t" => Key::T,
            _ => return None,
        };
        Some(key)
    }

    /// Discrete action bound to this key, if any
    pub fn trigger(&self) -> Option<Trigger> {
        match self {
            Key::Space => Some(Trigger::Start),
            Key::Tab => Some(Trigger::SwitchWeapon),
            Key::Shift => Some(Trigger::Skill(0)),
            Key::F => Some(Trigger::Skill(1)),
            Key::G => Some(Trigger::Skill(2)),
            Key::T => Some(Trigger::ToggleMenu),
            _ => None,
        }
    }
}

/// One-shot actions raised by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Start from the title screen or restart after game over
    Start,
    SwitchWeapon,
    /// Skill slot index (0-based)
    Skill(usize),
    ToggleMenu,
}

/// What the platform layer should do with the native key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// Suppress the platform's default handling (focus cycling for Tab)
    pub prevent_default: bool,
}

/// Current key state plus triggers raised since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; Key::COUNT],
    pending: Vec<Trigger>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) -> KeyResponse {
        self.held[key as usize] = true;
        if let Some(trigger) = key.trigger() {
            self.pending.push(trigger);
        }
        KeyResponse {
            prevent_default: key == Key::Tab,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held[key as usize] = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key as usize]
    }

    /// Release every key and drop queued triggers (focus lost)
    pub fn clear(&mut self) {
        self.held = [false; Key::COUNT];
        self.pending.clear();
    }

    /// Movement inputs from the held keys
    pub fn controls(&self) -> Controls {
        Controls {
            forward: self.is_held(Key::W) || self.is_held(Key::Up),
            back: self.is_held(Key::S) || self.is_held(Key::Down),
            turn_left: self.is_held(Key::A) || self.is_held(Key::Left),
            turn_right: self.is_held(Key::D) || self.is_held(Key::Right),
            strafe_left: self.is_held(Key::Q),
            strafe_right: self.is_held(Key::E),
        }
    }

    /// Build this frame's tick input, draining queued triggers
    pub fn take_tick_input(&mut self, now_ms: f64) -> TickInput {
        let mut input = TickInput {
            controls: self.controls(),
            now_ms,
            ..Default::default()
        };
        for trigger in self.pending.drain(..) {
            match trigger {
                Trigger::Start => input.start = true,
                Trigger::SwitchWeapon => input.switch_weapon = true,
                Trigger::Skill(slot) if slot < SKILL_SLOTS => input.skills[slot] = true,
                Trigger::Skill(slot) => log::warn!("Ignoring trigger for skill slot {}", slot),
                // Two presses in one frame cancel out
                Trigger::ToggleMenu => input.toggle_menu = !input.toggle_menu,
            }
        }
        input
    }
}

//! Keyboard state for the game's five actions.
//!
//! `InputState` is fed key-down/key-up events (or whole held-key states from
//! a replay) and remembers which keys went down or up since the last
//! `end_frame()`. Movement and fire read the held set; jump and the debug
//! toggle read the press edge, so holding either key acts once.
//!
//! Call `end_frame()` only after a simulation step has seen the edges,
//! otherwise a press on a frame with no steps is lost.
//!
//! The simulation itself only sees the `InputSnapshot` value built by
//! `snapshot()` for each tick.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Fire,
    DebugToggle,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Left,
        Key::Right,
        Key::Jump,
        Key::Fire,
        Key::DebugToggle,
    ];
}

/// Per-tick key state consumed by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Down transition of the jump key this tick.
    pub jump_pressed: bool,
    pub fire_held: bool,
    /// Down transition of the debug key this tick.
    pub debug_toggle_pressed: bool,
}

impl InputSnapshot {
    /// Horizontal axis in `{-1, 0, +1}`. Right wins when both keys are held.
    pub fn horizontal(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Apply a full held-key state, generating edges for every key that changed.
    pub fn set_held(&mut self, key: Key, down: bool) {
        if down {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            jump_pressed: self.is_just_pressed(Key::Jump),
            fire_held: self.is_held(Key::Fire),
            debug_toggle_pressed: self.is_just_pressed(Key::DebugToggle),
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

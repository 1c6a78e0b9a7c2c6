//! Clip table for the entities the simulation animates.
//!
//! Clips are resolved by name from an animation definition file and laid out
//! in fixed slot order, so entities can address them by the index constants
//! below. Each entity receives its own copy of the table.

use std::path::Path;

use gr_core::animation::{load_animation_file, AnimationClip, AnimationFile};

pub const PLAYER_IDLE: usize = 0;
pub const PLAYER_RUN: usize = 1;
pub const PLAYER_SLIDE: usize = 2;
pub const PLAYER_SHOOT: usize = 3;
pub const PLAYER_SLIDE_SHOOT: usize = 4;

pub const BULLET_MOVING: usize = 0;
pub const BULLET_HIT: usize = 1;

/// Clip names in player slot order.
const PLAYER_CLIP_NAMES: [&str; 5] = ["idle", "run", "slide", "shoot", "slide_shoot"];

/// Clip names in bullet slot order.
const BULLET_CLIP_NAMES: [&str; 2] = ["bullet_moving", "bullet_hit"];

#[derive(Debug, Clone, PartialEq)]
pub struct ClipLibrary {
    player: Vec<AnimationClip>,
    bullet: Vec<AnimationClip>,
}

impl ClipLibrary {
    /// Timings the game ships with.
    pub fn builtin() -> Self {
        Self {
            player: vec![
                AnimationClip::new(8, 1.6, true),
                AnimationClip::new(4, 0.5, true),
                AnimationClip::new(1, 1.0, true),
                AnimationClip::new(4, 0.5, true),
                AnimationClip::new(4, 0.5, true),
            ],
            bullet: vec![
                AnimationClip::new(4, 0.05, true),
                // One-shot: the bullet slot is released when it finishes.
                AnimationClip::new(4, 0.15, false),
            ],
        }
    }

    /// Build the table from an animation file that defines every required clip.
    pub fn from_animation_file(file: &AnimationFile) -> Result<Self, String> {
        let resolve = |names: &[&str]| -> Result<Vec<AnimationClip>, String> {
            names
                .iter()
                .map(|name| {
                    file.animations.get(*name).cloned().ok_or_else(|| {
                        format!(
                            "Animation '{}' is missing required clip '{}'",
                            file.animation_id, name
                        )
                    })
                })
                .collect()
        };

        let library = Self {
            player: resolve(&PLAYER_CLIP_NAMES)?,
            bullet: resolve(&BULLET_CLIP_NAMES)?,
        };
        if library.bullet[BULLET_HIT].is_looping() {
            return Err(format!(
                "Animation '{}' clip 'bullet_hit' must not loop",
                file.animation_id
            ));
        }
        Ok(library)
    }

    pub fn load_file(path: &Path) -> Result<Self, String> {
        let file = load_animation_file(path)?;
        Self::from_animation_file(&file)
    }

    pub fn player(&self) -> &[AnimationClip] {
        &self.player
    }

    pub fn bullet(&self) -> &[AnimationClip] {
        &self.bullet
    }
}

impl Default for ClipLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Frame-timing clips and the animation definition file format.
//!
//! A clip is a run of `frame_count` equally long frames spanning one total
//! duration. The clock is kept in integer microseconds (`u64`) even though
//! callers step it in seconds: accumulation is then exact, so stepping 0.4s
//! followed by 0.2s lands on the same frame as a single 0.6s step.
//!
//! Clip files give each duration in whole milliseconds (`duration_ms`).

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const MICROS_PER_SEC: f32 = 1_000_000.0;

/// Timed sequence of equally long frames with its own clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClip {
    frame_count: u32,
    duration_us: u64,
    elapsed_us: u64,
    looping: bool,
}

impl AnimationClip {
    /// Create a clip of `frame_count` frames lasting `duration_secs` in total.
    pub fn new(frame_count: u32, duration_secs: f32, looping: bool) -> Self {
        Self::from_us(frame_count, secs_to_us(duration_secs), looping)
    }

    pub fn from_us(frame_count: u32, duration_us: u64, looping: bool) -> Self {
        assert!(frame_count > 0, "animation clip needs at least one frame");
        assert!(duration_us > 0, "animation clip needs a non-zero duration");
        Self {
            frame_count,
            duration_us,
            elapsed_us: 0,
            looping,
        }
    }

    /// Advance the clock by `dt` seconds. `dt` must not be negative.
    pub fn step(&mut self, dt: f32) {
        assert!(dt >= 0.0, "animation step with negative dt ({dt})");
        self.step_us(secs_to_us(dt));
    }

    /// Advance the clock by `dt_us` microseconds.
    ///
    /// Looping clips wrap modulo the total duration; one-shot clips hold at
    /// the end so `is_done()` stays true and the last frame stays visible.
    pub fn step_us(&mut self, dt_us: u64) {
        self.elapsed_us = self.elapsed_us.saturating_add(dt_us);
        if self.looping {
            self.elapsed_us %= self.duration_us;
        } else {
            self.elapsed_us = self.elapsed_us.min(self.duration_us);
        }
    }

    /// Index of the frame to display, always in `0..frame_count`.
    pub fn current_frame(&self) -> u32 {
        let frame = self.elapsed_us * u64::from(self.frame_count) / self.duration_us;
        (frame as u32).min(self.frame_count - 1)
    }

    /// True once a full cycle has elapsed. Only meaningful for one-shot clips;
    /// a looping clip wraps before it can report done.
    pub fn is_done(&self) -> bool {
        self.elapsed_us >= self.duration_us
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn duration_us(&self) -> u64 {
        self.duration_us
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

fn secs_to_us(secs: f32) -> u64 {
    (secs * MICROS_PER_SEC).round() as u64
}

/// Named clips from one animation file.
#[derive(Debug, Clone)]
pub struct AnimationFile {
    pub version: String,
    pub animation_id: String,
    pub animations: HashMap<String, AnimationClip>,
}

#[derive(Debug, Deserialize)]
struct AnimationFileJson {
    version: String,
    animation_id: String,
    animations: HashMap<String, AnimationClipJson>,
}

#[derive(Debug, Deserialize)]
struct AnimationClipJson {
    frame_count: u32,
    duration_ms: u64,
    #[serde(default)]
    looping: bool,
}

/// Load an animation definition file from disk.
pub fn load_animation_file(path: &Path) -> Result<AnimationFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animation file {}: {e}", path.display()))?;
    parse_animation_file(&raw)
        .map_err(|e| format!("Animation file {}: {e}", path.display()))
}

/// Parse an animation definition from a JSON string.
pub fn parse_animation_file(raw: &str) -> Result<AnimationFile, String> {
    let json: AnimationFileJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse animation JSON: {e}"))?;
    validate_animation_json(&json)?;

    let animations = json
        .animations
        .into_iter()
        .map(|(name, clip)| {
            let clip = AnimationClip::from_us(clip.frame_count, clip.duration_ms * 1000, clip.looping);
            (name, clip)
        })
        .collect();

    Ok(AnimationFile {
        version: json.version,
        animation_id: json.animation_id,
        animations,
    })
}

fn validate_animation_json(json: &AnimationFileJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Animation validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.animation_id.is_empty() {
        return Err("Animation validation failed: animation_id is empty".to_string());
    }
    for (name, clip) in &json.animations {
        if clip.frame_count == 0 {
            return Err(format!(
                "Animation validation failed: clip '{}' has no frames",
                name
            ));
        }
        if clip.duration_ms == 0 {
            return Err(format!(
                "Animation validation failed: clip '{}' has zero duration",
                name
            ));
        }
        if clip.duration_ms.checked_mul(1000).is_none() {
            return Err(format!(
                "Animation validation failed: clip '{}' duration too large",
                name
            ));
        }
    }
    Ok(())
}

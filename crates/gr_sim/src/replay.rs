//! Recorded input sequences played back against a world.
//!
//! A replay lists held-key states per rendered frame. Playback feeds each
//! frame's keys through `InputState`, so press edges (jump, debug toggle)
//! come out exactly as they would from a live keyboard, then lets
//! `TimeState` slice the frame into simulation steps.

use gr_core::input::{InputState, Key};
use gr_core::time::TimeState;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::world::World;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub fire: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    fn keys(&self) -> [(Key, bool); 5] {
        [
            (Key::Left, self.left),
            (Key::Right, self.right),
            (Key::Jump, self.jump),
            (Key::Fire, self.fire),
            (Key::DebugToggle, self.debug),
        ]
    }
}

impl ReplaySequence {
    /// One entry per rendered frame, with `repeat` unrolled.
    pub fn expanded_frames(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ReplayFrame { repeat: 1, ..*frame });
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplayStats {
    pub frames: u64,
    pub steps: u64,
    pub sim_time: f64,
}

/// Drive `world` through every frame of `replay`.
pub fn play(world: &mut World, replay: &ReplaySequence) -> ReplayStats {
    let mut time = TimeState::new();
    let mut input = InputState::new();

    for frame in replay.expanded_frames() {
        for (key, down) in frame.keys() {
            input.set_held(key, down);
        }
        time.begin_frame(replay.frame_dt);
        while let Some(dt) = time.next_step() {
            world.update(dt, &input.snapshot());
            // Edges belong to the first step of the frame only.
            input.end_frame();
        }
        input.end_frame();
    }

    log::info!(
        "Replay finished: {} frames, {} steps, {:.3}s simulated",
        time.frame_count,
        time.step_count,
        time.total_time
    );
    ReplayStats {
        frames: time.frame_count,
        steps: time.step_count,
        sim_time: time.total_time,
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("Replay {}: {e}", path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplaySequence, String> {
    let replay: ReplaySequence =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !(replay.frame_dt > 0.0) {
        return Err("Replay validation failed: frame_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::ClipLibrary;
    use crate::config::SimConfig;
    use crate::entity::PlayerState;
    use crate::level::LevelGrid;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "gr_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn demo_world() -> World {
        World::from_level(&LevelGrid::demo(), SimConfig::default(), ClipLibrary::builtin())
            .expect("demo world should build")
    }

    const RUN_AND_GUN: &str = r#"{
      "frames": [
        { "repeat": 30 },
        { "right": true, "repeat": 60 },
        { "right": true, "jump": true, "repeat": 20 },
        { "right": true, "fire": true, "repeat": 90 },
        { "left": true, "fire": true, "repeat": 45 },
        { "debug": true },
        { "repeat": 60 }
      ]
    }"#;

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frame_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_frames();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].right);
        assert!(expanded[3].jump);
        assert!(!expanded[3].right);
        assert!(expanded.iter().all(|f| f.repeat == 1));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_or_bad_dt() {
        let err = parse_replay(r#"{ "frames": [] }"#).expect_err("empty frames");
        assert!(err.contains("frames list is empty"));
        let err = parse_replay(r#"{ "frame_dt": 0.0, "frames": [{}] }"#).expect_err("zero dt");
        assert!(err.contains("frame_dt must be > 0"));
    }

    #[test]
    fn held_jump_gives_a_single_edge() {
        let replay = parse_replay(
            r#"{ "frames": [ { "repeat": 30 }, { "jump": true, "repeat": 30 } ] }"#,
        )
        .expect("valid replay");
        let mut world = demo_world();
        play(&mut world, &replay);
        assert_eq!(world.player().player().state, PlayerState::Jumping);

        // One impulse of -200 decays under gravity; a second would stack.
        let vy = world.player().velocity.y;
        assert!(vy > -200.0 && vy < 100.0, "unexpected vy {vy}");
    }

    #[test]
    fn long_frames_split_into_bounded_steps() {
        let replay =
            parse_replay(r#"{ "frame_dt": 0.05, "frames": [ { "repeat": 10 } ] }"#).expect("valid");
        let mut world = demo_world();
        let stats = play(&mut world, &replay);
        assert_eq!(stats.frames, 10);
        assert_eq!(stats.steps, 30);
        assert!((stats.sim_time - 0.5).abs() < 1e-4);
        assert_eq!(world.tick_count(), 30);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = parse_replay(RUN_AND_GUN).expect("valid replay");
        let mut run_a = demo_world();
        let mut run_b = demo_world();
        let stats_a = play(&mut run_a, &replay);
        let stats_b = play(&mut run_b, &replay);

        assert_eq!(stats_a, stats_b);
        assert_eq!(stats_a.frames, 306);
        assert_eq!(run_a.player(), run_b.player());
        assert_eq!(run_a.viewport, run_b.viewport);
        assert_eq!(run_a.bullets.len(), run_b.bullets.len());
        assert!(!run_a.bullets.is_empty());
        for (a, b) in run_a.bullets.iter().zip(run_b.bullets.iter()) {
            assert_eq!(a, b);
        }
        assert!(run_a.debug);
    }
}

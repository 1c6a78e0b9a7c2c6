//! Simulation tuning. Defaults reproduce the shipped game feel; a JSON file
//! may override any subset of fields.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World size of one level tile.
    pub tile_size: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Downward acceleration applied to airborne dynamic entities.
    pub gravity: f32,
    /// Seed for bullet spread, so replays are reproducible.
    pub rng_seed: u64,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub acceleration: f32,
    pub max_speed_x: f32,
    /// Instantaneous vertical velocity change on jump. Negative is up.
    pub jump_impulse: f32,
    /// Idle braking is this multiple of `acceleration`.
    pub deceleration_factor: f32,
    /// Collider as `[offset_x, offset_y, width, height]` relative to the sprite origin.
    pub collider: [f32; 4],
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub cooldown: f32,
    pub muzzle_speed: f32,
    /// Width of the uniform range the bullet's vertical velocity is drawn from.
    pub vertical_spread: f32,
    /// Horizontal spawn offset from the player origin when facing left.
    pub muzzle_offset_left: f32,
    /// Horizontal spawn offset from the player origin when facing right.
    pub muzzle_offset_right: f32,
    pub bullet_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            viewport_width: 640.0,
            viewport_height: 320.0,
            gravity: 500.0,
            rng_seed: 0x5eed,
            player: PlayerTuning::default(),
            weapon: WeaponTuning::default(),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            acceleration: 300.0,
            max_speed_x: 100.0,
            jump_impulse: -200.0,
            deceleration_factor: 1.5,
            collider: [11.0, 6.0, 10.0, 26.0],
        }
    }
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            cooldown: 0.1,
            muzzle_speed: 600.0,
            vertical_spread: 40.0,
            muzzle_offset_left: 0.0,
            muzzle_offset_right: 24.0,
            bullet_size: 8.0,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SimConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_config(&raw).map_err(|e| format!("Config {}: {e}", path.display()))
}

pub fn parse_config(raw: &str) -> Result<SimConfig, String> {
    let config: SimConfig =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse config JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SimConfig) -> Result<(), String> {
    if config.tile_size <= 0.0 {
        return Err("Config validation failed: tile_size must be > 0".to_string());
    }
    if config.viewport_width <= 0.0 || config.viewport_height <= 0.0 {
        return Err("Config validation failed: viewport size must be > 0".to_string());
    }
    if config.gravity < 0.0 {
        return Err("Config validation failed: gravity must be >= 0".to_string());
    }
    if config.player.acceleration <= 0.0 {
        return Err("Config validation failed: player.acceleration must be > 0".to_string());
    }
    if config.player.deceleration_factor <= 0.0 {
        return Err(
            "Config validation failed: player.deceleration_factor must be > 0".to_string(),
        );
    }
    if config.player.max_speed_x <= 0.0 {
        return Err("Config validation failed: player.max_speed_x must be > 0".to_string());
    }
    if config.player.jump_impulse >= 0.0 {
        return Err("Config validation failed: player.jump_impulse must be negative".to_string());
    }
    let [_, _, w, h] = config.player.collider;
    if w <= 0.0 || h <= 0.0 {
        return Err("Config validation failed: player.collider size must be > 0".to_string());
    }
    if config.weapon.cooldown <= 0.0 {
        return Err("Config validation failed: weapon.cooldown must be > 0".to_string());
    }
    if config.weapon.vertical_spread < 0.0 || config.weapon.bullet_size <= 0.0 {
        return Err(
            "Config validation failed: weapon spread must be >= 0 and bullet_size > 0".to_string(),
        );
    }
    Ok(())
}

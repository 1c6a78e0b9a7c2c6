//! Entity record shared by level tiles, the player and bullets.
//!
//! Common physical state lives on `Entity`; per-kind state lives in the
//! `EntityKind` payload. Variant accessors (`player()`, `bullet_mut()`, ...)
//! panic on a kind mismatch: reaching for the wrong payload is a logic error
//! and continuing would corrupt the simulation.

use glam::Vec2;
use gr_core::animation::AnimationClip;
use gr_core::time::Timer;

use crate::clips::{BULLET_MOVING, PLAYER_IDLE};
use crate::collision::Rect;
use crate::config::PlayerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    Moving,
    Colliding,
    Inactive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerData {
    pub state: PlayerState,
    pub weapon_timer: Timer,
    /// Fire key held this tick; selects the shooting poses.
    pub shooting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletData {
    pub state: BulletState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Level,
    Player(PlayerData),
    Bullet(BulletData),
}

/// Renderer-facing sprite handle. The simulation picks it; the renderer maps
/// it to a texture.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Ground,
    Panel,
    Grass,
    Brick,
    Idle,
    Run,
    Slide,
    Shoot,
    RunShoot,
    SlideShoot,
    Bullet,
    BulletHit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Facing, `-1.0` or `+1.0`.
    pub direction: f32,
    pub max_speed_x: f32,
    /// Offset and size relative to `position`.
    pub collider: Rect,
    /// Subject to gravity.
    pub dynamic: bool,
    pub grounded: bool,
    pub animations: Vec<AnimationClip>,
    pub current_animation: Option<usize>,
    pub sprite: Sprite,
}

impl Entity {
    fn base(kind: EntityKind, position: Vec2, collider: Rect, sprite: Sprite) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            direction: 1.0,
            max_speed_x: 0.0,
            collider,
            dynamic: false,
            grounded: false,
            animations: Vec::new(),
            current_animation: None,
            sprite,
        }
    }

    pub fn new_level(position: Vec2, collider: Rect, sprite: Sprite) -> Self {
        Self::base(EntityKind::Level, position, collider, sprite)
    }

    pub fn new_player(
        position: Vec2,
        tuning: &PlayerTuning,
        weapon_cooldown: f32,
        animations: Vec<AnimationClip>,
    ) -> Self {
        let [x, y, w, h] = tuning.collider;
        let data = PlayerData {
            state: PlayerState::Idle,
            weapon_timer: Timer::new(weapon_cooldown),
            shooting: false,
        };
        let mut player = Self::base(
            EntityKind::Player(data),
            position,
            Rect::new(x, y, w, h),
            Sprite::Idle,
        );
        player.acceleration = Vec2::new(tuning.acceleration, 0.0);
        player.max_speed_x = tuning.max_speed_x;
        player.dynamic = true;
        player.animations = animations;
        player.current_animation = Some(PLAYER_IDLE);
        player
    }

    pub fn new_bullet(
        position: Vec2,
        velocity: Vec2,
        direction: f32,
        size: f32,
        animations: Vec<AnimationClip>,
    ) -> Self {
        let data = BulletData {
            state: BulletState::Moving,
        };
        let mut bullet = Self::base(
            EntityKind::Bullet(data),
            position,
            Rect::new(0.0, 0.0, size, size),
            Sprite::Bullet,
        );
        bullet.velocity = velocity;
        bullet.direction = direction;
        bullet.animations = animations;
        bullet.current_animation = Some(BULLET_MOVING);
        bullet
    }

    /// Collider in world space.
    pub fn world_rect(&self) -> Rect {
        self.collider.translated(self.position)
    }

    pub fn is_level(&self) -> bool {
        matches!(self.kind, EntityKind::Level)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet(_))
    }

    /// Inactive bullets are skipped by physics, collision, animation and rendering.
    pub fn is_active(&self) -> bool {
        match &self.kind {
            EntityKind::Bullet(data) => data.state != BulletState::Inactive,
            _ => true,
        }
    }

    pub fn player(&self) -> &PlayerData {
        match &self.kind {
            EntityKind::Player(data) => data,
            other => panic!("expected a player entity, found {:?}", other),
        }
    }

    pub fn player_mut(&mut self) -> &mut PlayerData {
        match &mut self.kind {
            EntityKind::Player(data) => data,
            other => panic!("expected a player entity, found {:?}", other),
        }
    }

    pub fn bullet(&self) -> &BulletData {
        match &self.kind {
            EntityKind::Bullet(data) => data,
            other => panic!("expected a bullet entity, found {:?}", other),
        }
    }

    pub fn bullet_mut(&mut self) -> &mut BulletData {
        match &mut self.kind {
            EntityKind::Bullet(data) => data,
            other => panic!("expected a bullet entity, found {:?}", other),
        }
    }

    /// Switch to clip `index` and show `sprite`. The clip keeps its own clock.
    pub fn set_animation(&mut self, index: usize, sprite: Sprite) {
        assert!(
            index < self.animations.len(),
            "animation index {} out of range ({} clips)",
            index,
            self.animations.len()
        );
        self.current_animation = Some(index);
        self.sprite = sprite;
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current_animation.and_then(|i| self.animations.get(i))
    }

    /// Frame of the active clip, `0` when there is none.
    pub fn current_frame(&self) -> u32 {
        self.current_clip().map_or(0, AnimationClip::current_frame)
    }

    pub fn step_animation(&mut self, dt: f32) {
        if let Some(index) = self.current_animation {
            if let Some(clip) = self.animations.get_mut(index) {
                clip.step(dt);
            }
        }
    }
}

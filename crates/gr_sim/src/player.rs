//! Player locomotion and weapon control.
//!
//! Locomotion is a three-state machine:
//!
//! ```text
//!   Idle --h != 0--> Running --h == 0--> Idle
//!   Idle/Running --jump edge--> Jumping   (vy += jump_impulse)
//!   Jumping --landing--> Idle             (applied by ground sensing)
//! ```
//!
//! The weapon runs independently of locomotion: its cooldown timer ticks
//! every step and, while fire is held and the timer has elapsed, a bullet is
//! spawned into the pool.

use glam::Vec2;
use gr_core::animation::AnimationClip;
use gr_core::input::InputSnapshot;
use rand::Rng;

use crate::bullets::BulletPool;
use crate::clips::{PLAYER_IDLE, PLAYER_RUN, PLAYER_SHOOT, PLAYER_SLIDE, PLAYER_SLIDE_SHOOT};
use crate::config::SimConfig;
use crate::entity::{Entity, PlayerState, Sprite};
use crate::physics;

/// Run one tick of player control: jump, locomotion, horizontal motion, weapon.
pub fn step<R: Rng>(
    player: &mut Entity,
    bullets: &mut BulletPool,
    input: &InputSnapshot,
    dt: f32,
    config: &SimConfig,
    bullet_clips: &[AnimationClip],
    rng: &mut R,
) {
    let h = input.horizontal();
    if h != 0.0 {
        player.direction = h;
    }
    player.player_mut().shooting = input.fire_held;

    if input.jump_pressed {
        try_jump(player, config.player.jump_impulse);
    }

    update_locomotion(player, h, dt, config.player.deceleration_factor);
    physics::apply_horizontal_control(player, h, dt);

    if weapon_ready(player, input.fire_held, dt) {
        let template = bullet_template(player, config, bullet_clips, rng);
        bullets.spawn(template);
    }
}

fn set_state(player: &mut Entity, next: PlayerState) {
    let data = player.player_mut();
    if data.state != next {
        log::debug!("player state {:?} -> {:?}", data.state, next);
        data.state = next;
    }
}

/// Jumping is only reachable from the ground states, so a held key or a
/// repeated edge mid-air never adds a second impulse.
fn try_jump(player: &mut Entity, jump_impulse: f32) {
    match player.player().state {
        PlayerState::Idle | PlayerState::Running => {
            set_state(player, PlayerState::Jumping);
            player.velocity.y += jump_impulse;
        }
        PlayerState::Jumping => {}
    }
}

fn update_locomotion(player: &mut Entity, h: f32, dt: f32, deceleration_factor: f32) {
    let shooting = player.player().shooting;
    match player.player().state {
        PlayerState::Idle => {
            if h != 0.0 {
                set_state(player, PlayerState::Running);
            } else {
                let rate = deceleration_factor * player.acceleration.x;
                physics::decelerate(player, rate, dt);
            }
            if shooting {
                player.set_animation(PLAYER_SHOOT, Sprite::Shoot);
            } else {
                player.set_animation(PLAYER_IDLE, Sprite::Idle);
            }
        }
        PlayerState::Running => {
            if h == 0.0 {
                set_state(player, PlayerState::Idle);
            }
            // Facing against the motion while on the ground.
            let sliding = player.velocity.x * player.direction < 0.0 && player.grounded;
            match (sliding, shooting) {
                (true, true) => player.set_animation(PLAYER_SLIDE_SHOOT, Sprite::SlideShoot),
                (true, false) => player.set_animation(PLAYER_SLIDE, Sprite::Slide),
                (false, true) => player.set_animation(PLAYER_RUN, Sprite::RunShoot),
                (false, false) => player.set_animation(PLAYER_RUN, Sprite::Run),
            }
        }
        PlayerState::Jumping => {
            let sprite = if shooting { Sprite::RunShoot } else { Sprite::Run };
            player.set_animation(PLAYER_RUN, sprite);
        }
    }
}

fn weapon_ready(player: &mut Entity, fire_held: bool, dt: f32) -> bool {
    let timer = &mut player.player_mut().weapon_timer;
    timer.step(dt);
    if fire_held && timer.is_timeout() {
        timer.reset();
        return true;
    }
    false
}

/// Bullet leaving the muzzle on the player's facing side, inheriting the
/// player's horizontal velocity plus a small random vertical drift.
pub fn bullet_template<R: Rng>(
    player: &Entity,
    config: &SimConfig,
    bullet_clips: &[AnimationClip],
    rng: &mut R,
) -> Entity {
    let weapon = &config.weapon;
    let half_spread = weapon.vertical_spread / 2.0;
    let vertical = if half_spread > 0.0 {
        rng.gen_range(-half_spread..half_spread)
    } else {
        0.0
    };
    let velocity = Vec2::new(
        player.velocity.x + weapon.muzzle_speed * player.direction,
        vertical,
    );

    // Facing -1 maps to the left muzzle, +1 to the right one.
    let t = (player.direction + 1.0) / 2.0;
    let x_offset =
        weapon.muzzle_offset_left + (weapon.muzzle_offset_right - weapon.muzzle_offset_left) * t;
    let position = Vec2::new(
        player.position.x + x_offset,
        player.position.y + config.tile_size / 2.0 - weapon.bullet_size / 2.0,
    );

    Entity::new_bullet(
        position,
        velocity,
        player.direction,
        weapon.bullet_size,
        bullet_clips.to_vec(),
    )
}

//! Gravity and semi-implicit Euler integration.
//!
//! Velocity is updated before position within a tick. There is no
//! sub-stepping: a large `dt` lets fast movers tunnel through thin tiles.

use crate::bullets::BulletPool;
use crate::entity::Entity;

/// Integrate every dynamic entity and every live bullet by `dt`.
pub fn step(dynamic_layer: &mut [Entity], bullets: &mut BulletPool, gravity: f32, dt: f32) {
    for entity in dynamic_layer.iter_mut() {
        integrate(entity, gravity, dt);
    }
    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        integrate(bullet, gravity, dt);
    }
}

/// Apply gravity to airborne dynamic entities, then move by velocity.
pub fn integrate(entity: &mut Entity, gravity: f32, dt: f32) {
    if entity.dynamic && !entity.grounded {
        entity.velocity.y += gravity * dt;
    }
    entity.position += entity.velocity * dt;
}

/// Accelerate along `h` (in `{-1, 0, +1}`) and clamp to the speed limit.
///
/// With no input the clamp is skipped; idle braking handles that case.
pub fn apply_horizontal_control(entity: &mut Entity, h: f32, dt: f32) {
    entity.velocity.x += h * entity.acceleration.x * dt;
    if h != 0.0 && entity.velocity.x.abs() > entity.max_speed_x {
        entity.velocity.x = h * entity.max_speed_x;
    }
}

/// Brake horizontal velocity toward zero by `rate * dt` without crossing it.
pub fn decelerate(entity: &mut Entity, rate: f32, dt: f32) {
    let vx = entity.velocity.x;
    if vx == 0.0 {
        return;
    }
    let amount = rate * dt;
    if vx.abs() <= amount {
        entity.velocity.x = 0.0;
    } else {
        entity.velocity.x -= vx.signum() * amount;
    }
}

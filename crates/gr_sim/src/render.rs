//! Read-only draw lists for a renderer.
//!
//! Everything here is in screen space: world positions minus the viewport
//! origin. The records are `Pod` so a renderer can upload them as-is.

use glam::Vec2;

use crate::collision::{self, Rect};
use crate::entity::Entity;
use crate::world::World;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    /// `Sprite` discriminant.
    pub sprite: u32,
    pub frame: u32,
    /// Non-zero when the sprite faces left.
    pub flip_x: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugRect {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

const LEVEL_COLOR: [f32; 4] = [0.2, 0.9, 0.2, 1.0];
const PLAYER_COLOR: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
const BULLET_COLOR: [f32; 4] = [0.95, 0.85, 0.1, 1.0];
const PROBE_COLOR: [f32; 4] = [0.2, 0.4, 0.95, 1.0];

/// Translation from world space to screen space.
pub fn camera_offset(viewport: &Rect) -> Vec2 {
    Vec2::new(-viewport.x, -viewport.y)
}

fn instance(entity: &Entity, offset: Vec2) -> SpriteInstance {
    let p = entity.position + offset;
    SpriteInstance {
        position: [p.x, p.y],
        sprite: entity.sprite as u32,
        frame: entity.current_frame(),
        flip_x: u32::from(entity.direction < 0.0),
    }
}

fn debug_rect(rect: Rect, offset: Vec2, color: [f32; 4]) -> DebugRect {
    DebugRect {
        position: [rect.x + offset.x, rect.y + offset.y],
        size: [rect.w, rect.h],
        color,
    }
}

/// Sprites back to front: decorative tiles, level tiles, characters, bullets.
pub fn sprite_instances(world: &World) -> Vec<SpriteInstance> {
    let offset = camera_offset(&world.viewport);
    world
        .decorative_tiles
        .iter()
        .chain(world.static_layer.iter())
        .chain(world.dynamic_layer.iter())
        .chain(world.bullets.iter().filter(|b| b.is_active()))
        .map(|e| instance(e, offset))
        .collect()
}

/// Collider outlines and ground probes, empty unless the debug overlay is on.
pub fn debug_rects(world: &World) -> Vec<DebugRect> {
    if !world.debug {
        return Vec::new();
    }
    let offset = camera_offset(&world.viewport);
    let mut out = Vec::new();
    for tile in &world.static_layer {
        out.push(debug_rect(tile.world_rect(), offset, LEVEL_COLOR));
    }
    for entity in &world.dynamic_layer {
        out.push(debug_rect(entity.world_rect(), offset, PLAYER_COLOR));
        out.push(debug_rect(collision::ground_probe(entity), offset, PROBE_COLOR));
    }
    for bullet in world.bullets.iter().filter(|b| b.is_active()) {
        out.push(debug_rect(bullet.world_rect(), offset, BULLET_COLOR));
    }
    out
}

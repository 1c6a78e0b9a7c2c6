//! Rectangle overlap detection and response.
//!
//! Every mover (dynamic entities and live bullets) is tested against every
//! level tile. When two world rectangles overlap, the overlap rectangle picks
//! the axis to correct: a narrower-than-tall overlap is a side hit, anything
//! else is a floor or ceiling hit. The mover is pushed back by the overlap
//! extent *against its own velocity on that axis*, and that velocity
//! component is zeroed. A mover with zero velocity on the chosen axis gets
//! no positional correction, only the velocity zeroing; gameplay tuning
//! depends on this, so it stays.
//!
//! Ground sensing is separate from response: a 1-unit-tall probe directly
//! under the collider is tested against the level tiles. Rising edges of the
//! grounded flag force the player back to `Idle`.
//!
//! Pairs other than player/level and moving-bullet/level have no response,
//! so they are never tested. There is no broad phase; the level tile count
//! keeps the pairwise scan cheap enough.

use glam::Vec2;

use crate::bullets::BulletPool;
use crate::clips::BULLET_HIT;
use crate::entity::{BulletState, Entity, EntityKind, PlayerState, Sprite};

const GROUND_PROBE_HEIGHT: f32 = 1.0;

/// Axis-aligned rectangle, `x`/`y` at the top-left, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    /// Overlap of two rectangles, `None` unless it has positive area.
    /// Rectangles that only share an edge do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }
}

/// Resolve all mover/level overlaps and refresh ground sensing for one tick.
pub fn step(static_layer: &[Entity], dynamic_layer: &mut [Entity], bullets: &mut BulletPool) {
    for mover in dynamic_layer.iter_mut() {
        for tile in static_layer {
            check_collision(mover, tile);
        }
        let found_ground = sense_ground(mover, static_layer);
        apply_ground_sensor(mover, found_ground);
    }

    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        for tile in static_layer {
            check_collision(bullet, tile);
        }
    }
}

/// Test one pair and apply the response rule for its kinds.
/// Returns true if the rectangles overlapped.
pub fn check_collision(mover: &mut Entity, other: &Entity) -> bool {
    match mover.world_rect().intersection(&other.world_rect()) {
        Some(overlap) => {
            collision_response(mover, other, &overlap);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    Ignore,
    Block,
    Impact,
}

fn response_for(mover: &EntityKind, other: &EntityKind) -> Response {
    match (mover, other) {
        (EntityKind::Player(_), EntityKind::Level) => Response::Block,
        (EntityKind::Bullet(data), EntityKind::Level) if data.state == BulletState::Moving => {
            Response::Impact
        }
        _ => Response::Ignore,
    }
}

fn collision_response(mover: &mut Entity, other: &Entity, overlap: &Rect) {
    match response_for(&mover.kind, &other.kind) {
        Response::Ignore => {}
        Response::Block => resolve_overlap(mover, overlap),
        Response::Impact => {
            resolve_overlap(mover, overlap);
            mover.bullet_mut().state = BulletState::Colliding;
            mover.velocity = Vec2::ZERO;
            mover.set_animation(BULLET_HIT, Sprite::BulletHit);
            log::debug!(
                "bullet hit level at ({:.1}, {:.1})",
                mover.position.x,
                mover.position.y
            );
        }
    }
}

/// Push `entity` out of `overlap` along the thinner overlap axis, against
/// its velocity on that axis, and zero that velocity component.
pub fn resolve_overlap(entity: &mut Entity, overlap: &Rect) {
    if overlap.w < overlap.h {
        // Side hit
        if entity.velocity.x > 0.0 {
            entity.position.x -= overlap.w;
        } else if entity.velocity.x < 0.0 {
            entity.position.x += overlap.w;
        }
        entity.velocity.x = 0.0;
    } else {
        // Floor or ceiling hit
        if entity.velocity.y > 0.0 {
            entity.position.y -= overlap.h;
        } else if entity.velocity.y < 0.0 {
            entity.position.y += overlap.h;
        }
        entity.velocity.y = 0.0;
    }
}

/// Thin rectangle directly under the entity's collider.
pub fn ground_probe(entity: &Entity) -> Rect {
    let body = entity.world_rect();
    Rect::new(body.x, body.bottom(), body.w, GROUND_PROBE_HEIGHT)
}

/// True if the ground probe touches any level tile.
pub fn sense_ground(entity: &Entity, static_layer: &[Entity]) -> bool {
    let probe = ground_probe(entity);
    static_layer
        .iter()
        .filter(|tile| tile.is_level())
        .any(|tile| probe.intersects(&tile.world_rect()))
}

/// Store the sensor result. Landing (false -> true) forces the player idle.
pub fn apply_ground_sensor(entity: &mut Entity, found_ground: bool) {
    if entity.grounded == found_ground {
        return;
    }
    entity.grounded = found_ground;
    if !found_ground {
        return;
    }
    if let EntityKind::Player(data) = &mut entity.kind {
        if data.state != PlayerState::Idle {
            log::debug!("player landed: {:?} -> Idle", data.state);
        }
        data.state = PlayerState::Idle;
    }
}

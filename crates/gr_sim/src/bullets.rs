//! Projectile slot pool and bullet lifecycle.
//!
//! Slots are never removed. A spawn overwrites the first `Inactive` slot in
//! index order, or appends when every slot is live, so the pool grows to the
//! peak number of simultaneous bullets and stays there for the session.
//! The scan is linear; pools stay small because bullets die at the viewport
//! edge.

use crate::collision::Rect;
use crate::entity::{BulletState, Entity};

#[derive(Debug, Clone, Default)]
pub struct BulletPool {
    slots: Vec<Entity>,
}

impl BulletPool {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Place `template` in the first inactive slot, appending if none is free.
    /// Returns the slot index.
    pub fn spawn(&mut self, template: Entity) -> usize {
        assert!(template.is_bullet(), "bullet pool only holds bullets");
        match self.slots.iter().position(|b| !b.is_active()) {
            Some(index) => {
                self.slots[index] = template;
                index
            }
            None => {
                self.slots.push(template);
                log::debug!("bullet pool grew to {} slots", self.slots.len());
                self.slots.len() - 1
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.is_active()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut()
    }
}

/// True once `position` has crossed any edge of `viewport`.
pub fn outside_viewport(bullet: &Entity, viewport: &Rect) -> bool {
    let x = bullet.position.x - viewport.x;
    let y = bullet.position.y - viewport.y;
    x < 0.0 || x > viewport.w || y < 0.0 || y > viewport.h
}

/// Release bullets that left the viewport or finished their impact clip.
pub fn update_lifecycle(pool: &mut BulletPool, viewport: &Rect) {
    for (index, bullet) in pool.iter_mut().enumerate() {
        let release = match bullet.bullet().state {
            BulletState::Moving => outside_viewport(bullet, viewport),
            BulletState::Colliding => bullet.current_clip().map_or(true, |clip| clip.is_done()),
            BulletState::Inactive => false,
        };
        if release {
            log::debug!("bullet slot {} released from {:?}", index, bullet.bullet().state);
            bullet.bullet_mut().state = BulletState::Inactive;
        }
    }
}

//! Side-scrolling run-and-gun simulation core.
//!
//! The `World` owns every entity and advances them one tick at a time:
//! player control, integration, collision, animation, bullet lifecycle and
//! camera follow. Level grids, clip tables, tuning and replays load from
//! JSON; rendering only reads the world through `render`.

pub mod bullets;
pub mod clips;
pub mod collision;
pub mod config;
pub mod entity;
pub mod level;
pub mod physics;
pub mod player;
pub mod render;
pub mod replay;
pub mod world;

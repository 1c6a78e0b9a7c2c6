//! Simulation world: entity layers, bullet pool, camera window, tick pipeline.
//!
//! One tick runs to completion in this order:
//!
//!   1. player control (input, locomotion, weapon; may spawn a bullet)
//!   2. physics integration of dynamic entities and live bullets
//!   3. collision response and ground sensing
//!   4. animation clocks
//!   5. bullet lifecycle (viewport exit, finished impacts)
//!   6. viewport follows the player
//!
//! The world is rebuilt per level load. The player is created once during
//! load and lives in `dynamic_layer` at `player_index` for the whole session.

use glam::Vec2;
use gr_core::input::InputSnapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bullets::{self, BulletPool};
use crate::clips::ClipLibrary;
use crate::collision::{self, Rect};
use crate::config::SimConfig;
use crate::entity::{Entity, Sprite};
use crate::level::{LevelGrid, TileCode};
use crate::physics;
use crate::player;

pub struct World {
    /// Collision-relevant level tiles, fixed after load.
    pub static_layer: Vec<Entity>,
    /// Player and any future characters. Entries are never removed.
    pub dynamic_layer: Vec<Entity>,
    pub bullets: BulletPool,
    /// Render-only tiles, outside physics and collision.
    pub decorative_tiles: Vec<Entity>,
    /// Camera window in world units.
    pub viewport: Rect,
    /// Enemy spawn points from the level. Enemies are not simulated.
    pub enemy_spawns: Vec<Vec2>,
    /// Collider overlay toggle, read by the renderer.
    pub debug: bool,
    player_index: usize,
    config: SimConfig,
    clips: ClipLibrary,
    rng: StdRng,
    tick_count: u64,
}

impl World {
    /// Convert a level grid into entities placed on the tile grid.
    ///
    /// Rows are bottom-aligned to the viewport: the last row sits on the
    /// viewport's bottom edge.
    pub fn from_level(
        level: &LevelGrid,
        config: SimConfig,
        clips: ClipLibrary,
    ) -> Result<Self, String> {
        let tile = config.tile_size;
        let rows = level.row_count();
        let tile_collider = Rect::new(0.0, 0.0, tile, tile);

        let mut static_layer = Vec::new();
        let mut dynamic_layer = Vec::new();
        let mut decorative_tiles = Vec::new();
        let mut enemy_spawns = Vec::new();
        let mut player_index = None;

        for (r, c, code) in level.tiles() {
            let position = Vec2::new(
                c as f32 * tile,
                config.viewport_height - (rows - r) as f32 * tile,
            );
            match code {
                TileCode::Ground => {
                    static_layer.push(Entity::new_level(position, tile_collider, Sprite::Ground))
                }
                TileCode::Panel => {
                    static_layer.push(Entity::new_level(position, tile_collider, Sprite::Panel))
                }
                TileCode::Grass => {
                    decorative_tiles.push(Entity::new_level(position, tile_collider, Sprite::Grass))
                }
                TileCode::Brick => {
                    decorative_tiles.push(Entity::new_level(position, tile_collider, Sprite::Brick))
                }
                TileCode::Enemy => enemy_spawns.push(position),
                TileCode::PlayerSpawn => {
                    if player_index.is_some() {
                        return Err(format!(
                            "Level '{}' has more than one player spawn",
                            level.level_id
                        ));
                    }
                    dynamic_layer.push(Entity::new_player(
                        position,
                        &config.player,
                        config.weapon.cooldown,
                        clips.player().to_vec(),
                    ));
                    player_index = Some(dynamic_layer.len() - 1);
                }
                TileCode::Empty => {}
            }
        }

        let player_index = player_index
            .ok_or_else(|| format!("Level '{}' has no player spawn", level.level_id))?;

        log::info!(
            "Loaded level '{}' ({}x{}): {} solid tiles, {} decorative tiles",
            level.level_id,
            level.col_count(),
            rows,
            static_layer.len(),
            decorative_tiles.len()
        );
        if !enemy_spawns.is_empty() {
            log::warn!(
                "Level '{}' declares {} enemy spawns; enemies are not simulated",
                level.level_id,
                enemy_spawns.len()
            );
        }

        let mut world = Self {
            static_layer,
            dynamic_layer,
            bullets: BulletPool::new(),
            decorative_tiles,
            viewport: Rect::new(0.0, 0.0, config.viewport_width, config.viewport_height),
            enemy_spawns,
            debug: false,
            player_index,
            config,
            clips,
            rng: StdRng::seed_from_u64(config.rng_seed),
            tick_count: 0,
        };
        world.follow_player();
        Ok(world)
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn player(&self) -> &Entity {
        let player = &self.dynamic_layer[self.player_index];
        assert!(player.is_player(), "player_index does not address the player");
        player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        let player = &mut self.dynamic_layer[self.player_index];
        assert!(player.is_player(), "player_index does not address the player");
        player
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance the simulation by `dt` seconds using this tick's input.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        assert!(dt >= 0.0, "world update with negative dt ({dt})");

        if input.debug_toggle_pressed {
            self.debug = !self.debug;
            log::info!("Debug overlay {}", if self.debug { "on" } else { "off" });
        }

        let player = &mut self.dynamic_layer[self.player_index];
        assert!(player.is_player(), "player_index does not address the player");
        player::step(
            player,
            &mut self.bullets,
            input,
            dt,
            &self.config,
            self.clips.bullet(),
            &mut self.rng,
        );

        physics::step(
            &mut self.dynamic_layer,
            &mut self.bullets,
            self.config.gravity,
            dt,
        );
        collision::step(&self.static_layer, &mut self.dynamic_layer, &mut self.bullets);

        for entity in self.dynamic_layer.iter_mut() {
            entity.step_animation(dt);
        }
        for bullet in self.bullets.iter_mut().filter(|b| b.is_active()) {
            bullet.step_animation(dt);
        }

        bullets::update_lifecycle(&mut self.bullets, &self.viewport);
        self.follow_player();
        self.tick_count += 1;
    }

    /// Center the viewport horizontally on the player's sprite.
    fn follow_player(&mut self) {
        let player_x = self.player().position.x;
        self.viewport.x = player_x + self.config.tile_size / 2.0 - self.viewport.w / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BulletState, PlayerState};

    const DT: f32 = 1.0 / 60.0;

    fn world_from(codes: &[Vec<u8>]) -> World {
        let level = LevelGrid::from_codes("test", codes).expect("valid level");
        World::from_level(&level, SimConfig::default(), ClipLibrary::builtin())
            .expect("world should build")
    }

    fn run(world: &mut World, ticks: usize, input: InputSnapshot) {
        for _ in 0..ticks {
            world.update(DT, &input);
        }
    }

    fn right() -> InputSnapshot {
        InputSnapshot {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn level_load_places_tiles_bottom_aligned() {
        let world = world_from(&[vec![0, 4, 0], vec![5, 3, 6], vec![1, 2, 1]]);
        assert_eq!(world.static_layer.len(), 3);
        assert_eq!(world.decorative_tiles.len(), 2);
        assert_eq!(world.enemy_spawns, vec![Vec2::new(32.0, 256.0)]);
        assert_eq!(world.dynamic_layer.len(), 1);
        assert_eq!(world.player_index(), 0);

        assert_eq!(world.player().position, Vec2::new(32.0, 224.0));
        assert_eq!(world.static_layer[0].position, Vec2::new(0.0, 288.0));
        assert_eq!(world.static_layer[1].sprite, Sprite::Panel);
        assert!(world.static_layer.iter().all(|e| !e.dynamic));
        assert_eq!(world.config().tile_size, 32.0);
    }

    #[test]
    fn player_falls_and_rests_on_ground_strip() {
        let mut world = world_from(&[vec![0, 4, 0], vec![0, 0, 0], vec![1, 1, 1]]);
        assert!(!world.player().grounded);

        run(&mut world, 120, InputSnapshot::default());

        let player = world.player();
        let ground_top = world.static_layer[1].world_rect().y;
        let rest_y = ground_top - player.collider.h - player.collider.y;
        assert!(player.grounded);
        assert_eq!(player.velocity.y, 0.0);
        assert!(
            (player.position.y - rest_y).abs() < 1e-3,
            "player at {} expected {}",
            player.position.y,
            rest_y
        );
        assert_eq!(player.player().state, PlayerState::Idle);
    }

    #[test]
    fn rest_is_stable_over_time() {
        let mut world = world_from(&[vec![0, 4, 0], vec![0, 0, 0], vec![1, 1, 1]]);
        run(&mut world, 120, InputSnapshot::default());
        let settled = world.player().position;
        run(&mut world, 600, InputSnapshot::default());
        assert!((world.player().position - settled).length() < 1e-3);
        assert!(world.player().grounded);
    }

    #[test]
    fn jump_arc_lands_back_in_idle() {
        let mut world = world_from(&[vec![0, 0, 0], vec![0, 4, 0], vec![1, 1, 1]]);
        run(&mut world, 10, InputSnapshot::default());
        assert!(world.player().grounded);
        let floor_y = world.player().position.y;

        world.update(
            DT,
            &InputSnapshot {
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert_eq!(world.player().player().state, PlayerState::Jumping);

        run(&mut world, 5, InputSnapshot::default());
        assert!(!world.player().grounded);
        assert!(world.player().position.y < floor_y);

        // Holding right mid-air does not leave Jumping.
        run(&mut world, 5, right());
        assert_eq!(world.player().player().state, PlayerState::Jumping);

        run(&mut world, 120, InputSnapshot::default());
        assert!(world.player().grounded);
        assert_eq!(world.player().player().state, PlayerState::Idle);
        assert!((world.player().position.y - floor_y).abs() < 1e-3);
    }

    #[test]
    fn landing_forces_idle_while_right_is_held() {
        let mut world = world_from(&[vec![0; 6], vec![0, 4, 0, 0, 0, 0], vec![1; 6]]);
        run(&mut world, 10, InputSnapshot::default());
        assert!(world.player().grounded);

        world.update(
            DT,
            &InputSnapshot {
                right: true,
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert_eq!(world.player().player().state, PlayerState::Jumping);

        let mut landed = false;
        for _ in 0..120 {
            world.update(DT, &right());
            if world.player().grounded {
                landed = true;
                break;
            }
            assert_eq!(world.player().player().state, PlayerState::Jumping);
        }
        assert!(landed, "player never landed");
        assert_eq!(world.player().player().state, PlayerState::Idle);

        // Held input takes over again on the following tick.
        world.update(DT, &right());
        assert_eq!(world.player().player().state, PlayerState::Running);
    }

    #[test]
    fn wall_stops_player() {
        let mut world = world_from(&[vec![0, 0, 0, 0, 0], vec![0, 4, 0, 0, 2], vec![1, 1, 1, 1, 1]]);
        run(&mut world, 180, right());

        let player = world.player();
        let wall_left = world.static_layer[0].world_rect().x;
        let stop_x = wall_left - player.collider.w - player.collider.x;
        assert!((player.position.x - stop_x).abs() < 1e-2);
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.player().state, PlayerState::Running);
    }

    #[test]
    fn viewport_follows_player() {
        let mut world = world_from(&[vec![0, 4, 0, 0, 0, 0], vec![1, 1, 1, 1, 1, 1]]);
        assert_eq!(world.viewport.x, 32.0 + 16.0 - 320.0);

        run(&mut world, 30, right());
        let expected = world.player().position.x + 16.0 - 320.0;
        assert_eq!(world.viewport.x, expected);
        assert_eq!(world.viewport.y, 0.0);
        assert_eq!(world.viewport.w, 640.0);
    }

    #[test]
    fn bullets_leave_viewport_and_slot_is_reused() {
        let mut world = world_from(&[vec![0, 4, 0], vec![1, 1, 1]]);
        run(&mut world, 5, InputSnapshot::default());

        let fire = InputSnapshot {
            fire_held: true,
            ..Default::default()
        };
        while world.bullets.is_empty() {
            world.update(DT, &fire);
        }
        assert_eq!(world.bullets.len(), 1);

        run(&mut world, 90, InputSnapshot::default());
        assert_eq!(world.bullets.active_count(), 0);
        assert_eq!(world.bullets.len(), 1);

        while world.bullets.active_count() == 0 {
            world.update(DT, &fire);
        }
        assert_eq!(world.bullets.len(), 1);
    }

    #[test]
    fn bullet_hits_wall_then_releases() {
        let mut world = world_from(&[vec![0, 0, 0, 0, 0], vec![0, 4, 0, 0, 2], vec![1, 1, 1, 1, 1]]);
        run(&mut world, 5, InputSnapshot::default());

        let fire = InputSnapshot {
            fire_held: true,
            ..Default::default()
        };
        while world.bullets.is_empty() {
            world.update(DT, &fire);
        }

        let mut saw_impact = false;
        for _ in 0..30 {
            world.update(DT, &InputSnapshot::default());
            let bullet = world.bullets.get(0).expect("bullet slot");
            if bullet.bullet().state == BulletState::Colliding {
                saw_impact = true;
                assert_eq!(bullet.velocity, Vec2::ZERO);
                assert_eq!(bullet.sprite, Sprite::BulletHit);
            }
        }
        assert!(saw_impact, "bullet never hit the wall");
        assert_eq!(world.bullets.active_count(), 0);
    }

    #[test]
    fn debug_toggle_flips_on_edge() {
        let mut world = world_from(&[vec![4], vec![1]]);
        let toggle = InputSnapshot {
            debug_toggle_pressed: true,
            ..Default::default()
        };
        world.update(DT, &toggle);
        assert!(world.debug);
        world.update(DT, &InputSnapshot::default());
        assert!(world.debug);
        world.update(DT, &toggle);
        assert!(!world.debug);
    }

    #[test]
    fn animations_advance_each_tick() {
        let mut world = world_from(&[vec![4], vec![1]]);
        run(&mut world, 30, InputSnapshot::default());
        let clip = world.player().current_clip().expect("player has a clip");
        // Each 1/60 s step rounds to whole microseconds.
        assert!((clip.elapsed_us() as i64 - 500_000).abs() <= 30);
        assert_eq!(world.tick_count(), 30);
    }

    #[test]
    fn same_seed_same_bullets() {
        let codes = [vec![0, 4, 0], vec![1, 1, 1]];
        let fire = InputSnapshot {
            fire_held: true,
            ..Default::default()
        };
        let mut a = world_from(&codes);
        let mut b = world_from(&codes);
        run(&mut a, 40, fire);
        run(&mut b, 40, fire);
        let va: Vec<Vec2> = a.bullets.iter().map(|e| e.velocity).collect();
        let vb: Vec<Vec2> = b.bullets.iter().map(|e| e.velocity).collect();
        assert!(!va.is_empty());
        assert_eq!(va, vb);
    }

    #[test]
    #[should_panic(expected = "negative dt")]
    fn negative_dt_fails_fast() {
        let mut world = world_from(&[vec![4], vec![1]]);
        world.update(-DT, &InputSnapshot::default());
    }
}

//! Enemy behavior state machine.
//!
//! One call per enemy per tick. The airborne check always takes priority
//! over grounded state transitions; within grounded states the single
//! active enum value governs, so overlapping states are impossible by
//! construction. Perception is row-locked: an enemy only notices a player
//! on its own tile row, connected by walkable ground.

use crate::components::enemy::Enemy;
use crate::components::entity::{BehaviorState, EntityCore, EntityId, Facing};
use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use crate::level::grid::TileGrid;
use crate::level::query;
use crate::systems::movement;
use crate::world::events::{EventQueue, SimEvent};

/// Advance one enemy by one fixed tick. Reads the player's post-move
/// position for this tick; mutates only this enemy's own state.
pub fn update_enemy(
    enemy: &mut Enemy,
    grid: &TileGrid,
    cfg: &WorldConfig,
    player_box: &Hitbox,
    player_id: EntityId,
    events: &mut EventQueue,
    dt: f32,
) {
    if !enemy.core.active {
        return;
    }

    if enemy.core.first_update {
        movement::first_update_check(grid, cfg, &mut enemy.core);
    }

    if enemy.core.in_air {
        update_airborne(enemy, grid, cfg, events);
    } else {
        update_grounded(enemy, grid, cfg, player_box, player_id, events);
    }

    let finished = enemy.core.animator.tick(dt);
    if finished {
        match enemy.core.state {
            BehaviorState::Attack | BehaviorState::Hit => {
                enemy.core.set_state(BehaviorState::Idle)
            }
            BehaviorState::Dead => enemy.core.active = false,
            _ => {}
        }
    }
}

fn update_airborne(enemy: &mut Enemy, grid: &TileGrid, cfg: &WorldConfig, events: &mut EventQueue) {
    // Hit and dying enemies keep their reaction animation; everything else
    // falls until grounded.
    if enemy.core.state == BehaviorState::Hit || enemy.core.state == BehaviorState::Dead {
        return;
    }
    movement::update_in_air(grid, cfg, &mut enemy.core);
    if query::is_in_water(grid, cfg, &enemy.core.hitbox) {
        drown(enemy, events);
    }
}

fn update_grounded(
    enemy: &mut Enemy,
    grid: &TileGrid,
    cfg: &WorldConfig,
    player_box: &Hitbox,
    player_id: EntityId,
    events: &mut EventQueue,
) {
    match enemy.core.state {
        BehaviorState::Idle => {
            if query::is_on_floor(grid, cfg, &enemy.core.hitbox) {
                enemy.core.set_state(BehaviorState::Running);
            } else {
                enemy.core.in_air = true;
            }
        }
        BehaviorState::Running => {
            if can_see_player(enemy, grid, cfg, player_box) {
                turn_towards(&mut enemy.core, player_box);
                if is_player_close(enemy, cfg, player_box) {
                    enemy.core.set_state(BehaviorState::Attack);
                }
            }
            walk_step(enemy, grid, cfg);
        }
        BehaviorState::Attack => {
            if enemy.core.anim_index() == 0 {
                enemy.core.attack_checked = false;
            }
            if enemy.core.anim_index() == enemy.kind.impact_frame() && !enemy.core.attack_checked {
                check_player_hit(enemy, player_box, player_id, events);
            }
        }
        BehaviorState::Hit => {
            // Knockback runs through the final two reaction frames.
            if enemy.core.anim_index() + 2 >= enemy.kind.frames(BehaviorState::Hit) {
                push_back(enemy, grid, cfg);
            }
            enemy.core.update_push_draw_offset();
        }
        BehaviorState::Dead => {}
    }
}

/// Row-locked perception: same tile row, within sight range, and a walkable
/// line of sight between the two.
fn can_see_player(enemy: &Enemy, grid: &TileGrid, cfg: &WorldConfig, player_box: &Hitbox) -> bool {
    let player_tile_y = (player_box.y / cfg.tile_size) as i32;
    if player_tile_y != enemy.core.tile_y {
        return false;
    }
    let dist = (player_box.center_x() - enemy.core.hitbox.center_x()).abs();
    if dist > enemy.sight_range(cfg) {
        return false;
    }
    query::is_sight_clear(grid, cfg, &enemy.core.hitbox, player_box, enemy.core.tile_y)
}

/// Horizontal distance between hitbox centers against the kind's
/// configurable threshold; vertical distance is ignored.
fn is_player_close(enemy: &Enemy, cfg: &WorldConfig, player_box: &Hitbox) -> bool {
    (player_box.center_x() - enemy.core.hitbox.center_x()).abs() <= enemy.attack_distance(cfg)
}

fn turn_towards(core: &mut EntityCore, player_box: &Hitbox) {
    core.facing = if player_box.center_x() < core.hitbox.center_x() {
        Facing::Left
    } else {
        Facing::Right
    };
}

/// One walking step in the current facing direction. Reverses at walls and
/// ledge edges instead of stepping off.
fn walk_step(enemy: &mut Enemy, grid: &TileGrid, cfg: &WorldConfig) {
    let x_speed = enemy.core.facing.sign() * enemy.kind.walk_speed();
    let hb = &enemy.core.hitbox;
    if query::can_move_to(grid, cfg, hb.x + x_speed, hb.y, hb.w, hb.h)
        && query::is_floor_ahead(grid, cfg, hb, x_speed)
    {
        enemy.core.hitbox.x += x_speed;
    } else {
        enemy.core.facing = enemy.core.facing.flipped();
    }
}

/// Evaluate the active swing against the player. The swing is marked
/// checked whether or not it connected, so it can never register twice.
fn check_player_hit(
    enemy: &mut Enemy,
    player_box: &Hitbox,
    player_id: EntityId,
    events: &mut EventQueue,
) {
    if enemy.attack_box().overlaps(player_box) {
        events.push(SimEvent::AttackLanded {
            attacker: enemy.core.id,
            target: player_id,
            damage: enemy.kind.damage(),
        });
    }
    enemy.core.attack_checked = true;
}

/// Continuous knockback displacement away from the attacker, committed only
/// when the target position is clear.
fn push_back(enemy: &mut Enemy, grid: &TileGrid, cfg: &WorldConfig) {
    let x_speed =
        enemy.core.push_back_dir.sign() * enemy.kind.walk_speed() * cfg.push_back_multiplier;
    let hb = &enemy.core.hitbox;
    if query::can_move_to(grid, cfg, hb.x + x_speed, hb.y, hb.w, hb.h) {
        enemy.core.hitbox.x += x_speed;
    }
}

/// Apply damage from a player swing. Lethal damage starts the death
/// animation; anything else starts the hit reaction, shoved away from the
/// attacker.
pub fn hurt_enemy(enemy: &mut Enemy, damage: f32, attacker_center_x: f32, events: &mut EventQueue) {
    enemy.core.health -= damage;
    if enemy.core.health <= 0.0 {
        enemy.core.set_state(BehaviorState::Dead);
        events.push(SimEvent::EnemyDied {
            entity: enemy.core.id,
        });
    } else {
        let dir = if attacker_center_x < enemy.core.hitbox.center_x() {
            Facing::Right
        } else {
            Facing::Left
        };
        enemy.core.start_knockback(dir);
        events.push(SimEvent::Knockback {
            entity: enemy.core.id,
            dir,
        });
    }
}

fn drown(enemy: &mut Enemy, events: &mut EventQueue) {
    enemy.core.health = 0.0;
    enemy.core.set_state(BehaviorState::Dead);
    events.push(SimEvent::EnemyDied {
        entity: enemy.core.id,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::enemy::EnemyKind;
    use crate::level::grid::{AIR, WATER_SURFACE};

    const PLAYER_ID: EntityId = EntityId(0);

    fn cfg(w: u32, h: u32) -> WorldConfig {
        WorldConfig {
            tiles_wide: w,
            tiles_high: h,
            tile_size: 32.0,
            ..WorldConfig::default()
        }
    }

    /// Open box with a solid bottom row.
    fn floor_world(w: u32, h: u32) -> (TileGrid, WorldConfig) {
        let cfg = cfg(w, h);
        let mut rows = vec![vec![AIR; w as usize]; h as usize];
        rows[(h - 1) as usize] = vec![0; w as usize];
        (TileGrid::from_rows(&rows, &cfg).unwrap(), cfg)
    }

    /// Y that rests a hitbox of height `h` on the floor row of a world
    /// `tiles_high` tall.
    fn floor_y(cfg: &WorldConfig, h: f32) -> f32 {
        (cfg.tiles_high - 2) as f32 * cfg.tile_size + (cfg.tile_size - h) - 1.0
    }

    fn grounded_crab(cfg: &WorldConfig, x: f32) -> Enemy {
        let (_, h) = EnemyKind::Crab.hitbox_size();
        Enemy::new(EntityId(1), EnemyKind::Crab, x, floor_y(cfg, h))
    }

    fn grounded_player_box(cfg: &WorldConfig, x: f32) -> Hitbox {
        Hitbox::new(x, floor_y(cfg, 28.0), 20.0, 28.0)
    }

    #[test]
    fn idle_with_floor_runs_one_tick_later() {
        let (grid, cfg) = floor_world(10, 6);
        let mut enemy = grounded_crab(&cfg, 64.0);
        let player = grounded_player_box(&cfg, 288.0);
        let mut events = EventQueue::new();

        assert_eq!(enemy.core.state, BehaviorState::Idle);
        update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
        assert_eq!(enemy.core.state, BehaviorState::Running);
    }

    #[test]
    fn idle_mid_air_falls_before_running() {
        let (grid, cfg) = floor_world(10, 6);
        let mut enemy = Enemy::new(EntityId(1), EnemyKind::Crab, 64.0, 8.0);
        let player = grounded_player_box(&cfg, 288.0);
        let mut events = EventQueue::new();

        update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
        assert!(enemy.core.in_air);
        assert_eq!(enemy.core.state, BehaviorState::Idle);

        // Falls until grounded, never entering Running while airborne.
        let mut ticks = 0;
        while enemy.core.in_air {
            assert_eq!(enemy.core.state, BehaviorState::Idle);
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            ticks += 1;
            assert!(ticks < 10_000, "never landed");
        }
        update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
        assert_eq!(enemy.core.state, BehaviorState::Running);
    }

    #[test]
    fn running_enemy_approaches_and_attacks() {
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 64.0);
        let player = grounded_player_box(&cfg, 160.0);
        let mut events = EventQueue::new();

        // Starts out of proximity but inside sight range.
        let dist = (player.center_x() - enemy.core.hitbox.center_x()).abs();
        assert!(dist > enemy.attack_distance(&cfg));
        assert!(dist < enemy.sight_range(&cfg));

        let mut ticks = 0;
        while enemy.core.state != BehaviorState::Attack {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            ticks += 1;
            assert!(ticks < 5_000, "never reached attack range");
        }
        // It closed in on the player, facing it.
        assert_eq!(enemy.core.facing, Facing::Right);
        let dist = (player.center_x() - enemy.core.hitbox.center_x()).abs();
        assert!(dist <= enemy.attack_distance(&cfg));
    }

    #[test]
    fn perception_is_locked_to_the_enemy_row() {
        // Player on a platform one row above the enemy, horizontally near.
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 64.0);
        let player = Hitbox::new(96.0, floor_y(&cfg, 28.0) - cfg.tile_size, 20.0, 28.0);
        let mut events = EventQueue::new();

        for _ in 0..500 {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            assert_ne!(enemy.core.state, BehaviorState::Attack);
        }
    }

    #[test]
    fn swing_registers_exactly_once() {
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 96.0);
        // Player standing inside the crab's wide attack box.
        let player = grounded_player_box(&cfg, 110.0);
        let mut events = EventQueue::new();

        enemy.core.first_update = false;
        enemy.core.tile_y = (enemy.core.hitbox.y / cfg.tile_size) as i32;
        enemy.core.set_state(BehaviorState::Attack);

        // Run one full swing with many sub-frame ticks, so the impact frame
        // is revisited repeatedly without the index returning to zero.
        let mut landed = 0;
        while enemy.core.state == BehaviorState::Attack {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, 0.01);
            for event in events.drain() {
                if matches!(event, SimEvent::AttackLanded { .. }) {
                    landed += 1;
                }
            }
        }
        assert_eq!(landed, 1);
    }

    #[test]
    fn missed_swing_does_not_fire() {
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 96.0);
        let player = grounded_player_box(&cfg, 320.0); // far away
        let mut events = EventQueue::new();

        enemy.core.first_update = false;
        enemy.core.tile_y = (enemy.core.hitbox.y / cfg.tile_size) as i32;
        enemy.core.set_state(BehaviorState::Attack);

        while enemy.core.state == BehaviorState::Attack {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
        }
        assert!(events.drain().iter().all(|e| !matches!(e, SimEvent::AttackLanded { .. })));
    }

    #[test]
    fn hurt_enemy_knocks_back_away_from_the_attacker() {
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 96.0);
        let mut events = EventQueue::new();
        enemy.core.first_update = false;

        // Attacker on the left shoves the enemy right.
        hurt_enemy(&mut enemy, 5.0, 50.0, &mut events);
        assert_eq!(enemy.core.state, BehaviorState::Hit);
        assert_eq!(enemy.core.push_back_dir, Facing::Right);
        assert!(matches!(
            events.drain().as_slice(),
            [SimEvent::Knockback {
                dir: Facing::Right,
                ..
            }]
        ));

        // Displacement happens during the final two reaction frames, by a
        // fixed per-tick increment.
        let player = grounded_player_box(&cfg, 320.0);
        let step = enemy.kind.walk_speed() * cfg.push_back_multiplier;
        let mut last_x = enemy.core.hitbox.x;
        while enemy.core.state == BehaviorState::Hit {
            let frame = enemy.core.anim_index();
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            let moved = enemy.core.hitbox.x - last_x;
            if frame + 2 >= enemy.kind.frames(BehaviorState::Hit) {
                assert!((moved - step).abs() < 1e-4);
            } else {
                assert_eq!(moved, 0.0);
            }
            last_x = enemy.core.hitbox.x;
        }
        assert_eq!(enemy.core.state, BehaviorState::Idle);

        // The visual shove offset decays back to zero after the reaction.
        for _ in 0..200 {
            enemy.core.update_push_draw_offset();
        }
        assert_eq!(enemy.core.push_draw_offset, 0.0);
    }

    #[test]
    fn lethal_damage_starts_death_and_deactivates() {
        let (grid, cfg) = floor_world(12, 6);
        let mut enemy = grounded_crab(&cfg, 96.0);
        let player = grounded_player_box(&cfg, 320.0);
        let mut events = EventQueue::new();
        enemy.core.first_update = false;

        let health = enemy.core.health;
        hurt_enemy(&mut enemy, health, 50.0, &mut events);
        assert_eq!(enemy.core.state, BehaviorState::Dead);
        assert!(matches!(events.drain().as_slice(), [SimEvent::EnemyDied { .. }]));

        let mut ticks = 0;
        while enemy.core.active {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            ticks += 1;
            assert!(ticks < 1_000, "death animation never finished");
        }
    }

    #[test]
    fn airborne_enemy_drowns_in_water() {
        let cfg = cfg(6, 6);
        let mut rows = vec![vec![AIR; 6]; 6];
        rows[4] = vec![WATER_SURFACE; 6];
        rows[5] = vec![0; 6];
        let grid = TileGrid::from_rows(&rows, &cfg).unwrap();

        let mut enemy = Enemy::new(EntityId(1), EnemyKind::Crab, 64.0, 8.0);
        let player = Hitbox::new(160.0, 8.0, 20.0, 28.0);
        let mut events = EventQueue::new();

        let mut died = false;
        for _ in 0..5_000 {
            update_enemy(&mut enemy, &grid, &cfg, &player, PLAYER_ID, &mut events, cfg.tick_dt());
            if events.drain().iter().any(|e| matches!(e, SimEvent::EnemyDied { .. })) {
                died = true;
                break;
            }
        }
        assert!(died, "enemy never drowned");
    }
}

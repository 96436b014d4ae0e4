//! Pure collision and perception queries over a tile grid.
//!
//! Every function here is side-effect free and bounded-time: point lookups
//! are O(1), sight scans are O(distance in tiles). Out-of-bounds coordinates
//! always read as solid, so nothing escapes the level.

use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use crate::level::grid::{TileGrid, WATER_SURFACE};

/// Whether a rectangle of `w` x `h` pixels can sit at (`x`, `y`): all four
/// corners must be non-solid. Gates any proposed move before it commits.
pub fn can_move_to(grid: &TileGrid, cfg: &WorldConfig, x: f32, y: f32, w: f32, h: f32) -> bool {
    !grid.is_solid(x, y, cfg)
        && !grid.is_solid(x + w, y + h, cfg)
        && !grid.is_solid(x + w, y, cfg)
        && !grid.is_solid(x, y + h, cfg)
}

/// Whether a hitbox is resting on a floor: the row one pixel below either
/// bottom corner is solid. The OR of two corners is deliberate: an entity
/// straddling a ledge still counts as grounded.
pub fn is_on_floor(grid: &TileGrid, cfg: &WorldConfig, hb: &Hitbox) -> bool {
    grid.is_solid(hb.x, hb.bottom() + 1.0, cfg) || grid.is_solid(hb.right(), hb.bottom() + 1.0, cfg)
}

/// Speed-aware floor probe: samples one pixel below the leading bottom
/// corner at the position the entity is about to occupy. Lets a walker stop
/// at a ledge edge before it steps off.
pub fn is_floor_ahead(grid: &TileGrid, cfg: &WorldConfig, hb: &Hitbox, x_speed: f32) -> bool {
    if x_speed > 0.0 {
        grid.is_solid(hb.right() + x_speed, hb.bottom() + 1.0, cfg)
    } else {
        grid.is_solid(hb.x + x_speed, hb.bottom() + 1.0, cfg)
    }
}

/// Whether either bottom corner of the hitbox touches the water-surface
/// band. Deeper water is unreachable without crossing the surface first.
pub fn is_in_water(grid: &TileGrid, cfg: &WorldConfig, hb: &Hitbox) -> bool {
    grid.tile_at(hb.x, hb.bottom(), cfg) == Some(WATER_SURFACE)
        || grid.tile_at(hb.right(), hb.bottom(), cfg) == Some(WATER_SURFACE)
}

/// X position flush against the tile boundary a horizontal move collided
/// with. Moving right snaps the right edge one pixel short of the next
/// tile; moving left snaps to the left edge of the current tile.
pub fn x_against_wall(cfg: &WorldConfig, hb: &Hitbox, x_speed: f32) -> f32 {
    let current_tile = (hb.x / cfg.tile_size) as i32;
    if x_speed > 0.0 {
        let tile_x = current_tile as f32 * cfg.tile_size;
        tile_x + (cfg.tile_size - hb.w) - 1.0
    } else {
        current_tile as f32 * cfg.tile_size
    }
}

/// Y position under a roof (moving up) or resting on a floor (moving
/// down), mirroring [`x_against_wall`] on the vertical axis.
pub fn y_under_roof_or_above_floor(cfg: &WorldConfig, hb: &Hitbox, air_speed: f32) -> f32 {
    let current_tile = (hb.y / cfg.tile_size) as i32;
    if air_speed > 0.0 {
        let tile_y = current_tile as f32 * cfg.tile_size;
        tile_y + (cfg.tile_size - hb.h) - 1.0
    } else {
        current_tile as f32 * cfg.tile_size
    }
}

/// Whether every tile column in `[x_start, x_end)` at row `y` is non-solid.
pub fn all_tiles_clear(grid: &TileGrid, x_start: i32, x_end: i32, y: i32) -> bool {
    for i in 0..(x_end - x_start) {
        if grid.is_tile_solid(x_start + i, y) {
            return false;
        }
    }
    true
}

/// Like [`all_tiles_clear`], but each column must also have solid ground
/// directly below it. Sight only counts across contiguous walkable floor,
/// never across open pits.
pub fn all_tiles_walkable(grid: &TileGrid, x_start: i32, x_end: i32, y: i32) -> bool {
    if !all_tiles_clear(grid, x_start, x_end, y) {
        return false;
    }
    for i in 0..(x_end - x_start) {
        if !grid.is_tile_solid(x_start + i, y + 1) {
            return false;
        }
    }
    true
}

/// Row-locked line of sight between an enemy and the player over walkable
/// ground. The player's anchor column is its supported edge: left edge if
/// the tile beneath it is solid, otherwise the right edge.
pub fn is_sight_clear(
    grid: &TileGrid,
    cfg: &WorldConfig,
    enemy_box: &Hitbox,
    player_box: &Hitbox,
    y_tile: i32,
) -> bool {
    let first_x = (enemy_box.x / cfg.tile_size) as i32;
    let second_x = if grid.is_solid(player_box.x, player_box.bottom() + 1.0, cfg) {
        (player_box.x / cfg.tile_size) as i32
    } else {
        (player_box.right() / cfg.tile_size) as i32
    };

    if first_x > second_x {
        all_tiles_walkable(grid, second_x, first_x, y_tile)
    } else {
        all_tiles_walkable(grid, first_x, second_x, y_tile)
    }
}

/// Straight-line sight along a row, with no ground requirement. Used by
/// cannons, which shoot across pits.
pub fn can_cannon_see(
    grid: &TileGrid,
    cfg: &WorldConfig,
    first: &Hitbox,
    second: &Hitbox,
    y_tile: i32,
) -> bool {
    let first_x = (first.x / cfg.tile_size) as i32;
    let second_x = (second.x / cfg.tile_size) as i32;

    if first_x > second_x {
        all_tiles_clear(grid, second_x, first_x, y_tile)
    } else {
        all_tiles_clear(grid, first_x, second_x, y_tile)
    }
}

/// Whether a projectile hit the level: point sample at the hitbox center.
pub fn projectile_impact(grid: &TileGrid, cfg: &WorldConfig, hb: &Hitbox) -> bool {
    grid.is_solid(hb.x + hb.w / 2.0, hb.y + hb.h / 2.0, cfg)
}

//! Movement resolver: converts requested displacements into admissible
//! positions against the tile grid.
//!
//! Horizontal and vertical axes resolve independently. The safety invariant
//! is that a hitbox never ends a tick overlapping a solid tile: blocked
//! moves snap flush against the obstruction instead of committing.

use crate::components::entity::EntityCore;
use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use crate::level::grid::TileGrid;
use crate::level::query;

/// Outcome of one airborne tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirStep {
    /// Still falling or rising.
    Airborne,
    /// Came to rest on a floor; vertical speed cleared.
    Landed,
    /// Hit a roof while rising; now falling.
    BumpedRoof,
}

/// Try a horizontal step. Commits the move when the target is clear,
/// otherwise snaps flush against the wall. Returns whether the path was
/// clear.
pub fn step_horizontal(
    grid: &TileGrid,
    cfg: &WorldConfig,
    hb: &mut Hitbox,
    x_speed: f32,
) -> bool {
    if query::can_move_to(grid, cfg, hb.x + x_speed, hb.y, hb.w, hb.h) {
        hb.x += x_speed;
        true
    } else {
        hb.x = query::x_against_wall(cfg, hb, x_speed);
        false
    }
}

/// Advance one airborne tick: fall (or rise) by the current vertical speed,
/// integrate gravity up to terminal velocity, and resolve floor/roof
/// contact by snapping.
pub fn air_step(
    grid: &TileGrid,
    cfg: &WorldConfig,
    hb: &mut Hitbox,
    air_speed: &mut f32,
) -> AirStep {
    if query::can_move_to(grid, cfg, hb.x, hb.y + *air_speed, hb.w, hb.h) {
        hb.y += *air_speed;
        *air_speed = (*air_speed + cfg.gravity).min(cfg.terminal_velocity);
        AirStep::Airborne
    } else {
        hb.y = query::y_under_roof_or_above_floor(cfg, hb, *air_speed);
        if *air_speed > 0.0 {
            *air_speed = 0.0;
            AirStep::Landed
        } else {
            // Start falling instead of sticking to the ceiling.
            *air_speed = cfg.bump_fall_speed;
            AirStep::BumpedRoof
        }
    }
}

/// One-shot spawn check, run the first tick an entity exists: anything not
/// resting on a floor enters the falling regime immediately.
pub fn first_update_check(grid: &TileGrid, cfg: &WorldConfig, core: &mut EntityCore) {
    core.first_update = false;
    core.tile_y = (core.hitbox.y / cfg.tile_size) as i32;
    if !query::is_on_floor(grid, cfg, &core.hitbox) {
        core.in_air = true;
    }
}

/// Run the airborne path for a grounded-entity core: falls, lands, and
/// refreshes the cached tile row on touchdown.
pub fn update_in_air(grid: &TileGrid, cfg: &WorldConfig, core: &mut EntityCore) -> AirStep {
    let step = air_step(grid, cfg, &mut core.hitbox, &mut core.air_speed);
    if step == AirStep::Landed {
        core.in_air = false;
        core.tile_y = (core.hitbox.y / cfg.tile_size) as i32;
    }
    step
}

//! Tile storage and solidity rules.
//!
//! The grid is created once per level load, validated there, and read-only
//! for the lifetime of the level. Per-tick queries assume a valid grid and
//! do not re-check content.

use crate::core::config::WorldConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tile code for open air.
pub const AIR: u8 = 11;
/// Tile code for the water surface band. Non-solid, and the marker for
/// submersion checks.
pub const WATER_SURFACE: u8 = 48;
/// Tile code for water below the surface. Non-solid.
pub const WATER_BODY: u8 = 49;

/// Content/configuration errors detected at level load. Fatal: a level that
/// fails validation is never simulated.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level data is empty")]
    Empty,
    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("level is {got_w}x{got_h} tiles, config expects {want_w}x{want_h}")]
    DimensionMismatch {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
}

/// Immutable row-major grid of tile codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<u8>,
}

impl TileGrid {
    /// Build a grid from row-major level data, validating shape against the
    /// config. Index 0 of `rows` is the top of the level.
    pub fn from_rows(rows: &[Vec<u8>], cfg: &WorldConfig) -> Result<Self, LevelError> {
        if rows.is_empty() || rows[0].is_empty() {
            log::error!("rejecting level: empty tile data");
            return Err(LevelError::Empty);
        }
        let width = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                log::error!("rejecting level: row {} is ragged", i);
                return Err(LevelError::RaggedRow {
                    row: i,
                    got: row.len(),
                    expected: width,
                });
            }
        }
        let (got_w, got_h) = (width as u32, rows.len() as u32);
        if got_w != cfg.tiles_wide || got_h != cfg.tiles_high {
            log::error!(
                "rejecting level: {}x{} tiles, config expects {}x{}",
                got_w,
                got_h,
                cfg.tiles_wide,
                cfg.tiles_high
            );
            return Err(LevelError::DimensionMismatch {
                got_w,
                got_h,
                want_w: cfg.tiles_wide,
                want_h: cfg.tiles_high,
            });
        }
        let tiles = rows.iter().flatten().copied().collect();
        Ok(Self {
            width: got_w,
            height: got_h,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw tile code at grid coordinates, or `None` outside the grid.
    pub fn tile(&self, tx: i32, ty: i32) -> Option<u8> {
        if tx < 0 || ty < 0 || tx as u32 >= self.width || ty as u32 >= self.height {
            return None;
        }
        Some(self.tiles[(ty as u32 * self.width + tx as u32) as usize])
    }

    /// Whether the tile at grid coordinates is solid. Out-of-bounds tiles
    /// are solid (fail-closed: entities cannot leave the level).
    pub fn is_tile_solid(&self, tx: i32, ty: i32) -> bool {
        match self.tile(tx, ty) {
            Some(AIR) | Some(WATER_SURFACE) | Some(WATER_BODY) => false,
            _ => true,
        }
    }

    /// Whether the world-space point (pixels) lies in a solid tile.
    /// Coordinates outside the playable bounds count as solid. Pixel
    /// coordinates are floored to tile indices, never rounded.
    pub fn is_solid(&self, x: f32, y: f32, cfg: &WorldConfig) -> bool {
        if x < 0.0 || x >= cfg.width_px() {
            return true;
        }
        if y < 0.0 || y >= cfg.height_px() {
            return true;
        }
        let tx = (x / cfg.tile_size) as i32;
        let ty = (y / cfg.tile_size) as i32;
        self.is_tile_solid(tx, ty)
    }

    /// Raw tile code at a world-space point, or `None` outside the level.
    pub fn tile_at(&self, x: f32, y: f32, cfg: &WorldConfig) -> Option<u8> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.tile((x / cfg.tile_size) as i32, (y / cfg.tile_size) as i32)
    }
}

use serde::{Deserialize, Serialize};

/// Immutable configuration for a running level, provided by the level/world
/// collaborator at load time.
///
/// Passed explicitly into every query and resolver call so tests can build
/// synthetic worlds with tiny grids and custom rates. Tile size and world
/// bounds must match the grid the level loader ships or coordinate math
/// silently misbehaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Size of one tile in pixels.
    pub tile_size: f32,
    /// Level width in tiles.
    pub tiles_wide: u32,
    /// Level height in tiles.
    pub tiles_high: u32,
    /// Simulation updates per second (default: 200).
    pub updates_per_second: f32,
    /// Render triggers per second (default: 120).
    pub frames_per_second: f32,
    /// Downward acceleration in pixels per tick, applied while airborne.
    pub gravity: f32,
    /// Cap on downward speed in pixels per tick.
    pub terminal_velocity: f32,
    /// Downward speed assigned after bumping a roof, so the entity starts
    /// falling instead of sticking to the ceiling.
    pub bump_fall_speed: f32,
    /// Multiplier on each enemy kind's attack distance when testing
    /// proximity between hitbox centers.
    pub proximity_scale: f32,
    /// Horizontal knockback speed multiplier while an entity is in the
    /// hit-reaction state.
    pub push_back_multiplier: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            tiles_wide: 26,
            tiles_high: 14,
            updates_per_second: 200.0,
            frames_per_second: 120.0,
            gravity: 0.04,
            terminal_velocity: 3.0,
            bump_fall_speed: 0.5,
            proximity_scale: 1.0,
            push_back_multiplier: 2.0,
        }
    }
}

impl WorldConfig {
    /// Playable world width in pixels.
    pub fn width_px(&self) -> f32 {
        self.tiles_wide as f32 * self.tile_size
    }

    /// Playable world height in pixels.
    pub fn height_px(&self) -> f32 {
        self.tiles_high as f32 * self.tile_size
    }

    /// Duration of one simulation tick in seconds.
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.updates_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_bounds() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.width_px(), 832.0);
        assert_eq!(cfg.height_px(), 448.0);
    }

    #[test]
    fn tick_dt_matches_rate() {
        let cfg = WorldConfig::default();
        assert!((cfg.tick_dt() - 0.005).abs() < 1e-6);
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = WorldConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tiles_wide, cfg.tiles_wide);
        assert_eq!(back.tile_size, cfg.tile_size);
    }
}

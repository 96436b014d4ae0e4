//! Stationary cannons and their cannonballs.

use crate::components::entity::{EntityId, Facing};
use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use crate::level::grid::TileGrid;
use crate::level::query;
use crate::world::events::SimEvent;

/// Seconds between shots.
const FIRE_COOLDOWN: f32 = 1.5;
/// Firing range in tiles.
const FIRE_RANGE_TILES: f32 = 5.0;
const CANNON_W: f32 = 40.0;
const CANNON_H: f32 = 26.0;
const BALL_SIZE: f32 = 15.0;
/// Cannonball speed in pixels per tick.
const BALL_SPEED: f32 = 1.5;
const BALL_DAMAGE: f32 = 25.0;

/// A wall-mounted cannon. Shoots straight along its row whenever the
/// player lines up in front of it with nothing solid in between. Unlike
/// walking enemies, it happily shoots across pits.
#[derive(Debug, Clone)]
pub struct Cannon {
    pub id: EntityId,
    pub hitbox: Hitbox,
    pub facing: Facing,
    pub tile_y: i32,
    cooldown: f32,
}

impl Cannon {
    /// Place a cannon on tile (`tx`, `ty`), resting on that tile's floor.
    pub fn new(id: EntityId, tx: u32, ty: u32, facing: Facing, cfg: &WorldConfig) -> Self {
        let x = tx as f32 * cfg.tile_size;
        let y = ty as f32 * cfg.tile_size + (cfg.tile_size - CANNON_H);
        Self {
            id,
            hitbox: Hitbox::new(x, y, CANNON_W, CANNON_H),
            facing,
            tile_y: ty as i32,
            cooldown: 0.0,
        }
    }

    fn player_in_front(&self, player_box: &Hitbox) -> bool {
        match self.facing {
            Facing::Left => player_box.center_x() < self.hitbox.center_x(),
            Facing::Right => player_box.center_x() > self.hitbox.center_x(),
        }
    }

    /// Advance one tick. Returns a cannonball when the cannon fires.
    pub fn update(
        &mut self,
        grid: &TileGrid,
        cfg: &WorldConfig,
        player_box: &Hitbox,
        dt: f32,
    ) -> Option<Projectile> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0 {
            return None;
        }
        let player_tile_y = (player_box.y / cfg.tile_size) as i32;
        if player_tile_y != self.tile_y {
            return None;
        }
        let dist = (player_box.center_x() - self.hitbox.center_x()).abs();
        if dist > FIRE_RANGE_TILES * cfg.tile_size {
            return None;
        }
        if !self.player_in_front(player_box) {
            return None;
        }
        if !query::can_cannon_see(grid, cfg, &self.hitbox, player_box, self.tile_y) {
            return None;
        }

        self.cooldown = FIRE_COOLDOWN;
        log::debug!("cannon {:?} fires {:?}", self.id, self.facing);
        let x = match self.facing {
            Facing::Left => self.hitbox.x - BALL_SIZE,
            Facing::Right => self.hitbox.right(),
        };
        let y = self.hitbox.y + (self.hitbox.h - BALL_SIZE) / 2.0;
        Some(Projectile::new(x, y, self.facing))
    }
}

/// A cannonball in flight: constant horizontal velocity, no gravity, no
/// persistent relation to the grid beyond the impact point sample.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub hitbox: Hitbox,
    pub facing: Facing,
    pub active: bool,
}

impl Projectile {
    pub fn new(x: f32, y: f32, facing: Facing) -> Self {
        Self {
            hitbox: Hitbox::new(x, y, BALL_SIZE, BALL_SIZE),
            facing,
            active: true,
        }
    }

    pub fn damage(&self) -> f32 {
        BALL_DAMAGE
    }

    /// Advance one tick. Returns the impact event when the ball stops.
    pub fn update(
        &mut self,
        grid: &TileGrid,
        cfg: &WorldConfig,
        player_box: &Hitbox,
    ) -> Option<SimEvent> {
        if !self.active {
            return None;
        }
        self.hitbox.x += self.facing.sign() * BALL_SPEED;

        let center = self.hitbox.center();
        if self.hitbox.overlaps(player_box) {
            self.active = false;
            Some(SimEvent::ProjectileImpact {
                x: center.x,
                y: center.y,
                hit_player: true,
            })
        } else if query::projectile_impact(grid, cfg, &self.hitbox) {
            self.active = false;
            Some(SimEvent::ProjectileImpact {
                x: center.x,
                y: center.y,
                hit_player: false,
            })
        } else {
            None
        }
    }
}

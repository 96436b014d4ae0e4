use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world (pixel) units.
///
/// Used for every collision and proximity check. Width and height are fixed
/// per entity; only the position moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Whether two rectangles overlap (touching edges do not count).
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

use crate::components::animation::{AnimationDef, Animator};
use crate::components::entity::{BehaviorState, EntityCore, EntityId, Facing};
use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use serde::{Deserialize, Serialize};

/// Seconds per animation frame (25 simulation ticks at 200 updates/s).
const FRAME_DURATION: f32 = 0.125;

/// Enemy variant. Each kind supplies only the data that differs: sizes,
/// speeds, ranges, frame counts, combat timing. Shared behavior lives in
/// `systems::behavior` and runs identically for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Crab,
    Star,
    Shark,
}

impl EnemyKind {
    /// Horizontal walk speed in pixels per tick.
    pub fn walk_speed(self) -> f32 {
        match self {
            Self::Crab => 0.35,
            Self::Star => 0.4,
            Self::Shark => 0.45,
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            Self::Crab => 10.0,
            Self::Star => 25.0,
            Self::Shark => 5.0,
        }
    }

    /// Damage dealt to the player by a landed swing.
    pub fn damage(self) -> f32 {
        match self {
            Self::Crab => 15.0,
            Self::Star => 20.0,
            Self::Shark => 25.0,
        }
    }

    /// Hitbox size (width, height) in pixels.
    pub fn hitbox_size(self) -> (f32, f32) {
        match self {
            Self::Crab => (22.0, 19.0),
            Self::Star => (17.0, 21.0),
            Self::Shark => (18.0, 22.0),
        }
    }

    /// Attack box (width, height, horizontal offset from the hitbox).
    pub fn attack_box_dims(self) -> (f32, f32, f32) {
        match self {
            // The crab's claws reach both sides at once, so its box spans
            // the hitbox symmetrically.
            Self::Crab => (82.0, 19.0, 30.0),
            Self::Star => (30.0, 21.0, 30.0),
            Self::Shark => (34.0, 30.0, 34.0),
        }
    }

    /// Attack proximity threshold in tiles (distance between hitbox
    /// centers, horizontal only).
    pub fn attack_distance_tiles(self) -> f32 {
        match self {
            Self::Crab => 1.0,
            Self::Star => 1.0,
            Self::Shark => 0.75,
        }
    }

    /// Sight range in tiles. Seeing farther than this never triggers.
    pub fn sight_range_tiles(self) -> f32 {
        self.attack_distance_tiles() * 5.0
    }

    /// Frames in the given state's animation sequence.
    pub fn frames(self, state: BehaviorState) -> usize {
        match self {
            Self::Crab => match state {
                BehaviorState::Idle => 9,
                BehaviorState::Running => 6,
                BehaviorState::Attack => 7,
                BehaviorState::Hit => 4,
                BehaviorState::Dead => 5,
            },
            Self::Star => match state {
                BehaviorState::Idle => 8,
                BehaviorState::Running => 6,
                BehaviorState::Attack => 5,
                BehaviorState::Hit => 4,
                BehaviorState::Dead => 5,
            },
            Self::Shark => match state {
                BehaviorState::Idle => 8,
                BehaviorState::Running => 6,
                BehaviorState::Attack => 8,
                BehaviorState::Hit => 4,
                BehaviorState::Dead => 5,
            },
        }
    }

    /// Attack animation frame on which the swing connects.
    pub fn impact_frame(self) -> usize {
        match self {
            Self::Crab => 3,
            Self::Star => 2,
            Self::Shark => 3,
        }
    }

    fn animator(self) -> Animator {
        let states = [
            BehaviorState::Idle,
            BehaviorState::Running,
            BehaviorState::Attack,
            BehaviorState::Hit,
            BehaviorState::Dead,
        ];
        Animator::new(
            states
                .iter()
                .map(|&s| (s, AnimationDef::new(self.frames(s), FRAME_DURATION)))
                .collect(),
        )
    }
}

/// One enemy instance: shared entity state plus its kind tag.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub core: EntityCore,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, x: f32, y: f32) -> Self {
        let (w, h) = kind.hitbox_size();
        let core = EntityCore::new(id, Hitbox::new(x, y, w, h), kind.animator(), kind.max_health());
        Self { kind, core }
    }

    /// Attack hit-volume for the current position and facing, recomputed
    /// every frame and never persisted.
    pub fn attack_box(&self) -> Hitbox {
        let (w, h, off) = self.kind.attack_box_dims();
        let hb = &self.core.hitbox;
        let x = match self.kind {
            EnemyKind::Crab => hb.x - off,
            _ => match self.core.facing {
                Facing::Left => hb.x - off,
                Facing::Right => hb.right() + off - w,
            },
        };
        Hitbox::new(x, hb.y, w, h)
    }

    /// Attack proximity threshold in pixels for this kind.
    pub fn attack_distance(&self, cfg: &WorldConfig) -> f32 {
        self.kind.attack_distance_tiles() * cfg.tile_size * cfg.proximity_scale
    }

    /// Sight range in pixels for this kind.
    pub fn sight_range(&self, cfg: &WorldConfig) -> f32 {
        self.kind.sight_range_tiles() * cfg.tile_size
    }
}

use crate::components::animation::Animator;
use crate::components::hitbox::Hitbox;
use serde::{Deserialize, Serialize};

/// Unique identifier for a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Horizontal facing. Doubles as a knockback direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Unit sign along x: -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Behavior state. Exactly one is active per entity at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    Idle,
    Running,
    Attack,
    Hit,
    Dead,
}

/// How far the hit-reaction draw offset travels before decaying back.
const PUSH_OFFSET_LIMIT: f32 = -30.0;
/// Per-tick change of the hit-reaction draw offset.
const PUSH_OFFSET_SPEED: f32 = 0.95;

/// State shared by every simulated entity: the player and each enemy
/// variant embed one of these and mutate it exclusively from their own
/// update step.
#[derive(Debug, Clone)]
pub struct EntityCore {
    pub id: EntityId,
    pub hitbox: Hitbox,
    pub facing: Facing,
    pub state: BehaviorState,
    pub animator: Animator,
    pub health: f32,
    /// Inactive entities are skipped entirely (set after the death
    /// animation finishes).
    pub active: bool,
    /// One-shot lifecycle gate, checked and cleared on the first tick the
    /// entity exists. Snaps mid-air spawns into the falling regime.
    pub first_update: bool,
    /// Airborne entities run the fall-resolution path and skip behavioral
    /// transitions until grounded.
    pub in_air: bool,
    /// Vertical speed in pixels per tick, positive downward.
    pub air_speed: f32,
    /// Cached tile row, refreshed on landing. Perception is locked to it.
    pub tile_y: i32,
    /// Per-swing latch: set once the active swing has been evaluated, so a
    /// swing never registers twice.
    pub attack_checked: bool,
    /// Direction the entity is shoved while in the hit reaction.
    pub push_back_dir: Facing,
    /// Visual shove offset for the renderer; decays back to zero.
    pub push_draw_offset: f32,
    push_offset_rising: bool,
}

impl EntityCore {
    pub fn new(id: EntityId, hitbox: Hitbox, animator: Animator, health: f32) -> Self {
        Self {
            id,
            hitbox,
            facing: Facing::Left,
            state: BehaviorState::Idle,
            animator,
            health,
            active: true,
            first_update: true,
            in_air: false,
            air_speed: 0.0,
            tile_y: 0,
            attack_checked: false,
            push_back_dir: Facing::Left,
            push_draw_offset: 0.0,
            push_offset_rising: true,
        }
    }

    /// Switch behavior state and restart its animation from frame zero.
    pub fn set_state(&mut self, state: BehaviorState) {
        log::debug!("entity {:?}: {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
        self.animator.play(state);
    }

    /// Current animation frame, for sprite selection.
    pub fn anim_index(&self) -> usize {
        self.animator.frame_index()
    }

    /// Arm the hit reaction: store the shove direction and reset the draw
    /// offset sweep.
    pub fn start_knockback(&mut self, dir: Facing) {
        self.push_back_dir = dir;
        self.push_draw_offset = 0.0;
        self.push_offset_rising = true;
        self.set_state(BehaviorState::Hit);
    }

    /// Advance the visual shove offset one tick: rises to the limit, then
    /// returns and clamps to exactly zero.
    pub fn update_push_draw_offset(&mut self) {
        if self.push_offset_rising {
            self.push_draw_offset -= PUSH_OFFSET_SPEED;
            if self.push_draw_offset <= PUSH_OFFSET_LIMIT {
                self.push_offset_rising = false;
            }
        } else {
            self.push_draw_offset += PUSH_OFFSET_SPEED;
            if self.push_draw_offset >= 0.0 {
                self.push_draw_offset = 0.0;
            }
        }
    }
}

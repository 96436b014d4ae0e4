use crate::components::animation::{AnimationDef, Animator};
use crate::components::enemy::Enemy;
use crate::components::entity::{BehaviorState, EntityCore, EntityId, Facing};
use crate::components::hitbox::Hitbox;
use crate::core::config::WorldConfig;
use crate::level::grid::TileGrid;
use crate::level::query;
use crate::systems::{behavior, movement};
use crate::world::events::EventQueue;
use glam::Vec2;

const WALK_SPEED: f32 = 1.0;
const JUMP_SPEED: f32 = -2.25;
const ATTACK_DAMAGE: f32 = 10.0;
/// Attack animation frame on which the player's swing connects.
const IMPACT_FRAME: usize = 1;
const HITBOX_W: f32 = 20.0;
const HITBOX_H: f32 = 28.0;
const ATTACK_BOX_W: f32 = 20.0;
/// Seconds per animation frame (25 simulation ticks at 200 updates/s).
const FRAME_DURATION: f32 = 0.125;

/// Directional intent for the current tick, written by the input
/// collaborator and read here. The core never touches the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

impl PlayerInput {
    /// Drop all intent, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The player: same entity core and movement resolver as enemies, driven
/// by input flags instead of perception.
#[derive(Debug, Clone)]
pub struct Player {
    pub core: EntityCore,
    pub input: PlayerInput,
}

impl Player {
    pub fn new(id: EntityId, spawn: Vec2) -> Self {
        let animator = Animator::new(vec![
            (BehaviorState::Idle, AnimationDef::new(5, FRAME_DURATION)),
            (BehaviorState::Running, AnimationDef::new(6, FRAME_DURATION)),
            (BehaviorState::Attack, AnimationDef::new(3, FRAME_DURATION)),
            (BehaviorState::Hit, AnimationDef::new(4, FRAME_DURATION)),
            (BehaviorState::Dead, AnimationDef::new(8, FRAME_DURATION)),
        ]);
        let core = EntityCore::new(
            id,
            Hitbox::new(spawn.x, spawn.y, HITBOX_W, HITBOX_H),
            animator,
            100.0,
        );
        Self {
            core,
            input: PlayerInput::default(),
        }
    }

    /// Attack hit-volume directly in front of the player.
    pub fn attack_box(&self) -> Hitbox {
        let hb = &self.core.hitbox;
        let x = match self.core.facing {
            Facing::Left => hb.x - ATTACK_BOX_W,
            Facing::Right => hb.right(),
        };
        Hitbox::new(x, hb.y, ATTACK_BOX_W, hb.h)
    }

    /// Advance one fixed tick. Runs before every enemy update within the
    /// tick, so enemy perception sees the post-move position.
    pub fn update(
        &mut self,
        grid: &TileGrid,
        cfg: &WorldConfig,
        enemies: &mut [Enemy],
        events: &mut EventQueue,
        dt: f32,
    ) {
        if !self.core.active {
            return;
        }

        if self.core.first_update {
            movement::first_update_check(grid, cfg, &mut self.core);
        }

        if self.input.attack && self.core.state != BehaviorState::Attack {
            self.core.set_state(BehaviorState::Attack);
        }
        if self.input.jump && !self.core.in_air {
            self.core.in_air = true;
            self.core.air_speed = JUMP_SPEED;
        }

        let mut x_speed = 0.0;
        if self.input.left {
            x_speed -= WALK_SPEED;
            self.core.facing = Facing::Left;
        }
        if self.input.right {
            x_speed += WALK_SPEED;
            self.core.facing = Facing::Right;
        }

        if self.core.in_air {
            movement::update_in_air(grid, cfg, &mut self.core);
        } else if !query::is_on_floor(grid, cfg, &self.core.hitbox) {
            self.core.in_air = true;
        }
        if x_speed != 0.0 {
            movement::step_horizontal(grid, cfg, &mut self.core.hitbox, x_speed);
        }

        match self.core.state {
            BehaviorState::Attack => {
                if self.core.anim_index() == 0 {
                    self.core.attack_checked = false;
                }
                if self.core.anim_index() == IMPACT_FRAME && !self.core.attack_checked {
                    self.check_enemy_hit(enemies, events);
                }
            }
            BehaviorState::Idle | BehaviorState::Running => {
                let wanted = if x_speed != 0.0 {
                    BehaviorState::Running
                } else {
                    BehaviorState::Idle
                };
                if self.core.state != wanted {
                    self.core.set_state(wanted);
                }
            }
            _ => {}
        }

        let finished = self.core.animator.tick(dt);
        if finished && matches!(self.core.state, BehaviorState::Attack | BehaviorState::Hit) {
            self.core.set_state(BehaviorState::Idle);
        }
    }

    /// Evaluate the active swing against every live enemy; the first one
    /// overlapped takes the hit. Latched per swing like enemy attacks.
    fn check_enemy_hit(&mut self, enemies: &mut [Enemy], events: &mut EventQueue) {
        let ab = self.attack_box();
        let from_x = self.core.hitbox.center_x();
        for enemy in enemies
            .iter_mut()
            .filter(|e| e.core.active && e.core.state != BehaviorState::Dead)
        {
            if ab.overlaps(&enemy.core.hitbox) {
                behavior::hurt_enemy(enemy, ATTACK_DAMAGE, from_x, events);
                break;
            }
        }
        self.core.attack_checked = true;
    }
}

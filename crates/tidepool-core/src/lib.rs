pub mod components;
pub mod core;
pub mod level;
pub mod systems;
pub mod world;

// Re-export key types at crate root for convenience
pub use components::animation::{AnimationDef, Animator};
pub use components::enemy::{Enemy, EnemyKind};
pub use components::entity::{BehaviorState, EntityCore, EntityId, Facing};
pub use components::hitbox::Hitbox;
pub use crate::core::config::WorldConfig;
pub use crate::core::time::{ClockSteps, LoopClock};
pub use level::grid::{LevelError, TileGrid, AIR, WATER_BODY, WATER_SURFACE};
pub use world::events::{EventQueue, SimEvent};
pub use world::objects::{Cannon, Projectile};
pub use world::player::{Player, PlayerInput};
pub use world::World;

pub mod animation;
pub mod enemy;
pub mod entity;
pub mod hitbox;

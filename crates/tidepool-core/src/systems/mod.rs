pub mod behavior;
pub mod movement;

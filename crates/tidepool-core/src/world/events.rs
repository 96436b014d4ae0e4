use crate::components::entity::{EntityId, Facing};

/// Observable combat events produced during a tick, drained by the
/// audio/score collaborators each frame. Not an event bus: just a buffer of
/// state changes that already happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A swing connected. Fired at most once per swing.
    AttackLanded {
        attacker: EntityId,
        target: EntityId,
        damage: f32,
    },
    /// An entity entered the hit reaction, shoved in `dir`.
    Knockback { entity: EntityId, dir: Facing },
    /// An enemy ran out of health (or drowned).
    EnemyDied { entity: EntityId },
    /// A projectile stopped, either on the player or on the level.
    ProjectileImpact { x: f32, y: f32, hit_player: bool },
}

/// Per-tick event buffer.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Take all buffered events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

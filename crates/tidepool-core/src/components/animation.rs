//! Frame sequencing for entity behavior states.
//!
//! The core is headless: it tracks only the frame *index* within the active
//! state's sequence. The renderer maps (state, index) to a sprite; the
//! behavior system reads the index for combat timing (impact frames, the
//! knockback window).

use crate::components::entity::BehaviorState;

/// One state's frame sequence.
#[derive(Debug, Clone, Copy)]
pub struct AnimationDef {
    /// Number of frames in the sequence.
    pub frame_count: usize,
    /// Seconds per frame.
    pub frame_duration: f32,
}

impl AnimationDef {
    pub fn new(frame_count: usize, frame_duration: f32) -> Self {
        Self {
            frame_count,
            frame_duration,
        }
    }
}

/// Animation state for an entity: one sequence per behavior state, advanced
/// by the fixed-timestep dt.
#[derive(Debug, Clone)]
pub struct Animator {
    defs: Vec<(BehaviorState, AnimationDef)>,
    current: BehaviorState,
    frame_index: usize,
    frame_timer: f32,
}

impl Animator {
    /// Create from per-state sequences. The first entry becomes current.
    pub fn new(defs: Vec<(BehaviorState, AnimationDef)>) -> Self {
        let current = defs.first().map(|(s, _)| *s).unwrap_or(BehaviorState::Idle);
        Self {
            defs,
            current,
            frame_index: 0,
            frame_timer: 0.0,
        }
    }

    fn def_for(&self, state: BehaviorState) -> Option<AnimationDef> {
        self.defs
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, d)| *d)
    }

    /// Restart the sequence for `state` from frame zero.
    pub fn play(&mut self, state: BehaviorState) {
        self.current = state;
        self.frame_index = 0;
        self.frame_timer = 0.0;
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Frame count of the active sequence.
    pub fn frame_count(&self) -> usize {
        self.def_for(self.current).map(|d| d.frame_count).unwrap_or(1)
    }

    /// Advance by dt seconds. Returns true each time the sequence wraps
    /// past its last frame; callers decide what a completed sequence means
    /// (revert to idle, deactivate, ...).
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(def) = self.def_for(self.current) else {
            return false;
        };
        if def.frame_count == 0 {
            return false;
        }

        self.frame_timer += dt;
        let mut wrapped = false;
        while self.frame_timer >= def.frame_duration {
            self.frame_timer -= def.frame_duration;
            self.frame_index += 1;
            if self.frame_index >= def.frame_count {
                self.frame_index = 0;
                wrapped = true;
            }
        }
        wrapped
    }
}

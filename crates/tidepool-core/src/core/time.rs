use crate::core::config::WorldConfig;

/// Maximum whole steps a lane may emit from a single call. Caps catch-up
/// after a long stall (spiral of death).
const MAX_STEPS: u32 = 10;

/// One fixed-rate accumulator lane.
#[derive(Debug, Clone)]
struct Lane {
    /// The fixed delta time per step.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl Lane {
    fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps due.
    fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}

/// Whole steps due after feeding elapsed wall-clock time to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSteps {
    /// Simulation ticks to run.
    pub updates: u32,
    /// Render triggers to fire.
    pub renders: u32,
}

/// Two-lane fixed timestep accumulator.
///
/// Converts variable frame deltas into whole simulation ticks and whole
/// render triggers, each at its own fixed rate. The lanes are independent:
/// rendering may be skipped or repeated relative to simulation without
/// affecting simulation correctness.
#[derive(Debug, Clone)]
pub struct LoopClock {
    update: Lane,
    render: Lane,
}

impl LoopClock {
    /// Create a clock from explicit update/render rates in Hz.
    pub fn new(updates_per_second: f32, frames_per_second: f32) -> Self {
        Self {
            update: Lane::new(1.0 / updates_per_second),
            render: Lane::new(1.0 / frames_per_second),
        }
    }

    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self::new(cfg.updates_per_second, cfg.frames_per_second)
    }

    /// Feed elapsed wall-clock seconds. Returns the whole steps due per lane.
    pub fn advance(&mut self, frame_dt: f32) -> ClockSteps {
        ClockSteps {
            updates: self.update.accumulate(frame_dt),
            renders: self.render.accumulate(frame_dt),
        }
    }

    /// Interpolation alpha between simulation ticks (0.0 to 1.0), for
    /// renderers that blend entity positions between ticks.
    pub fn alpha(&self) -> f32 {
        self.update.accumulator / self.update.dt
    }

    /// The fixed simulation delta time.
    pub fn update_dt(&self) -> f32 {
        self.update.dt
    }

    /// Residual time sitting in the update lane, below one tick.
    pub fn update_residual(&self) -> f32 {
        self.update.accumulator
    }
}

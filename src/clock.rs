//! Fixed-step scheduler converting variable frame deltas into whole
//! integration ticks.
//!
//! The wave solver is only stable when driven at a constant step size, so
//! real time is accumulated here and drained in fixed-size chunks. If the
//! host stalls, the next call drains the whole backlog synchronously:
//! determinism is preferred over frame-rate smoothness, and there is
//! deliberately no catch-up cap.

/// Accumulates scaled wall-clock time and hands out fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    /// Duration of one simulation step (seconds, > 0)
    step_duration_s: f32,

    /// Time scale applied to incoming deltas (>= 0)
    speed_multiplier: f32,

    /// Scaled time not yet consumed by a step (seconds, >= 0)
    accumulated_s: f32,
}

impl FixedStepClock {
    pub fn new(step_duration_s: f32, speed_multiplier: f32) -> Self {
        Self {
            step_duration_s,
            speed_multiplier,
            accumulated_s: 0.0,
        }
    }

    /// Add a real-time delta and return how many whole steps are now due.
    ///
    /// Multiple steps may come due in one call when real time has fallen
    /// behind. After draining, the residual is strictly less than one step
    /// and clamped at zero against float underflow.
    pub fn advance(&mut self, dt_s: f32) -> u32 {
        self.accumulated_s += self.speed_multiplier * dt_s;

        let mut steps = 0;
        while self.accumulated_s > self.step_duration_s {
            self.accumulated_s -= self.step_duration_s;
            steps += 1;
        }

        self.accumulated_s = self.accumulated_s.max(0.0);
        steps
    }

    pub fn step_duration_s(&self) -> f32 {
        self.step_duration_s
    }

    pub fn accumulated_s(&self) -> f32 {
        self.accumulated_s
    }
}

//! Simulation clocks. Nothing in here reads a time source: the driving loop
//! measures wall-clock deltas and hands them in.

/// Repeating countdown used for cooldowns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    length: f32,
    time: f32,
    timeout: bool,
}

impl Timer {
    pub fn new(length: f32) -> Self {
        assert!(length > 0.0, "timer length must be positive");
        Self {
            length,
            time: 0.0,
            timeout: false,
        }
    }

    /// Advance by `dt`. Returns true on the step where the timer elapses.
    pub fn step(&mut self, dt: f32) -> bool {
        assert!(dt >= 0.0, "timer step with negative dt ({dt})");
        self.time += dt;
        if self.time >= self.length {
            self.time -= self.length;
            self.timeout = true;
            return true;
        }
        false
    }

    /// Latched once the timer has elapsed, until `reset()`.
    pub fn is_timeout(&self) -> bool {
        self.timeout
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.timeout = false;
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Splits each frame's elapsed time into semi-fixed simulation steps.
///
/// Every step is at most `max_step` long; the remainder of a frame becomes
/// one shorter final step, so no time is carried into the next frame.
pub struct TimeState {
    pub max_step: f32,
    pub max_frame_time: f32,
    remaining: f32,
    pub total_time: f64,
    pub step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f32,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            max_step: 1.0 / 60.0,
            max_frame_time: 0.25,
            remaining: 0.0,
            total_time: 0.0,
            step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
        }
    }

    pub fn begin_frame(&mut self, real_dt: f32) {
        assert!(real_dt >= 0.0, "frame with negative dt ({real_dt})");
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_frame_time {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                self.real_dt * 1000.0,
                self.max_frame_time * 1000.0
            );
            self.real_dt = self.max_frame_time;
        }

        self.remaining = self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    /// Length of the next step to simulate, or `None` when the frame is used up.
    pub fn next_step(&mut self) -> Option<f32> {
        if self.remaining <= 0.0 {
            return None;
        }
        let dt = self.remaining.min(self.max_step);
        self.remaining -= dt;
        self.total_time += f64::from(dt);
        self.step_count += 1;
        self.steps_this_frame += 1;
        Some(dt)
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

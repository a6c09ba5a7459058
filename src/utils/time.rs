/// Turns variable frame times into a whole number of fixed ticks.
///
/// Leftover time carries into the next frame. When a frame owes more ticks
/// than `max_steps`, the excess backlog is dropped instead of run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    ticks: u64,
}

impl FixedTimestep {
    #[must_use]
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time banked toward the next tick.
    #[inline]
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Ticks issued since creation.
    #[inline]
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Banks `wall_dt` and returns how many ticks to run now.
    pub fn advance(&mut self, wall_dt: f32) -> u32 {
        if wall_dt.is_finite() && wall_dt > 0.0 {
            self.accumulator += wall_dt;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.3}s of simulation backlog after {steps} ticks",
                self.accumulator
            );
            self.accumulator %= self.step;
        }

        self.ticks += u64::from(steps);
        steps
    }
}

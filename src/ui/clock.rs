use std::time::Duration;

/// Converts egui's wall-clock time into fixed-rate update ticks.
///
/// egui repaints whenever input arrives or a repaint is requested, so frames
/// are irregular. Repeat and lockout timings are counted in ticks, which only
/// advance at `ticks_per_second` no matter how often frames arrive.
#[derive(Debug, Clone)]
pub struct FrameClock {
    ticks_per_second: u32,
    max_catch_up: u32,
    elapsed_ticks: u64,
}

impl FrameClock {
    pub fn new(ticks_per_second: u32, max_catch_up: u32) -> Self {
        Self {
            ticks_per_second: ticks_per_second.max(1),
            max_catch_up: max_catch_up.max(1),
            elapsed_ticks: 0,
        }
    }

    /// Number of ticks to run for a frame at `time` seconds since start.
    ///
    /// Ticks missed during a stall beyond `max_catch_up` are dropped.
    pub fn due_ticks(&mut self, time: f64) -> u32 {
        let target = (time.max(0.0) * f64::from(self.ticks_per_second)).floor() as u64;
        if target <= self.elapsed_ticks {
            return 0;
        }
        let due = target - self.elapsed_ticks;
        self.elapsed_ticks = target;
        due.min(u64::from(self.max_catch_up)) as u32
    }

    /// Repaint interval that keeps ticks flowing without input.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.ticks_per_second))
    }
}

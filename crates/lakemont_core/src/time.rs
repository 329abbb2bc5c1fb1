//! Frame timing.
//!
//! The application runner owns a [`TimeClock`] and calls `tick()` once at the
//! top of every frame; everything downstream receives the resulting [`Time`]
//! snapshot by value.

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1 s so a long
    /// stall (debugger, window drag) cannot explode the simulation step.
    pub delta: f32,

    /// Total seconds elapsed since the application started.
    pub elapsed: f64,

    /// Number of frames rendered so far (0 on the first frame).
    pub frame_count: u64,
}

/// Stateful timer that produces [`Time`] snapshots.
pub struct TimeClock {
    start: std::time::Instant,
    last_tick: std::time::Instant,
    frame_count: u64,
}

impl TimeClock {
    pub fn new() -> Self {
        let now = std::time::Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Advances by one frame and returns this frame's snapshot.
    pub fn tick(&mut self) -> Time {
        let now = std::time::Instant::now();
        let snapshot = Time {
            delta: (now - self.last_tick).as_secs_f32().min(0.1),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        };
        self.last_tick = now;
        self.frame_count += 1;
        snapshot
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

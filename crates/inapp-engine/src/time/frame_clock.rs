use std::time::{Duration, Instant};

/// Source of the per-frame animation delta.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameDelta {
    /// Every tick advances by the same number of seconds. Deterministic.
    Fixed(f32),

    /// Delta measured between ticks with a monotonic clock, clamped.
    WallClock,
}

impl FrameDelta {
    /// Fixed 60 Hz step.
    pub const SIXTY_HZ: FrameDelta = FrameDelta::Fixed(1.0 / 60.0);
}

impl Default for FrameDelta {
    fn default() -> Self {
        Self::SIXTY_HZ
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds the active example should advance by.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per canvas, so multiple canvases in the same process do not share
/// delta-time state.
///
/// In wall-clock mode the delta is clamped to avoid pathological values when the
/// host pauses the display link, the app is backgrounded, or the GPU stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: FrameDelta,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from back-to-back host calls
    /// - maximum prevents animation jumps after long pauses
    pub fn new(mode: FrameDelta) -> Self {
        Self::with_clamps(mode, Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom wall-clock clamps.
    pub fn with_clamps(mode: FrameDelta, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            mode,
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn mode(&self) -> FrameDelta {
        self.mode
    }

    /// Number of ticks produced so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Resets the wall-clock baseline.
    ///
    /// Called after an example switch so the first frame of the new example does not
    /// see the time spent in its setup.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();

        let dt = match self.mode {
            FrameDelta::Fixed(step) => step.max(0.0),
            FrameDelta::WallClock => now
                .saturating_duration_since(self.last)
                .clamp(self.dt_min, self.dt_max)
                .as_secs_f32(),
        };

        self.last = now;

        let ft = FrameTime {
            dt,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FrameDelta::default())
    }
}

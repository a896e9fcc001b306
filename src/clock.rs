//! Wall-clock bookkeeping for the main loop.
//!
//! The clock never reads the system time itself: the front-end passes a
//! monotonic timestamp in milliseconds into every call, which keeps the
//! simulation reproducible under test.

/// Tracks match start, accumulated pause time and the previous frame stamp.
#[derive(Clone, Debug)]
pub struct Clock {
    start_ms: f64,
    paused_total_ms: f64,
    pause_started_ms: Option<f64>,
    last_frame_ms: Option<f64>,
    max_delta: f32,
}

impl Clock {
    pub fn new(now_ms: f64, max_delta: f32) -> Self {
        Self {
            start_ms: now_ms,
            paused_total_ms: 0.0,
            pause_started_ms: None,
            last_frame_ms: None,
            max_delta,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_ms.is_some()
    }

    /// Start a pause.  Returns `false` if already paused.
    pub fn pause(&mut self, now_ms: f64) -> bool {
        if self.pause_started_ms.is_some() {
            return false;
        }
        self.pause_started_ms = Some(now_ms);
        true
    }

    /// End a pause, banking its length.  Returns `false` if not paused.
    pub fn resume(&mut self, now_ms: f64) -> bool {
        let Some(started) = self.pause_started_ms.take() else {
            return false;
        };
        self.paused_total_ms += (now_ms - started).max(0.0);
        // The first frame after a pause must not see the paused span as delta.
        self.last_frame_ms = Some(now_ms);
        true
    }

    /// Milliseconds spent paused so far, including an open pause.
    pub fn paused_ms(&self, now_ms: f64) -> f64 {
        let open = self
            .pause_started_ms
            .map(|started| (now_ms - started).max(0.0))
            .unwrap_or(0.0);
        self.paused_total_ms + open
    }

    /// Unpaused seconds since the match started.
    pub fn elapsed_secs(&self, now_ms: f64) -> f32 {
        let ms = now_ms - self.start_ms - self.paused_ms(now_ms);
        (ms.max(0.0) / 1000.0) as f32
    }

    /// Seconds since the previous frame, clamped to `[0, max_delta]`.
    /// The very first frame has a delta of zero.
    pub fn frame_delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        delta.clamp(0.0, self.max_delta)
    }
}

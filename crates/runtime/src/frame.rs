use foundation::time::Time;

/// Nominal renderer cadence (frames per second).
pub const NOMINAL_FPS: f64 = 60.0;

/// Frame metadata handed to per-frame updates.
///
/// `dt_s` is the time the frame covers; `time` is the engine time at its start.
/// Frames are values, so a run can be recorded and replayed exactly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time covered by this frame (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame.
    pub time: Time,
}

impl Frame {
    /// First frame of a run.
    pub fn first(dt_s: f64) -> Self {
        Self {
            index: 0,
            dt_s: sanitize_dt(dt_s),
            time: Time::ZERO,
        }
    }

    /// Following frame with the same delta time.
    pub fn next(self) -> Self {
        self.next_with_dt(self.dt_s)
    }

    /// Following frame covering `dt_s` seconds.
    pub fn next_with_dt(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s: sanitize_dt(dt_s),
            time: self.time.advanced_by(self.dt_s),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first(1.0 / NOMINAL_FPS)
    }
}

// Negative or non-finite deltas come from clock glitches on the host; treat
// them as an empty frame.
fn sanitize_dt(dt_s: f64) -> f64 {
    if dt_s.is_finite() && dt_s > 0.0 { dt_s } else { 0.0 }
}

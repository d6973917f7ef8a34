use crate::pipeline::types::EventHistory;

/// Most recent events used for the rate. Kept separate from the history
/// capacity so the history can grow without changing the smoothing.
pub const RATE_WINDOW: usize = 4;

/// Weight of the newest instantaneous rate in the exponential blend.
pub const RATE_SMOOTHING: f32 = 0.7;

/// Upper bound on the reported cadence, in compressions per minute.
pub const MAX_RATE: f32 = 200.0;

/// Derives a smoothed compressions-per-minute figure from event timestamps.
#[derive(Debug, Clone, Copy)]
pub struct CadenceEstimator {
    window: usize,
    smoothing: f32,
    max_rate: f32,
}

impl Default for CadenceEstimator {
    fn default() -> Self {
        Self {
            window: RATE_WINDOW,
            smoothing: RATE_SMOOTHING,
            max_rate: MAX_RATE,
        }
    }
}

impl CadenceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate implied by the average interval over the trailing window, or
    /// `None` when fewer than two events are known.
    pub fn instantaneous_rate(&self, history: &EventHistory) -> Option<f32> {
        let recent: Vec<f32> = history
            .recent(self.window)
            .map(|at| at.as_secs_f32())
            .collect();
        if recent.len() < 2 {
            return None;
        }

        let intervals = recent.windows(2).map(|pair| pair[1] - pair[0]);
        let avg_interval = intervals.sum::<f32>() / (recent.len() - 1) as f32;
        if avg_interval > 0.0 {
            Some(60.0 / avg_interval)
        } else {
            Some(0.0)
        }
    }

    /// Blend the latest instantaneous rate into `previous`.
    /// Returns `previous` untouched while there is not enough history.
    pub fn smoothed_rate(&self, history: &EventHistory, previous: f32) -> f32 {
        match self.instantaneous_rate(history) {
            Some(rate) => {
                let blended = self.smoothing * rate + (1.0 - self.smoothing) * previous;
                blended.clamp(0.0, self.max_rate)
            }
            None => previous,
        }
    }
}

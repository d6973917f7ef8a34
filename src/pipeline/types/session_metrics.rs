use chrono::{DateTime, Utc};

use crate::pipeline::services::signal_extractor::SignalValidity;

/// Counters collected while a session processes frames
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    pub started_at: DateTime<Utc>,
    pub frames_processed: u64,
    pub frames_tracked: u64,
    pub frames_without_body: u64,
    pub frames_without_hands: u64,
    pub frames_out_of_range: u64,
    pub frames_without_video: u64,
    pub compressions: u64,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            frames_processed: 0,
            frames_tracked: 0,
            frames_without_body: 0,
            frames_without_hands: 0,
            frames_out_of_range: 0,
            frames_without_video: 0,
            compressions: 0,
        }
    }
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_signal(&mut self, validity: &SignalValidity) {
        self.frames_processed += 1;
        match validity {
            SignalValidity::Ok(_) => self.frames_tracked += 1,
            SignalValidity::NoBody => self.frames_without_body += 1,
            SignalValidity::HandsNotVisible => self.frames_without_hands += 1,
            SignalValidity::OutOfRange(_) => self.frames_out_of_range += 1,
        }
    }

    pub fn record_missing_video(&mut self) {
        self.frames_processed += 1;
        self.frames_without_video += 1;
    }

    /// Share of processed frames that produced a usable hand position.
    pub fn tracking_ratio(&self) -> f32 {
        if self.frames_processed == 0 {
            0.0
        } else {
            self.frames_tracked as f32 / self.frames_processed as f32
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

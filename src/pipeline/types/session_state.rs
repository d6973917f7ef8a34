use crate::pipeline::{
    services::compression_detector::StrokeTracker,
    types::{CoachingMessage, EventHistory, Feedback, Phase, SessionMetrics},
};

/// Compressions per cycle before the counter wraps back to 1.
pub const COMPRESSIONS_PER_CYCLE: u32 = 30;

/// Mutable aggregate for one coaching connection.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub stroke: StrokeTracker,
    pub compression_count: u32,
    pub event_times: EventHistory,
    pub smoothed_rate: f32,
    pub message: CoachingMessage,
    pub metrics: SessionMetrics,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.stroke.phase()
    }

    pub fn reference_y(&self) -> f32 {
        self.stroke.reference_y()
    }

    /// Advance the cyclic counter: 0 → 1 → … → 30 → 1.
    pub fn record_compression(&mut self) {
        self.compression_count = (self.compression_count % COMPRESSIONS_PER_CYCLE) + 1;
        self.metrics.compressions += 1;
    }

    pub fn feedback(&self) -> Feedback {
        Feedback::new(self.smoothed_rate, self.compression_count, self.message)
    }
}

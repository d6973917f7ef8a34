use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use tower::Service;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::{
    services::{
        cadence_estimator::CadenceEstimator,
        feedback_classifier::classify,
        signal_extractor::{SignalValidity, extract_signal},
    },
    types::{CoachingMessage, Feedback, LandmarkSet, SessionState},
};

/// Landmarks observed on one frame, optionally with an explicit timestamp
/// relative to the session start.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub landmarks: Option<LandmarkSet>,
    pub at: Option<Duration>,
}

impl Observation {
    pub fn new(landmarks: Option<LandmarkSet>) -> Self {
        Self {
            landmarks,
            at: None,
        }
    }

    pub fn at(mut self, at: Duration) -> Self {
        self.at = Some(at);
        self
    }
}

/// Per-connection coaching engine. Owns its state exclusively; one frame is
/// fully processed before the next is accepted.
pub struct CoachingSession {
    id: Uuid,
    state: SessionState,
    cadence: CadenceEstimator,
    started: Instant,
}

impl CoachingSession {
    pub fn new(id: Uuid) -> Self {
        Self::from_state(id, SessionState::new())
    }

    pub fn from_state(id: Uuid, state: SessionState) -> Self {
        Self {
            id,
            state,
            cadence: CadenceEstimator::new(),
            started: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Time since the session started, used to stamp compression events.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Process one frame's landmarks observed at `at`.
    pub fn observe(&mut self, landmarks: Option<&LandmarkSet>, at: Duration) -> Feedback {
        let validity = extract_signal(landmarks);
        self.state.metrics.record_signal(&validity);

        let y = match validity {
            SignalValidity::Ok(y) => y,
            SignalValidity::OutOfRange(y) => {
                warn!(
                    "Session {}: hand position {:.2} outside the frame, skipping",
                    self.id, y
                );
                self.state.message = CoachingMessage::Stabilizing;
                return self.state.feedback();
            }
            SignalValidity::NoBody | SignalValidity::HandsNotVisible => {
                debug!("Session {}: unusable frame {:?}", self.id, validity);
                if let Some(prompt) = validity.prompt() {
                    self.state.message = prompt;
                }
                return self.state.feedback();
            }
        };

        debug!(
            "Session {}: phase={}, y={:.2}, reference={:.2}",
            self.id,
            self.state.phase(),
            y,
            self.state.reference_y()
        );

        if self.state.stroke.update(y).completes_compression() {
            self.state.record_compression();
            self.state.event_times.push(at);
            self.state.smoothed_rate = self
                .cadence
                .smoothed_rate(&self.state.event_times, self.state.smoothed_rate);
            debug!(
                "Session {}: compression {} at {:.2}s, rate {:.1}",
                self.id,
                self.state.compression_count,
                at.as_secs_f32(),
                self.state.smoothed_rate
            );
        }

        self.state.message = classify(
            self.state.smoothed_rate,
            self.state.compression_count,
            self.state.phase(),
            self.state.message,
        );
        self.state.feedback()
    }

    /// Process one frame stamped with the session clock.
    pub fn observe_now(&mut self, landmarks: Option<&LandmarkSet>) -> Feedback {
        let at = self.elapsed();
        self.observe(landmarks, at)
    }

    /// A frame arrived but no landmarks could be produced from it.
    pub fn video_unavailable(&mut self) -> Feedback {
        self.state.metrics.record_missing_video();
        self.state.message = CoachingMessage::WaitingForVideo;
        self.state.feedback()
    }

    pub fn reset(&mut self) {
        self.state = SessionState::new();
        self.started = Instant::now();
    }

    /// Log the end-of-session summary.
    pub fn finish(&self) {
        let metrics = &self.state.metrics;
        info!(
            "Session {} finished after {}s: {} frames ({:.0}% tracked), {} compressions, last rate {:.0}",
            self.id,
            metrics.elapsed().num_seconds(),
            metrics.frames_processed,
            metrics.tracking_ratio() * 100.0,
            metrics.compressions,
            self.state.smoothed_rate
        );
    }
}

impl Service<Observation> for CoachingSession {
    type Response = Feedback;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, observation: Observation) -> Self::Future {
        let at = observation.at.unwrap_or_else(|| self.elapsed());
        let feedback = self.observe(observation.landmarks.as_ref(), at);
        Box::pin(async move { Ok(feedback) })
    }
}

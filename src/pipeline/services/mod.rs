pub mod cadence_estimator;
pub mod coaching_service;
pub mod compression_detector;
pub mod feedback_classifier;
pub mod perception;
pub mod signal_extractor;

pub use cadence_estimator::CadenceEstimator;
pub use coaching_service::{CoachingSession, Observation};
pub use compression_detector::{StrokeTracker, StrokeTransition};
pub use feedback_classifier::classify;
pub use perception::PoseEstimator;
pub use signal_extractor::{SignalValidity, extract_signal};

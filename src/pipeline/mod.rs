pub mod services;
pub mod types;

pub use services::{CoachingSession, Observation, PoseEstimator};
pub use types::{CoachingMessage, Feedback, Landmark, LandmarkSet, Phase, SessionState};

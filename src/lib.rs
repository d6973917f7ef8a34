pub mod config;
pub mod error;
pub mod intake;
pub mod network;
pub mod pipeline;

pub use error::{AppError, FrameError, PerceptionError};
pub use pipeline::{CoachingSession, Feedback, LandmarkSet};

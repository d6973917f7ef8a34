pub mod coaching_frame_handler;
pub mod handler;

pub use coaching_frame_handler::CoachingFrameHandler;
pub use handler::{DelegatingRouter, FrameHandler, Route};

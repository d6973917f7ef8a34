mod event_history;
mod feedback;
mod landmark;
mod message;
mod phase;
mod session_metrics;
mod session_state;

pub use event_history::{EVENT_HISTORY_CAPACITY, EventHistory};
pub use feedback::Feedback;
pub use landmark::{LEFT_WRIST, Landmark, LandmarkSet, RIGHT_WRIST};
pub use message::CoachingMessage;
pub use phase::Phase;
pub use session_metrics::SessionMetrics;
pub use session_state::{COMPRESSIONS_PER_CYCLE, SessionState};

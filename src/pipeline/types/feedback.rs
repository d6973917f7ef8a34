use serde::{Deserialize, Serialize};

use crate::pipeline::types::CoachingMessage;

/// Record sent back to the client after every processed frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Smoothed cadence in compressions per minute, truncated.
    pub rate: u32,
    /// Position in the current 30-compression cycle.
    pub count: u32,
    pub message: String,
}

impl Feedback {
    pub fn new(smoothed_rate: f32, count: u32, message: CoachingMessage) -> Self {
        Self {
            rate: smoothed_rate as u32,
            count,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_is_truncated() {
        let feedback = Feedback::new(109.9, 4, CoachingMessage::GoodRhythm);
        assert_eq!(feedback.rate, 109);
        assert_eq!(feedback.message, "Good rhythm!");
    }

    #[test]
    fn test_json_shape() {
        let feedback = Feedback::new(0.0, 0, CoachingMessage::BeginCompressions);
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rate": 0, "count": 0, "message": "Begin compressions"})
        );
    }
}

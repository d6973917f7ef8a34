use crate::pipeline::types::{CoachingMessage, LEFT_WRIST, LandmarkSet, RIGHT_WRIST};

/// Wrists below this visibility are treated as not seen.
pub const MIN_WRIST_VISIBILITY: f32 = 0.6;

/// Outcome of reducing a landmark set to the hands' vertical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValidity {
    Ok(f32),
    NoBody,
    HandsNotVisible,
    OutOfRange(f32),
}

impl SignalValidity {
    pub fn position(&self) -> Option<f32> {
        match self {
            SignalValidity::Ok(y) => Some(*y),
            _ => None,
        }
    }

    /// Prompt shown when the frame cannot drive the detector.
    pub fn prompt(&self) -> Option<CoachingMessage> {
        match self {
            SignalValidity::Ok(_) => None,
            SignalValidity::NoBody => Some(CoachingMessage::NoBody),
            SignalValidity::HandsNotVisible => Some(CoachingMessage::HandsNotVisible),
            SignalValidity::OutOfRange(_) => Some(CoachingMessage::Stabilizing),
        }
    }
}

/// Average vertical position of both wrists, or why it is unusable.
pub fn extract_signal(landmarks: Option<&LandmarkSet>) -> SignalValidity {
    let landmarks = match landmarks {
        Some(landmarks) if !landmarks.is_empty() => landmarks,
        _ => return SignalValidity::NoBody,
    };

    let (left, right) = match (landmarks.get(LEFT_WRIST), landmarks.get(RIGHT_WRIST)) {
        (Some(left), Some(right)) => (left, right),
        _ => return SignalValidity::HandsNotVisible,
    };

    if left.visibility < MIN_WRIST_VISIBILITY && right.visibility < MIN_WRIST_VISIBILITY {
        return SignalValidity::HandsNotVisible;
    }

    let y = (left.y + right.y) / 2.0;
    if y.is_finite() && y > 0.0 && y < 1.0 {
        SignalValidity::Ok(y)
    } else {
        SignalValidity::OutOfRange(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Landmark;

    #[test]
    fn test_missing_landmarks_is_no_body() {
        assert_eq!(extract_signal(None), SignalValidity::NoBody);
        assert_eq!(
            extract_signal(Some(&LandmarkSet::default())),
            SignalValidity::NoBody
        );
    }

    #[test]
    fn test_both_wrists_hidden() {
        let set = LandmarkSet::with_wrists((0.4, 0.59), (0.5, 0.1));
        assert_eq!(extract_signal(Some(&set)), SignalValidity::HandsNotVisible);
    }

    #[test]
    fn test_one_visible_wrist_is_enough() {
        let set = LandmarkSet::with_wrists((0.4, 0.9), (0.6, 0.2));
        let validity = extract_signal(Some(&set));
        assert!((validity.position().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_body_without_wrists() {
        let set = LandmarkSet::new(vec![Landmark::new(0, 0.5, 0.2, 0.99)]);
        assert_eq!(extract_signal(Some(&set)), SignalValidity::HandsNotVisible);
    }

    #[test]
    fn test_out_of_range_positions() {
        let below = LandmarkSet::with_wrists((1.2, 0.9), (1.2, 0.9));
        assert_eq!(
            extract_signal(Some(&below)),
            SignalValidity::OutOfRange(1.2)
        );

        let top = LandmarkSet::with_wrists((0.0, 0.9), (0.0, 0.9));
        assert_eq!(extract_signal(Some(&top)), SignalValidity::OutOfRange(0.0));

        let nan = LandmarkSet::with_wrists((f32::NAN, 0.9), (0.3, 0.9));
        assert!(matches!(
            extract_signal(Some(&nan)),
            SignalValidity::OutOfRange(_)
        ));
    }

    #[test]
    fn test_prompts() {
        assert_eq!(SignalValidity::Ok(0.3).prompt(), None);
        assert_eq!(
            SignalValidity::NoBody.prompt(),
            Some(CoachingMessage::NoBody)
        );
        assert_eq!(
            SignalValidity::HandsNotVisible.prompt(),
            Some(CoachingMessage::HandsNotVisible)
        );
        assert_eq!(
            SignalValidity::OutOfRange(1.5).prompt(),
            Some(CoachingMessage::Stabilizing)
        );
    }
}

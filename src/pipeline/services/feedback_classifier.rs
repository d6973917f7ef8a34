use crate::pipeline::types::{CoachingMessage, Phase};

/// Recommended cadence band, inclusive, in compressions per minute.
pub const TARGET_RATE_MIN: f32 = 100.0;
pub const TARGET_RATE_MAX: f32 = 120.0;

/// Map the current cadence to coaching text.
///
/// A zero rate after compressions have started carries no new information,
/// so the previous message is kept.
pub fn classify(rate: f32, count: u32, phase: Phase, previous: CoachingMessage) -> CoachingMessage {
    let message = if rate == 0.0 && count == 0 {
        CoachingMessage::BeginCompressions
    } else if (TARGET_RATE_MIN..=TARGET_RATE_MAX).contains(&rate) {
        CoachingMessage::GoodRhythm
    } else if rate > 0.0 && rate < TARGET_RATE_MIN {
        CoachingMessage::TooSlow
    } else if rate > TARGET_RATE_MAX {
        CoachingMessage::TooFast
    } else {
        previous
    };

    match (phase, message) {
        (Phase::Compressed, CoachingMessage::GoodRhythm) => CoachingMessage::GoodRhythmRecoil,
        (_, message) => message,
    }
}

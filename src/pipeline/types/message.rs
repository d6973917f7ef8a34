/// Coaching text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoachingMessage {
    #[default]
    BeginCompressions,
    GoodRhythm,
    GoodRhythmRecoil,
    TooSlow,
    TooFast,
    NoBody,
    HandsNotVisible,
    Stabilizing,
    WaitingForVideo,
}

impl CoachingMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachingMessage::BeginCompressions => "Begin compressions",
            CoachingMessage::GoodRhythm => "Good rhythm!",
            CoachingMessage::GoodRhythmRecoil => "Good rhythm! (Recoil)",
            CoachingMessage::TooSlow => "Too slow - speed up!",
            CoachingMessage::TooFast => "Too fast - slow down!",
            CoachingMessage::NoBody => "Position your full body in view",
            CoachingMessage::HandsNotVisible => "Cannot see hands",
            CoachingMessage::Stabilizing => "Positioning...",
            CoachingMessage::WaitingForVideo => "Waiting for video...",
        }
    }
}

impl std::fmt::Display for CoachingMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

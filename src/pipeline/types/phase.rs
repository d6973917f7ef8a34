use serde::{Deserialize, Serialize};

/// Belief of the stroke detector about where the hands are in a compression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Hands near the top, waiting for a downward push.
    #[default]
    Released,
    /// Hands pushed down, waiting for the recoil.
    Compressed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Released => write!(f, "released"),
            Phase::Compressed => write!(f, "compressed"),
        }
    }
}

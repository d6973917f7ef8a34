use crate::pipeline::types::Phase;

/// Excursion, as a fraction of frame height, needed to confirm a phase change.
pub const HYSTERESIS_MARGIN: f32 = 0.05;

/// Reference position a fresh session starts from.
pub const INITIAL_REFERENCE_Y: f32 = 0.5;

/// What a single sample did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeTransition {
    /// Sample stayed inside the hysteresis band.
    Hold,
    /// Sample moved the reference further in the current direction.
    Track { reference_y: f32 },
    /// Hands were pushed down far enough to start a stroke.
    Pushed { reference_y: f32 },
    /// Hands recoiled far enough: one compression is complete.
    Recoiled { reference_y: f32 },
}

impl StrokeTransition {
    pub fn completes_compression(&self) -> bool {
        matches!(self, StrokeTransition::Recoiled { .. })
    }
}

/// Two-state hysteresis detector over the hands' vertical position.
///
/// `reference_y` is the extreme seen since entering the current phase: the
/// topmost point while released, the deepest point while compressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeTracker {
    phase: Phase,
    reference_y: f32,
    margin: f32,
}

impl Default for StrokeTracker {
    fn default() -> Self {
        Self::new(Phase::Released, INITIAL_REFERENCE_Y)
    }
}

impl StrokeTracker {
    pub fn new(phase: Phase, reference_y: f32) -> Self {
        Self {
            phase,
            reference_y: reference_y.clamp(0.0, 1.0),
            margin: HYSTERESIS_MARGIN,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reference_y(&self) -> f32 {
        self.reference_y
    }

    /// Feed one validated position in `(0, 1)`.
    pub fn update(&mut self, y: f32) -> StrokeTransition {
        let transition = match self.phase {
            Phase::Released => {
                if y > self.reference_y + self.margin {
                    StrokeTransition::Pushed { reference_y: y }
                } else if y < self.reference_y {
                    StrokeTransition::Track { reference_y: y }
                } else {
                    StrokeTransition::Hold
                }
            }
            Phase::Compressed => {
                if y < self.reference_y - self.margin {
                    StrokeTransition::Recoiled { reference_y: y }
                } else if y > self.reference_y {
                    StrokeTransition::Track { reference_y: y }
                } else {
                    StrokeTransition::Hold
                }
            }
        };

        match transition {
            StrokeTransition::Hold => {}
            StrokeTransition::Track { reference_y } => self.reference_y = reference_y,
            StrokeTransition::Pushed { reference_y } => {
                self.phase = Phase::Compressed;
                self.reference_y = reference_y;
            }
            StrokeTransition::Recoiled { reference_y } => {
                self.phase = Phase::Released;
                self.reference_y = reference_y;
            }
        }
        transition
    }
}

use serde::{Deserialize, Serialize};

/// MediaPipe Pose landmark indices consumed by the coach.
pub const LEFT_WRIST: u8 = 15;
pub const RIGHT_WRIST: u8 = 16;

/// A single pose landmark in normalized image coordinates.
/// `y` grows downwards: 0.0 is the top of the frame, 1.0 the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub index: u8,
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(index: u8, x: f32, y: f32, visibility: f32) -> Self {
        Self {
            index,
            x,
            y,
            visibility,
        }
    }
}

/// Landmarks detected on one frame by the perception engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn get(&self, index: u8) -> Option<&Landmark> {
        self.landmarks.iter().find(|landmark| landmark.index == index)
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// Convenience constructor for a body where only the wrists matter.
    pub fn with_wrists(left: (f32, f32), right: (f32, f32)) -> Self {
        Self::new(vec![
            Landmark::new(LEFT_WRIST, 0.45, left.0, left.1),
            Landmark::new(RIGHT_WRIST, 0.55, right.0, right.1),
        ])
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

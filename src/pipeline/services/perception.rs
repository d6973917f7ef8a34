use image::DynamicImage;

use crate::error::PerceptionError;
use crate::pipeline::types::LandmarkSet;

/// Pose perception engine that turns a frame into body landmarks.
///
/// `Ok(None)` means the engine ran but found nobody in the frame.
pub trait PoseEstimator: Send + Sync {
    fn estimate(&self, image: &DynamicImage) -> Result<Option<LandmarkSet>, PerceptionError>;
    fn name(&self) -> &'static str;
}

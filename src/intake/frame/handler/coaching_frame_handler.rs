use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use tower::{Service, ServiceExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, PerceptionError};
use crate::intake::frame::handler::FrameHandler;
use crate::pipeline::{
    services::{CoachingSession, Observation, PoseEstimator},
    types::{Feedback, LandmarkSet},
};

/// Drives one connection's coaching session from decoded frames.
pub struct CoachingFrameHandler {
    session: CoachingSession,
    estimator: Option<Arc<dyn PoseEstimator>>,
    peer_name: Option<String>,
}

impl CoachingFrameHandler {
    pub fn new(client_id: Uuid, estimator: Option<Arc<dyn PoseEstimator>>) -> Self {
        Self {
            session: CoachingSession::new(client_id),
            estimator,
            peer_name: None,
        }
    }

    pub fn session(&self) -> &CoachingSession {
        &self.session
    }

    async fn observe(&mut self, landmarks: Option<LandmarkSet>) -> Result<Feedback, AppError> {
        self.session
            .ready()
            .await?
            .call(Observation::new(landmarks))
            .await
    }

    fn estimate(&self, image: &DynamicImage) -> Result<Option<LandmarkSet>, PerceptionError> {
        match &self.estimator {
            Some(estimator) => estimator.estimate(image),
            None => Err(PerceptionError::Unavailable),
        }
    }
}

#[async_trait]
impl FrameHandler for CoachingFrameHandler {
    async fn handle_ping(&mut self) -> Result<(), AppError> {
        debug!("Received ping from {}", self.session.id());
        Ok(())
    }

    async fn handle_handshake(&mut self, version: u32, name: String) -> Result<(), AppError> {
        info!(
            "Client {} handshake: version={}, name={}",
            self.session.id(),
            version,
            name
        );
        self.peer_name = Some(name);
        Ok(())
    }

    async fn handle_landmarks(
        &mut self,
        landmarks: Option<LandmarkSet>,
    ) -> Result<Option<Feedback>, AppError> {
        self.observe(landmarks).await.map(Some)
    }

    async fn handle_image(&mut self, image: DynamicImage) -> Result<Option<Feedback>, AppError> {
        debug!(
            "Received image from {}: width={}, height={}",
            self.session.id(),
            image.width(),
            image.height()
        );
        match self.estimate(&image) {
            Ok(landmarks) => self.observe(landmarks).await.map(Some),
            Err(e) => {
                warn!("Client {}: {}", self.session.id(), e);
                Ok(Some(self.session.video_unavailable()))
            }
        }
    }

    async fn handle_shutdown(&mut self) -> Result<(), AppError> {
        debug!("Received shutdown from {}", self.session.id());
        Ok(())
    }

    fn finish(&mut self) {
        if let Some(name) = &self.peer_name {
            debug!("Closing session for {}", name);
        }
        self.session.finish();
    }
}

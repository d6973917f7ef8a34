use async_trait::async_trait;
use image::DynamicImage;

use crate::error::AppError;
use crate::intake::frame::Frame;
use crate::pipeline::types::{Feedback, LandmarkSet};

/// Receives decoded frames for one connection. Methods returning
/// `Some(feedback)` expect it to be written back to the peer.
#[async_trait]
pub trait FrameHandler: Send + Sync {
    async fn handle_ping(&mut self) -> Result<(), AppError>;
    async fn handle_handshake(&mut self, version: u32, name: String) -> Result<(), AppError>;
    async fn handle_landmarks(
        &mut self,
        landmarks: Option<LandmarkSet>,
    ) -> Result<Option<Feedback>, AppError>;
    async fn handle_image(&mut self, image: DynamicImage) -> Result<Option<Feedback>, AppError>;
    async fn handle_shutdown(&mut self) -> Result<(), AppError>;

    /// Called once when the connection ends, however it ends.
    fn finish(&mut self) {}
}

/// What the client should do after a frame was routed.
#[derive(Debug, PartialEq)]
pub enum Route {
    Continue,
    Reply(Frame),
    Disconnect,
}

pub struct DelegatingRouter {
    handler: Box<dyn FrameHandler + Send + Sync>,
}

impl DelegatingRouter {
    pub fn new(handler: Box<dyn FrameHandler + Send + Sync>) -> Self {
        Self { handler }
    }

    pub async fn route(&mut self, frame: Frame) -> Result<Route, AppError> {
        let feedback = match frame {
            Frame::Ping => {
                self.handler.handle_ping().await?;
                None
            }
            Frame::Handshake { version, name } => {
                self.handler.handle_handshake(version, name).await?;
                None
            }
            Frame::Landmarks { landmarks } => self.handler.handle_landmarks(landmarks).await?,
            Frame::Image { image } => self.handler.handle_image(image).await?,
            Frame::Shutdown => {
                self.handler.handle_shutdown().await?;
                return Ok(Route::Disconnect);
            }
            Frame::Feedback { .. } => {
                return Err(AppError::Client(
                    "Feedback frames are only sent by the server".to_string(),
                ));
            }
        };
        Ok(match feedback {
            Some(feedback) => Route::Reply(Frame::Feedback { feedback }),
            None => Route::Continue,
        })
    }

    pub fn finish(&mut self) {
        self.handler.finish();
    }
}

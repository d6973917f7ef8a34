use image::DynamicImage;

use crate::pipeline::types::{Feedback, LandmarkSet};

pub const TAG_PING: u8 = 0;
pub const TAG_HANDSHAKE: u8 = 1;
pub const TAG_LANDMARKS: u8 = 2;
pub const TAG_IMAGE: u8 = 3;
pub const TAG_SHUTDOWN: u8 = 4;
pub const TAG_FEEDBACK: u8 = 5;

/// Bytes in the little-endian length prefix: [length][tag][data]
pub const FRAME_LENGTH_BYTES: usize = 4;

/// Largest frame accepted, tag included.
pub const MAX_FRAME_LENGTH: usize = 32 * 1024 * 1024;

/// Bytes per encoded landmark: index u8, x f32, y f32, visibility f32.
pub const LANDMARK_BYTES: usize = 13;

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Ping,
    Handshake {
        version: u32,
        name: String,
    },
    /// Landmarks from client-side perception; `None` when no body was found.
    Landmarks {
        landmarks: Option<LandmarkSet>,
    },
    Image {
        image: DynamicImage,
    },
    Shutdown,
    Feedback {
        feedback: Feedback,
    },
}

impl Frame {
    pub fn tag(&self) -> u8 {
        match self {
            Frame::Ping => TAG_PING,
            Frame::Handshake { .. } => TAG_HANDSHAKE,
            Frame::Landmarks { .. } => TAG_LANDMARKS,
            Frame::Image { .. } => TAG_IMAGE,
            Frame::Shutdown => TAG_SHUTDOWN,
            Frame::Feedback { .. } => TAG_FEEDBACK,
        }
    }
}

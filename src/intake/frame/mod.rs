pub mod frame;
pub mod handler;
pub mod reader;
pub mod writer;

pub use frame::{
    FRAME_LENGTH_BYTES, Frame, LANDMARK_BYTES, MAX_FRAME_LENGTH, TAG_FEEDBACK, TAG_HANDSHAKE,
    TAG_IMAGE, TAG_LANDMARKS, TAG_PING, TAG_SHUTDOWN,
};

use std::{future::Future, pin::Pin};

use image::DynamicImage;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::{
    error::FrameError,
    intake::frame::{FRAME_LENGTH_BYTES, Frame, LANDMARK_BYTES, MAX_FRAME_LENGTH},
    pipeline::types::LandmarkSet,
};

pub trait FrameWriter: Send + Sync {
    fn write<'a>(
        &'a mut self,
        frame: Frame,
    ) -> Pin<Box<dyn Future<Output = Result<(), FrameError>> + Send + 'a>>;
}

pub struct FramedAsyncBufferedWriter<T>
where
    T: AsyncWrite + Unpin + Sync + Send,
{
    writer: BufWriter<T>,
}

impl<T: AsyncWrite + Unpin + Sync + Send> FramedAsyncBufferedWriter<T> {
    pub fn new(writer: T) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> T {
        self.writer.into_inner()
    }
}

impl<T: AsyncWrite + Unpin + Sync + Send> FrameWriter for FramedAsyncBufferedWriter<T> {
    fn write<'a>(
        &'a mut self,
        frame: Frame,
    ) -> Pin<Box<dyn Future<Output = Result<(), FrameError>> + Send + 'a>> {
        Box::pin(async move {
            let bytes = encode_frame(&frame)?;
            self.writer
                .write_all(&bytes)
                .await
                .map_err(FrameError::Write)?;
            self.writer.flush().await.map_err(FrameError::Write)?;
            Ok(())
        })
    }
}

/// Encode a frame as `[length][tag][data]`.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, FrameError> {
    let mut body = vec![frame.tag()];
    match frame {
        Frame::Ping | Frame::Shutdown => {}
        Frame::Handshake { version, name } => {
            let name_length =
                u16::try_from(name.len()).map_err(|_| FrameError::TooLarge(name.len()))?;
            body.extend_from_slice(&version.to_le_bytes());
            body.extend_from_slice(&name_length.to_le_bytes());
            body.extend_from_slice(name.as_bytes());
        }
        Frame::Landmarks { landmarks } => write_landmarks(&mut body, landmarks.as_ref())?,
        Frame::Image { image } => write_rgb_image(&mut body, image),
        Frame::Feedback { feedback } => serde_json::to_writer(&mut body, feedback)?,
    }

    if body.len() > MAX_FRAME_LENGTH {
        return Err(FrameError::TooLarge(body.len()));
    }
    let mut bytes = Vec::with_capacity(FRAME_LENGTH_BYTES + body.len());
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

fn write_landmarks(body: &mut Vec<u8>, landmarks: Option<&LandmarkSet>) -> Result<(), FrameError> {
    let Some(landmarks) = landmarks else {
        body.push(0);
        return Ok(());
    };
    let count = u8::try_from(landmarks.len()).map_err(|_| FrameError::TooLarge(landmarks.len()))?;
    body.reserve(1 + count as usize * LANDMARK_BYTES);
    body.push(count);
    for landmark in landmarks.iter() {
        body.push(landmark.index);
        body.extend_from_slice(&landmark.x.to_le_bytes());
        body.extend_from_slice(&landmark.y.to_le_bytes());
        body.extend_from_slice(&landmark.visibility.to_le_bytes());
    }
    Ok(())
}

fn write_rgb_image(body: &mut Vec<u8>, image: &DynamicImage) {
    let rgb = image.to_rgb8();
    body.extend_from_slice(&rgb.width().to_le_bytes());
    body.extend_from_slice(&rgb.height().to_le_bytes());
    body.extend_from_slice(rgb.as_raw());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::frame::{TAG_FEEDBACK, TAG_LANDMARKS};
    use crate::pipeline::types::{CoachingMessage, Feedback};

    #[test]
    fn test_length_prefix_counts_tag_and_payload() {
        let bytes = encode_frame(&Frame::Ping).unwrap();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0]);

        let landmarks = LandmarkSet::with_wrists((0.4, 0.9), (0.4, 0.9));
        let bytes = encode_frame(&Frame::Landmarks {
            landmarks: Some(landmarks),
        })
        .unwrap();
        let expected = 1 + 1 + 2 * LANDMARK_BYTES;
        assert_eq!(&bytes[..4], &(expected as u32).to_le_bytes());
        assert_eq!(bytes[4], TAG_LANDMARKS);
        assert_eq!(bytes[5], 2);
        assert_eq!(bytes.len(), FRAME_LENGTH_BYTES + expected);
    }

    #[test]
    fn test_absent_body_is_zero_count() {
        let bytes = encode_frame(&Frame::Landmarks { landmarks: None }).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, TAG_LANDMARKS, 0]);
    }

    #[tokio::test]
    async fn test_writes_feedback_as_json() {
        let mut writer = FramedAsyncBufferedWriter::new(Vec::new());
        let feedback = Feedback::new(112.4, 7, CoachingMessage::GoodRhythm);
        writer
            .write(Frame::Feedback { feedback })
            .await
            .unwrap();

        let bytes = writer.into_inner();
        assert_eq!(bytes[4], TAG_FEEDBACK);
        let json: serde_json::Value = serde_json::from_slice(&bytes[5..]).unwrap();
        assert_eq!(json["rate"], 112);
        assert_eq!(json["count"], 7);
        assert_eq!(json["message"], "Good rhythm!");
    }
}

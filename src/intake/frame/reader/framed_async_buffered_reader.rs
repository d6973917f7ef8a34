use crate::{
    error::FrameError,
    intake::frame::{
        FRAME_LENGTH_BYTES, Frame, MAX_FRAME_LENGTH, TAG_FEEDBACK, TAG_HANDSHAKE,
        TAG_IMAGE, TAG_LANDMARKS, TAG_PING, TAG_SHUTDOWN,
        reader::{FrameReader, frame_reader::ReadState},
    },
    pipeline::types::{Feedback, Landmark, LandmarkSet},
};
use image::{DynamicImage, RgbImage};
use std::{future::Future, pin::Pin};
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

pub struct FramedAsyncBufferedReader<T>
where
    T: AsyncRead + Unpin + Sync + Send,
{
    reader: BufReader<T>,
}

impl<T: AsyncRead + Unpin + Sync + Send> FramedAsyncBufferedReader<T> {
    pub fn new(stream: T) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    async fn read_frame_length(&mut self) -> Result<u32, FrameError> {
        let mut length_buffer = [0u8; FRAME_LENGTH_BYTES];
        self.reader
            .read_exact(&mut length_buffer)
            .await
            .map_err(FrameError::Read)?;
        let length = u32::from_le_bytes(length_buffer);
        if length == 0 {
            return Err(FrameError::InvalidFrameLength(1, 0));
        }
        if length as usize > MAX_FRAME_LENGTH {
            return Err(FrameError::TooLarge(length as usize));
        }
        Ok(length)
    }

    async fn read_frame_data(&mut self, expected_length: u32) -> Result<Frame, FrameError> {
        let mut data = vec![0u8; expected_length as usize];
        self.reader
            .read_exact(&mut data)
            .await
            .map_err(FrameError::Read)?;
        decode_frame(&data)
    }
}

impl<T: AsyncRead + Unpin + Sync + Send> FrameReader for FramedAsyncBufferedReader<T> {
    fn read<'a>(
        &'a mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Frame, FrameError>> + Send + 'a>> {
        Box::pin(async move {
            let mut state = ReadState::WaitingForLength;
            loop {
                match state {
                    ReadState::WaitingForLength => {
                        state = ReadState::WaitingForFrame {
                            expected_length: self.read_frame_length().await?,
                        };
                    }
                    ReadState::WaitingForFrame { expected_length } => {
                        return self.read_frame_data(expected_length).await;
                    }
                }
            }
        })
    }
}

/// Decode `[tag][payload]`; the whole buffer must be consumed.
pub fn decode_frame(data: &[u8]) -> Result<Frame, FrameError> {
    let mut payload = Payload::new(data);
    let tag = payload.u8()?;
    let frame = match tag {
        TAG_PING => Frame::Ping,
        TAG_HANDSHAKE => read_handshake(&mut payload)?,
        TAG_LANDMARKS => read_landmarks(&mut payload)?,
        TAG_IMAGE => read_rgb_image(&mut payload)?,
        TAG_SHUTDOWN => Frame::Shutdown,
        TAG_FEEDBACK => {
            let feedback: Feedback = serde_json::from_slice(payload.rest())?;
            Frame::Feedback { feedback }
        }
        _ => return Err(FrameError::UnknownTag(tag)),
    };
    if payload.consumed() != data.len() {
        return Err(FrameError::InvalidFrameLength(
            data.len(),
            payload.consumed(),
        ));
    }
    Ok(frame)
}

fn read_handshake(payload: &mut Payload<'_>) -> Result<Frame, FrameError> {
    let version = payload.u32()?;
    let name_length = payload.u16()? as usize;
    let name = std::str::from_utf8(payload.bytes(name_length)?)
        .map_err(|_| FrameError::InvalidName)?
        .to_string();
    Ok(Frame::Handshake { version, name })
}

fn read_landmarks(payload: &mut Payload<'_>) -> Result<Frame, FrameError> {
    let count = payload.u8()? as usize;
    if count == 0 {
        return Ok(Frame::Landmarks { landmarks: None });
    }
    let mut landmarks = Vec::with_capacity(count);
    for _ in 0..count {
        let index = payload.u8()?;
        let x = payload.f32()?;
        let y = payload.f32()?;
        let visibility = payload.f32()?;
        landmarks.push(Landmark::new(index, x, y, visibility));
    }
    Ok(Frame::Landmarks {
        landmarks: Some(LandmarkSet::new(landmarks)),
    })
}

fn read_rgb_image(payload: &mut Payload<'_>) -> Result<Frame, FrameError> {
    let width = payload.u32()?;
    let height = payload.u32()?;
    let pixel_bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or(FrameError::InvalidImage(width, height))?;
    let pixels = payload
        .bytes(pixel_bytes)
        .map_err(|_| FrameError::InvalidImage(width, height))?
        .to_vec();
    let image =
        RgbImage::from_raw(width, height, pixels).ok_or(FrameError::InvalidImage(width, height))?;
    Ok(Frame::Image {
        image: DynamicImage::ImageRgb8(image),
    })
}

/// Cursor over a frame body that reports short reads as length errors.
struct Payload<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Payload<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn consumed(&self) -> usize {
        self.position
    }

    fn bytes(&mut self, count: usize) -> Result<&'a [u8], FrameError> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or(FrameError::InvalidFrameLength(
                self.position.saturating_add(count),
                self.data.len(),
            ))?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        self.position = self.data.len();
        rest
    }

    fn u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, FrameError> {
        let mut buffer = [0u8; 2];
        buffer.copy_from_slice(self.bytes(2)?);
        Ok(u16::from_le_bytes(buffer))
    }

    fn u32(&mut self) -> Result<u32, FrameError> {
        let mut buffer = [0u8; 4];
        buffer.copy_from_slice(self.bytes(4)?);
        Ok(u32::from_le_bytes(buffer))
    }

    fn f32(&mut self) -> Result<f32, FrameError> {
        let mut buffer = [0u8; 4];
        buffer.copy_from_slice(self.bytes(4)?);
        Ok(f32::from_le_bytes(buffer))
    }
}

pub mod writer;

pub use writer::{FrameWriter, FramedAsyncBufferedWriter, encode_frame};

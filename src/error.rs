use thiserror::Error;
use uuid::Uuid;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("Failed to accept connection: {0}")]
    Accept(std::io::Error),
    #[error("Client Error: {0}")]
    Client(String),
    #[error("Failed to send shutdown to client handle: {0}")]
    ClientShutdown(Uuid),
    #[error("Client limit of {0} reached")]
    TooManyClients(usize),
    #[error("Client supervisor is not running")]
    SupervisorClosed,
    #[error("Frame Error: {0}")]
    Frame(#[from] FrameError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// Wire protocol Error Type
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to read frame: {0}")]
    Read(std::io::Error),
    #[error("Failed to write frame: {0}")]
    Write(std::io::Error),
    #[error("Invalid frame length, expected {0} bytes but consumed {1}")]
    InvalidFrameLength(usize, usize),
    #[error("Unknown frame tag {0}")]
    UnknownTag(u8),
    #[error("Handshake name is not valid UTF-8")]
    InvalidName,
    #[error("Image payload does not match {0}x{1} RGB")]
    InvalidImage(u32, u32),
    #[error("Frame is too large to encode: {0} bytes")]
    TooLarge(usize),
    #[error("Invalid feedback payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    /// The peer closed the stream; not a protocol failure.
    pub fn is_disconnect(&self) -> bool {
        match self {
            FrameError::Read(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

// Perception collaborator Error Type
#[derive(Error, Debug)]
pub enum PerceptionError {
    #[error("No pose estimator is configured")]
    Unavailable,
    #[error("Pose estimation failed: {0}")]
    Estimation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_disconnect() {
        let eof = FrameError::Read(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(eof.is_disconnect());
        assert!(!FrameError::UnknownTag(9).is_disconnect());
        let timeout = FrameError::Read(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert!(!timeout.is_disconnect());
    }
}

use crate::{
    error::AppError,
    intake::frame::{
        handler::{DelegatingRouter, FrameHandler, Route},
        reader::FrameReader,
        writer::FrameWriter,
    },
};
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct Client {
    id: Uuid,
    reader: Box<dyn FrameReader + Send + Sync>,
    writer: Box<dyn FrameWriter + Send + Sync>,
    shutdown_tx: Sender<()>,
    shutdown_rx: Option<Receiver<()>>,
    router: DelegatingRouter,
}

#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub id: Uuid,
    shutdown_tx: Sender<()>,
}

impl ClientHandle {
    pub fn send_shutdown(&self) -> Result<(), AppError> {
        match self.shutdown_tx.send(()) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "Error sending shutdown to client handle {:?}: {:?}",
                    self.id,
                    e.to_string()
                );
                Err(AppError::ClientShutdown(self.id))
            }
        }
    }
}

impl Client {
    pub fn new(
        id: Uuid,
        handler: Box<dyn FrameHandler + Send + Sync>,
        reader: Box<dyn FrameReader + Send + Sync>,
        writer: Box<dyn FrameWriter + Send + Sync>,
    ) -> (Box<Client>, ClientHandle) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        (
            Box::new(Client {
                id,
                reader,
                writer,
                shutdown_tx: shutdown_tx.clone(),
                shutdown_rx: Some(shutdown_rx),
                router: DelegatingRouter::new(handler),
            }),
            ClientHandle { id, shutdown_tx },
        )
    }

    /// Read, route and answer one frame. `Ok(false)` once the peer is gone.
    async fn handle_next_message(&mut self) -> Result<bool, AppError> {
        let frame = match self.reader.read().await {
            Ok(frame) => frame,
            Err(e) if e.is_disconnect() => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        debug!("Client {:?} received frame tag {}", self.id, frame.tag());
        match self.router.route(frame).await? {
            Route::Continue => Ok(true),
            Route::Reply(reply) => {
                self.writer.write(reply).await?;
                Ok(true)
            }
            Route::Disconnect => Ok(false),
        }
    }

    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("Running client pipeline for {:?}", self.id);
        let result = self.run_pipeline().await;
        self.router.finish();
        result
    }

    async fn run_pipeline(&mut self) -> Result<(), AppError> {
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .unwrap_or_else(|| self.shutdown_tx.subscribe());
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!("Client pipeline for {:?} received shutdown", self.id);
                    break;
                }
                result = self.handle_next_message() => {
                    match result {
                        Ok(true) => {
                            debug!("Client pipeline for {:?} handled message", self.id);
                        }
                        Ok(false) => {
                            info!("Client {:?} has disconnected", self.id);
                            break;
                        }
                        Err(e) => {
                            error!("Client pipeline for {:?} failed: {}", self.id, e);
                            return Err(e);
                        }
                    }
                }
            }
        }
        debug!("Client pipeline for {:?} finished", self.id);
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::frame::{
        Frame,
        handler::CoachingFrameHandler,
        reader::FramedAsyncBufferedReader,
        writer::{FramedAsyncBufferedWriter, encode_frame},
    };
    use crate::pipeline::types::{Feedback, LandmarkSet};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    fn spawn_client(stream: DuplexStream) -> (ClientHandle, tokio::task::JoinHandle<Result<(), AppError>>) {
        let (stream_rx, stream_tx) = tokio::io::split(stream);
        let id = Uuid::new_v4();
        let (mut client, handle) = Client::new(
            id,
            Box::new(CoachingFrameHandler::new(id, None)),
            Box::new(FramedAsyncBufferedReader::new(stream_rx)),
            Box::new(FramedAsyncBufferedWriter::new(stream_tx)),
        );
        let task = tokio::spawn(async move { client.start().await });
        (handle, task)
    }

    async fn read_feedback<R: FrameReader>(reader: &mut R) -> Feedback {
        match reader.read().await.unwrap() {
            Frame::Feedback { feedback } => feedback,
            other => panic!("expected feedback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_answers_each_landmark_frame() {
        let (local, remote) = tokio::io::duplex(4096);
        let (_handle, task) = spawn_client(remote);
        let (local_rx, mut local_tx) = tokio::io::split(local);
        let mut replies = FramedAsyncBufferedReader::new(local_rx);

        let frames = [
            Frame::Handshake {
                version: 1,
                name: "duplex".to_string(),
            },
            Frame::Ping,
            Frame::Landmarks { landmarks: None },
            Frame::Landmarks {
                landmarks: Some(LandmarkSet::with_wrists((0.45, 0.9), (0.45, 0.9))),
            },
        ];
        for frame in &frames {
            local_tx.write_all(&encode_frame(frame).unwrap()).await.unwrap();
        }

        let first = read_feedback(&mut replies).await;
        assert_eq!(first.message, "Position your full body in view");
        let second = read_feedback(&mut replies).await;
        assert_eq!(second.message, "Begin compressions");
        assert_eq!((second.rate, second.count), (0, 0));

        local_tx
            .write_all(&encode_frame(&Frame::Shutdown).unwrap())
            .await
            .unwrap();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_client_counts_compressions() {
        let (local, remote) = tokio::io::duplex(4096);
        let (_handle, task) = spawn_client(remote);
        let (local_rx, mut local_tx) = tokio::io::split(local);
        let mut replies = FramedAsyncBufferedReader::new(local_rx);

        let mut last = None;
        for y in [0.40, 0.50, 0.55, 0.41, 0.52, 0.40] {
            let frame = Frame::Landmarks {
                landmarks: Some(LandmarkSet::with_wrists((y, 0.9), (y, 0.9))),
            };
            local_tx.write_all(&encode_frame(&frame).unwrap()).await.unwrap();
            last = Some(read_feedback(&mut replies).await);
        }
        assert_eq!(last.unwrap().count, 2);

        drop(local_tx);
        drop(replies);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_client_stops_on_shutdown_signal() {
        let (local, remote) = tokio::io::duplex(64);
        let (handle, task) = spawn_client(remote);

        handle.send_shutdown().unwrap();
        task.await.unwrap().unwrap();
        drop(local);
    }

    #[tokio::test]
    async fn test_protocol_error_ends_client() {
        let (mut local, remote) = tokio::io::duplex(64);
        let (_handle, task) = spawn_client(remote);
        local.write_all(&[1, 0, 0, 0, 99]).await.unwrap();
        assert!(task.await.unwrap().is_err());
        let mut rest = Vec::new();
        local.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}

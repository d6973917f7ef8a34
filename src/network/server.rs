use std::net::SocketAddr;

use crate::{
    config::Settings,
    error::AppError,
    intake::{
        client::ClientManagerHandle,
        frame::{reader::FramedAsyncBufferedReader, writer::FramedAsyncBufferedWriter},
    },
};
use tokio::net::{TcpListener, TcpStream};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub struct Server {
    listener: TcpListener,
    client_manager: ClientManagerHandle,
}

impl Server {
    pub async fn bind(
        settings: &Settings,
        client_manager: ClientManagerHandle,
    ) -> Result<Self, AppError> {
        let address = settings.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::Bind(e, address.clone()))?;
        Ok(Self {
            listener,
            client_manager,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        self.listener
            .local_addr()
            .map_err(|e| AppError::Bind(e, "listener".to_string()))
    }

    /// Accept connections until the supervisor goes away.
    pub async fn run(&self) -> Result<(), AppError> {
        info!("Coaching server listening on {}", self.local_addr()?);
        loop {
            let (stream, peer) = match self.listener.accept().await.map_err(AppError::Accept) {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("{} from unknown peer", e);
                    continue;
                }
            };
            debug!("New client attempting to connect: {:?}", peer);
            match self.handle_client(stream).await {
                Ok(client_id) => info!("Client connected: {} for peer {}", client_id, peer),
                Err(AppError::TooManyClients(limit)) => {
                    warn!("Closing connection from {}: {} clients already", peer, limit);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn handle_client(&self, stream: TcpStream) -> Result<Uuid, AppError> {
        let (stream_rx, stream_tx) = stream.into_split();
        let reader = FramedAsyncBufferedReader::new(stream_rx);
        let writer = FramedAsyncBufferedWriter::new(stream_tx);
        self.client_manager
            .add_client(Box::new(reader), Box::new(writer))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{
        client::ClientManager,
        frame::{Frame, reader::FrameReader, writer::FrameWriter},
    };
    use crate::pipeline::types::LandmarkSet;
    use std::time::Duration;

    fn loopback() -> Settings {
        Settings {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            max_clients: 1,
            ..Settings::default()
        }
    }

    async fn wait_for_clients(handle: &ClientManagerHandle, expected: usize) {
        for _ in 0..100 {
            if handle.list_clients().await.unwrap().len() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} clients", expected);
    }

    #[tokio::test]
    async fn test_tcp_client_receives_feedback() {
        let settings = loopback();
        let (manager, handle) = ClientManager::new(&settings, None);
        let server = Server::bind(&settings, handle.clone()).await.unwrap();
        let address = server.local_addr().unwrap();
        let server_task = tokio::spawn(async move { server.run().await });

        let stream = TcpStream::connect(address).await.unwrap();
        let (stream_rx, stream_tx) = stream.into_split();
        let mut reader = FramedAsyncBufferedReader::new(stream_rx);
        let mut writer = FramedAsyncBufferedWriter::new(stream_tx);

        writer
            .write(Frame::Handshake {
                version: 1,
                name: "loopback".to_string(),
            })
            .await
            .unwrap();
        let mut counts = Vec::new();
        for y in [0.40, 0.50, 0.40] {
            writer
                .write(Frame::Landmarks {
                    landmarks: Some(LandmarkSet::with_wrists((y, 0.9), (y, 0.9))),
                })
                .await
                .unwrap();
            match reader.read().await.unwrap() {
                Frame::Feedback { feedback } => counts.push(feedback.count),
                other => panic!("expected feedback, got {:?}", other),
            }
        }
        assert_eq!(counts, vec![0, 0, 1]);
        wait_for_clients(&handle, 1).await;

        // A second connection is over the limit and is closed straight away.
        let refused = TcpStream::connect(address).await.unwrap();
        let mut refused = FramedAsyncBufferedReader::new(refused);
        assert!(refused.read().await.unwrap_err().is_disconnect());

        drop(writer);
        drop(reader);
        wait_for_clients(&handle, 0).await;

        server_task.abort();
        manager.stop();
    }

    #[tokio::test]
    async fn test_bind_error_names_address() {
        let settings = loopback();
        let (manager, handle) = ClientManager::new(&settings, None);
        let first = Server::bind(&settings, handle.clone()).await.unwrap();
        let taken = Settings {
            port: first.local_addr().unwrap().port(),
            ..loopback()
        };
        match Server::bind(&taken, handle).await {
            Err(AppError::Bind(_, address)) => assert_eq!(address, taken.address()),
            _ => panic!("expected bind failure"),
        }
        manager.stop();
    }
}

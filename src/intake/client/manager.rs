use std::sync::Arc;

use crate::{
    config::Settings,
    error::AppError,
    intake::{
        client::{
            Client, ClientSupervisor,
            supervisor::{ClientEntry, ClientSupervisorCommand},
        },
        frame::{handler::CoachingFrameHandler, reader::FrameReader, writer::FrameWriter},
    },
    pipeline::PoseEstimator,
};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ClientManagerHandle {
    command_tx: mpsc::Sender<ClientSupervisorCommand>,
    estimator: Option<Arc<dyn PoseEstimator>>,
}

impl ClientManagerHandle {
    pub fn new(
        command_tx: mpsc::Sender<ClientSupervisorCommand>,
        estimator: Option<Arc<dyn PoseEstimator>>,
    ) -> Self {
        Self {
            command_tx,
            estimator,
        }
    }

    async fn request<T>(
        &self,
        command: ClientSupervisorCommand,
        response_rx: oneshot::Receiver<T>,
    ) -> Result<T, AppError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| AppError::SupervisorClosed)?;
        response_rx.await.map_err(|_| AppError::SupervisorClosed)
    }

    /// Start a coaching session for a new connection. The client only begins
    /// reading once the supervisor has accepted it.
    pub async fn add_client(
        &self,
        reader: Box<dyn FrameReader + Send + Sync>,
        writer: Box<dyn FrameWriter + Send + Sync>,
    ) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        debug!("Adding client {}", id);
        let handler = CoachingFrameHandler::new(id, self.estimator.clone());
        let (mut client, handle) = Client::new(id, Box::new(handler), reader, writer);

        let (accepted_tx, accepted_rx) = oneshot::channel::<()>();
        let command_tx = self.command_tx.clone();
        let client_task = tokio::spawn(async move {
            if accepted_rx.await.is_err() {
                debug!("Client {} was not accepted", id);
                return Ok(());
            }
            debug!("Client {:?} starting task", id);
            let result = client.start().await;
            let (responder, _) = oneshot::channel();
            if command_tx
                .send(ClientSupervisorCommand::RemoveClient { id, responder })
                .await
                .is_err()
            {
                warn!("Supervisor gone before client {} was removed", id);
            }
            result
        });

        let entry = ClientEntry {
            id,
            client_task,
            handle,
        };
        let (responder, response_rx) = oneshot::channel();
        let client_id = self
            .request(
                ClientSupervisorCommand::AddClient { entry, responder },
                response_rx,
            )
            .await??;
        let _ = accepted_tx.send(());
        debug!("Client {:?} added and started", client_id);
        Ok(client_id)
    }

    pub async fn list_clients(&self) -> Result<Vec<Uuid>, AppError> {
        let (responder, response_rx) = oneshot::channel();
        self.request(ClientSupervisorCommand::ListClients { responder }, response_rx)
            .await
    }

    pub async fn remove_client(&self, client_id: Uuid) -> Result<bool, AppError> {
        let (responder, response_rx) = oneshot::channel();
        self.request(
            ClientSupervisorCommand::RemoveClient {
                id: client_id,
                responder,
            },
            response_rx,
        )
        .await
    }

    /// Stop every client and wait for their sessions to finish.
    pub async fn shutdown_all(&self) -> Result<(), AppError> {
        let (responder, response_rx) = oneshot::channel();
        let tasks = self
            .request(ClientSupervisorCommand::ShutdownAll { responder }, response_rx)
            .await?;
        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Client ended with error during shutdown: {}", e),
                Err(e) => error!("Client task failed to join: {}", e),
            }
        }
        Ok(())
    }
}

pub struct ClientManager {
    supervisor_task: JoinHandle<()>,
}

impl ClientManager {
    pub fn new(
        settings: &Settings,
        estimator: Option<Arc<dyn PoseEstimator>>,
    ) -> (Self, ClientManagerHandle) {
        let (command_tx, mut command_rx) =
            mpsc::channel::<ClientSupervisorCommand>(settings.supervisor_channel_size);
        match &estimator {
            Some(estimator) => info!("Using pose estimator {}", estimator.name()),
            None => info!("No pose estimator configured, image frames will wait for video"),
        }
        let mut supervisor = ClientSupervisor::new(settings.max_clients);
        let supervisor_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(command) = command_rx.recv() => {
                        supervisor.handle_command(command);
                    }
                    else => {
                        debug!("Client supervisor command channel closed");
                        break;
                    },
                }
            }
        });
        (
            Self { supervisor_task },
            ClientManagerHandle::new(command_tx, estimator),
        )
    }

    pub fn is_running(&self) -> bool {
        !self.supervisor_task.is_finished()
    }

    pub fn stop(self) {
        self.supervisor_task.abort();
    }
}

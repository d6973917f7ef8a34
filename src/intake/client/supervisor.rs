use crate::{error::AppError, intake::client::ClientHandle};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ClientEntry {
    pub id: Uuid,
    pub client_task: JoinHandle<Result<(), AppError>>,
    pub handle: ClientHandle,
}

pub enum ClientSupervisorCommand {
    AddClient {
        entry: ClientEntry,
        responder: oneshot::Sender<Result<Uuid, AppError>>,
    },
    RemoveClient {
        id: Uuid,
        responder: oneshot::Sender<bool>,
    },
    ListClients {
        responder: oneshot::Sender<Vec<Uuid>>,
    },
    ShutdownAll {
        responder: oneshot::Sender<Vec<JoinHandle<Result<(), AppError>>>>,
    },
}

/// Owns the task of every connected client. Driven by a single command loop.
pub struct ClientSupervisor {
    clients: Vec<ClientEntry>,
    max_clients: usize,
}

impl ClientSupervisor {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: Vec::new(),
            max_clients,
        }
    }

    /// Refuses the entry once `max_clients` are supervised; its task is never started.
    pub fn add_client(&mut self, client_entry: ClientEntry) -> Result<Uuid, AppError> {
        if self.clients.len() >= self.max_clients {
            warn!(
                "Refusing client {}: limit of {} reached",
                client_entry.id, self.max_clients
            );
            client_entry.client_task.abort();
            return Err(AppError::TooManyClients(self.max_clients));
        }
        let id = client_entry.id;
        info!("Supervising client {}", id);
        self.clients.push(client_entry);
        Ok(id)
    }

    /// Returns whether the client was known.
    pub fn remove_client(&mut self, client_id: Uuid) -> bool {
        let before = self.clients.len();
        self.clients.retain(|entry| entry.id != client_id);
        let removed = self.clients.len() != before;
        if removed {
            debug!("Client {} removed, {} remaining", client_id, self.clients.len());
        }
        removed
    }

    pub fn list_clients(&self) -> Vec<Uuid> {
        self.clients.iter().map(|entry| entry.id).collect()
    }

    /// Signal every client to stop and hand back their tasks.
    pub fn shutdown_all(&mut self) -> Vec<JoinHandle<Result<(), AppError>>> {
        info!("Shutting down {} clients", self.clients.len());
        self.clients
            .drain(..)
            .map(|entry| {
                if let Err(e) = entry.handle.send_shutdown() {
                    warn!("Client {} already stopped: {}", entry.id, e);
                }
                entry.client_task
            })
            .collect()
    }

    pub fn handle_command(&mut self, command: ClientSupervisorCommand) {
        match command {
            ClientSupervisorCommand::AddClient { entry, responder } => {
                let _ = responder.send(self.add_client(entry));
            }
            ClientSupervisorCommand::RemoveClient { id, responder } => {
                let removed = self.remove_client(id);
                let _ = responder.send(removed);
            }
            ClientSupervisorCommand::ListClients { responder } => {
                let _ = responder.send(self.list_clients());
            }
            ClientSupervisorCommand::ShutdownAll { responder } => {
                let _ = responder.send(self.shutdown_all());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{
        client::Client,
        frame::{
            handler::CoachingFrameHandler, reader::FramedAsyncBufferedReader,
            writer::FramedAsyncBufferedWriter,
        },
    };
    use tokio::io::DuplexStream;

    fn entry() -> (ClientEntry, DuplexStream) {
        let (local, remote) = tokio::io::duplex(64);
        let (stream_rx, stream_tx) = tokio::io::split(remote);
        let id = Uuid::new_v4();
        let (mut client, handle) = Client::new(
            id,
            Box::new(CoachingFrameHandler::new(id, None)),
            Box::new(FramedAsyncBufferedReader::new(stream_rx)),
            Box::new(FramedAsyncBufferedWriter::new(stream_tx)),
        );
        let entry = ClientEntry {
            id,
            client_task: tokio::spawn(async move { client.start().await }),
            handle,
        };
        (entry, local)
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let mut supervisor = ClientSupervisor::new(2);
        let (first, _first_stream) = entry();
        let (second, _second_stream) = entry();
        let (third, _third_stream) = entry();
        let first_id = supervisor.add_client(first).unwrap();
        let second_id = supervisor.add_client(second).unwrap();
        assert!(matches!(
            supervisor.add_client(third),
            Err(AppError::TooManyClients(2))
        ));
        assert_eq!(supervisor.list_clients(), vec![first_id, second_id]);

        assert!(supervisor.remove_client(first_id));
        assert!(!supervisor.remove_client(first_id));
        assert_eq!(supervisor.list_clients(), vec![second_id]);

        for task in supervisor.shutdown_all() {
            task.await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_commands_answer_through_responders() {
        let mut supervisor = ClientSupervisor::new(4);
        let (entry, _stream) = entry();
        let id = entry.id;

        let (responder, response) = oneshot::channel();
        supervisor.handle_command(ClientSupervisorCommand::AddClient { entry, responder });
        assert_eq!(response.await.unwrap().unwrap(), id);

        let (responder, response) = oneshot::channel();
        supervisor.handle_command(ClientSupervisorCommand::ListClients { responder });
        assert_eq!(response.await.unwrap(), vec![id]);

        let (responder, response) = oneshot::channel();
        supervisor.handle_command(ClientSupervisorCommand::ShutdownAll { responder });
        let tasks = response.await.unwrap();
        assert_eq!(tasks.len(), 1);
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert!(supervisor.list_clients().is_empty());
    }
}

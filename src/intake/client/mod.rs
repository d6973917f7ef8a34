pub mod client;
pub mod manager;
pub mod supervisor;

pub use client::{Client, ClientHandle};
pub use manager::{ClientManager, ClientManagerHandle};
pub use supervisor::ClientSupervisor;

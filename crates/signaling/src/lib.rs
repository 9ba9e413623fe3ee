//! stammtisch-signaling – TCP-Transport fuer den Raum-Broker
//!
//! Dieser Crate verbindet Clients ueber TCP mit dem `RoomBroker`. Er
//! verwaltet die Verbindungen, die Send-Queues und die Raum-Gruppen fuer
//! selektives Broadcasting.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (SignalingServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |  BrokerBefehl ueber mpsc
//!     v
//! MessageDispatcher (ein Task, besitzt den RoomBroker)
//!     |  Anweisungen
//!     v
//! EventBroadcaster – Send-Queues + Raum-Gruppen -> ClientConnection -> TCP
//! ```
//!
//! Alle Zustandsaenderungen laufen nacheinander im Dispatcher-Task, daher
//! braucht der Broker selbst keine Locks.

pub mod broadcast;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod server_state;
pub mod tcp;

// Bequeme Re-Exporte
pub use broadcast::EventBroadcaster;
pub use connection::ClientConnection;
pub use dispatcher::{BrokerBefehl, BrokerHandle, MessageDispatcher};
pub use error::{SignalingError, SignalingResult};
pub use server_state::{SignalingConfig, SignalingState};
pub use tcp::SignalingServer;

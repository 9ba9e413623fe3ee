//! Gemeinsamer Server-Zustand fuer den Signaling-Service
//!
//! Haelt Konfiguration, Broadcaster und das Handle zum Broker-Task als
//! Arc-Referenz, die sicher zwischen tokio-Tasks geteilt werden kann.

use stammtisch_chat::{BrokerConfig, RoomBroker};
use stammtisch_protocol::wire::DEFAULT_MAX_FRAME_SIZE;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::broadcast::{EventBroadcaster, SEND_QUEUE_GROESSE};
use crate::dispatcher::{BrokerHandle, MessageDispatcher};

/// Konfiguration fuer den Signaling-Service
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// Maximale Frame-Groesse in Bytes (ein- und ausgehend)
    pub max_frame_bytes: usize,
    /// Groesse der Send-Queue pro Verbindung
    pub send_queue: usize,
    /// Verhalten des Brokers
    pub broker: BrokerConfig,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_SIZE,
            send_queue: SEND_QUEUE_GROESSE,
            broker: BrokerConfig::default(),
        }
    }
}

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
pub struct SignalingState {
    /// Server-Konfiguration
    pub config: Arc<SignalingConfig>,
    /// Event-Broadcaster (Send-Queues und Raum-Gruppen)
    pub broadcaster: EventBroadcaster,
    /// Handle zum Broker-Task
    pub broker: BrokerHandle,
}

impl SignalingState {
    /// Erstellt den Zustand und startet den Broker-Task
    ///
    /// Muss innerhalb einer tokio-Runtime aufgerufen werden. Der zurueck-
    /// gegebene JoinHandle endet, wenn alle Handles gedroppt sind.
    pub fn starten(config: SignalingConfig) -> (Arc<Self>, JoinHandle<RoomBroker>) {
        let broadcaster = EventBroadcaster::mit_queue_groesse(config.send_queue);
        let broker = RoomBroker::neu(config.broker.clone());
        let (handle, task) = MessageDispatcher::neu(broker, broadcaster.clone()).starten();

        let state = Arc::new(Self {
            config: Arc::new(config),
            broadcaster,
            broker: handle,
        });
        (state, task)
    }
}

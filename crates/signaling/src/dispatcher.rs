//! Message-Dispatcher – Einziger Eigentuemer des RoomBrokers
//!
//! Verbindungs-Tasks schicken `BrokerBefehl`e ueber einen mpsc-Kanal an
//! genau einen Dispatcher-Task. Dieser fuehrt jeden Befehl vollstaendig aus
//! (Broker-Mutation + Verteilung ueber den Broadcaster), bevor er den
//! naechsten annimmt. Dadurch gibt es keine verschraenkten Mutationen und
//! der Broker braucht keine Locks.

use stammtisch_chat::RoomBroker;
use stammtisch_core::ConnectionId;
use stammtisch_protocol::ClientEvent;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::broadcast::EventBroadcaster;
use crate::error::{SignalingError, SignalingResult};

// ---------------------------------------------------------------------------
// Befehle
// ---------------------------------------------------------------------------

/// Befehle von den Verbindungs-Tasks an den Dispatcher
#[derive(Debug)]
pub enum BrokerBefehl {
    /// Neue Verbindung; die Antwort enthaelt den vergebenen Anzeigenamen
    Verbunden {
        verbindung: ConnectionId,
        antwort: oneshot::Sender<String>,
    },
    /// Eingehendes Client-Ereignis
    Ereignis {
        verbindung: ConnectionId,
        ereignis: ClientEvent,
    },
    /// Verbindung getrennt
    Getrennt { verbindung: ConnectionId },
}

// ---------------------------------------------------------------------------
// BrokerHandle
// ---------------------------------------------------------------------------

/// Cloneable Handle zum Dispatcher-Task
#[derive(Clone, Debug)]
pub struct BrokerHandle {
    tx: mpsc::UnboundedSender<BrokerBefehl>,
}

impl BrokerHandle {
    /// Meldet eine neue Verbindung an und wartet auf den Anzeigenamen
    pub async fn verbunden(&self, verbindung: ConnectionId) -> SignalingResult<String> {
        let (antwort, rx) = oneshot::channel();
        self.senden(BrokerBefehl::Verbunden {
            verbindung,
            antwort,
        })?;
        rx.await.map_err(|_| SignalingError::BrokerBeendet)
    }

    /// Reicht ein Client-Ereignis an den Broker weiter
    pub fn ereignis(&self, verbindung: ConnectionId, ereignis: ClientEvent) -> SignalingResult<()> {
        self.senden(BrokerBefehl::Ereignis {
            verbindung,
            ereignis,
        })
    }

    /// Meldet eine Verbindung ab
    pub fn getrennt(&self, verbindung: ConnectionId) -> SignalingResult<()> {
        self.senden(BrokerBefehl::Getrennt { verbindung })
    }

    fn senden(&self, befehl: BrokerBefehl) -> SignalingResult<()> {
        self.tx
            .send(befehl)
            .map_err(|_| SignalingError::BrokerBeendet)
    }
}

// ---------------------------------------------------------------------------
// MessageDispatcher
// ---------------------------------------------------------------------------

/// Fuehrt Broker-Befehle aus und verteilt die Ergebnisse
pub struct MessageDispatcher {
    broker: RoomBroker,
    broadcaster: EventBroadcaster,
}

impl MessageDispatcher {
    /// Erstellt einen neuen Dispatcher
    pub fn neu(broker: RoomBroker, broadcaster: EventBroadcaster) -> Self {
        Self {
            broker,
            broadcaster,
        }
    }

    /// Verarbeitet einen einzelnen Befehl vollstaendig
    pub fn dispatch(&mut self, befehl: BrokerBefehl) {
        match befehl {
            BrokerBefehl::Verbunden {
                verbindung,
                antwort,
            } => {
                let (name, anweisungen) = self.broker.verbunden(verbindung);
                self.broadcaster.anweisungen_ausfuehren(anweisungen);
                if antwort.send(name).is_err() {
                    tracing::debug!(verbindung = %verbindung, "Verbindung wartet nicht mehr auf ihren Namen");
                }
            }
            BrokerBefehl::Ereignis {
                verbindung,
                ereignis,
            } => {
                tracing::trace!(verbindung = %verbindung, ereignis = ereignis.name(), "Ereignis empfangen");
                let anweisungen = self.broker.ereignis(verbindung, ereignis);
                let gesendet = self.broadcaster.anweisungen_ausfuehren(anweisungen);
                tracing::trace!(verbindung = %verbindung, gesendet, "Ereignis verarbeitet");
            }
            BrokerBefehl::Getrennt { verbindung } => {
                // Erst hier aufraeumen, damit noch eingereihte Beitritte
                // der Verbindung keine Gruppen-Mitgliedschaft hinterlassen
                self.broadcaster.verbindung_entfernen(&verbindung);
                self.broker.getrennt(verbindung);
            }
        }
    }

    /// Startet den Dispatcher als eigenen Task
    ///
    /// Der Task endet, sobald alle `BrokerHandle`s gedroppt sind, und gibt
    /// den Broker mit seinem Endzustand zurueck.
    pub fn starten(self) -> (BrokerHandle, JoinHandle<RoomBroker>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.laufen(rx));
        (BrokerHandle { tx }, task)
    }

    async fn laufen(mut self, mut rx: mpsc::UnboundedReceiver<BrokerBefehl>) -> RoomBroker {
        tracing::debug!("Broker-Task gestartet");
        while let Some(befehl) = rx.recv().await {
            self.dispatch(befehl);
        }
        tracing::debug!("Broker-Task beendet");
        self.broker
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Der Task liest Frames, reicht sie an den Broker-Task weiter
//! und schreibt alles, was der Broadcaster fuer diese Verbindung einreiht.
//!
//! ## Ablauf
//! ```text
//! accept -> im Broadcaster registrieren -> Verbunden an Broker
//!        -> Lese-/Schreib-Schleife
//!        -> Getrennt an Broker (entfernt auch aus dem Broadcaster)
//! ```
//!
//! Die Registrierung im Broadcaster passiert vor der Anmeldung beim Broker,
//! damit die initiale Raumliste die Verbindung erreicht.

use futures_util::{SinkExt, StreamExt};
use stammtisch_core::ConnectionId;
use stammtisch_protocol::{wire::FrameCodec, ClientEvent, ServerEvent};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_util::codec::Framed;

use crate::server_state::SignalingState;

/// Verarbeitet eine einzelne TCP-Verbindung
pub struct ClientConnection {
    state: Arc<SignalingState>,
    peer_addr: SocketAddr,
    verbindung: ConnectionId,
}

impl ClientConnection {
    /// Erstellt eine neue ClientConnection mit frischer ConnectionId
    pub fn neu(state: Arc<SignalingState>, peer_addr: SocketAddr) -> Self {
        Self {
            state,
            peer_addr,
            verbindung: ConnectionId::new(),
        }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Laeuft bis der Client trennt, ein IO-Fehler auftritt oder das
    /// Shutdown-Signal eingeht.
    pub async fn verarbeiten(self, stream: TcpStream, mut shutdown_rx: watch::Receiver<bool>) {
        let peer_addr = self.peer_addr;
        let verbindung = self.verbindung;
        let codec =
            FrameCodec::<ClientEvent, ServerEvent>::with_max_size(self.state.config.max_frame_bytes);
        let mut framed = Framed::new(stream, codec);

        let mut sende_rx = self.state.broadcaster.verbindung_registrieren(verbindung);
        let name = match self.state.broker.verbunden(verbindung).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(peer = %peer_addr, fehler = %e, "Anmeldung beim Broker fehlgeschlagen");
                self.state.broadcaster.verbindung_entfernen(&verbindung);
                return;
            }
        };

        tracing::info!(
            peer = %peer_addr,
            verbindung = %verbindung,
            username = %name,
            "Neue Verbindung"
        );

        loop {
            tokio::select! {
                // Eingehendes Ereignis vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(Ok(ereignis))) => {
                            if self.state.broker.ereignis(verbindung, ereignis).is_err() {
                                tracing::warn!(verbindung = %verbindung, "Broker nicht erreichbar");
                                break;
                            }
                        }
                        Some(Ok(Err(e))) => {
                            tracing::warn!(
                                verbindung = %verbindung,
                                fehler = %e,
                                "Unlesbares Ereignis verworfen"
                            );
                        }
                        Some(Err(e)) => {
                            tracing::warn!(
                                verbindung = %verbindung,
                                fehler = %e,
                                "Frame-Lesefehler"
                            );
                            break;
                        }
                        None => {
                            tracing::info!(verbindung = %verbindung, username = %name, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehendes Ereignis aus dem Broadcaster
                Some(ausgehend) = sende_rx.recv() => {
                    if let Err(e) = framed.send(ausgehend).await {
                        tracing::warn!(
                            verbindung = %verbindung,
                            fehler = %e,
                            "Senden fehlgeschlagen"
                        );
                        break;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(verbindung = %verbindung, "Shutdown-Signal – Verbindung wird getrennt");
                        break;
                    }
                }
            }
        }

        // Der Broker-Task entfernt die Verbindung aus dem Broadcaster, in
        // Reihenfolge mit noch eingereihten Ereignissen dieser Verbindung
        if self.state.broker.getrennt(verbindung).is_err() {
            tracing::debug!(verbindung = %verbindung, "Broker bereits beendet");
            self.state.broadcaster.verbindung_entfernen(&verbindung);
        }

        tracing::debug!(peer = %peer_addr, "Verbindungs-Task beendet");
    }
}

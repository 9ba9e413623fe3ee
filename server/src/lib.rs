//! stammtisch-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;

use anyhow::{Context, Result};
use config::ServerConfig;
use stammtisch_signaling::{SignalingServer, SignalingState};
use std::net::SocketAddr;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

/// Ein gestarteter Server, der per `beenden` heruntergefahren wird
pub struct LaufenderServer {
    adresse: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    listener_task: JoinHandle<stammtisch_signaling::SignalingResult<()>>,
}

impl LaufenderServer {
    /// Tatsaechlich gebundene Adresse (wichtig bei Port 0)
    pub fn adresse(&self) -> SocketAddr {
        self.adresse
    }

    /// Sendet das Shutdown-Signal und wartet auf den Listener
    pub async fn beenden(self) -> Result<()> {
        // Fehler nur wenn alle Empfaenger schon weg sind
        let _ = self.shutdown_tx.send(true);
        self.listener_task
            .await
            .context("Listener-Task abgebrochen")??;
        Ok(())
    }
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bindet den Listener und startet Broker und Accept-Schleife im Hintergrund
    pub async fn hochfahren(&self) -> Result<LaufenderServer> {
        let bind_adresse = self.config.tcp_bind_adresse();
        let (state, _broker_task) = SignalingState::starten(self.config.signaling_config());

        let listener = SignalingServer::binden(state, bind_adresse.as_str())
            .await
            .with_context(|| format!("Bind auf {bind_adresse} fehlgeschlagen"))?;
        let adresse = listener.lokale_adresse()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let listener_task = tokio::spawn(listener.starten(shutdown_rx));

        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %adresse,
            "Server bereit"
        );

        Ok(LaufenderServer {
            adresse,
            shutdown_tx,
            listener_task,
        })
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Broker-Task starten
    /// 2. TCP-Listener binden und Accept-Schleife starten
    /// 3. Auf Ctrl-C warten
    /// 4. Shutdown an Listener und Verbindungen signalisieren
    pub async fn starten(self) -> Result<()> {
        let laufend = self.hochfahren().await?;

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        laufend.beenden().await
    }
}

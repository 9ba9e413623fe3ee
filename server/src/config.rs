//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};
use stammtisch_chat::{BrokerConfig, KEINE_RAEUME_HINWEIS};
use stammtisch_core::StammtischError;
use stammtisch_signaling::SignalingConfig;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers (nur fuer Logs)
    pub name: String,
    /// Hinweis in `update-rooms` solange kein Raum existiert
    pub keine_raeume_hinweis: String,
    /// Beim Raumwechsel die Gruppe des alten Raums verlassen
    pub alte_gruppe_verlassen: bool,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Stammtisch".into(),
            keine_raeume_hinweis: KEINE_RAEUME_HINWEIS.into(),
            alte_gruppe_verlassen: false,
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer den TCP-Listener
    pub bind_adresse: String,
    /// TCP-Port
    pub port: u16,
    /// Maximale Frame-Groesse in Bytes
    pub max_frame_bytes: usize,
    /// Groesse der Send-Queue pro Verbindung
    pub send_queue: usize,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        let signaling = SignalingConfig::default();
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 3000,
            max_frame_bytes: signaling.max_frame_bytes,
            send_queue: signaling.send_queue,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> stammtisch_core::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt).map_err(|e| {
                    StammtischError::konfiguration(format!("Fehler in '{pfad}': {e}"))
                })?;
                config.pruefen()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(StammtischError::konfiguration(format!(
                "Datei '{pfad}' nicht lesbar: {e}"
            ))),
        }
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn pruefen(&self) -> stammtisch_core::Result<()> {
        if self.netzwerk.max_frame_bytes == 0 {
            return Err(StammtischError::konfiguration(
                "netzwerk.max_frame_bytes muss groesser als 0 sein",
            ));
        }
        if self.netzwerk.send_queue == 0 {
            return Err(StammtischError::konfiguration(
                "netzwerk.send_queue muss groesser als 0 sein",
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(StammtischError::konfiguration(format!(
                "logging.format '{}' unbekannt (erlaubt: text, json)",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Gibt die vollstaendige Bind-Adresse fuer TCP zurueck
    pub fn tcp_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    /// Leitet die Transport- und Broker-Konfiguration ab
    pub fn signaling_config(&self) -> SignalingConfig {
        SignalingConfig {
            max_frame_bytes: self.netzwerk.max_frame_bytes,
            send_queue: self.netzwerk.send_queue,
            broker: BrokerConfig {
                keine_raeume_hinweis: self.server.keine_raeume_hinweis.clone(),
                alte_gruppe_verlassen: self.server.alte_gruppe_verlassen,
            },
        }
    }
}

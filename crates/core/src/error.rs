//! Fehlertypen fuer Stammtisch
//!
//! Der Broker selbst kennt keine Fehlerzustaende (ungueltige Eingaben werden
//! still verworfen). Dieser Enum deckt die Randbereiche ab: Konfiguration,
//! Netzwerk und Protokoll.

use thiserror::Error;

/// Globaler Result-Alias fuer Stammtisch
pub type Result<T> = std::result::Result<T, StammtischError>;

/// Alle moeglichen Fehler ausserhalb des Brokers
#[derive(Debug, Error)]
pub enum StammtischError {
    // --- Netzwerk ---
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    // --- Protokoll ---
    #[error("Ungueltige Nachricht: {0}")]
    UngueltigeNachricht(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),
}

impl StammtischError {
    /// Erstellt einen Konfigurationsfehler
    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }
}

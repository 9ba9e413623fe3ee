//! Fehlertypen fuer den Signaling-Service

use stammtisch_core::StammtischError;
use thiserror::Error;

/// Fehlertyp fuer den Signaling-Service
#[derive(Debug, Error)]
pub enum SignalingError {
    /// IO-Fehler (TCP, Socket)
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    /// Protokollfehler (zu grosser Frame, Serialisierung)
    #[error("Protokollfehler: {0}")]
    Protokoll(#[from] StammtischError),

    /// Der Broker-Task laeuft nicht mehr
    #[error("Broker-Task beendet")]
    BrokerBeendet,
}

/// Result-Typ fuer den Signaling-Service
pub type SignalingResult<T> = Result<T, SignalingError>;

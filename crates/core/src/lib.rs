//! stammtisch-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die vom Broker, vom
//! Protokoll und vom Transport gemeinsam genutzt werden.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, StammtischError};
pub use types::ConnectionId;

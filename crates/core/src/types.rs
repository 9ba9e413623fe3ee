//! Gemeinsame Identifikationstypen fuer Stammtisch
//!
//! Verbindungs-IDs verwenden das Newtype-Pattern, damit sie nicht mit
//! Raumnamen oder anderen Strings verwechselt werden koennen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vom Transport vergebene, opake Verbindungs-ID
///
/// Lebt genau so lange wie die TCP-Verbindung und dient nur als
/// Nachschlage-Schluessel fuer Session und Send-Queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Erstellt eine neue zufaellige ConnectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

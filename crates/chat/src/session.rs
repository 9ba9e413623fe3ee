//! Session-Tabelle – Verbindung -> {Anzeigename, aktueller Raum}
//!
//! Jede aktive Verbindung hat genau eine Session. Der Anzeigename wird beim
//! Verbinden einmal vergeben und danach nie geaendert; der Raum wird bei
//! jedem Beitritt ueberschrieben (es gibt kein Verlassen).

use stammtisch_core::ConnectionId;
use std::collections::HashMap;

/// Laufzeitzustand einer Verbindung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub verbindung: ConnectionId,
    pub anzeigename: String,
    pub raum: Option<String>,
}

/// Alle Sessions, indiziert nach ConnectionId
#[derive(Debug, Default)]
pub struct SessionTabelle {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionTabelle {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Legt die Session einer neuen Verbindung an (noch ohne Raum)
    pub fn verbinden(&mut self, verbindung: ConnectionId, anzeigename: String) {
        self.sessions.insert(
            verbindung,
            Session {
                verbindung,
                anzeigename,
                raum: None,
            },
        );
    }

    /// Setzt (oder ueberschreibt) den aktuellen Raum
    ///
    /// Gibt den vorherigen Raum zurueck. Unbekannte Verbindungen sind ein No-op.
    pub fn raum_setzen(&mut self, verbindung: &ConnectionId, raum: &str) -> Option<String> {
        let session = self.sessions.get_mut(verbindung)?;
        session.raum.replace(raum.to_owned())
    }

    /// Anzeigename einer Verbindung
    pub fn name(&self, verbindung: &ConnectionId) -> Option<&str> {
        self.sessions
            .get(verbindung)
            .map(|s| s.anzeigename.as_str())
    }

    /// Aktueller Raum einer Verbindung
    pub fn raum(&self, verbindung: &ConnectionId) -> Option<&str> {
        self.sessions.get(verbindung)?.raum.as_deref()
    }

    /// Entfernt die Session; ein zweiter Aufruf ist ein No-op
    pub fn trennen(&mut self, verbindung: &ConnectionId) -> Option<Session> {
        self.sessions.remove(verbindung)
    }

    pub fn anzahl(&self) -> usize {
        self.sessions.len()
    }
}

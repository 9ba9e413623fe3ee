//! Event-Broadcaster – Sendet Events an die richtigen Verbindungen
//!
//! Der EventBroadcaster verwaltet die Send-Queues aller verbundenen Clients
//! und die Raum-Gruppen. Er ist die Transport-Seite der `Anweisung`en, die
//! der Broker zurueckgibt.
//!
//! ## Selektives Broadcasting
//! - An alle Verbindungen: `an_alle_senden`
//! - An eine Raum-Gruppe: `an_raum_senden`
//! - An eine Verbindung: `an_verbindung_senden`
//!
//! Zustellung ist best-effort: ist eine Queue voll, wird das Ereignis fuer
//! diese Verbindung verworfen.

use dashmap::DashMap;
use stammtisch_chat::{Anweisung, Ziel};
use stammtisch_core::ConnectionId;
use stammtisch_protocol::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Standard-Groesse der Send-Queue pro Verbindung
pub const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// VerbindungsSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer Verbindung
#[derive(Clone, Debug)]
pub struct VerbindungsSender {
    pub verbindung: ConnectionId,
    pub tx: mpsc::Sender<ServerEvent>,
}

impl VerbindungsSender {
    /// Sendet ein Ereignis nicht-blockierend an die Verbindung
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, ereignis: ServerEvent) -> bool {
        match self.tx.try_send(ereignis) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(ev)) => {
                tracing::warn!(
                    verbindung = %self.verbindung,
                    ereignis = ev.name(),
                    "Send-Queue voll – Ereignis verworfen"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.verbindung, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EventBroadcaster
// ---------------------------------------------------------------------------

/// Zentraler Event-Broadcaster fuer alle Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct EventBroadcaster {
    inner: Arc<EventBroadcasterInner>,
}

struct EventBroadcasterInner {
    /// Send-Queues, indiziert nach ConnectionId
    verbindungen: DashMap<ConnectionId, VerbindungsSender>,
    /// Raum-Gruppen: raum -> abonnierte Verbindungen
    raum_gruppen: DashMap<String, Vec<ConnectionId>>,
    queue_groesse: usize,
}

impl EventBroadcaster {
    /// Erstellt einen neuen EventBroadcaster
    pub fn neu() -> Self {
        Self::mit_queue_groesse(SEND_QUEUE_GROESSE)
    }

    /// Erstellt einen EventBroadcaster mit eigener Queue-Groesse pro Verbindung
    pub fn mit_queue_groesse(queue_groesse: usize) -> Self {
        Self {
            inner: Arc::new(EventBroadcasterInner {
                verbindungen: DashMap::new(),
                raum_gruppen: DashMap::new(),
                queue_groesse: queue_groesse.max(1),
            }),
        }
    }

    /// Registriert eine neue Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und sendet via TCP.
    pub fn verbindung_registrieren(&self, verbindung: ConnectionId) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(self.inner.queue_groesse);
        self.inner
            .verbindungen
            .insert(verbindung, VerbindungsSender { verbindung, tx });
        tracing::debug!(verbindung = %verbindung, "Verbindung im Broadcaster registriert");
        rx
    }

    /// Entfernt eine Verbindung samt aller Gruppen-Mitgliedschaften
    pub fn verbindung_entfernen(&self, verbindung: &ConnectionId) {
        self.inner.verbindungen.remove(verbindung);
        self.inner.raum_gruppen.iter_mut().for_each(|mut entry| {
            entry.value_mut().retain(|id| id != verbindung);
        });
        // Leere Gruppen aufraeumen
        self.inner.raum_gruppen.retain(|_, mitglieder| !mitglieder.is_empty());
        tracing::debug!(verbindung = %verbindung, "Verbindung aus Broadcaster entfernt");
    }

    /// Nimmt eine Verbindung in die Gruppe eines Raums auf
    ///
    /// Andere Gruppen bleiben unberuehrt. Mehrfaches Beitreten ist ein No-op.
    /// Nicht (mehr) registrierte Verbindungen werden ignoriert.
    pub fn gruppe_beitreten(&self, verbindung: ConnectionId, raum: &str) {
        if !self.ist_registriert(&verbindung) {
            tracing::debug!(verbindung = %verbindung, raum = %raum, "Beitritt einer getrennten Verbindung ignoriert");
            return;
        }
        let mut mitglieder = self.inner.raum_gruppen.entry(raum.to_owned()).or_default();
        if !mitglieder.contains(&verbindung) {
            mitglieder.push(verbindung);
        }
    }

    /// Entfernt eine Verbindung aus der Gruppe eines Raums
    pub fn gruppe_verlassen(&self, verbindung: &ConnectionId, raum: &str) {
        if let Some(mut mitglieder) = self.inner.raum_gruppen.get_mut(raum) {
            mitglieder.retain(|id| id != verbindung);
        }
        self.inner
            .raum_gruppen
            .remove_if(raum, |_, mitglieder| mitglieder.is_empty());
    }

    /// Sendet ein Ereignis an eine einzelne Verbindung
    ///
    /// Gibt `true` zurueck wenn die Verbindung gefunden und das Ereignis eingereiht wurde.
    pub fn an_verbindung_senden(&self, verbindung: &ConnectionId, ereignis: ServerEvent) -> bool {
        match self.inner.verbindungen.get(verbindung) {
            Some(sender) => sender.senden(ereignis),
            None => {
                tracing::debug!(verbindung = %verbindung, "Senden an unbekannte Verbindung");
                false
            }
        }
    }

    /// Sendet ein Ereignis an alle Abonnenten eines Raums
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_raum_senden(&self, raum: &str, ereignis: ServerEvent) -> usize {
        let ids = match self.inner.raum_gruppen.get(raum) {
            Some(ids) => ids.clone(),
            None => return 0,
        };

        let mut gesendet = 0;
        for id in &ids {
            if let Some(sender) = self.inner.verbindungen.get(id) {
                if sender.senden(ereignis.clone()) {
                    gesendet += 1;
                }
            }
        }
        gesendet
    }

    /// Sendet ein Ereignis an alle verbundenen Clients
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_alle_senden(&self, ereignis: ServerEvent) -> usize {
        let mut gesendet = 0;
        self.inner.verbindungen.iter().for_each(|entry| {
            if entry.value().senden(ereignis.clone()) {
                gesendet += 1;
            }
        });
        gesendet
    }

    /// Fuehrt die Anweisungen des Brokers der Reihe nach aus
    ///
    /// Gibt die Anzahl der eingereihten Ereignisse zurueck.
    pub fn anweisungen_ausfuehren(&self, anweisungen: Vec<Anweisung>) -> usize {
        let mut gesendet = 0;
        for anweisung in anweisungen {
            match anweisung {
                Anweisung::Senden { ziel, ereignis } => {
                    gesendet += match ziel {
                        Ziel::Verbindung(id) => usize::from(self.an_verbindung_senden(&id, ereignis)),
                        Ziel::Alle => self.an_alle_senden(ereignis),
                        Ziel::Raum(raum) => self.an_raum_senden(&raum, ereignis),
                    };
                }
                Anweisung::Abonnieren { verbindung, raum } => {
                    self.gruppe_beitreten(verbindung, &raum);
                }
                Anweisung::Abbestellen { verbindung, raum } => {
                    self.gruppe_verlassen(&verbindung, &raum);
                }
            }
        }
        gesendet
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn verbindung_anzahl(&self) -> usize {
        self.inner.verbindungen.len()
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, verbindung: &ConnectionId) -> bool {
        self.inner.verbindungen.contains_key(verbindung)
    }

    /// Gibt alle Abonnenten eines Raums zurueck
    pub fn mitglieder(&self, raum: &str) -> Vec<ConnectionId> {
        self.inner
            .raum_gruppen
            .get(raum)
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

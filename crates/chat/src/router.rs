//! Event-Router – Orchestriert Sessions, Raeume und History
//!
//! Der `RoomBroker` besitzt alle Zustands-Komponenten als eigene Felder
//! (keine globalen Maps). Jeder Handler laeuft vollstaendig durch und gibt
//! eine Liste von `Anweisung`en zurueck, die der Transport ausfuehrt:
//! an wen welches Ereignis geht und wer welche Raum-Gruppe abonniert.
//!
//! ## Zustaende pro Verbindung
//! ```text
//! Verbunden (kein Raum) --join-room--> ImRaum(raum) --join-room--> ImRaum(raum')
//! ```
//!
//! Ungueltige Eingaben (fehlender Raumname, leere Nachricht) erzeugen keine
//! Anweisungen und keinen Fehler.

use stammtisch_core::ConnectionId;
use stammtisch_protocol::{ChatNachricht, ClientEvent, PostMessage, ServerEvent};

use crate::history::HistorySpeicher;
use crate::identity::Namensgeber;
use crate::registry::RaumRegister;
use crate::session::{Session, SessionTabelle};

/// Hinweis in `update-rooms` solange kein Raum existiert
pub const KEINE_RAEUME_HINWEIS: &str = "No rooms available, create one.";

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Verhalten des Brokers
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Text fuer `update-rooms` wenn die Raumliste leer ist
    pub keine_raeume_hinweis: String,
    /// Bei erneutem Beitritt die Gruppe des vorherigen Raums verlassen
    ///
    /// Standard `false`: eine Verbindung bleibt in allen bisher betretenen
    /// Raum-Gruppen und empfaengt deren neue Nachrichten weiterhin.
    pub alte_gruppe_verlassen: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            keine_raeume_hinweis: KEINE_RAEUME_HINWEIS.to_string(),
            alte_gruppe_verlassen: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Anweisungen an den Transport
// ---------------------------------------------------------------------------

/// Empfaengerkreis eines ausgehenden Ereignisses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ziel {
    /// Nur diese Verbindung
    Verbindung(ConnectionId),
    /// Alle verbundenen Clients
    Alle,
    /// Alle Abonnenten der Raum-Gruppe
    Raum(String),
}

/// Was der Transport nach einem Ereignis tun soll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anweisung {
    Senden { ziel: Ziel, ereignis: ServerEvent },
    Abonnieren { verbindung: ConnectionId, raum: String },
    Abbestellen { verbindung: ConnectionId, raum: String },
}

impl Anweisung {
    fn an(ziel: Ziel, ereignis: ServerEvent) -> Self {
        Self::Senden { ziel, ereignis }
    }
}

// ---------------------------------------------------------------------------
// RoomBroker
// ---------------------------------------------------------------------------

/// In-Memory Broker fuer Raeume, Sessions und History
#[derive(Debug)]
pub struct RoomBroker {
    config: BrokerConfig,
    namensgeber: Namensgeber,
    raeume: RaumRegister,
    sessions: SessionTabelle,
    history: HistorySpeicher,
}

impl RoomBroker {
    /// Erstellt einen leeren Broker mit zufaelliger Namensvergabe
    pub fn neu(config: BrokerConfig) -> Self {
        Self::mit_namensgeber(config, Namensgeber::neu())
    }

    /// Erstellt einen leeren Broker mit vorgegebenem Namensgeber
    pub fn mit_namensgeber(config: BrokerConfig, namensgeber: Namensgeber) -> Self {
        Self {
            config,
            namensgeber,
            raeume: RaumRegister::neu(),
            sessions: SessionTabelle::neu(),
            history: HistorySpeicher::neu(),
        }
    }

    // -----------------------------------------------------------------------
    // Handler
    // -----------------------------------------------------------------------

    /// Neue Verbindung: Namen vergeben, Session anlegen, Raumliste schicken
    ///
    /// Gibt den vergebenen Anzeigenamen fuer den Transport zurueck.
    pub fn verbunden(&mut self, verbindung: ConnectionId) -> (String, Vec<Anweisung>) {
        let name = self.namensgeber.zuteilen();
        self.sessions.verbinden(verbindung, name.clone());
        tracing::info!(verbindung = %verbindung, username = %name, "Benutzer verbunden");

        let hinweis = self
            .raeume
            .ist_leer()
            .then(|| self.config.keine_raeume_hinweis.clone());
        let raeume = self.raeume.liste();

        let anweisungen = vec![Anweisung::an(
            Ziel::Verbindung(verbindung),
            ServerEvent::update_rooms(raeume, hinweis),
        )];
        (name, anweisungen)
    }

    /// Verteilt ein eingehendes Client-Ereignis auf den passenden Handler
    pub fn ereignis(&mut self, verbindung: ConnectionId, ereignis: ClientEvent) -> Vec<Anweisung> {
        match ereignis {
            ClientEvent::JoinRoom(raum) => self.raum_beitreten(verbindung, raum),
            ClientEvent::CreateRoom(raum) => self.raum_erstellen(raum),
            ClientEvent::PostMessage(PostMessage { room, message }) => {
                self.nachricht_posten(verbindung, room, message)
            }
        }
    }

    /// `join-room`: Raum sicherstellen, Gruppe abonnieren, History schicken
    pub fn raum_beitreten(
        &mut self,
        verbindung: ConnectionId,
        raum: Option<String>,
    ) -> Vec<Anweisung> {
        let Some(raum) = raum else {
            tracing::debug!(verbindung = %verbindung, "join-room ohne Raumnamen verworfen");
            return Vec::new();
        };
        let Some(name) = self.sessions.name(&verbindung).map(str::to_owned) else {
            tracing::debug!(verbindung = %verbindung, "join-room von unbekannter Verbindung");
            return Vec::new();
        };

        self.raeume.sicherstellen(&raum);
        let vorheriger = self.sessions.raum_setzen(&verbindung, &raum);

        let mut anweisungen = Vec::with_capacity(4);
        if self.config.alte_gruppe_verlassen {
            if let Some(alt) = vorheriger.filter(|alt| *alt != raum) {
                anweisungen.push(Anweisung::Abbestellen {
                    verbindung,
                    raum: alt,
                });
            }
        }
        anweisungen.push(Anweisung::Abonnieren {
            verbindung,
            raum: raum.clone(),
        });

        let verlauf = self.history.verlauf(&raum).to_vec();
        tracing::info!(verbindung = %verbindung, username = %name, raum = %raum, "Raum betreten");

        anweisungen.push(Anweisung::an(
            Ziel::Verbindung(verbindung),
            ServerEvent::receive_messages(verlauf, Some(name), raum),
        ));
        anweisungen.push(Anweisung::an(
            Ziel::Verbindung(verbindung),
            ServerEvent::EnableChatbox,
        ));
        anweisungen
    }

    /// `create-room`: nur ein neuer Raum fuehrt zu einem Broadcast an alle
    pub fn raum_erstellen(&mut self, raum: Option<String>) -> Vec<Anweisung> {
        let Some(raum) = raum else {
            tracing::debug!("create-room ohne Raumnamen verworfen");
            return Vec::new();
        };

        if !self.raeume.sicherstellen(&raum) {
            tracing::debug!(raum = %raum, "Raum existiert bereits");
            return Vec::new();
        }

        tracing::info!(raum = %raum, "Raum erstellt");
        vec![Anweisung::an(
            Ziel::Alle,
            ServerEvent::update_rooms(self.raeume.liste(), None),
        )]
    }

    /// `post-message`: anhaengen und den ganzen Verlauf an die Raum-Gruppe senden
    ///
    /// Es wird nicht geprueft, ob der Absender den Raum betreten hat.
    pub fn nachricht_posten(
        &mut self,
        verbindung: ConnectionId,
        raum: Option<String>,
        text: Option<String>,
    ) -> Vec<Anweisung> {
        let (Some(raum), Some(text)) = (raum, text) else {
            tracing::debug!(verbindung = %verbindung, "post-message ohne Raum oder Text verworfen");
            return Vec::new();
        };
        if ist_blank(&text) {
            tracing::debug!(verbindung = %verbindung, raum = %raum, "Leere Nachricht verworfen");
            return Vec::new();
        }
        let Some(name) = self.sessions.name(&verbindung).map(str::to_owned) else {
            tracing::debug!(verbindung = %verbindung, "post-message von unbekannter Verbindung");
            return Vec::new();
        };

        let verlauf = self
            .history
            .anhaengen(&raum, ChatNachricht::neu(name, text))
            .to_vec();
        tracing::debug!(raum = %raum, laenge = verlauf.len(), "Nachricht angehaengt");

        vec![Anweisung::an(
            Ziel::Raum(raum.clone()),
            ServerEvent::receive_messages(verlauf, None, raum),
        )]
    }

    /// Verbindung getrennt: Session entfernen, nichts senden
    pub fn getrennt(&mut self, verbindung: ConnectionId) -> Option<Session> {
        let session = self.sessions.trennen(&verbindung);
        if let Some(ref s) = session {
            tracing::info!(verbindung = %verbindung, username = %s.anzeigename, "Benutzer getrennt");
        }
        session
    }

    // -----------------------------------------------------------------------
    // Lesezugriffe
    // -----------------------------------------------------------------------

    /// Registrierte Raeume in Anlege-Reihenfolge
    pub fn raeume(&self) -> Vec<String> {
        self.raeume.liste()
    }

    pub fn verlauf(&self, raum: &str) -> &[ChatNachricht] {
        self.history.verlauf(raum)
    }

    pub fn name(&self, verbindung: &ConnectionId) -> Option<&str> {
        self.sessions.name(verbindung)
    }

    pub fn aktueller_raum(&self, verbindung: &ConnectionId) -> Option<&str> {
        self.sessions.raum(verbindung)
    }

    pub fn session_anzahl(&self) -> usize {
        self.sessions.anzahl()
    }
}

/// Prueft ob ein Text nur aus Leerraum besteht
///
/// Leerraum wie bei JavaScript-`trim`: Unicode-White_Space ohne U+0085,
/// dafuer mit U+FEFF.
fn ist_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

impl Default for RoomBroker {
    fn default() -> Self {
        Self::neu(BrokerConfig::default())
    }
}

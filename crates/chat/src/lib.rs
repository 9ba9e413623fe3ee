//! stammtisch-chat – In-Memory Raum- und Session-Broker
//!
//! Dieses Crate implementiert den Kern des Relays:
//! - Namensgeber: lesbare Anzeigenamen fuer neue Verbindungen
//! - RaumRegister: bekannte Raeume (anlegen, auflisten, nie loeschen)
//! - SessionTabelle: Verbindung -> Anzeigename + aktueller Raum
//! - HistorySpeicher: Raum -> geordneter Nachrichtenverlauf
//! - RoomBroker: Event-Router, der alles zusammenfuehrt
//!
//! Der Broker kennt keinen Transport. Er gibt `Anweisung`en zurueck, die
//! der Aufrufer an die Verbindungen verteilt.
//!
//! # Beispiel
//!
//! ```
//! use stammtisch_chat::{BrokerConfig, RoomBroker};
//! use stammtisch_core::ConnectionId;
//! use stammtisch_protocol::ClientEvent;
//!
//! let mut broker = RoomBroker::neu(BrokerConfig::default());
//! let verbindung = ConnectionId::new();
//! let (_name, _anweisungen) = broker.verbunden(verbindung);
//!
//! broker.ereignis(verbindung, ClientEvent::join_room("lobby"));
//! broker.ereignis(verbindung, ClientEvent::post_message("lobby", "hallo"));
//! assert_eq!(broker.verlauf("lobby").len(), 1);
//! ```

pub mod history;
pub mod identity;
pub mod registry;
pub mod router;
pub mod session;

// Bequeme Re-Exporte
pub use history::HistorySpeicher;
pub use identity::Namensgeber;
pub use registry::RaumRegister;
pub use router::{Anweisung, BrokerConfig, RoomBroker, Ziel, KEINE_RAEUME_HINWEIS};
pub use session::{Session, SessionTabelle};

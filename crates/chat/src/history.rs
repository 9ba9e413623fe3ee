//! History-Speicher – Raum -> geordnete Nachrichtenliste
//!
//! Nur Anhaengen, nie Kuerzen. Die Einfuege-Reihenfolge ist die einzige Ordnung.

use stammtisch_protocol::ChatNachricht;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct HistorySpeicher {
    verlaeufe: HashMap<String, Vec<ChatNachricht>>,
}

impl HistorySpeicher {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Haengt eine Nachricht an und gibt den vollstaendigen Verlauf zurueck
    ///
    /// Der Verlauf des Raums wird bei der ersten Nachricht angelegt.
    pub fn anhaengen(&mut self, raum: &str, nachricht: ChatNachricht) -> &[ChatNachricht] {
        let verlauf = self.verlaeufe.entry(raum.to_owned()).or_default();
        verlauf.push(nachricht);
        verlauf
    }

    /// Verlauf eines Raums; leer wenn noch nichts gepostet wurde
    pub fn verlauf(&self, raum: &str) -> &[ChatNachricht] {
        self.verlaeufe
            .get(raum)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

//! Raum-Register – Menge der bekannten Raumnamen
//!
//! Raeume entstehen durch `create-room` oder `join-room` und werden nie
//! geloescht. Namen werden weder validiert noch normalisiert: Gross-/
//! Kleinschreibung zaehlt, Leerzeichen bleiben erhalten, der leere String
//! ist ein gueltiger Raumname.

use std::collections::HashSet;

/// Alle registrierten Raeume in Anlege-Reihenfolge
#[derive(Debug, Default, Clone)]
pub struct RaumRegister {
    reihenfolge: Vec<String>,
    namen: HashSet<String>,
}

impl RaumRegister {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Legt den Raum an falls er fehlt
    ///
    /// Gibt `true` zurueck wenn der Raum neu angelegt wurde, `false` wenn
    /// er schon existierte (No-op).
    pub fn sicherstellen(&mut self, raum: &str) -> bool {
        if self.namen.contains(raum) {
            return false;
        }
        self.namen.insert(raum.to_owned());
        self.reihenfolge.push(raum.to_owned());
        true
    }

    /// Prueft ob ein Raum registriert ist
    pub fn enthaelt(&self, raum: &str) -> bool {
        self.namen.contains(raum)
    }

    /// Alle Raumnamen in der Reihenfolge ihrer Erstellung
    pub fn liste(&self) -> Vec<String> {
        self.reihenfolge.clone()
    }

    pub fn anzahl(&self) -> usize {
        self.reihenfolge.len()
    }

    pub fn ist_leer(&self) -> bool {
        self.reihenfolge.is_empty()
    }
}

//! Namensvergabe – Lesbare Anzeigenamen fuer neue Verbindungen
//!
//! Ein Name besteht aus zwei Woertern (Adjektiv, Tier), verbunden mit `-`,
//! z.B. `brave-falcon`. Kollisionen werden nicht geprueft und sind erlaubt.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Trennzeichen zwischen den beiden Namensteilen
pub const TRENNER: &str = "-";

/// Beschreibende Woerter (erster Namensteil)
pub const ADJEKTIVE: &[&str] = &[
    "amber", "bold", "brave", "bright", "calm", "clever", "cosmic", "crimson", "curious",
    "daring", "eager", "fancy", "fearless", "gentle", "golden", "happy", "hidden", "humble",
    "jolly", "keen", "lively", "lucky", "mellow", "merry", "mighty", "nimble", "noble", "quiet",
    "rapid", "silent", "silver", "sleepy", "smooth", "swift", "tidy", "vivid", "witty", "zesty",
];

/// Tiere (zweiter Namensteil)
pub const TIERE: &[&str] = &[
    "badger", "beaver", "bison", "cobra", "condor", "coyote", "crane", "dolphin", "eagle",
    "falcon", "ferret", "gecko", "heron", "ibex", "jackal", "koala", "lemur", "lynx", "marmot",
    "moose", "narwhal", "ocelot", "otter", "owl", "panda", "pelican", "puffin", "quail",
    "raven", "salmon", "seal", "sparrow", "tapir", "tiger", "walrus", "wombat", "yak", "zebra",
];

/// Erzeugt Anzeigenamen aus den beiden festen Wortlisten
///
/// Reine Generierung ohne Seiteneffekte ausser dem Verbrauch von Zufall.
#[derive(Debug, Clone)]
pub struct Namensgeber {
    rng: StdRng,
}

impl Namensgeber {
    /// Erstellt einen Namensgeber mit Zufall aus dem Betriebssystem
    pub fn neu() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Erstellt einen deterministischen Namensgeber (fuer Tests)
    pub fn mit_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Vergibt einen neuen Anzeigenamen
    pub fn zuteilen(&mut self) -> String {
        // Beide Listen sind nicht leer, `choose` liefert also immer ein Wort
        let adjektiv = ADJEKTIVE.choose(&mut self.rng).copied().unwrap_or("anonymous");
        let tier = TIERE.choose(&mut self.rng).copied().unwrap_or("guest");
        format!("{adjektiv}{TRENNER}{tier}")
    }
}

impl Default for Namensgeber {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_hat_zwei_teile_aus_den_listen() {
        let mut geber = Namensgeber::neu();
        for _ in 0..50 {
            let name = geber.zuteilen();
            let (adjektiv, tier) = name.split_once(TRENNER).expect("Trenner fehlt");
            assert!(ADJEKTIVE.contains(&adjektiv), "unbekanntes Adjektiv: {adjektiv}");
            assert!(TIERE.contains(&tier), "unbekanntes Tier: {tier}");
        }
    }

    #[test]
    fn gleicher_seed_gleiche_namen() {
        let mut a = Namensgeber::mit_seed(7);
        let mut b = Namensgeber::mit_seed(7);
        let namen_a: Vec<_> = (0..5).map(|_| a.zuteilen()).collect();
        let namen_b: Vec<_> = (0..5).map(|_| b.zuteilen()).collect();
        assert_eq!(namen_a, namen_b);
    }

    #[test]
    fn wortlisten_ohne_trenner() {
        // Sonst waere der Name nicht eindeutig in zwei Teile zerlegbar
        assert!(ADJEKTIVE.iter().chain(TIERE).all(|w| !w.contains(TRENNER)));
    }
}

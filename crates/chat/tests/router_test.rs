//! Integration-Tests fuer den RoomBroker (Event-Router)

use stammtisch_chat::{Anweisung, BrokerConfig, Namensgeber, RoomBroker, Ziel, KEINE_RAEUME_HINWEIS};
use stammtisch_core::ConnectionId;
use stammtisch_protocol::{ChatNachricht, ClientEvent, PostMessage, ServerEvent};

fn broker() -> RoomBroker {
    RoomBroker::mit_namensgeber(BrokerConfig::default(), Namensgeber::mit_seed(42))
}

fn verbinden(broker: &mut RoomBroker) -> (ConnectionId, String) {
    let id = ConnectionId::new();
    let (name, _) = broker.verbunden(id);
    (id, name)
}

/// Alle `Senden`-Anweisungen als (Ziel, Ereignis)
fn gesendet(anweisungen: &[Anweisung]) -> Vec<(Ziel, ServerEvent)> {
    anweisungen
        .iter()
        .filter_map(|a| match a {
            Anweisung::Senden { ziel, ereignis } => Some((ziel.clone(), ereignis.clone())),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// connect
// ---------------------------------------------------------------------------

#[test]
fn verbinden_ohne_raeume_sendet_hinweis_nur_an_neue_verbindung() {
    let mut broker = broker();
    let id = ConnectionId::new();

    let (name, anweisungen) = broker.verbunden(id);

    assert!(!name.is_empty());
    assert_eq!(broker.name(&id), Some(name.as_str()));
    assert_eq!(broker.aktueller_raum(&id), None);
    assert_eq!(
        anweisungen,
        vec![Anweisung::Senden {
            ziel: Ziel::Verbindung(id),
            ereignis: ServerEvent::update_rooms(vec![], Some(KEINE_RAEUME_HINWEIS.into())),
        }]
    );
}

#[test]
fn verbinden_mit_raeumen_sendet_liste_ohne_hinweis() {
    let mut broker = broker();
    broker.raum_erstellen(Some("lobby".into()));
    broker.raum_erstellen(Some("games".into()));

    let id = ConnectionId::new();
    let (_, anweisungen) = broker.verbunden(id);

    assert_eq!(
        gesendet(&anweisungen),
        vec![(
            Ziel::Verbindung(id),
            ServerEvent::update_rooms(vec!["lobby".into(), "games".into()], None),
        )]
    );
}

#[test]
fn hinweistext_ist_konfigurierbar() {
    let config = BrokerConfig {
        keine_raeume_hinweis: "Noch leer hier.".into(),
        ..Default::default()
    };
    let mut broker = RoomBroker::mit_namensgeber(config, Namensgeber::mit_seed(1));
    let (_, anweisungen) = broker.verbunden(ConnectionId::new());

    match &gesendet(&anweisungen)[0].1 {
        ServerEvent::UpdateRooms(u) => assert_eq!(u.message.as_deref(), Some("Noch leer hier.")),
        andere => panic!("Erwartet update-rooms, erhalten {andere:?}"),
    }
}

// ---------------------------------------------------------------------------
// create-room
// ---------------------------------------------------------------------------

#[test]
fn neuer_raum_wird_an_alle_gesendet() {
    let mut broker = broker();
    let anweisungen = broker.raum_erstellen(Some("lobby".into()));

    assert_eq!(
        anweisungen,
        vec![Anweisung::Senden {
            ziel: Ziel::Alle,
            ereignis: ServerEvent::update_rooms(vec!["lobby".into()], None),
        }]
    );
}

#[test]
fn bestehender_raum_erzeugt_keinen_broadcast() {
    let mut broker = broker();
    broker.raum_erstellen(Some("lobby".into()));

    assert!(broker.raum_erstellen(Some("lobby".into())).is_empty());
    assert_eq!(broker.raeume(), vec!["lobby"]);
}

#[test]
fn raum_ohne_namen_wird_verworfen() {
    let mut broker = broker();
    assert!(broker.ereignis(ConnectionId::new(), ClientEvent::CreateRoom(None)).is_empty());
    assert!(broker.raeume().is_empty());
}

#[test]
fn leerer_raumname_ist_gueltig() {
    let mut broker = broker();
    assert_eq!(broker.raum_erstellen(Some(String::new())).len(), 1);
    assert_eq!(broker.raeume(), vec![""]);
}

// ---------------------------------------------------------------------------
// join-room
// ---------------------------------------------------------------------------

#[test]
fn beitreten_legt_raum_an_und_sendet_history_identitaet_und_chatbox() {
    let mut broker = broker();
    let (id, name) = verbinden(&mut broker);

    let anweisungen = broker.raum_beitreten(id, Some("X".into()));

    assert_eq!(broker.raeume(), vec!["X"]);
    assert_eq!(broker.aktueller_raum(&id), Some("X"));
    assert_eq!(
        anweisungen,
        vec![
            Anweisung::Abonnieren {
                verbindung: id,
                raum: "X".into(),
            },
            Anweisung::Senden {
                ziel: Ziel::Verbindung(id),
                ereignis: ServerEvent::receive_messages(vec![], Some(name), "X"),
            },
            Anweisung::Senden {
                ziel: Ziel::Verbindung(id),
                ereignis: ServerEvent::EnableChatbox,
            },
        ]
    );
}

#[test]
fn beitreten_zu_neuem_raum_sendet_keine_raumliste() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);

    let anweisungen = broker.raum_beitreten(id, Some("heimlich".into()));
    assert!(gesendet(&anweisungen)
        .iter()
        .all(|(ziel, _)| *ziel == Ziel::Verbindung(id)));
}

#[test]
fn doppelter_beitritt_liefert_identische_history() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("X".into()));
    broker.nachricht_posten(id, Some("X".into()), Some("eins".into()));

    let erstes = gesendet(&broker.raum_beitreten(id, Some("X".into())));
    let zweites = gesendet(&broker.raum_beitreten(id, Some("X".into())));

    assert_eq!(erstes, zweites);
    match &erstes[0].1 {
        ServerEvent::ReceiveMessages(r) => {
            assert_eq!(r.chat_history, broker.verlauf("X"));
            assert_eq!(r.chat_history.len(), 1);
        }
        andere => panic!("Erwartet receive-messages, erhalten {andere:?}"),
    }
}

#[test]
fn wechsel_behaelt_alte_gruppe_standardmaessig() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("a".into()));

    let anweisungen = broker.raum_beitreten(id, Some("b".into()));

    assert!(!anweisungen
        .iter()
        .any(|a| matches!(a, Anweisung::Abbestellen { .. })));
    assert_eq!(broker.aktueller_raum(&id), Some("b"));
}

#[test]
fn wechsel_verlaesst_alte_gruppe_wenn_konfiguriert() {
    let config = BrokerConfig {
        alte_gruppe_verlassen: true,
        ..Default::default()
    };
    let mut broker = RoomBroker::mit_namensgeber(config, Namensgeber::mit_seed(3));
    let (id, _) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("a".into()));

    let anweisungen = broker.raum_beitreten(id, Some("b".into()));
    assert_eq!(
        anweisungen[0],
        Anweisung::Abbestellen {
            verbindung: id,
            raum: "a".into(),
        }
    );

    // Erneuter Beitritt in denselben Raum verlaesst nichts
    let gleich = broker.raum_beitreten(id, Some("b".into()));
    assert!(!gleich
        .iter()
        .any(|a| matches!(a, Anweisung::Abbestellen { .. })));
}

#[test]
fn beitreten_ohne_raumnamen_wird_verworfen() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);

    assert!(broker.ereignis(id, ClientEvent::JoinRoom(None)).is_empty());
    assert_eq!(broker.aktueller_raum(&id), None);
}

// ---------------------------------------------------------------------------
// post-message
// ---------------------------------------------------------------------------

#[test]
fn history_zaehlt_jede_gueltige_nachricht_in_reihenfolge() {
    let mut broker = broker();
    let (id, name) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("R".into()));

    let texte = ["eins", "  zwei  ", "drei"];
    for text in texte {
        broker.nachricht_posten(id, Some("R".into()), Some(text.into()));
    }

    let erwartet: Vec<_> = texte.iter().map(|t| ChatNachricht::neu(&name, *t)).collect();
    assert_eq!(broker.verlauf("R"), erwartet.as_slice());
}

#[test]
fn leere_oder_blanke_nachricht_aendert_nichts() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("R".into()));

    for text in ["", "   ", "\n\t "] {
        let anweisungen = broker.nachricht_posten(id, Some("R".into()), Some(text.into()));
        assert!(anweisungen.is_empty(), "Text {text:?} darf nichts ausloesen");
    }
    assert!(broker
        .ereignis(
            id,
            ClientEvent::PostMessage(PostMessage {
                room: Some("R".into()),
                message: None,
            })
        )
        .is_empty());
    assert!(broker.verlauf("R").is_empty());
}

#[test]
fn byte_order_mark_gilt_als_leer_nel_nicht() {
    let mut broker = broker();
    let (id, name) = verbinden(&mut broker);

    let bom = broker.nachricht_posten(id, Some("R".into()), Some(" \u{FEFF} ".into()));
    assert!(bom.is_empty());

    let nel = broker.nachricht_posten(id, Some("R".into()), Some("\u{0085}".into()));
    assert_eq!(nel.len(), 1);
    assert_eq!(broker.verlauf("R"), &[ChatNachricht::neu(name, "\u{0085}")]);
}

#[test]
fn nachricht_geht_als_ganzer_verlauf_an_die_raum_gruppe() {
    let mut broker = broker();
    let (id, name) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("lobby".into()));

    let anweisungen = broker.ereignis(id, ClientEvent::post_message("lobby", "hi"));

    assert_eq!(
        anweisungen,
        vec![Anweisung::Senden {
            ziel: Ziel::Raum("lobby".into()),
            ereignis: ServerEvent::receive_messages(
                vec![ChatNachricht::neu(name, "hi")],
                None,
                "lobby",
            ),
        }]
    );
}

#[test]
fn posten_ohne_beitritt_wird_trotzdem_angehaengt() {
    let mut broker = broker();
    let (c2, name) = verbinden(&mut broker);
    broker.raum_beitreten(c2, Some("lobby".into()));

    let anweisungen = broker.nachricht_posten(c2, Some("fremd".into()), Some("hallo?".into()));

    assert_eq!(anweisungen.len(), 1);
    assert_eq!(broker.verlauf("fremd"), &[ChatNachricht::neu(name, "hallo?")]);
    // Nur die History entsteht, der Raum wird nicht registriert
    assert_eq!(broker.raeume(), vec!["lobby"]);
}

#[test]
fn nachricht_nach_trennung_wird_verworfen() {
    let mut broker = broker();
    let (id, _) = verbinden(&mut broker);
    broker.getrennt(id);

    assert!(broker
        .nachricht_posten(id, Some("R".into()), Some("zu spaet".into()))
        .is_empty());
    assert!(broker.verlauf("R").is_empty());
}

// ---------------------------------------------------------------------------
// disconnect
// ---------------------------------------------------------------------------

#[test]
fn trennen_entfernt_session_und_ist_idempotent() {
    let mut broker = broker();
    let (id, name) = verbinden(&mut broker);
    broker.raum_beitreten(id, Some("lobby".into()));
    broker.nachricht_posten(id, Some("lobby".into()), Some("tschuess".into()));

    let session = broker.getrennt(id).expect("Session muss existieren");
    assert_eq!(session.anzeigename, name);
    assert_eq!(session.raum.as_deref(), Some("lobby"));
    assert!(broker.getrennt(id).is_none());
    assert_eq!(broker.session_anzahl(), 0);

    // Raum und History bleiben erhalten
    assert_eq!(broker.raeume(), vec!["lobby"]);
    assert_eq!(broker.verlauf("lobby").len(), 1);
}

// ---------------------------------------------------------------------------
// Szenario
// ---------------------------------------------------------------------------

#[test]
fn szenario_lobby() {
    let mut broker = broker();
    let c1 = ConnectionId::new();

    let (name, anweisungen) = broker.verbunden(c1);
    assert_eq!(
        gesendet(&anweisungen)[0].1,
        ServerEvent::update_rooms(vec![], Some(KEINE_RAEUME_HINWEIS.into()))
    );

    let anweisungen = broker.ereignis(c1, ClientEvent::create_room("lobby"));
    assert_eq!(
        gesendet(&anweisungen),
        vec![(Ziel::Alle, ServerEvent::update_rooms(vec!["lobby".into()], None))]
    );

    let anweisungen = broker.ereignis(c1, ClientEvent::join_room("lobby"));
    assert_eq!(
        gesendet(&anweisungen),
        vec![
            (
                Ziel::Verbindung(c1),
                ServerEvent::receive_messages(vec![], Some(name.clone()), "lobby"),
            ),
            (Ziel::Verbindung(c1), ServerEvent::EnableChatbox),
        ]
    );

    let anweisungen = broker.ereignis(c1, ClientEvent::post_message("lobby", "hi"));
    assert_eq!(
        gesendet(&anweisungen),
        vec![(
            Ziel::Raum("lobby".into()),
            ServerEvent::receive_messages(vec![ChatNachricht::neu(name, "hi")], None, "lobby"),
        )]
    );
}

#[test]
fn unabhaengige_broker_teilen_keinen_zustand() {
    let mut a = broker();
    let b = broker();
    a.raum_erstellen(Some("nur-in-a".into()));

    assert_eq!(a.raeume(), vec!["nur-in-a"]);
    assert!(b.raeume().is_empty());
}

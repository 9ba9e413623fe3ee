//! Benannte Ereignisse zwischen Client und Relay
//!
//! Jede Nachricht ist ein JSON-Umschlag `{"event": "<name>", "data": <payload>}`.
//! Ereignisse ohne Payload (z.B. `enable-chatbox`) lassen `data` weg.
//!
//! ## Design
//! - Eingehend (`ClientEvent`): `join-room`, `create-room`, `post-message`
//! - Ausgehend (`ServerEvent`): `update-rooms`, `receive-messages`, `enable-chatbox`
//! - Raumnamen sind beliebige Strings; `null` wird als fehlender Name
//!   durchgereicht und vom Broker still verworfen

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Chat-Nachricht
// ---------------------------------------------------------------------------

/// Eine gepostete Nachricht, wie sie in der Raum-History liegt
///
/// Unveraenderlich nach dem Anlegen. Es gibt keine Zeitstempel: die
/// Reihenfolge in der History ist die einzige Ordnung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatNachricht {
    /// Anzeigename des Autors
    pub username: String,
    /// Text wie gesendet (nicht getrimmt)
    pub message: String,
}

impl ChatNachricht {
    pub fn neu(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Eingehende Ereignisse (Client -> Relay)
// ---------------------------------------------------------------------------

/// Payload von `post-message`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessage {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Alle Ereignisse die ein Client senden darf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Raum betreten (wird bei Bedarf angelegt)
    JoinRoom(Option<String>),
    /// Raum anlegen
    CreateRoom(Option<String>),
    /// Nachricht in einen Raum posten
    PostMessage(PostMessage),
}

impl ClientEvent {
    /// Name des Ereignisses auf dem Draht (fuer Logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join-room",
            Self::CreateRoom(_) => "create-room",
            Self::PostMessage(_) => "post-message",
        }
    }

    pub fn join_room(raum: impl Into<String>) -> Self {
        Self::JoinRoom(Some(raum.into()))
    }

    pub fn create_room(raum: impl Into<String>) -> Self {
        Self::CreateRoom(Some(raum.into()))
    }

    pub fn post_message(raum: impl Into<String>, text: impl Into<String>) -> Self {
        Self::PostMessage(PostMessage {
            room: Some(raum.into()),
            message: Some(text.into()),
        })
    }
}

// ---------------------------------------------------------------------------
// Ausgehende Ereignisse (Relay -> Client)
// ---------------------------------------------------------------------------

/// Payload von `update-rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRooms {
    pub rooms: Vec<String>,
    /// Hinweistext, nur gesetzt wenn noch kein Raum existiert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload von `receive-messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveMessages {
    /// Vollstaendige History des Raums (kein Diff)
    #[serde(rename = "chatHistory")]
    pub chat_history: Vec<ChatNachricht>,
    /// Eigener Anzeigename, nur beim Beitritt gesetzt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub room: String,
}

/// Alle Ereignisse die das Relay an Clients sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    UpdateRooms(UpdateRooms),
    ReceiveMessages(ReceiveMessages),
    /// Der Client darf ab jetzt Nachrichten senden
    EnableChatbox,
}

impl ServerEvent {
    /// Name des Ereignisses auf dem Draht (fuer Logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateRooms(_) => "update-rooms",
            Self::ReceiveMessages(_) => "receive-messages",
            Self::EnableChatbox => "enable-chatbox",
        }
    }

    /// Erstellt ein `update-rooms`-Ereignis
    pub fn update_rooms(rooms: Vec<String>, message: Option<String>) -> Self {
        Self::UpdateRooms(UpdateRooms { rooms, message })
    }

    /// Erstellt ein `receive-messages`-Ereignis
    pub fn receive_messages(
        chat_history: Vec<ChatNachricht>,
        username: Option<String>,
        room: impl Into<String>,
    ) -> Self {
        Self::ReceiveMessages(ReceiveMessages {
            chat_history,
            username,
            room: room.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_room_wire_format() {
        let ev: ClientEvent =
            serde_json::from_value(json!({"event": "join-room", "data": "lobby"})).unwrap();
        assert_eq!(ev, ClientEvent::join_room("lobby"));
    }

    #[test]
    fn join_room_mit_null_ergibt_fehlenden_namen() {
        let ev: ClientEvent =
            serde_json::from_value(json!({"event": "join-room", "data": null})).unwrap();
        assert_eq!(ev, ClientEvent::JoinRoom(None));
    }

    #[test]
    fn post_message_fehlende_felder_sind_none() {
        let ev: ClientEvent =
            serde_json::from_value(json!({"event": "post-message", "data": {"room": "a"}}))
                .unwrap();
        match ev {
            ClientEvent::PostMessage(p) => {
                assert_eq!(p.room.as_deref(), Some("a"));
                assert!(p.message.is_none());
            }
            andere => panic!("Erwartet post-message, erhalten {andere:?}"),
        }
    }

    #[test]
    fn unbekanntes_ereignis_wird_abgelehnt() {
        let res = serde_json::from_value::<ClientEvent>(json!({"event": "delete-room", "data": "x"}));
        assert!(res.is_err());
    }

    #[test]
    fn update_rooms_ohne_hinweis_laesst_message_weg() {
        let ev = ServerEvent::update_rooms(vec!["lobby".into()], None);
        let wert = serde_json::to_value(&ev).unwrap();
        assert_eq!(wert, json!({"event": "update-rooms", "data": {"rooms": ["lobby"]}}));
    }

    #[test]
    fn receive_messages_verwendet_chat_history_feldname() {
        let ev = ServerEvent::receive_messages(
            vec![ChatNachricht::neu("brave-falcon", "hi")],
            Some("brave-falcon".into()),
            "lobby",
        );
        let wert = serde_json::to_value(&ev).unwrap();
        assert_eq!(
            wert,
            json!({
                "event": "receive-messages",
                "data": {
                    "chatHistory": [{"username": "brave-falcon", "message": "hi"}],
                    "username": "brave-falcon",
                    "room": "lobby"
                }
            })
        );
    }

    #[test]
    fn enable_chatbox_hat_kein_data_feld() {
        let wert = serde_json::to_value(ServerEvent::EnableChatbox).unwrap();
        assert_eq!(wert, json!({"event": "enable-chatbox"}));
        let zurueck: ServerEvent = serde_json::from_value(wert).unwrap();
        assert_eq!(zurueck, ServerEvent::EnableChatbox);
    }
}

//! Wire-Format fuer TCP-Verbindungen
//!
//! Frame-basiertes Protokoll: Length(u32 big-endian) + JSON-Payload.
//!
//! ## Frame-Format
//!
//! ```text
//! +--------+--------+--------+--------+----...----+
//! | Laenge (u32 BE) | 4 Bytes        | Payload    |
//! +--------+--------+--------+--------+----...----+
//! ```
//!
//! Die Laenge gibt die Anzahl der Payload-Bytes an (ohne die 4 Laengen-Bytes).
//! Maximale Frame-Groesse ist konfigurierbar (Standard: 1 MB).
//!
//! Ein zu grosser Frame ist ein Verbindungsfehler. Ein vollstaendiger Frame
//! mit unlesbarem JSON dagegen wird als `Err` im Item gemeldet, damit der
//! Aufrufer ihn verwerfen kann ohne die Verbindung zu verlieren.

use bytes::{Buf, BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};
use stammtisch_core::StammtischError;
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Standard-maximale Frame-Groesse (1 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Groesse des Laengen-Felds in Bytes
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Ergebnis der JSON-Dekodierung eines vollstaendigen Frames
pub type Dekodiert<T> = Result<T, serde_json::Error>;

// ---------------------------------------------------------------------------
// FrameCodec
// ---------------------------------------------------------------------------

/// tokio-util Codec fuer frame-basierte TCP-Verbindungen
///
/// `Rein` ist der Typ der gelesenen Frames, `Raus` der Typ der geschriebenen.
/// Das Relay verwendet `FrameCodec<ClientEvent, ServerEvent>`, ein Client
/// (oder Test) die umgekehrte Richtung.
///
/// # Beispiel
///
/// ```rust,no_run
/// use tokio_util::codec::Framed;
/// use stammtisch_protocol::{ClientEvent, ServerEvent, wire::FrameCodec};
///
/// // let stream = TcpStream::connect(...).await?;
/// // let framed = Framed::new(stream, FrameCodec::<ServerEvent, ClientEvent>::new());
/// ```
#[derive(Debug)]
pub struct FrameCodec<Rein, Raus> {
    /// Maximale erlaubte Frame-Groesse in Bytes
    max_frame_size: usize,
    _typen: PhantomData<fn(Raus) -> Rein>,
}

impl<Rein, Raus> FrameCodec<Rein, Raus> {
    /// Erstellt einen neuen `FrameCodec` mit Standard-Limits
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Erstellt einen `FrameCodec` mit benutzerdefinierter maximaler Frame-Groesse
    pub fn with_max_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            _typen: PhantomData,
        }
    }

    /// Gibt die konfigurierte maximale Frame-Groesse zurueck
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl<Rein, Raus> Default for FrameCodec<Rein, Raus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Rein, Raus> Clone for FrameCodec<Rein, Raus> {
    fn clone(&self) -> Self {
        Self::with_max_size(self.max_frame_size)
    }
}

// ---------------------------------------------------------------------------
// Decoder-Implementierung
// ---------------------------------------------------------------------------

impl<Rein, Raus> Decoder for FrameCodec<Rein, Raus>
where
    Rein: DeserializeOwned,
{
    type Item = Dekodiert<Rein>;
    type Error = StammtischError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Warte auf mindestens 4 Bytes fuer das Laengen-Feld
        if src.len() < LENGTH_FIELD_SIZE {
            return Ok(None);
        }

        // Laenge lesen ohne den Buffer zu veraendern
        let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;

        if length > self.max_frame_size {
            return Err(StammtischError::UngueltigeNachricht(format!(
                "Frame zu gross: {} Bytes (Maximum: {} Bytes)",
                length, self.max_frame_size
            )));
        }

        let total_size = LENGTH_FIELD_SIZE + length;
        if src.len() < total_size {
            src.reserve(total_size - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_FIELD_SIZE);
        let payload = src.split_to(length);

        Ok(Some(serde_json::from_slice(&payload)))
    }
}

// ---------------------------------------------------------------------------
// Encoder-Implementierung
// ---------------------------------------------------------------------------

impl<Rein, Raus> Encoder<Raus> for FrameCodec<Rein, Raus>
where
    Raus: Serialize,
{
    type Error = StammtischError;

    fn encode(&mut self, item: Raus, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item).map_err(|e| {
            StammtischError::UngueltigeNachricht(format!(
                "JSON-Serialisierung fehlgeschlagen: {e}"
            ))
        })?;

        if json.len() > self.max_frame_size {
            return Err(StammtischError::UngueltigeNachricht(format!(
                "Nachricht zu gross: {} Bytes (Maximum: {} Bytes)",
                json.len(),
                self.max_frame_size
            )));
        }

        // Laengen-Feld + Payload schreiben
        dst.reserve(LENGTH_FIELD_SIZE + json.len());
        dst.put_u32(json.len() as u32);
        dst.put_slice(&json);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

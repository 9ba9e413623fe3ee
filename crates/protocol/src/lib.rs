//! stammtisch-protocol – Netzwerkprotokoll-Definitionen
//!
//! Dieses Crate definiert die benannten Ereignisse, die zwischen Client und
//! Relay ausgetauscht werden, sowie das frame-basierte Wire-Format.

pub mod events;
pub mod wire;

pub use events::{ChatNachricht, ClientEvent, PostMessage, ReceiveMessages, ServerEvent, UpdateRooms};
pub use wire::FrameCodec;

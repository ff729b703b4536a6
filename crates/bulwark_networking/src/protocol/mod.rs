//! # Network Protocol
//!
//! Fixed-layout binary messages with a one-byte kind prefix.
//!
//! ## Frame Structure
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ Kind (1) │ Payload (fixed size per kind, little-endian) │
//! └──────────┴──────────────────────────────────────────────┘
//!
//! [0] ConnectRequest     : <empty>                                   0 bytes
//! [1] ConnectResponse    : i32 player, u8 self, u8 connecting        6 bytes
//! [2] PlayerIdAssignment : i32 player                                4 bytes
//! [3] ProjectileCreate   : i32 slot, i32 owner, f32x3 pos, f32x3 vel 32 bytes
//! [4] ProjectileDestroy  : i32 slot                                  4 bytes
//! ```
//!
//! ## Design Philosophy
//!
//! - Tagging and payload encoding are separate steps. The tag is the only
//!   thing framing ever looks at.
//! - Every field is written explicitly, so the layout never depends on how
//!   the compiler lays out a struct.
//! - Decoding checks the exact payload length against the catalog before
//!   reading a single field.

mod error;
mod messages;
mod serialization;

pub use error::ProtocolError;
pub use messages::{
    ConnectRequest, ConnectResponse, Message, MessageType, Payload, PlayerIdAssignment,
    ProjectileCreate, ProjectileDestroy,
};
pub use serialization::{
    decode, decode_message, encode, tag, untag, PayloadReader, PayloadWriter,
};

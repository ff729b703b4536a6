//! # BULWARK Networking
//!
//! Everything that turns game events into bytes and back.
//!
//! ## Architecture
//!
//! - **Protocol**: five fixed-layout messages behind a one-byte kind tag
//! - **Client**: the connection handshake and the receive-side dispatcher
//! - **Server**: the relay lobby that hands out player indices and fans
//!   projectile events out to the other peers
//! - **Transport**: the seam where bytes leave the process
//!
//! ## Frame Flow
//!
//! ```text
//! CLIENT A                    SERVER                     CLIENT B
//!   |--- [0] ConnectRequest --->|                           |
//!   |<-- [2] PlayerId ----------|                           |
//!   |<-- [1] ConnectResponse ---|--- [1] ConnectResponse -->|
//!   |                           |                           |
//!   |--- [3] ProjectileCreate ->|--- [3] ProjectileCreate ->|
//!   |--- [4] ProjectileDestroy >|--- [4] ProjectileDestroy >|
//! ```
//!
//! Frames are immutable once built. The server relays projectile frames
//! byte-for-byte; it never re-encodes them.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod client;
pub mod protocol;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use client::{ClientState, GameClient, Inbound, SessionStats};
pub use protocol::{
    decode, decode_message, encode, tag, untag, ConnectRequest, ConnectResponse, Message,
    MessageType, Payload, PlayerIdAssignment, ProjectileCreate, ProjectileDestroy, ProtocolError,
};
pub use server::{PeerId, RelayServer, ServerCommand, ServerConfig, ServerStats};
pub use transport::{ChannelTransport, Transport, TransportError, TransportStats};

/// Largest frame the protocol can produce (`ProjectileCreate` plus its tag).
pub const MAX_FRAME_SIZE: usize = 1 + ProjectileCreate::SIZE;

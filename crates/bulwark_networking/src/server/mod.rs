//! # Relay Server
//!
//! Hands out player indices and relays projectile traffic between peers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   handle_frame(peer, bytes)   ┌────────────────────┐
//! │ Network I/O  │ ─────────────────────────────►│    RelayServer     │
//! │              │                               │  ┌──────────────┐  │
//! │              │   ServerCommand::Send          │  │ Lobby seats  │  │
//! │              │ ◄─────────────────────────────│  └──────────────┘  │
//! └──────────────┘      (crossbeam, bounded)      └────────────────────┘
//! ```
//!
//! The server holds no projectile state. Projectile frames are forwarded
//! byte-for-byte to every other joined peer.

mod lobby;

pub use lobby::PeerId;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::protocol::{ConnectResponse, Message, PlayerIdAssignment};
use bulwark_shared::MAX_PLAYERS;
use lobby::Lobby;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Number of player seats.
    pub max_players: usize,
    /// Capacity of the outgoing command queue.
    pub command_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            command_capacity: 1024,
        }
    }
}

/// Command to the I/O layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerCommand {
    /// Send a frame to one peer.
    Send {
        /// Target peer.
        peer: PeerId,
        /// Tagged frame.
        frame: Vec<u8>,
    },
}

/// Server counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerStats {
    /// Projectile frames forwarded, counted once per recipient.
    pub frames_relayed: u64,
    /// Frames dropped: undecodable, unexpected, or from unjoined peers.
    pub frames_dropped: u64,
    /// Connect requests refused because the lobby was full.
    pub joins_rejected: u64,
    /// Commands lost because the command queue was full or closed.
    pub send_failures: u64,
}

/// The relay server.
pub struct RelayServer {
    /// Seat table.
    lobby: Lobby,
    /// Channel for sending commands to the I/O layer.
    command_tx: Sender<ServerCommand>,
    /// Counters.
    stats: ServerStats,
}

impl RelayServer {
    /// Creates a server and the receiving end of its command queue.
    #[must_use]
    pub fn new(config: &ServerConfig) -> (Self, Receiver<ServerCommand>) {
        let (command_tx, command_rx) = bounded(config.command_capacity);
        let server = Self {
            lobby: Lobby::new(config.max_players),
            command_tx,
            stats: ServerStats::default(),
        };
        (server, command_rx)
    }

    /// Returns the player index assigned to `peer`.
    #[inline]
    #[must_use]
    pub fn player_index_of(&self, peer: PeerId) -> Option<i32> {
        self.lobby.seat_of(peer)
    }

    /// Returns the number of joined players.
    #[inline]
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.lobby.len()
    }

    /// Returns counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &ServerStats {
        &self.stats
    }

    /// Handles one frame received from `peer`.
    pub fn handle_frame(&mut self, peer: PeerId, frame: &[u8]) {
        let message = match Message::from_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                self.stats.frames_dropped += 1;
                tracing::warn!(%peer, error = %e, "protocol desync, dropping frame");
                return;
            }
        };

        match message {
            Message::ConnectRequest(_) => self.handle_connect(peer),
            Message::ProjectileCreate(_) | Message::ProjectileDestroy(_) => {
                self.relay(peer, frame);
            }
            Message::ConnectResponse(_) | Message::PlayerIdAssignment(_) => {
                self.stats.frames_dropped += 1;
                tracing::warn!(%peer, kind = ?message.kind(), "unexpected message from client");
            }
        }
    }

    /// Frees the seat held by `peer` and tells everyone else.
    pub fn disconnect(&mut self, peer: PeerId) {
        let Some(index) = self.lobby.leave(peer) else {
            return;
        };
        tracing::info!("Player {} left ({})", index, peer);

        let leave = Message::from(ConnectResponse {
            player_index: index,
            is_self: false,
            connecting: false,
        })
        .to_frame();
        let remaining: Vec<PeerId> = self.lobby.occupied().map(|(_, p)| p).collect();
        for other in remaining {
            self.send(other, leave.clone());
        }
    }

    fn handle_connect(&mut self, peer: PeerId) {
        if let Some(index) = self.lobby.seat_of(peer) {
            // Lost assignment, send it again
            tracing::debug!(%peer, index, "repeated connect request");
            self.send(peer, Message::from(PlayerIdAssignment { player_index: index }).to_frame());
            return;
        }

        let Some(index) = self.lobby.join(peer) else {
            self.stats.joins_rejected += 1;
            tracing::warn!(%peer, "lobby full, ignoring connect request");
            return;
        };
        tracing::info!("Player {} joined ({})", index, peer);

        self.send(peer, Message::from(PlayerIdAssignment { player_index: index }).to_frame());
        self.send(
            peer,
            Message::from(ConnectResponse {
                player_index: index,
                is_self: true,
                connecting: true,
            })
            .to_frame(),
        );

        let joined = Message::from(ConnectResponse {
            player_index: index,
            is_self: false,
            connecting: true,
        })
        .to_frame();
        let others: Vec<(i32, PeerId)> = self
            .lobby
            .occupied()
            .filter(|(_, other)| *other != peer)
            .collect();
        for (other_index, other) in others {
            self.send(other, joined.clone());
            self.send(
                peer,
                Message::from(ConnectResponse {
                    player_index: other_index,
                    is_self: false,
                    connecting: true,
                })
                .to_frame(),
            );
        }
    }

    fn relay(&mut self, from: PeerId, frame: &[u8]) {
        if self.lobby.seat_of(from).is_none() {
            self.stats.frames_dropped += 1;
            tracing::debug!(peer = %from, "projectile frame from unjoined peer");
            return;
        }
        let targets: Vec<PeerId> = self
            .lobby
            .occupied()
            .map(|(_, p)| p)
            .filter(|p| *p != from)
            .collect();
        for target in targets {
            if self.send(target, frame.to_vec()) {
                self.stats.frames_relayed += 1;
            }
        }
    }

    fn send(&mut self, peer: PeerId, frame: Vec<u8>) -> bool {
        match self.command_tx.try_send(ServerCommand::Send { peer, frame }) {
            Ok(()) => true,
            Err(e) => {
                self.stats.send_failures += 1;
                let reason = match e {
                    TrySendError::Full(_) => "full",
                    TrySendError::Disconnected(_) => "closed",
                };
                tracing::warn!(%peer, reason, "command queue rejected frame");
                false
            }
        }
    }
}

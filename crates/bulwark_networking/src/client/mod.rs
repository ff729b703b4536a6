//! # Client Session
//!
//! The client end of the handshake and the receive-side dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! bytes from transport
//!        │
//!        ▼
//!   handle_frame ──► untag + decode ──✗──► warn, count, drop
//!        │
//!        ├─ ConnectResponse / PlayerIdAssignment ──► session state
//!        │
//!        └─ ProjectileCreate / ProjectileDestroy ──► Inbound (to gameplay)
//! ```
//!
//! The session owns no projectiles. It only tells the gameplay layer what
//! arrived.

use std::collections::BTreeSet;

use crate::protocol::{
    ConnectRequest, ConnectResponse, Message, PlayerIdAssignment, ProjectileCreate,
    ProjectileDestroy,
};

/// Client state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Connect request sent, no assignment yet.
    Connecting,
    /// Player index assigned.
    Connected,
}

/// Projectile events the session hands to the gameplay layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inbound {
    /// A remote player fired.
    ProjectileCreate(ProjectileCreate),
    /// A remote projectile is gone.
    ProjectileDestroy(ProjectileDestroy),
}

/// Receive-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames that decoded cleanly.
    pub frames_handled: u64,
    /// Frames dropped because they failed to untag or decode.
    pub dropped: u64,
    /// Well-formed frames of a kind a client never expects.
    pub unexpected: u64,
}

/// Client connection session.
#[derive(Debug, Default)]
pub struct GameClient {
    /// Current state.
    state: ClientState,
    /// Index assigned by the server.
    player_index: Option<i32>,
    /// Every player index currently known to be connected, ours included.
    roster: BTreeSet<i32>,
    /// Receive counters.
    stats: SessionStats,
}

impl GameClient {
    /// Creates a disconnected session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current client state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ClientState {
        self.state
    }

    /// Returns the assigned player index.
    #[inline]
    #[must_use]
    pub const fn player_index(&self) -> Option<i32> {
        self.player_index
    }

    /// Returns connected player indices in ascending order.
    pub fn roster(&self) -> impl Iterator<Item = i32> + '_ {
        self.roster.iter().copied()
    }

    /// Returns receive counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Builds the connect request frame and moves to `Connecting`.
    #[must_use]
    pub fn create_connect_frame(&mut self) -> Vec<u8> {
        self.state = ClientState::Connecting;
        Message::from(ConnectRequest).to_frame()
    }

    /// Handles one received frame.
    ///
    /// Handshake messages update the session and return `None`. Projectile
    /// messages are returned for the gameplay layer. Malformed frames are
    /// logged as a protocol desync and dropped.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Option<Inbound> {
        match Message::from_frame(frame) {
            Ok(message) => {
                self.stats.frames_handled += 1;
                self.dispatch(message)
            }
            Err(e) => {
                self.stats.dropped += 1;
                tracing::warn!(error = %e, len = frame.len(), "protocol desync, dropping frame");
                None
            }
        }
    }

    fn dispatch(&mut self, message: Message) -> Option<Inbound> {
        match message {
            Message::PlayerIdAssignment(PlayerIdAssignment { player_index }) => {
                self.assign(player_index);
                None
            }
            Message::ConnectResponse(response) => {
                self.handle_connect_response(response);
                None
            }
            Message::ProjectileCreate(create) => {
                if self.player_index == Some(create.owner_index) {
                    tracing::debug!(slot = create.slot_id, "ignoring echo of own projectile");
                    return None;
                }
                Some(Inbound::ProjectileCreate(create))
            }
            Message::ProjectileDestroy(destroy) => Some(Inbound::ProjectileDestroy(destroy)),
            Message::ConnectRequest(_) => {
                self.stats.unexpected += 1;
                tracing::warn!("client received a connect request, dropping");
                None
            }
        }
    }

    fn assign(&mut self, player_index: i32) {
        if self.player_index != Some(player_index) {
            tracing::info!("Connected with player_index: {}", player_index);
        }
        self.player_index = Some(player_index);
        self.roster.insert(player_index);
        self.state = ClientState::Connected;
    }

    fn handle_connect_response(&mut self, response: ConnectResponse) {
        let ConnectResponse {
            player_index,
            is_self,
            connecting,
        } = response;

        if connecting {
            if is_self {
                self.assign(player_index);
            } else if self.roster.insert(player_index) {
                tracing::info!("Player {} joined", player_index);
            }
        } else if is_self {
            tracing::info!("Server released player_index: {}", player_index);
            self.disconnect();
        } else if self.roster.remove(&player_index) {
            tracing::info!("Player {} left", player_index);
        }
    }

    /// Drops the assignment and roster.
    pub fn disconnect(&mut self) {
        self.state = ClientState::Disconnected;
        self.player_index = None;
        self.roster.clear();
    }
}

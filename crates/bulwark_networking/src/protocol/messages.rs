//! # Message Catalog
//!
//! The closed set of message kinds and their payload layouts.
//!
//! The catalog is the single source of truth for payload sizes:
//! [`MessageType::payload_size`] is what the codec checks every decode
//! against, and each payload's `SIZE` constant is defined from it.

use bulwark_shared::Vec3;

use super::error::ProtocolError;
use super::serialization::{PayloadReader, PayloadWriter};

/// Kinds of messages in the protocol.
///
/// The discriminant is the first byte of every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Client -> Server: Ask to join.
    ConnectRequest = 0,
    /// Server -> Client: A player joined or left.
    ConnectResponse = 1,
    /// Server -> Client: Your player index.
    PlayerIdAssignment = 2,
    /// Bidirectional: A projectile was fired.
    ProjectileCreate = 3,
    /// Bidirectional: A projectile is gone.
    ProjectileDestroy = 4,
}

impl MessageType {
    /// Every kind, in discriminant order.
    pub const ALL: [Self; 5] = [
        Self::ConnectRequest,
        Self::ConnectResponse,
        Self::PlayerIdAssignment,
        Self::ProjectileCreate,
        Self::ProjectileDestroy,
    ];

    /// Maps a kind byte back to its message type.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConnectRequest),
            1 => Some(Self::ConnectResponse),
            2 => Some(Self::PlayerIdAssignment),
            3 => Some(Self::ProjectileCreate),
            4 => Some(Self::ProjectileDestroy),
            _ => None,
        }
    }

    /// Exact payload length in bytes, excluding the kind byte.
    #[must_use]
    pub const fn payload_size(self) -> usize {
        match self {
            Self::ConnectRequest => 0,
            // i32 player + u8 self + u8 connecting
            Self::ConnectResponse => 4 + 1 + 1,
            Self::PlayerIdAssignment | Self::ProjectileDestroy => 4,
            // i32 slot + i32 owner + 3 x f32 position + 3 x f32 velocity
            Self::ProjectileCreate => 4 + 4 + 12 + 12,
        }
    }

    /// Exact frame length in bytes, including the kind byte.
    #[must_use]
    pub const fn frame_size(self) -> usize {
        1 + self.payload_size()
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(ProtocolError::UnknownMessageType(value))
    }
}

/// A fixed-layout payload record.
///
/// Implementors write and read their fields in catalog order. The codec
/// handles length checking and tagging; payloads never see the kind byte.
pub trait Payload: Sized {
    /// Kind this payload travels as.
    const KIND: MessageType;

    /// Payload length in bytes.
    const SIZE: usize = Self::KIND.payload_size();

    /// Writes every field in catalog order.
    fn write(&self, writer: &mut PayloadWriter);

    /// Reads every field in catalog order.
    ///
    /// Returns `None` if the reader runs out of bytes.
    fn read(reader: &mut PayloadReader<'_>) -> Option<Self>;
}

/// Connection request - Client -> Server.
///
/// Size: 0 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectRequest;

impl Payload for ConnectRequest {
    const KIND: MessageType = MessageType::ConnectRequest;

    fn write(&self, _writer: &mut PayloadWriter) {}

    fn read(_reader: &mut PayloadReader<'_>) -> Option<Self> {
        Some(Self)
    }
}

/// Roster change announcement - Server -> Client.
///
/// Size: 6 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectResponse {
    /// Index of the player this announcement is about.
    pub player_index: i32,
    /// True when the announcement is about the receiving client itself.
    pub is_self: bool,
    /// True for a join, false for a leave.
    pub connecting: bool,
}

impl Payload for ConnectResponse {
    const KIND: MessageType = MessageType::ConnectResponse;

    fn write(&self, writer: &mut PayloadWriter) {
        writer.write_i32(self.player_index);
        writer.write_bool(self.is_self);
        writer.write_bool(self.connecting);
    }

    fn read(reader: &mut PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            player_index: reader.read_i32()?,
            is_self: reader.read_bool()?,
            connecting: reader.read_bool()?,
        })
    }
}

/// Player index assignment - Server -> Client.
///
/// Size: 4 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerIdAssignment {
    /// Index the server assigned to the receiving client.
    pub player_index: i32,
}

impl Payload for PlayerIdAssignment {
    const KIND: MessageType = MessageType::PlayerIdAssignment;

    fn write(&self, writer: &mut PayloadWriter) {
        writer.write_i32(self.player_index);
    }

    fn read(reader: &mut PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            player_index: reader.read_i32()?,
        })
    }
}

/// Projectile spawn event.
///
/// Size: 32 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileCreate {
    /// Slot the owner stores this projectile in.
    pub slot_id: i32,
    /// Player index of the owner.
    pub owner_index: i32,
    /// Spawn position.
    pub position: Vec3,
    /// Initial velocity (direction x speed).
    pub velocity: Vec3,
}

impl Payload for ProjectileCreate {
    const KIND: MessageType = MessageType::ProjectileCreate;

    fn write(&self, writer: &mut PayloadWriter) {
        writer.write_i32(self.slot_id);
        writer.write_i32(self.owner_index);
        writer.write_vec3(self.position);
        writer.write_vec3(self.velocity);
    }

    fn read(reader: &mut PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            slot_id: reader.read_i32()?,
            owner_index: reader.read_i32()?,
            position: reader.read_vec3()?,
            velocity: reader.read_vec3()?,
        })
    }
}

/// Projectile removal event.
///
/// Size: 4 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectileDestroy {
    /// Slot of the projectile being removed.
    pub slot_id: i32,
}

impl Payload for ProjectileDestroy {
    const KIND: MessageType = MessageType::ProjectileDestroy;

    fn write(&self, writer: &mut PayloadWriter) {
        writer.write_i32(self.slot_id);
    }

    fn read(reader: &mut PayloadReader<'_>) -> Option<Self> {
        Some(Self {
            slot_id: reader.read_i32()?,
        })
    }
}

/// Any message in the catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    /// Connection request.
    ConnectRequest(ConnectRequest),
    /// Roster change.
    ConnectResponse(ConnectResponse),
    /// Player index assignment.
    PlayerIdAssignment(PlayerIdAssignment),
    /// Projectile spawn.
    ProjectileCreate(ProjectileCreate),
    /// Projectile removal.
    ProjectileDestroy(ProjectileDestroy),
}

impl Message {
    /// Returns the message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageType {
        match self {
            Self::ConnectRequest(_) => MessageType::ConnectRequest,
            Self::ConnectResponse(_) => MessageType::ConnectResponse,
            Self::PlayerIdAssignment(_) => MessageType::PlayerIdAssignment,
            Self::ProjectileCreate(_) => MessageType::ProjectileCreate,
            Self::ProjectileDestroy(_) => MessageType::ProjectileDestroy,
        }
    }

    /// Encodes the payload only, without the kind byte.
    #[must_use]
    pub fn encode_payload(&self) -> Vec<u8> {
        match self {
            Self::ConnectRequest(p) => super::encode(p),
            Self::ConnectResponse(p) => super::encode(p),
            Self::PlayerIdAssignment(p) => super::encode(p),
            Self::ProjectileCreate(p) => super::encode(p),
            Self::ProjectileDestroy(p) => super::encode(p),
        }
    }

    /// Encodes and tags: `[kind] || payload`.
    #[must_use]
    pub fn to_frame(&self) -> Vec<u8> {
        super::tag(&self.encode_payload(), self.kind())
    }

    /// Untags and decodes a full frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the frame is empty, carries an unknown
    /// kind, or its payload length disagrees with the catalog.
    pub fn from_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (kind, payload) = super::untag(frame)?;
        super::decode_message(kind, payload)
    }
}

impl From<ConnectRequest> for Message {
    fn from(p: ConnectRequest) -> Self {
        Self::ConnectRequest(p)
    }
}

impl From<ConnectResponse> for Message {
    fn from(p: ConnectResponse) -> Self {
        Self::ConnectResponse(p)
    }
}

impl From<PlayerIdAssignment> for Message {
    fn from(p: PlayerIdAssignment) -> Self {
        Self::PlayerIdAssignment(p)
    }
}

impl From<ProjectileCreate> for Message {
    fn from(p: ProjectileCreate) -> Self {
        Self::ProjectileCreate(p)
    }
}

impl From<ProjectileDestroy> for Message {
    fn from(p: ProjectileDestroy) -> Self {
        Self::ProjectileDestroy(p)
    }
}

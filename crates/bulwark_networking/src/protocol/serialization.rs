//! # Payload Serialization
//!
//! Field-by-field little-endian writer and reader, plus the four codec
//! operations built on them.
//!
//! ## Design
//!
//! - `encode`/`decode` deal in payloads only
//! - `tag`/`untag` deal in the kind byte only
//! - Frames compose the two: `tag(encode(p), kind)` and `decode(untag(f))`

use bulwark_shared::Vec3;

use super::error::{ProtocolError, ProtocolResult};
use super::messages::{
    ConnectRequest, ConnectResponse, Message, MessageType, Payload, PlayerIdAssignment,
    ProjectileCreate, ProjectileDestroy,
};

/// Payload writer - appends fields to a byte buffer.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buffer: Vec<u8>,
}

impl PayloadWriter {
    /// Creates a writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a boolean as one byte (0 or 1).
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a f32 in little-endian format.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes x, y, z as three f32s.
    #[inline]
    pub fn write_vec3(&mut self, value: Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    /// Consumes the writer and returns the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Payload reader - reads fields from a borrowed buffer.
pub struct PayloadReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> PayloadReader<'a> {
    /// Creates a new reader over a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.position.checked_add(N)?;
        let bytes: [u8; N] = self.buffer.get(self.position..end)?.try_into().ok()?;
        self.position = end;
        Some(bytes)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    /// Reads a one-byte boolean. Any non-zero byte is true.
    #[inline]
    pub fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Reads an i32 in little-endian format.
    #[inline]
    pub fn read_i32(&mut self) -> Option<i32> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    /// Reads a f32 in little-endian format.
    #[inline]
    pub fn read_f32(&mut self) -> Option<f32> {
        self.take::<4>().map(f32::from_le_bytes)
    }

    /// Reads x, y, z as three f32s.
    #[inline]
    pub fn read_vec3(&mut self) -> Option<Vec3> {
        Some(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }
}

/// Serializes a payload. The result is exactly `P::SIZE` bytes long.
#[must_use]
pub fn encode<P: Payload>(payload: &P) -> Vec<u8> {
    let mut writer = PayloadWriter::with_capacity(P::SIZE);
    payload.write(&mut writer);
    debug_assert_eq!(writer.len(), P::SIZE, "{:?} wrote a bad layout", P::KIND);
    writer.into_bytes()
}

/// Deserializes a payload of a statically known kind.
///
/// # Errors
///
/// Returns [`ProtocolError::LayoutMismatch`] if `bytes` is not exactly
/// `P::SIZE` bytes long.
pub fn decode<P: Payload>(bytes: &[u8]) -> ProtocolResult<P> {
    let mismatch = ProtocolError::LayoutMismatch {
        kind: P::KIND,
        expected: P::SIZE,
        actual: bytes.len(),
    };
    if bytes.len() != P::SIZE {
        return Err(mismatch);
    }
    let mut reader = PayloadReader::new(bytes);
    P::read(&mut reader).ok_or(mismatch)
}

/// Deserializes a payload of a runtime kind into a [`Message`].
///
/// # Errors
///
/// Returns [`ProtocolError::LayoutMismatch`] if `bytes` is not exactly the
/// catalog size for `kind`.
pub fn decode_message(kind: MessageType, bytes: &[u8]) -> ProtocolResult<Message> {
    Ok(match kind {
        MessageType::ConnectRequest => decode::<ConnectRequest>(bytes)?.into(),
        MessageType::ConnectResponse => decode::<ConnectResponse>(bytes)?.into(),
        MessageType::PlayerIdAssignment => decode::<PlayerIdAssignment>(bytes)?.into(),
        MessageType::ProjectileCreate => decode::<ProjectileCreate>(bytes)?.into(),
        MessageType::ProjectileDestroy => decode::<ProjectileDestroy>(bytes)?.into(),
    })
}

/// Prepends the kind byte: `[kind] || bytes`.
#[must_use]
pub fn tag(bytes: &[u8], kind: MessageType) -> Vec<u8> {
    let mut frame = Vec::with_capacity(bytes.len() + 1);
    frame.push(kind as u8);
    frame.extend_from_slice(bytes);
    frame
}

/// Splits a frame into its kind and the remaining payload bytes.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyFrame`] for a zero-length frame and
/// [`ProtocolError::UnknownMessageType`] if the first byte is outside the
/// catalog.
pub fn untag(frame: &[u8]) -> ProtocolResult<(MessageType, &[u8])> {
    let (&kind_byte, payload) = frame.split_first().ok_or(ProtocolError::EmptyFrame)?;
    let kind = MessageType::try_from(kind_byte)?;
    Ok((kind, payload))
}

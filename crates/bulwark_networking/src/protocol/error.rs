//! # Protocol Error Types
//!
//! Every way a received frame can be rejected. None of these are fatal: the
//! receiver drops the frame and carries on.

use thiserror::Error;

use super::messages::MessageType;

/// Errors produced while untagging or decoding a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame had no bytes, so there is no kind tag to read.
    #[error("empty frame: no message kind byte")]
    EmptyFrame,

    /// The kind tag is outside the declared message catalog.
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// The payload length disagrees with the catalog size for its kind.
    #[error("layout mismatch for {kind:?}: expected {expected} bytes, got {actual}")]
    LayoutMismatch {
        /// Kind the payload was decoded as.
        kind: MessageType,
        /// Catalog size for that kind.
        expected: usize,
        /// Length actually received.
        actual: usize,
    },
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

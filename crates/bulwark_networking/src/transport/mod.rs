//! # Transport Layer
//!
//! The seam where frames leave the process.
//!
//! ## Design
//!
//! - The simulation only ever calls [`Transport::send`] with a finished frame
//! - Receiving is the driver's job: it pulls frames from wherever they arrive
//!   and hands them to the session's dispatcher
//! - [`ChannelTransport`] is an in-memory loopback used by tests and the
//!   local demo; a socket-backed transport implements the same trait

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use thiserror::Error;

/// Errors a transport can report on send.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The other end is gone.
    #[error("transport disconnected")]
    Disconnected,
    /// The outgoing queue has no room.
    #[error("transport queue full")]
    QueueFull,
}

/// Outgoing half of a transport.
///
/// Implementations must not block: a frame that cannot be queued is
/// reported as an error and the caller decides what to do with it.
pub trait Transport {
    /// Hands one finished frame to the wire.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the frame could not be queued.
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;
}

/// Transport statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Frames sent.
    pub frames_sent: u64,
    /// Frames received.
    pub frames_received: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Send errors.
    pub send_errors: u64,
}

/// In-memory loopback transport over crossbeam channels.
///
/// Created in connected pairs: whatever one end sends, the other receives.
pub struct ChannelTransport {
    outgoing: Sender<Vec<u8>>,
    incoming: Receiver<Vec<u8>>,
    stats: TransportStats,
}

impl ChannelTransport {
    /// Creates two connected ends, each queue holding up to `capacity` frames.
    #[must_use]
    pub fn pair(capacity: usize) -> (Self, Self) {
        let (a_tx, a_rx) = bounded(capacity);
        let (b_tx, b_rx) = bounded(capacity);
        (
            Self {
                outgoing: a_tx,
                incoming: b_rx,
                stats: TransportStats::default(),
            },
            Self {
                outgoing: b_tx,
                incoming: a_rx,
                stats: TransportStats::default(),
            },
        )
    }

    /// Takes the next received frame, if any. Never blocks.
    pub fn recv(&mut self) -> Option<Vec<u8>> {
        match self.incoming.try_recv() {
            Ok(frame) => {
                self.stats.frames_received += 1;
                self.stats.bytes_received += frame.len() as u64;
                Some(frame)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Takes every frame received so far.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        std::iter::from_fn(|| self.recv()).collect()
    }

    /// Returns statistics.
    #[must_use]
    pub const fn stats(&self) -> &TransportStats {
        &self.stats
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        match self.outgoing.try_send(frame.to_vec()) {
            Ok(()) => {
                self.stats.frames_sent += 1;
                self.stats.bytes_sent += frame.len() as u64;
                Ok(())
            }
            Err(e) => {
                self.stats.send_errors += 1;
                Err(match e {
                    TrySendError::Full(_) => TransportError::QueueFull,
                    TrySendError::Disconnected(_) => TransportError::Disconnected,
                })
            }
        }
    }
}

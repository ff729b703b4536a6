//! # Combat Event System
//!
//! Events the combat core publishes for whoever draws, plays sounds, or
//! keeps score.
//!
//! ## Event Flow for One Shot
//! ```text
//! 1. Avatar fires          → ProjectileCreated (local)
//! 2. Frame reaches peer    → ProjectileCreated (remote, on the peer)
//! 3. Peer's shield hit     → ProjectileDeflected (remote, on the peer)
//! 4. TTL runs out at owner → ProjectileDestroyed (local)
//! 5. Destroy reaches peer  → ProjectileDestroyed (remote, on the peer)
//! ```
//!
//! Publishing never blocks. A full or abandoned channel loses the event and
//! logs a warning; the simulation carries on.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::shield::DeflectionOutcome;
use bulwark_shared::Vec3;

/// Events published by the combat core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CombatEvent {
    /// A projectile came into existence.
    ProjectileCreated {
        /// Owning player.
        owner_index: i32,
        /// Owner's slot.
        slot_id: i32,
        /// Spawn position.
        position: Vec3,
        /// Initial velocity.
        velocity: Vec3,
    },

    /// A projectile is gone.
    ProjectileDestroyed {
        /// Owning player.
        owner_index: i32,
        /// Owner's slot.
        slot_id: i32,
    },

    /// A shield turned a projectile.
    ProjectileDeflected {
        /// Owning player.
        owner_index: i32,
        /// Owner's slot.
        slot_id: i32,
        /// Which reflection was applied.
        outcome: DeflectionOutcome,
        /// Velocity after the reflection.
        velocity: Vec3,
    },

    /// The local shield's facing changed.
    ShieldFacingChanged {
        /// New facing bearing in degrees.
        angle: f32,
    },
}

/// Bounded, lock-free event channel.
pub struct EventChannel<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> EventChannel<T> {
    /// Creates a new bounded event channel.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Tries to receive an event (non-blocking).
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Takes every event published so far.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Gets a publisher for a producer.
    #[must_use]
    pub fn publisher(&self) -> EventPublisher<T> {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Producer half of an [`EventChannel`].
pub struct EventPublisher<T> {
    sender: Sender<T>,
}

impl<T> Clone for EventPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: std::fmt::Debug> EventPublisher<T> {
    /// Publishes an event without blocking.
    ///
    /// Returns false if the event was lost.
    pub fn publish(&self, event: T) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "event channel full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::warn!(?event, "event channel closed, dropping event");
                false
            }
        }
    }
}

impl<T> std::fmt::Debug for EventPublisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("queued", &self.sender.len())
            .finish()
    }
}

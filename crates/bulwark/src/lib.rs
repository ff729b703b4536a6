//! # BULWARK
//!
//! Shield and projectile combat core for a small multiplayer arena.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      ClientSimulation                         │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │ Shield       │  │ Avatar       │  │ ProjectileManager   │  │
//! │  │ orientation  │  │ aim/cooldown │──│ slots + remote map  │  │
//! │  └──────┬───────┘  └──────────────┘  └─────────┬───────────┘  │
//! │         │ facing at contact time               │ frames       │
//! │         └────────────► deflection ◄────────────┘              │
//! │                                                │              │
//! │  GameClient (session) ◄── on_receive           ▼              │
//! │                                          Transport::send      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//!
//! - Ground plane is (x, z); y is carried but never steered
//! - Angles are bearings: degrees clockwise from +X, in [0, 360)
//! - Only encoded frames cross the wire; reflections stay local

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod avatar;
pub mod clock;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod integration;
pub mod projectiles;
pub mod shield;

// Re-exports for convenience
pub use avatar::Avatar;
pub use clock::{TickLoop, TickStats};
pub use config::CombatConfig;
pub use error::{CombatError, CombatResult, ConfigError};
pub use game_loop::{ClientSimulation, SimulationStats};
pub use integration::{Clock, CombatEvent, EventChannel, EventPublisher, InputFrame, InputSource};
pub use projectiles::{
    Contact, ContactOutcome, Ownership, Projectile, ProjectileKey, ProjectileManager, SlotId,
};
pub use shield::{DeflectionOutcome, DirectionalFlags, ShieldController};

//! # Integration Layer
//!
//! The seams between the combat core and the rest of the game:
//!
//! - **Events**: what the core tells the outside (spawns, removals,
//!   deflections, shield turns)
//! - **Traits**: what the core asks of the outside (input, time)

pub mod events;
pub mod traits;

pub use events::{CombatEvent, EventChannel, EventPublisher};
pub use traits::{Clock, InputFrame, InputSource};

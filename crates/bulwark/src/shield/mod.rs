//! # Shield
//!
//! - **Orientation**: which way the shield faces, turning at a fixed rate
//! - **Deflection**: what happens when a projectile meets it
//!
//! Both speak in bearings: degrees clockwise from +X, in [0, 360).

pub mod deflection;
pub mod orientation;

pub use deflection::{classify, resolve, DeflectionOutcome, BLOCK_TOLERANCE, HEAD_ON_TOLERANCE};
pub use orientation::{DirectionalFlags, ShieldController};

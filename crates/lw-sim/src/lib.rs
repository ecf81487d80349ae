//! # lw-sim: Lucky Wheel simulation and inspection
//!
//! - **Distribution**: parallel seeded batch draws with a chi-square check
//! - **Playback**: frame-by-frame controller spins on a simulated clock
//! - **Targets**: per-segment landing table from any rotation
//! - **Daily**: one cooldown-gated spin recorded in a ledger

pub mod daily;
pub mod distribution;
pub mod error;
pub mod playback;
pub mod targets;

pub use daily::*;
pub use distribution::*;
pub use error::*;
pub use playback::*;
pub use targets::*;

//! # lw-ledger: caller-side records for the Lucky Wheel
//!
//! The spin engine leaves cooldown policy and history to its host. This crate
//! is that host plumbing:
//!
//! - **Roster**: fixed player ids with one active selection
//! - **History**: last 10 spins per player, newest first
//! - **Ledger**: per-player last-spin time, eligibility, expiry sweep, JSON snapshot

pub mod error;
pub mod history;
pub mod ledger;
pub mod roster;

pub use error::*;
pub use history::*;
pub use ledger::*;
pub use roster::*;

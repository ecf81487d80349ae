//! # lw-wheel: Lucky Wheel spin engine
//!
//! Decides the outcome of a prize-wheel spin and computes where the wheel has
//! to stop so the chosen segment lands under the pointer.
//!
//! ## Features
//!
//! - **Segment Catalog**: fixed, ordered segments; order defines geometry
//! - **Weighted Selector**: pure draw → segment mapping, plus a forced entry point
//! - **Rotation Targeting**: forward-only absolute target with clamped jitter
//! - **Spin Controller**: Idle/Locked state machine, tick-driven eased animation
//! - **Eligibility Gate**: cooldown check applied by the caller
//!
//! ## Architecture
//!
//! ```text
//! EligibilityGate (caller)
//!     │
//!     v
//! SpinController ── RandomSource ──▶ WeightedSelector
//!     │                                  │
//!     │                                  v
//!     │                          compute_target ──▶ SpinTicket
//!     v
//! tick() ── Clock + SpinEasing ──▶ SpinProgress … SpinOutcome
//! ```

pub mod angle;
pub mod clock;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod gate;
pub mod random;
pub mod segment;
pub mod selector;
pub mod target;

pub use clock::*;
pub use config::*;
pub use controller::*;
pub use easing::*;
pub use error::*;
pub use gate::*;
pub use random::*;
pub use segment::*;
pub use selector::*;
pub use target::*;

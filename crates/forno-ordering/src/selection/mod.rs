//! Variation selection module.
//!
//! The dialog-shaped state machine that turns a catalog item plus customer
//! choices into a configured cart line.

mod session;

pub use session::{IncreaseOutcome, SelectionPhase, SelectionRow, SelectionSession};

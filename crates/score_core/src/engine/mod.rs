//! Match scoring engines.
//!
//! A point flows one way through the engines:
//!
//! ```text
//! apply_point ─┬─> regular game ──> win_game ─┬─> (continue)
//!              │                               ├─> start tiebreak
//!              │                               └─> win_set ─┬─> match complete
//!              └─> tiebreak point ────────────────> win_set ┘    └─> next set
//! ```
//!
//! Every public operation takes a snapshot and returns a new one. Internally the
//! engines advance a private clone in place.

pub mod correction;
pub mod game;
pub mod point;
pub mod rotation;
pub mod set;
pub mod tiebreak;

#[cfg(test)]
mod proptest_rules;
#[cfg(test)]
pub(crate) mod test_support;

pub use correction::remove_point;
pub use game::win_game;
pub use point::apply_point;
pub use rotation::{apply_side_change, next_server, switch_server, toggle_sides};
pub use set::win_set;

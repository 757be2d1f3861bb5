//! Terminal rendering for tack.
//!
//! Colors follow the Ayu Dark palette and are only emitted when the
//! terminal supports them (see [`terminal::supports_color`]).

pub mod board;
pub mod styles;
pub mod terminal;

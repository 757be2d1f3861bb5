//! Core types for the tack board.
//!
//! Tasks, the filter pipeline and the column model. Everything here is pure:
//! no I/O and no shared state.

pub mod column;
pub mod enums;
pub mod filter;
pub mod task;
pub mod validation;

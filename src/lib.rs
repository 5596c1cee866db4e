//! World-load wiring for the grid building core.
#![forbid(unsafe_code)]

pub mod session;

pub use session::{BuildSession, GridConfig};

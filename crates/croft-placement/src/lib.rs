//! Interactive placement: preview/drag state machine, commits, deletes.
#![forbid(unsafe_code)]

pub mod anchor;
pub mod controller;
pub mod ui;

pub use controller::{PlacementController, PlacementState, Preview};
pub use ui::{ConfirmUi, NullConfirmUi};

//! Bubble interaction: drag, edge snap and delete-zone handling
//!
//! The module is organized into:
//! - `gesture`: pure pointer-event state machine
//! - `snap`: frame-driven edge-snap animation
//! - `controller`: applies gesture effects to the window, the store and the
//!   delete handler

mod controller;
mod gesture;
mod snap;

pub use controller::{BubbleController, DeleteHandler};

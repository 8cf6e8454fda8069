//! Scroll input handling and the views that follow the scroll scalar.
//!
//! # Responsibility
//! - `coordinator`: wheel/touch folding, edge lock, synchronous fan-out.
//! - `views`: logo visibility and the text-panel transform.

pub mod coordinator;
pub mod views;

//! Parallax starfield: particle simulation, frame pacing and painting.
//!
//! # Responsibility
//! - `field`: star population, radial motion and recycling.
//! - `frame`: frame-rate gate and resize debounce.
//! - `animator`: host-facing per-frame driver.
//! - `render`: drawing seam and retained draw list.

pub mod animator;
pub mod field;
pub mod frame;
pub mod render;

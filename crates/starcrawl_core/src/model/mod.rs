//! Domain model shared by the simulator and its hosts.
//!
//! # Responsibility
//! - Define the star particle and its depth layers.
//! - Keep per-layer appearance ranges in one table.

pub mod star;

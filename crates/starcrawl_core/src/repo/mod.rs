//! Repository layer over the durable store.
//!
//! # Responsibility
//! - Keep SQL inside core; the session only sees `TextRepository`.

pub mod text_repo;

//! Flutter-facing bindings for the starcrawl editor.

pub mod api;

//! Flutter-facing bindings for the Stockbook core store.

pub mod api;

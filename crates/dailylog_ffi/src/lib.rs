//! Flutter-facing bindings for the daily log core.

pub mod api;

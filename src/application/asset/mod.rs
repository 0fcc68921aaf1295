//! Tracked asset management.

pub mod registry;

//! Strategy trust weights.

pub mod book;

//! Core console abstractions.

pub mod keys;
pub mod status_line;
pub mod terminal;

//! Shared runtime helpers for the message board binaries and crates.

pub mod utils;

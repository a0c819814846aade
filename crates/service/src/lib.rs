//! Service layer for the message board.
//! - `repository`: the generic persistence port and its MongoDB adapter.
//! - `storage`: in-process JSON document store (file-backed or in-memory).
//! - `message`: message repository wiring and the pass-through service.

pub mod errors;
pub mod repository;
pub mod storage;
pub mod message;
#[cfg(test)]
pub mod test_support;

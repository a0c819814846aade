//! Storage backends that live in the process.
//!
//! Used for local development and tests where running MongoDB is overkill.

pub mod json_document_store;

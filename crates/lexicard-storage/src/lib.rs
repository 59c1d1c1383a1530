//! lexicard-storage — Durable key-value stores for lexicard.
//!
//! Each key is kept as one JSON file inside a data directory, written with an
//! atomic whole-file replace.

pub mod error;
pub mod file;

pub use error::StorageError;
pub use file::JsonFileStore;

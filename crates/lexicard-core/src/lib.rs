//! lexicard-core — Word library, quiz engine, and persistence contracts.
//!
//! This crate defines the vocabulary data model, the categorized word store,
//! the quiz session state machine, and the repositories that move them in and
//! out of a key-value store. Nothing in here touches a terminal.

pub mod backup;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod model;
pub mod quiz;
pub mod repository;
pub mod seed;
pub mod settings;
pub mod store;
pub mod traits;
pub mod transfer;

pub use error::{ErrorKind, LibraryError, QuizError, StudyError};
pub use model::{QuizMode, WordEntry, WordLibrary};
pub use quiz::QuizEngine;
pub use store::WordStore;

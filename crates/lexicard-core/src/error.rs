//! Error types for the word store and the quiz engine.
//!
//! Expected domain conditions (duplicates, missing categories, a question
//! checked twice) are values of these enums, returned through `Result`.
//! I/O failures travel as `anyhow::Error` and are wrapped by [`StudyError`]
//! where the controller needs to mix both.

use thiserror::Error;

/// Coarse classification shared by every domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFormat,
    DuplicateWord,
    NotFound,
    AlreadyExists,
    ProtectedCategory,
    EmptyWordSet,
    EmptyCategory,
    UnsupportedFormat,
    AlreadyChecked,
    AnswerNotChecked,
    OutOfRange,
    NoActiveSession,
    SessionInProgress,
    Storage,
}

/// Errors raised by [`crate::store::WordStore`] and the import/export layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// An entry or payload is missing required data.
    #[error("invalid word data: {0}")]
    InvalidFormat(String),

    /// The top-level structure of an import payload is unusable; nothing was imported.
    #[error("malformed import data: {0}")]
    MalformedImport(String),

    #[error("word \"{word}\" already exists in category \"{category}\"")]
    DuplicateWord { category: String, word: String },

    #[error("category \"{0}\" does not exist")]
    CategoryNotFound(String),

    #[error("word \"{word}\" does not exist in category \"{category}\"")]
    WordNotFound { category: String, word: String },

    #[error("category \"{0}\" already exists")]
    AlreadyExists(String),

    /// Attempted to delete or clear a reserved category.
    #[error("category \"{category}\" is reserved and cannot be {action}")]
    ProtectedCategory {
        category: String,
        action: &'static str,
    },

    #[error("category \"{0}\" is empty")]
    EmptyCategory(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidFormat(_) | LibraryError::MalformedImport(_) => {
                ErrorKind::InvalidFormat
            }
            LibraryError::DuplicateWord { .. } => ErrorKind::DuplicateWord,
            LibraryError::CategoryNotFound(_) | LibraryError::WordNotFound { .. } => {
                ErrorKind::NotFound
            }
            LibraryError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            LibraryError::ProtectedCategory { .. } => ErrorKind::ProtectedCategory,
            LibraryError::EmptyCategory(_) => ErrorKind::EmptyCategory,
            LibraryError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
        }
    }
}

/// Errors raised by [`crate::quiz::QuizEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("cannot start a quiz with no words")]
    EmptyWordSet,

    /// The current question was already evaluated; counters are unchanged.
    #[error("the current answer has already been checked")]
    AlreadyChecked,

    #[error("the current answer has not been checked or marked yet")]
    AnswerNotChecked,

    #[error("question {index} is out of range (session has {total} words)")]
    OutOfRange { index: usize, total: usize },

    #[error("no quiz session is active")]
    NoActiveSession,

    #[error("quiz still has {remaining} unanswered question(s)")]
    SessionInProgress { remaining: usize },
}

impl QuizError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::EmptyWordSet => ErrorKind::EmptyWordSet,
            QuizError::AlreadyChecked => ErrorKind::AlreadyChecked,
            QuizError::AnswerNotChecked => ErrorKind::AnswerNotChecked,
            QuizError::OutOfRange { .. } => ErrorKind::OutOfRange,
            QuizError::NoActiveSession => ErrorKind::NoActiveSession,
            QuizError::SessionInProgress { .. } => ErrorKind::SessionInProgress,
        }
    }
}

/// Error returned by [`crate::controller::StudyController`].
#[derive(Debug, Error)]
pub enum StudyError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl StudyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudyError::Library(e) => e.kind(),
            StudyError::Quiz(e) => e.kind(),
            StudyError::Storage(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        let err = LibraryError::DuplicateWord {
            category: "default".into(),
            word: "Abandon".into(),
        };
        assert_eq!(
            err.to_string(),
            "word \"Abandon\" already exists in category \"default\""
        );

        let err = LibraryError::ProtectedCategory {
            category: "wrongWords".into(),
            action: "deleted",
        };
        assert!(err.to_string().contains("cannot be deleted"));
    }

    #[test]
    fn kinds_collapse_related_variants() {
        assert_eq!(
            LibraryError::MalformedImport("x".into()).kind(),
            ErrorKind::InvalidFormat
        );
        assert_eq!(
            LibraryError::WordNotFound {
                category: "a".into(),
                word: "b".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        let study: StudyError = QuizError::AlreadyChecked.into();
        assert_eq!(study.kind(), ErrorKind::AlreadyChecked);
        let study: StudyError = anyhow::anyhow!("disk full").into();
        assert_eq!(study.kind(), ErrorKind::Storage);
    }
}

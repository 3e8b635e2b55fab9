//! Message cache and service error types.

use thiserror::Error;

use crate::scheme::ErrorId;

/// Lookup/population failures of the messages cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("{}", format_key("entry already cached", translation, path, *error_id))]
    DuplicateKey {
        translation: String,
        path: Option<String>,
        error_id: ErrorId,
    },

    #[error("{}", format_key("no cached entry", translation, path, *error_id))]
    NotFound {
        translation: String,
        path: Option<String>,
        error_id: ErrorId,
    },
}

fn format_key(what: &str, translation: &str, path: &Option<String>, error_id: ErrorId) -> String {
    match path {
        Some(path) => {
            format!("{what} for translation '{translation}', path '{path}', error id {error_id}")
        }
        None => format!("{what} for translation '{translation}', error id {error_id}"),
    }
}

/// A violated internal invariant of the messages cache, found by
/// [`crate::messages::MessagesCache::verify_integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error(
        "translation '{translation}' holds {actual} messages for error id {error_id}, translation '{reference}' holds {expected}"
    )]
    MessageCountMismatch {
        translation: String,
        reference: String,
        error_id: ErrorId,
        expected: usize,
        actual: usize,
    },

    #[error(
        "error id {error_id} is cached for translation '{reference}' but missing from translation '{translation}'"
    )]
    MissingErrorId {
        translation: String,
        reference: String,
        error_id: ErrorId,
    },

    #[error("placeholder table references translation '{translation}', which has no cached messages")]
    PlaceholderUnknownTranslation { translation: String },

    #[error(
        "placeholder table for translation '{translation}' references error id {error_id}, which has no cached messages"
    )]
    PlaceholderUnknownErrorId {
        translation: String,
        error_id: ErrorId,
    },

    #[error(
        "placeholder table for translation '{translation}', error id {error_id} points at message index {index}, but only {message_count} messages are cached"
    )]
    PlaceholderIndexOutOfRange {
        translation: String,
        error_id: ErrorId,
        index: usize,
        message_count: usize,
    },

    #[error("path-args table references translation '{translation}', which has no cached messages")]
    PathArgsUnknownTranslation { translation: String },

    #[error(
        "path-args table for translation '{translation}', path '{path}' references error id {error_id}, which has no cached messages"
    )]
    PathArgsUnknownErrorId {
        translation: String,
        path: String,
        error_id: ErrorId,
    },

    #[error(
        "path-args messages for translation '{translation}', path '{path}', error id {error_id} hold {actual} messages, exceeding the {expected} cached for that error"
    )]
    PathArgsMessageCountExceeded {
        translation: String,
        path: String,
        error_id: ErrorId,
        expected: usize,
        actual: usize,
    },
}

/// Failures of message resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagesError {
    #[error("unknown translation '{0}'")]
    UnknownTranslation(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

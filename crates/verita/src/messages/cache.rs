//! Memoization tables for resolved messages.
//!
//! Three tables, all keyed by translation name first:
//!
//! - messages: error ID → resolved templates (static args already
//!   substituted);
//! - path messages: path → error ID → messages with the path placeholders
//!   rendered for that specific path;
//! - path placeholders: error ID → message index → the path-dependent
//!   placeholders found in that message, so scanning happens at most once
//!   per (translation, error ID) no matter how many paths hit the error.
//!
//! Message lists are shared `Arc`s; a lookup hands back the allocation
//! that was added.

use std::sync::Arc;

use ahash::AHashMap;

use crate::scheme::ErrorId;

use super::Placeholder;
use super::error::{CacheError, IntegrityError};

type MessageList = Arc<Vec<String>>;

/// Build-then-freeze message memoization. Population is single-writer;
/// once populated, lookups take `&self` and are safe to share.
#[derive(Debug, Default)]
pub struct MessagesCache {
    messages: AHashMap<String, AHashMap<ErrorId, MessageList>>,
    path_messages: AHashMap<String, AHashMap<Arc<str>, AHashMap<ErrorId, MessageList>>>,
    path_placeholders: AHashMap<String, AHashMap<ErrorId, AHashMap<usize, Vec<Placeholder>>>>,
}

impl MessagesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(
        &mut self,
        translation: &str,
        error_id: ErrorId,
        messages: MessageList,
    ) -> Result<(), CacheError> {
        let by_error = self.messages.entry(translation.to_string()).or_default();
        if by_error.contains_key(&error_id) {
            return Err(CacheError::DuplicateKey {
                translation: translation.to_string(),
                path: None,
                error_id,
            });
        }
        by_error.insert(error_id, messages);
        Ok(())
    }

    pub fn get_messages(
        &self,
        translation: &str,
        error_id: ErrorId,
    ) -> Result<MessageList, CacheError> {
        self.messages
            .get(translation)
            .and_then(|by_error| by_error.get(&error_id))
            .cloned()
            .ok_or_else(|| CacheError::NotFound {
                translation: translation.to_string(),
                path: None,
                error_id,
            })
    }

    pub fn add_message_with_path_args(
        &mut self,
        translation: &str,
        path: Arc<str>,
        error_id: ErrorId,
        messages: MessageList,
    ) -> Result<(), CacheError> {
        let by_error = self
            .path_messages
            .entry(translation.to_string())
            .or_default()
            .entry(path.clone())
            .or_default();
        if by_error.contains_key(&error_id) {
            return Err(CacheError::DuplicateKey {
                translation: translation.to_string(),
                path: Some(path.to_string()),
                error_id,
            });
        }
        by_error.insert(error_id, messages);
        Ok(())
    }

    pub fn get_messages_with_path_args(
        &self,
        translation: &str,
        path: &str,
        error_id: ErrorId,
    ) -> Result<MessageList, CacheError> {
        self.path_messages
            .get(translation)
            .and_then(|by_path| by_path.get(path))
            .and_then(|by_error| by_error.get(&error_id))
            .cloned()
            .ok_or_else(|| CacheError::NotFound {
                translation: translation.to_string(),
                path: Some(path.to_string()),
                error_id,
            })
    }

    pub fn has_messages_with_path_args(
        &self,
        translation: &str,
        path: &str,
        error_id: ErrorId,
    ) -> bool {
        self.path_messages
            .get(translation)
            .and_then(|by_path| by_path.get(path))
            .is_some_and(|by_error| by_error.contains_key(&error_id))
    }

    pub fn add_indexed_path_placeholders(
        &mut self,
        translation: &str,
        error_id: ErrorId,
        placeholders: AHashMap<usize, Vec<Placeholder>>,
    ) -> Result<(), CacheError> {
        let by_error = self
            .path_placeholders
            .entry(translation.to_string())
            .or_default();
        if by_error.contains_key(&error_id) {
            return Err(CacheError::DuplicateKey {
                translation: translation.to_string(),
                path: None,
                error_id,
            });
        }
        by_error.insert(error_id, placeholders);
        Ok(())
    }

    pub fn get_indexed_path_placeholders(
        &self,
        translation: &str,
        error_id: ErrorId,
    ) -> Result<&AHashMap<usize, Vec<Placeholder>>, CacheError> {
        self.path_placeholders
            .get(translation)
            .and_then(|by_error| by_error.get(&error_id))
            .ok_or_else(|| CacheError::NotFound {
                translation: translation.to_string(),
                path: None,
                error_id,
            })
    }

    pub fn has_indexed_path_placeholders(&self, translation: &str, error_id: ErrorId) -> bool {
        self.path_placeholders
            .get(translation)
            .is_some_and(|by_error| by_error.contains_key(&error_id))
    }

    /// Walk all three tables and report the first violated invariant.
    ///
    /// A consistency self-check after population; lookups never run it.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        // Every translation must register the same error IDs with the same
        // message counts.
        let mut translations = self.messages.iter();
        if let Some((reference, reference_counts)) = translations.next() {
            for (translation, by_error) in translations {
                for (&error_id, messages) in reference_counts {
                    match by_error.get(&error_id) {
                        None => {
                            return Err(IntegrityError::MissingErrorId {
                                translation: translation.clone(),
                                reference: reference.clone(),
                                error_id,
                            });
                        }
                        Some(other) if other.len() != messages.len() => {
                            return Err(IntegrityError::MessageCountMismatch {
                                translation: translation.clone(),
                                reference: reference.clone(),
                                error_id,
                                expected: messages.len(),
                                actual: other.len(),
                            });
                        }
                        Some(_) => {}
                    }
                }
                for &error_id in by_error.keys() {
                    if !reference_counts.contains_key(&error_id) {
                        return Err(IntegrityError::MissingErrorId {
                            translation: reference.clone(),
                            reference: translation.clone(),
                            error_id,
                        });
                    }
                }
            }
        }

        // Placeholder indices must stay within the registered messages.
        for (translation, by_error) in &self.path_placeholders {
            let Some(registered) = self.messages.get(translation) else {
                return Err(IntegrityError::PlaceholderUnknownTranslation {
                    translation: translation.clone(),
                });
            };
            for (&error_id, by_index) in by_error {
                let Some(messages) = registered.get(&error_id) else {
                    return Err(IntegrityError::PlaceholderUnknownErrorId {
                        translation: translation.clone(),
                        error_id,
                    });
                };
                for &index in by_index.keys() {
                    if index >= messages.len() {
                        return Err(IntegrityError::PlaceholderIndexOutOfRange {
                            translation: translation.clone(),
                            error_id,
                            index,
                            message_count: messages.len(),
                        });
                    }
                }
            }
        }

        // Path-args entries may only refine registered errors.
        for (translation, by_path) in &self.path_messages {
            let Some(registered) = self.messages.get(translation) else {
                return Err(IntegrityError::PathArgsUnknownTranslation {
                    translation: translation.clone(),
                });
            };
            for (path, by_error) in by_path {
                for (&error_id, messages) in by_error {
                    let Some(base) = registered.get(&error_id) else {
                        return Err(IntegrityError::PathArgsUnknownErrorId {
                            translation: translation.clone(),
                            path: path.to_string(),
                            error_id,
                        });
                    };
                    if messages.len() > base.len() {
                        return Err(IntegrityError::PathArgsMessageCountExceeded {
                            translation: translation.clone(),
                            path: path.to_string(),
                            error_id,
                            expected: base.len(),
                            actual: messages.len(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

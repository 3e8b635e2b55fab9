//! Message resolution service.

use std::sync::Arc;

use ahash::AHashMap;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use tracing::debug;

use crate::scheme::{ErrorDefinition, ErrorId};

use super::cache::MessagesCache;
use super::error::MessagesError;
use super::placeholder::{Placeholder, parse_placeholders};
use super::{NAME_ARG, PATH_ARG, TRANSLATION_ARG, Translation, Translations};

/// Turns accumulated `path → error IDs` maps into `path → message` lists.
///
/// Construction is the write phase: every (translation, error ID) pair is
/// resolved and cached up front. Serving only ever renders the
/// path-dependent placeholders, memoized per (translation, path, error ID).
pub struct MessageService {
    default_translation: String,
    translations: Translations,
    cache: MessagesCache,
}

impl MessageService {
    /// Resolve and cache all messages. Fails when `default_translation` is
    /// not among `translations`.
    pub fn new(
        translations: Translations,
        errors: &AHashMap<ErrorId, ErrorDefinition>,
        default_translation: impl Into<String>,
    ) -> Result<Self, MessagesError> {
        let default_translation = default_translation.into();
        if !translations.contains_key(&default_translation) {
            return Err(MessagesError::UnknownTranslation(default_translation));
        }

        let mut cache = MessagesCache::new();
        for (name, table) in &translations {
            for (&error_id, definition) in errors {
                let mut templates = Vec::with_capacity(definition.message_keys.len());
                let mut path_placeholders: AHashMap<usize, Vec<Placeholder>> = AHashMap::new();
                for (index, key) in definition.message_keys.iter().enumerate() {
                    let template = table
                        .get(key.as_ref())
                        .cloned()
                        .unwrap_or_else(|| key.as_ref().to_string());
                    let resolved = substitute_static(&template, definition, table);
                    let dynamic: Vec<Placeholder> = parse_placeholders(&resolved)
                        .into_iter()
                        .filter(|p| p.name == PATH_ARG || p.name == NAME_ARG)
                        .collect();
                    if !dynamic.is_empty() {
                        path_placeholders.insert(index, dynamic);
                    }
                    templates.push(resolved);
                }
                cache.add_message(name, error_id, Arc::new(templates))?;
                if !path_placeholders.is_empty() {
                    cache.add_indexed_path_placeholders(name, error_id, path_placeholders)?;
                }
            }
        }
        debug!(
            translations = translations.len(),
            errors = errors.len(),
            "message cache populated"
        );

        Ok(Self {
            default_translation,
            translations,
            cache,
        })
    }

    pub fn default_translation(&self) -> &str {
        &self.default_translation
    }

    pub fn cache(&self) -> &MessagesCache {
        &self.cache
    }

    /// Self-check the underlying cache's invariants.
    pub fn verify_integrity(&self) -> Result<(), super::IntegrityError> {
        self.cache.verify_integrity()
    }

    /// Resolve every error of every path into its localized messages, in
    /// bucket order. `None` picks the default translation; an unknown name
    /// fails, an unknown error ID surfaces the cache's not-found.
    pub fn errors_messages(
        &mut self,
        errors: &IndexMap<Arc<str>, Vec<ErrorId>>,
        translation: Option<&str>,
    ) -> Result<IndexMap<String, Vec<String>>, MessagesError> {
        let translation = translation.unwrap_or(&self.default_translation).to_string();
        if !self.translations.contains_key(&translation) {
            return Err(MessagesError::UnknownTranslation(translation));
        }

        let mut output = IndexMap::with_capacity(errors.len());
        for (path, error_ids) in errors {
            let mut messages = Vec::new();
            for &error_id in error_ids {
                let resolved = self.messages_for(&translation, path, error_id)?;
                messages.extend(resolved.iter().cloned());
            }
            output.insert(path.to_string(), messages);
        }
        Ok(output)
    }

    fn messages_for(
        &mut self,
        translation: &str,
        path: &Arc<str>,
        error_id: ErrorId,
    ) -> Result<Arc<Vec<String>>, MessagesError> {
        if !self.cache.has_indexed_path_placeholders(translation, error_id) {
            return Ok(self.cache.get_messages(translation, error_id)?);
        }
        if self
            .cache
            .has_messages_with_path_args(translation, path, error_id)
        {
            return Ok(self
                .cache
                .get_messages_with_path_args(translation, path, error_id)?);
        }

        let base = self.cache.get_messages(translation, error_id)?;
        let mut rendered: Vec<String> = (*base).clone();
        {
            let by_index = self
                .cache
                .get_indexed_path_placeholders(translation, error_id)?;
            for (&index, placeholders) in by_index {
                let message = &mut rendered[index];
                for placeholder in placeholders {
                    let replacement = match placeholder.name.as_str() {
                        PATH_ARG => path.to_string(),
                        NAME_ARG => render_name(path, placeholder),
                        _ => continue,
                    };
                    *message = message.replace(&placeholder.raw, &replacement);
                }
            }
        }
        let rendered = Arc::new(rendered);
        self.cache
            .add_message_with_path_args(translation, path.clone(), error_id, rendered.clone())?;
        Ok(rendered)
    }
}

/// Substitute everything that does not depend on the error's path: the
/// error's own args and `{_translation|key=…}` lookups.
fn substitute_static(template: &str, definition: &ErrorDefinition, table: &Translation) -> String {
    let mut resolved = template.to_string();
    for placeholder in parse_placeholders(template) {
        let replacement = if placeholder.name == TRANSLATION_ARG {
            placeholder
                .params
                .get("key")
                .map(|key| table.get(key).cloned().unwrap_or_else(|| key.clone()))
        } else if placeholder.name == PATH_ARG || placeholder.name == NAME_ARG {
            None
        } else {
            definition
                .args
                .iter()
                .find(|arg| arg.name() == placeholder.name)
                .map(|arg| arg.render(&placeholder.params))
        };
        if let Some(replacement) = replacement {
            resolved = resolved.replace(&placeholder.raw, &replacement);
        }
    }
    resolved
}

/// `{_name}`: the last path segment; `format=titleCase` renders it as
/// space-separated title case.
fn render_name(path: &str, placeholder: &Placeholder) -> String {
    let name = path.rsplit('.').next().unwrap_or(path);
    match placeholder.params.get("format").map(String::as_str) {
        Some("titleCase") => name.to_case(Case::Title),
        _ => name.to_string(),
    }
}

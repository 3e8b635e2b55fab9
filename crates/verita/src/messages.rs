//! Message resolution: translations, caches and argument substitution.
//!
//! # Architecture
//!
//! A translation is a `message key → template` table; templates carry
//! `{name}` / `{name|param=value}` placeholders. Resolution happens in two
//! phases:
//!
//! - **Build** ([`MessageService::new`]): per (translation, error ID), each
//!   message key is looked up (absent keys fall back to the raw key), the
//!   error's own args and `{_translation|key=…}` placeholders are
//!   substituted, and the path-dependent placeholders (`{_path}`,
//!   `{_name}`) left in each message are indexed. Everything lands in the
//!   [`MessagesCache`].
//! - **Query** ([`MessageService::errors_messages`]): per path and error
//!   ID, messages without path placeholders are served straight from the
//!   cache; the rest are rendered once per (translation, path, error ID)
//!   and memoized, so identical errors recurring across many paths only
//!   re-render the path tokens.
//!
//! Population happens under exclusive access (`&mut self`); steady-state
//! sharing across runs is the caller's concern.

mod args;
mod cache;
mod error;
mod placeholder;
mod service;

pub use args::{Arg, NumberValue};
pub use cache::MessagesCache;
pub use error::{CacheError, IntegrityError, MessagesError};
pub use placeholder::{Placeholder, parse_placeholders};
pub use service::MessageService;

use ahash::AHashMap;

/// One translation: message key → template.
pub type Translation = AHashMap<String, String>;

/// All known translations, by name.
pub type Translations = AHashMap<String, Translation>;

/// Placeholder resolved to the final path segment of the error's path.
pub const NAME_ARG: &str = "_name";

/// Placeholder resolved to the error's full path, indexes rendered `#<n>`.
pub const PATH_ARG: &str = "_path";

/// Placeholder resolved by looking its `key` parameter up in the same
/// translation, falling back to the literal key.
pub const TRANSLATION_ARG: &str = "_translation";

//! Path-addressed model validation core.
//!
//! Validation walks a model instance depth-first against a compiled
//! specification (a "model scheme"), tracking the current dotted path,
//! accumulating error IDs per path, guarding against reference loops, and
//! resolving the accumulated IDs into localized messages through a
//! build-once message cache.
//!
//! The scheme itself (how specifications are compiled, which rules exist,
//! where translations come from) lives outside this crate and is consumed
//! through the traits in [`scheme`].

/// Dotted-path joining and collection-index rewriting.
pub mod path;

/// Depth-indexed enable/detect flags backing the scoped error modes.
pub mod flag;

/// Handle types and traits at the model-scheme boundary.
pub mod scheme;

/// Traversal failures: reference loops and unknown scopes.
pub mod error;

/// Dry-run traversal: path enumeration and structural loop detection.
pub mod discovery;

/// Validation traversal contexts.
pub mod validate;

/// Translations, message caches and argument substitution.
pub mod messages;

pub use discovery::{DiscoveryContext, DiscoveryOutput};
pub use error::{ReferenceLoopError, TraversalError};
pub use flag::ErrorFlag;
pub use messages::{
    Arg, CacheError, IntegrityError, MessageService, MessagesCache, MessagesError, NumberValue,
    Placeholder, Translation, Translations,
};
pub use scheme::{
    DiscoveryActions, ErrorDefinition, ErrorId, ModelRef, ModelScheme, ReferenceId, ScopeId,
    SpecificationScope, TypeInfo,
};
pub use validate::{
    ErrorMode, IsValidContext, ReportContext, ValidationContext, ValidationOutput,
    ValidationSettings, is_valid, validate,
};

//! Traversal failure types.
//!
//! Two failures abort a traversal: a reference loop found while validating
//! a real instance (continuing would recurse without bound), and a scope ID
//! the model scheme does not know (an inconsistent scheme that must be
//! fixed before validation can be trusted). Both are propagated to the
//! caller; neither is converted into validation-domain error data.

use thiserror::Error;

use crate::scheme::ScopeId;

/// A failure that aborts the current traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error(transparent)]
    ReferenceLoop(#[from] ReferenceLoopError),

    #[error("unknown specification scope id {scope_id}")]
    UnknownScope { scope_id: ScopeId },
}

/// A model reference appeared twice on the active descent path.
///
/// Raised by validation contexts with reference-loop protection enabled.
/// The error-reporting context fills in where the reference was first seen
/// and where it recurred; the boolean-only context knows neither and leaves
/// both fields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_reference_loop(type_name, path, nested_path))]
pub struct ReferenceLoopError {
    /// Runtime type of the looping model.
    pub type_name: &'static str,
    /// Path at which the reference was first seen.
    pub path: Option<String>,
    /// Path at which the same reference was reached again.
    pub nested_path: Option<String>,
}

fn format_reference_loop(
    type_name: &str,
    path: &Option<String>,
    nested_path: &Option<String>,
) -> String {
    match (path, nested_path) {
        (Some(path), Some(nested_path)) => format!(
            "reference loop detected for type {type_name}: the value at path '{path}' was reached again at path '{nested_path}'"
        ),
        _ => format!(
            "reference loop detected for type {type_name}: run the error-reporting validation to locate the loop"
        ),
    }
}

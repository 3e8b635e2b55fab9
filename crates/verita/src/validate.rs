//! Validation traversal contexts.
//!
//! # Architecture
//!
//! Scopes program against the [`ValidationContext`] trait: they descend
//! with `enter_path` / `enter_collection_item_path` / `enter_scope`, record
//! findings with `add_error`, and consult `should_fall_back` between
//! siblings for cooperative short-circuiting. Two implementations exist:
//!
//! - [`ReportContext`]: accumulates error IDs per resolved path, supports
//!   fail-fast and the scoped Append/Override error modes.
//! - [`IsValidContext`]: answers yes/no only. No error map, no path
//!   tracking; stops at the first detected error.
//!
//! # Error modes
//!
//! A scope may enable Append or Override at its depth with a
//! representative error ID. When any error is detected at that depth or
//! deeper, leaving the depth folds the representative into the bucket of
//! the path being left: Append adds it after the children's errors,
//! Override replaces that exact path's bucket with it alone. Override is
//! path-exact: buckets recorded under nested paths are never purged.

mod context;
mod is_valid;

pub use context::{ReportContext, ValidationOutput};
pub use is_valid::IsValidContext;

use crate::error::TraversalError;
use crate::scheme::{ErrorId, ModelRef, ModelScheme, ScopeId};

/// How a subtree's representative error folds into the path being left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Add the representative error after the subtree's own errors.
    Append,
    /// Replace the left path's bucket with the representative error alone.
    Override,
}

/// Per-run validation knobs, immutable once a context is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationSettings {
    /// Stop traversing at the first recorded error.
    pub fail_fast: bool,
    /// Track visited reference identities and fail deterministically on a
    /// loop instead of recursing without bound.
    pub reference_loop_protection: bool,
}

/// The traversal surface exposed to specification scopes.
pub trait ValidationContext {
    /// Descend into a named member. An empty segment stays at the current
    /// path (a frame is still pushed, keeping [`Self::leave_path`]
    /// symmetric).
    fn enter_path(&mut self, segment: &str);

    /// Descend into the collection item at `index`.
    fn enter_collection_item_path(&mut self, index: usize);

    /// Leave the current path, folding any enabled error mode into the
    /// bucket of the path being left.
    fn leave_path(&mut self);

    /// Resolve `scope_id` through the scheme and validate `model` against
    /// it. Fails on an unknown scope ID, or on a repeated reference
    /// identity when loop protection is enabled.
    fn enter_scope(&mut self, scope_id: ScopeId, model: ModelRef<'_>)
    -> Result<(), TraversalError>;

    /// Record `error_id` at the current path. With the skip flag set the ID
    /// is only recorded when not already present under this exact path;
    /// either way the error counts as detected.
    fn add_error(&mut self, error_id: ErrorId, skip_if_duplicate_in_path: bool);

    /// Enable an error mode at the current depth with a representative
    /// error ID. The first representative per depth and mode wins.
    fn enable_error_detection_mode(&mut self, mode: ErrorMode, error_id: ErrorId);

    /// Cooperative short-circuit: when true, the calling scope skips its
    /// remaining sibling rules and unwinds.
    fn should_fall_back(&self) -> bool;

    fn error_found(&self) -> bool;

    /// `None` when loop protection is disabled, else the number of
    /// identities currently on the protection stack.
    fn loop_protection_stack_count(&self) -> Option<usize>;
}

/// Validate `model` against the scheme's root scope, collecting the full
/// error report.
pub fn validate(
    scheme: &dyn ModelScheme,
    model: ModelRef<'_>,
    settings: ValidationSettings,
) -> Result<ValidationOutput, TraversalError> {
    let mut context = ReportContext::new(scheme, settings, Some(model));
    let scope = scheme.specification_scope(scheme.root_specification_scope_id())?;
    scope.validate(model, &mut context)?;
    Ok(context.finish())
}

/// Check `model` against the scheme's root scope, stopping at the first
/// detected error.
pub fn is_valid(
    scheme: &dyn ModelScheme,
    model: ModelRef<'_>,
    reference_loop_protection: bool,
) -> Result<bool, TraversalError> {
    let mut context = IsValidContext::new(scheme, reference_loop_protection, Some(model));
    let scope = scheme.specification_scope(scheme.root_specification_scope_id())?;
    scope.validate(model, &mut context)?;
    Ok(!context.error_found())
}

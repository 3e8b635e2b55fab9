//! Full validation context: per-path error accumulation.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ReferenceLoopError, TraversalError};
use crate::flag::ErrorFlag;
use crate::path::COLLECTION_ITEM_SEGMENT;
use crate::scheme::{ErrorId, ModelRef, ModelScheme, ReferenceId, ScopeId};

use super::{ErrorMode, ValidationContext, ValidationSettings};

// =============================================================================
// ValidationOutput
// =============================================================================

/// Final result of one error-reporting validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutput {
    /// No errors were recorded.
    pub is_valid: bool,
    /// Error IDs per resolved path, in the order they were recorded.
    pub errors: IndexMap<Arc<str>, Vec<ErrorId>>,
}

// =============================================================================
// ReportContext
// =============================================================================

#[derive(Debug)]
struct PathFrame {
    path: Arc<str>,
    collection_item: bool,
}

/// Validation context accumulating the full error report.
///
/// Path joins go through the scheme's memoized `resolve_path`, so repeated
/// paths across many model instances reuse prior allocations. The errors
/// map is not allocated until the first error arrives.
pub struct ReportContext<'s> {
    scheme: &'s dyn ModelScheme,
    fail_fast: bool,
    root_path: Arc<str>,
    path_stack: Vec<PathFrame>,
    indexes: Vec<usize>,
    errors: Option<IndexMap<Arc<str>, Vec<ErrorId>>>,
    loop_stack: Option<Vec<(Arc<str>, ReferenceId)>>,
    append_flag: ErrorFlag,
    override_flag: ErrorFlag,
}

impl<'s> ReportContext<'s> {
    /// Build a context for one run. `root_model` seeds the loop-protection
    /// stack when protection is enabled and the scheme's root type carries
    /// reference identity.
    pub fn new(
        scheme: &'s dyn ModelScheme,
        settings: ValidationSettings,
        root_model: Option<ModelRef<'_>>,
    ) -> Self {
        let root_path: Arc<str> = Arc::from("");
        let loop_stack = if settings.reference_loop_protection {
            let mut stack = Vec::new();
            if scheme.root_model_type().is_reference {
                if let Some(identity) = root_model.and_then(|model| model.identity()) {
                    stack.push((root_path.clone(), identity));
                }
            }
            Some(stack)
        } else {
            None
        };
        Self {
            scheme,
            fail_fast: settings.fail_fast,
            root_path,
            path_stack: Vec::new(),
            indexes: Vec::new(),
            errors: None,
            loop_stack,
            append_flag: ErrorFlag::new(),
            override_flag: ErrorFlag::new(),
        }
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Errors recorded so far, if any.
    pub fn errors(&self) -> Option<&IndexMap<Arc<str>, Vec<ErrorId>>> {
        self.errors.as_ref()
    }

    /// Consume the context into its final output.
    pub fn finish(self) -> ValidationOutput {
        let errors = self.errors.unwrap_or_default();
        ValidationOutput {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    fn current_path(&self) -> Arc<str> {
        self.path_stack
            .last()
            .map(|frame| frame.path.clone())
            .unwrap_or_else(|| self.root_path.clone())
    }

    /// The current path with collection indexes applied.
    fn current_resolved_path(&self) -> Arc<str> {
        let current = self.current_path();
        if self.indexes.is_empty() {
            current
        } else {
            self.scheme.path_with_indexes(&current, &self.indexes)
        }
    }
}

impl ValidationContext for ReportContext<'_> {
    fn enter_path(&mut self, segment: &str) {
        let base = self.current_path();
        let resolved = self.scheme.resolve_path(&base, segment);
        self.path_stack.push(PathFrame {
            path: resolved,
            collection_item: false,
        });
    }

    fn enter_collection_item_path(&mut self, index: usize) {
        let base = self.current_path();
        let resolved = self.scheme.resolve_path(&base, COLLECTION_ITEM_SEGMENT);
        self.path_stack.push(PathFrame {
            path: resolved,
            collection_item: true,
        });
        self.indexes.push(index);
    }

    fn leave_path(&mut self) {
        debug_assert!(!self.path_stack.is_empty(), "leave_path at the root");
        let depth = self.path_stack.len();
        let appended = self.append_flag.leave_level(depth);
        let overridden = self.override_flag.leave_level(depth);
        if appended.is_some() || overridden.is_some() {
            let path = self.current_resolved_path();
            let errors = self.errors.get_or_insert_with(IndexMap::new);
            if let Some(error_id) = appended {
                errors.entry(path.clone()).or_default().push(error_id);
            }
            if let Some(error_id) = overridden {
                let bucket = errors.entry(path).or_default();
                bucket.clear();
                bucket.push(error_id);
            }
        }
        if let Some(frame) = self.path_stack.pop() {
            if frame.collection_item {
                self.indexes.pop();
            }
        }
    }

    fn enter_scope(
        &mut self,
        scope_id: ScopeId,
        model: ModelRef<'_>,
    ) -> Result<(), TraversalError> {
        let mut pushed = false;
        if self.loop_stack.is_some() {
            if let Some(identity) = model.identity() {
                let first_seen = self.loop_stack.as_ref().and_then(|stack| {
                    stack
                        .iter()
                        .find(|(_, id)| *id == identity)
                        .map(|(path, _)| path.clone())
                });
                if let Some(first_seen) = first_seen {
                    return Err(TraversalError::ReferenceLoop(ReferenceLoopError {
                        type_name: model.type_name(),
                        path: Some(first_seen.to_string()),
                        nested_path: Some(self.current_resolved_path().to_string()),
                    }));
                }
                let path = self.current_resolved_path();
                if let Some(stack) = self.loop_stack.as_mut() {
                    stack.push((path, identity));
                    pushed = true;
                }
            }
        }

        let scheme = self.scheme;
        let scope = scheme.specification_scope(scope_id)?;
        let result = scope.validate(model, self);

        if pushed {
            if let Some(stack) = self.loop_stack.as_mut() {
                stack.pop();
            }
        }
        result
    }

    fn add_error(&mut self, error_id: ErrorId, skip_if_duplicate_in_path: bool) {
        let path = self.current_resolved_path();
        let depth = self.path_stack.len();
        let errors = self.errors.get_or_insert_with(IndexMap::new);
        let bucket = errors.entry(path).or_default();
        if !(skip_if_duplicate_in_path && bucket.contains(&error_id)) {
            bucket.push(error_id);
        }
        self.append_flag.set_detected(depth);
        self.override_flag.set_detected(depth);
    }

    fn enable_error_detection_mode(&mut self, mode: ErrorMode, error_id: ErrorId) {
        let depth = self.path_stack.len();
        match mode {
            ErrorMode::Append => self.append_flag.set_enabled(depth, error_id),
            ErrorMode::Override => self.override_flag.set_enabled(depth, error_id),
        }
    }

    fn should_fall_back(&self) -> bool {
        (self.fail_fast && self.errors.is_some())
            || self.override_flag.is_detected_at_any_level()
    }

    fn error_found(&self) -> bool {
        self.errors.is_some()
    }

    fn loop_protection_stack_count(&self) -> Option<usize> {
        self.loop_stack.as_ref().map(Vec::len)
    }
}

//! Boolean-only validation context.

use crate::error::{ReferenceLoopError, TraversalError};
use crate::scheme::{ErrorId, ModelRef, ModelScheme, ReferenceId, ScopeId};

use super::{ErrorMode, ValidationContext, ValidationSettings};

/// Validation context for the yes/no fast path.
///
/// Tracks no paths and allocates no error map: the first detected error
/// flips a single flag, and `should_fall_back` is that flag; any error
/// means "stop", since the caller only wants a boolean. Reference-loop
/// protection still works, but its error carries only the looping type;
/// callers needing the loop's location re-run through [`super::validate`].
pub struct IsValidContext<'s> {
    scheme: &'s dyn ModelScheme,
    error_found: bool,
    loop_stack: Option<Vec<ReferenceId>>,
}

impl<'s> IsValidContext<'s> {
    pub fn new(
        scheme: &'s dyn ModelScheme,
        reference_loop_protection: bool,
        root_model: Option<ModelRef<'_>>,
    ) -> Self {
        let loop_stack = if reference_loop_protection {
            let mut stack = Vec::new();
            if scheme.root_model_type().is_reference {
                if let Some(identity) = root_model.and_then(|model| model.identity()) {
                    stack.push(identity);
                }
            }
            Some(stack)
        } else {
            None
        };
        Self {
            scheme,
            error_found: false,
            loop_stack,
        }
    }

    /// Settings-compatible constructor; only the loop-protection knob
    /// applies here (any error already stops this context).
    pub fn with_settings(
        scheme: &'s dyn ModelScheme,
        settings: ValidationSettings,
        root_model: Option<ModelRef<'_>>,
    ) -> Self {
        Self::new(scheme, settings.reference_loop_protection, root_model)
    }
}

impl ValidationContext for IsValidContext<'_> {
    fn enter_path(&mut self, _segment: &str) {}

    fn enter_collection_item_path(&mut self, _index: usize) {}

    fn leave_path(&mut self) {}

    fn enter_scope(
        &mut self,
        scope_id: ScopeId,
        model: ModelRef<'_>,
    ) -> Result<(), TraversalError> {
        let mut pushed = false;
        if let Some(stack) = self.loop_stack.as_mut() {
            if let Some(identity) = model.identity() {
                if stack.contains(&identity) {
                    return Err(TraversalError::ReferenceLoop(ReferenceLoopError {
                        type_name: model.type_name(),
                        path: None,
                        nested_path: None,
                    }));
                }
                stack.push(identity);
                pushed = true;
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

    fn add_error(&mut self, _error_id: ErrorId, _skip_if_duplicate_in_path: bool) {
        self.error_found = true;
    }

    fn enable_error_detection_mode(&mut self, _mode: ErrorMode, _error_id: ErrorId) {}

    fn should_fall_back(&self) -> bool {
        self.error_found
    }

    fn error_found(&self) -> bool {
        self.error_found
    }

    fn loop_protection_stack_count(&self) -> Option<usize> {
        self.loop_stack.as_ref().map(Vec::len)
    }
}

//! Handle types and traits at the model-scheme boundary.
//!
//! A specification is compiled (outside this crate) into a model scheme:
//! the lookup structure holding specification scopes, memoized path joins
//! and the error registry. The traversal core consumes the scheme through
//! [`ModelScheme`] and drives the scopes it hands out; during discovery,
//! before a scheme exists, the builder side is consumed through
//! [`DiscoveryActions`] instead.
//!
//! Scopes are polymorphic over the model type they validate. At the
//! traversal boundary they appear behind the non-generic
//! [`SpecificationScope`] trait taking an opaque [`ModelRef`]; the strongly
//! typed entry points are instantiated per concrete type at scheme-build
//! time, not through runtime reflection.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::sync::Arc;

use crate::discovery::DiscoveryContext;
use crate::error::TraversalError;
use crate::messages::Arg;
use crate::validate::ValidationContext;

/// Handle of a specification scope within one model scheme.
pub type ScopeId = usize;

/// Handle of a registered error within one model scheme.
pub type ErrorId = usize;

/// Message key of the error registered when discovery breaks a structural
/// reference loop.
pub const REFERENCE_LOOP_MESSAGE_KEY: &str = "Global.ReferenceLoop";

// =============================================================================
// TypeInfo / ModelRef
// =============================================================================

/// Static description of a model type as the scheme sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_id: TypeId,
    pub name: &'static str,
    /// Whether values of this type carry reference identity (and therefore
    /// participate in loop protection).
    pub is_reference: bool,
}

impl TypeInfo {
    pub fn reference<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            is_reference: true,
        }
    }

    pub fn value<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            is_reference: false,
        }
    }
}

/// Identity token of a model reference, compared by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceId(usize);

/// Type-erased borrow of a model value, as passed between scopes and
/// contexts.
///
/// [`ModelRef::reference`] carries an identity token and participates in
/// reference-loop protection; [`ModelRef::value`] does not, since
/// value-typed models cannot form loops.
#[derive(Debug, Clone, Copy)]
pub struct ModelRef<'m> {
    any: &'m dyn Any,
    type_name: &'static str,
    identity: Option<ReferenceId>,
}

impl<'m> ModelRef<'m> {
    /// Borrow a reference-typed model, with identity.
    pub fn reference<T: Any>(model: &'m T) -> Self {
        Self {
            any: model,
            type_name: std::any::type_name::<T>(),
            identity: Some(ReferenceId(model as *const T as usize)),
        }
    }

    /// Borrow a value-typed model, without identity.
    pub fn value<T: Any>(model: &'m T) -> Self {
        Self {
            any: model,
            type_name: std::any::type_name::<T>(),
            identity: None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'m T> {
        self.any.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn identity(&self) -> Option<ReferenceId> {
        self.identity
    }
}

// =============================================================================
// ErrorDefinition
// =============================================================================

/// Content of a registered error: ordered message keys plus the arguments
/// substituted into the resolved templates.
///
/// Registered once per scheme through [`DiscoveryActions::register_error`];
/// traversals afterwards refer to it only by its [`ErrorId`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDefinition {
    pub message_keys: Vec<Cow<'static, str>>,
    pub args: Vec<Arg>,
}

impl ErrorDefinition {
    pub fn new<I, K>(message_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        Self {
            message_keys: message_keys.into_iter().map(Into::into).collect(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    /// The error registered when discovery breaks a structural reference
    /// loop in the specification graph.
    pub fn reference_loop(type_name: &'static str) -> Self {
        Self {
            message_keys: vec![Cow::Borrowed(REFERENCE_LOOP_MESSAGE_KEY)],
            args: vec![Arg::type_name("type", type_name)],
        }
    }
}

// =============================================================================
// Boundary traits
// =============================================================================

/// One unit of validation logic, identified by a [`ScopeId`].
///
/// Scopes are supplied by the model scheme; the core never constructs them.
pub trait SpecificationScope {
    /// Statically enumerate reachable paths and registrable errors.
    fn discover(&self, context: &mut DiscoveryContext<'_>) -> Result<(), TraversalError>;

    /// Validate a model instance against this scope.
    fn validate(
        &self,
        model: ModelRef<'_>,
        context: &mut dyn ValidationContext,
    ) -> Result<(), TraversalError>;
}

/// The compiled lookup structure validation contexts run against.
pub trait ModelScheme {
    /// Memoized dotted-path join; repeated (base, segment) pairs across
    /// model instances reuse prior allocations. An empty segment resolves
    /// to `base` itself.
    fn resolve_path(&self, base: &str, segment: &str) -> Arc<str>;

    /// Apply concrete collection indexes to a path holding `#`
    /// placeholders, most-recently-entered placeholder first.
    fn path_with_indexes(&self, path: &str, indexes: &[usize]) -> Arc<str>;

    /// Look up a scope; an unknown ID is an inconsistent scheme and is
    /// propagated, never defaulted.
    fn specification_scope(&self, scope_id: ScopeId)
    -> Result<&dyn SpecificationScope, TraversalError>;

    fn root_model_type(&self) -> TypeInfo;

    fn root_specification_scope_id(&self) -> ScopeId;
}

/// Builder-side collaborator for discovery, before a scheme exists.
pub trait DiscoveryActions {
    /// Register an error, returning its handle. Each call registers anew;
    /// deduplication is the caller's concern.
    fn register_error(&self, error: ErrorDefinition) -> ErrorId;

    /// Look up a scope for discovery; unknown IDs propagate.
    fn discoverable_scope(&self, scope_id: ScopeId)
    -> Result<&dyn SpecificationScope, TraversalError>;
}

#![allow(dead_code)]
//! Shared stub collaborators for the integration suites.
//!
//! A real engine compiles specifications into a scheme; the suites here
//! hand-build the minimum: a memoizing path-join scheme, closure-backed
//! scopes, and an interior-mutability error registrar for discovery.

use std::cell::RefCell;
use std::sync::Arc;

use ahash::AHashMap;
use verita::path::{apply_index_to_path, resolve_next_level_path};
use verita::{
    DiscoveryActions, DiscoveryContext, ErrorDefinition, ErrorId, ModelRef, ModelScheme, ScopeId,
    SpecificationScope, TraversalError, TypeInfo, ValidationContext,
};

// =============================================================================
// StubScheme
// =============================================================================

/// Minimal model scheme: scope table plus memoized path joins.
pub struct StubScheme {
    scopes: AHashMap<ScopeId, Box<dyn SpecificationScope>>,
    root_scope_id: ScopeId,
    root_type: TypeInfo,
    joined: RefCell<AHashMap<(String, String), Arc<str>>>,
    indexed: RefCell<AHashMap<(String, Vec<usize>), Arc<str>>>,
}

impl StubScheme {
    pub fn new(root_type: TypeInfo, root_scope_id: ScopeId) -> Self {
        Self {
            scopes: AHashMap::new(),
            root_scope_id,
            root_type,
            joined: RefCell::new(AHashMap::new()),
            indexed: RefCell::new(AHashMap::new()),
        }
    }

    pub fn insert_scope(&mut self, scope_id: ScopeId, scope: Box<dyn SpecificationScope>) {
        self.scopes.insert(scope_id, scope);
    }
}

impl ModelScheme for StubScheme {
    fn resolve_path(&self, base: &str, segment: &str) -> Arc<str> {
        let key = (base.to_string(), segment.to_string());
        if let Some(found) = self.joined.borrow().get(&key) {
            return found.clone();
        }
        let resolved: Arc<str> = Arc::from(resolve_next_level_path(base, segment));
        self.joined.borrow_mut().insert(key, resolved.clone());
        resolved
    }

    fn path_with_indexes(&self, path: &str, indexes: &[usize]) -> Arc<str> {
        let key = (path.to_string(), indexes.to_vec());
        if let Some(found) = self.indexed.borrow().get(&key) {
            return found.clone();
        }
        let mut resolved = path.to_string();
        for &index in indexes.iter().rev() {
            resolved = apply_index_to_path(&resolved, index);
        }
        let resolved: Arc<str> = Arc::from(resolved);
        self.indexed.borrow_mut().insert(key, resolved.clone());
        resolved
    }

    fn specification_scope(
        &self,
        scope_id: ScopeId,
    ) -> Result<&dyn SpecificationScope, TraversalError> {
        self.scopes
            .get(&scope_id)
            .map(|scope| scope.as_ref())
            .ok_or(TraversalError::UnknownScope { scope_id })
    }

    fn root_model_type(&self) -> TypeInfo {
        self.root_type
    }

    fn root_specification_scope_id(&self) -> ScopeId {
        self.root_scope_id
    }
}

// =============================================================================
// FnScope
// =============================================================================

type ValidateFn = dyn Fn(ModelRef<'_>, &mut dyn ValidationContext) -> Result<(), TraversalError>;
type DiscoverFn = dyn Fn(&mut DiscoveryContext<'_>) -> Result<(), TraversalError>;

/// Closure-backed specification scope.
pub struct FnScope {
    validate: Box<ValidateFn>,
    discover: Box<DiscoverFn>,
}

impl FnScope {
    pub fn validating(
        f: impl Fn(ModelRef<'_>, &mut dyn ValidationContext) -> Result<(), TraversalError> + 'static,
    ) -> Self {
        Self {
            validate: Box::new(f),
            discover: Box::new(|_| Ok(())),
        }
    }

    pub fn discovering(
        f: impl Fn(&mut DiscoveryContext<'_>) -> Result<(), TraversalError> + 'static,
    ) -> Self {
        Self {
            validate: Box::new(|_, _| Ok(())),
            discover: Box::new(f),
        }
    }
}

impl SpecificationScope for FnScope {
    fn discover(&self, context: &mut DiscoveryContext<'_>) -> Result<(), TraversalError> {
        (self.discover)(context)
    }

    fn validate(
        &self,
        model: ModelRef<'_>,
        context: &mut dyn ValidationContext,
    ) -> Result<(), TraversalError> {
        (self.validate)(model, context)
    }
}

// =============================================================================
// StubActions
// =============================================================================

/// Discovery collaborator recording registered errors in order.
#[derive(Default)]
pub struct StubActions {
    scopes: AHashMap<ScopeId, Box<dyn SpecificationScope>>,
    registered: RefCell<Vec<ErrorDefinition>>,
}

impl StubActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scope(&mut self, scope_id: ScopeId, scope: Box<dyn SpecificationScope>) {
        self.scopes.insert(scope_id, scope);
    }

    pub fn registered(&self) -> Vec<ErrorDefinition> {
        self.registered.borrow().clone()
    }
}

impl DiscoveryActions for StubActions {
    fn register_error(&self, error: ErrorDefinition) -> ErrorId {
        let mut registered = self.registered.borrow_mut();
        registered.push(error);
        registered.len() - 1
    }

    fn discoverable_scope(
        &self,
        scope_id: ScopeId,
    ) -> Result<&dyn SpecificationScope, TraversalError> {
        self.scopes
            .get(&scope_id)
            .map(|scope| scope.as_ref())
            .ok_or(TraversalError::UnknownScope { scope_id })
    }
}

//! Dry-run traversal over the specification graph.
//!
//! Discovery walks the scopes with no model instance, enumerating every
//! statically reachable path together with the error IDs that can occur
//! there (the tables a model scheme needs for runtime path resolution),
//! and detecting type-structural reference loops: specifications that
//! recurse into themselves with no base case and would never terminate on
//! any instance.
//!
//! A structural loop is not fatal: it is broken, registered as a regular
//! validation error at the path reached, and discovery continues. Detection
//! is deliberately conservative. It tracks (type, scope) pairs on the
//! active descent, not instances, so a guard that would terminate on a
//! concrete acyclic value still counts as a loop.

use std::any::{Any, TypeId};

use ahash::{AHashMap, AHashSet};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::TraversalError;
use crate::path::{COLLECTION_ITEM_SEGMENT, resolve_next_level_path};
use crate::scheme::{DiscoveryActions, ErrorDefinition, ErrorId, ScopeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiscoveryFrame {
    type_id: TypeId,
    scope_id: ScopeId,
}

/// Everything discovery learned about one specification graph.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutput {
    /// Error IDs that can occur at each reachable path, in declaration
    /// order. Collection segments appear as the bare `#` placeholder.
    pub errors: IndexMap<String, Vec<ErrorId>>,
    /// `(base, segment) → resolved` join table for scheme construction.
    pub paths: AHashMap<String, AHashMap<String, String>>,
    /// Distinct paths at which a structural loop was broken.
    pub infinite_references_loop_roots: IndexSet<String>,
}

/// Traversal context for one discovery run.
pub struct DiscoveryContext<'a> {
    actions: &'a dyn DiscoveryActions,
    path_stack: Vec<String>,
    errors: IndexMap<String, Vec<ErrorId>>,
    paths: AHashMap<String, AHashMap<String, String>>,
    discovery_stack: Vec<DiscoveryFrame>,
    infinite_references_loop_roots: IndexSet<String>,
    flagged: AHashSet<(String, TypeId)>,
}

impl<'a> DiscoveryContext<'a> {
    pub fn new(actions: &'a dyn DiscoveryActions) -> Self {
        Self {
            actions,
            path_stack: Vec::new(),
            errors: IndexMap::new(),
            paths: AHashMap::new(),
            discovery_stack: Vec::new(),
            infinite_references_loop_roots: IndexSet::new(),
            flagged: AHashSet::new(),
        }
    }

    /// The path discovery is currently at; the empty string is the root.
    pub fn current_path(&self) -> &str {
        self.path_stack.last().map(String::as_str).unwrap_or("")
    }

    pub fn errors(&self) -> &IndexMap<String, Vec<ErrorId>> {
        &self.errors
    }

    pub fn paths(&self) -> &AHashMap<String, AHashMap<String, String>> {
        &self.paths
    }

    pub fn infinite_references_loop_roots(&self) -> &IndexSet<String> {
        &self.infinite_references_loop_roots
    }

    /// Descend into a named member. An empty segment keeps the current
    /// path; a frame is still pushed so [`Self::leave_path`] stays
    /// symmetric.
    pub fn enter_path(&mut self, segment: &str) {
        let base = self.current_path().to_string();
        let resolved = resolve_next_level_path(&base, segment);
        if !segment.is_empty() {
            self.paths
                .entry(base)
                .or_default()
                .insert(segment.to_string(), resolved.clone());
        }
        self.path_stack.push(resolved);
    }

    /// Descend into a collection item. Discovery has no concrete index and
    /// records the bare `#` placeholder.
    pub fn enter_collection_item_path(&mut self) {
        self.enter_path(COLLECTION_ITEM_SEGMENT);
    }

    pub fn leave_path(&mut self) {
        debug_assert!(!self.path_stack.is_empty(), "leave_path at the root");
        self.path_stack.pop();
    }

    /// Register an error with the scheme builder, returning its handle.
    pub fn register_error(&mut self, error: ErrorDefinition) -> ErrorId {
        self.actions.register_error(error)
    }

    /// Record `error_id` at the current path. With the skip flag set the ID
    /// is only added when not already present under this exact path.
    pub fn add_error(&mut self, error_id: ErrorId, skip_if_duplicate_in_path: bool) {
        let path = self.current_path().to_string();
        let bucket = self.errors.entry(path).or_default();
        if skip_if_duplicate_in_path && bucket.contains(&error_id) {
            return;
        }
        bucket.push(error_id);
    }

    /// Descend into the scope validating models of type `T`.
    ///
    /// If the `(T, scope_id)` pair is already on the active descent (true
    /// recursion, not merely "seen before and finished"), the loop is
    /// broken: a reference-loop error is registered and recorded at the
    /// current path, the path joins the loop-root set, and discovery does
    /// not recurse further.
    pub fn enter_scope<T: Any>(&mut self, scope_id: ScopeId) -> Result<(), TraversalError> {
        let type_id = TypeId::of::<T>();
        let recursing = self
            .discovery_stack
            .iter()
            .any(|frame| frame.type_id == type_id && frame.scope_id == scope_id);
        if recursing {
            let type_name = std::any::type_name::<T>();
            let path = self.current_path().to_string();
            debug!(%path, type_name, scope_id, "structural reference loop broken");
            if self.flagged.insert((path.clone(), type_id)) {
                let error_id = self
                    .actions
                    .register_error(ErrorDefinition::reference_loop(type_name));
                self.add_error(error_id, false);
            }
            self.infinite_references_loop_roots.insert(path);
            return Ok(());
        }

        let actions = self.actions;
        let scope = actions.discoverable_scope(scope_id)?;
        self.discovery_stack.push(DiscoveryFrame { type_id, scope_id });
        let result = scope.discover(self);
        self.discovery_stack.pop();
        result
    }

    pub fn finish(self) -> DiscoveryOutput {
        DiscoveryOutput {
            errors: self.errors,
            paths: self.paths,
            infinite_references_loop_roots: self.infinite_references_loop_roots,
        }
    }
}

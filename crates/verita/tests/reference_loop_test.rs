//! Reference-loop protection on cyclic model graphs.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{FnScope, StubScheme};
use verita::{
    ModelRef, TraversalError, TypeInfo, ValidationContext, ValidationSettings, is_valid, validate,
};

struct Node {
    next: RefCell<Option<Rc<Node>>>,
}

/// Scheme whose single scope follows `Next` edges. `max_depth` stands in
/// for an instance-level guard, so runs without loop protection terminate.
fn node_scheme(max_depth: usize) -> StubScheme {
    let depth = Cell::new(0usize);
    let mut scheme = StubScheme::new(TypeInfo::reference::<Node>(), 0);
    scheme.insert_scope(
        0,
        Box::new(FnScope::validating(move |model, ctx| {
            if depth.get() >= max_depth {
                return Ok(());
            }
            let node = model.downcast_ref::<Node>().expect("node model");
            let next = node.next.borrow();
            if let Some(next) = next.as_ref() {
                depth.set(depth.get() + 1);
                ctx.enter_path("Next");
                let result = ctx.enter_scope(0, ModelRef::reference(&**next));
                ctx.leave_path();
                depth.set(depth.get() - 1);
                result?;
            }
            Ok(())
        })),
    );
    scheme
}

fn self_looping_node() -> Rc<Node> {
    let node = Rc::new(Node {
        next: RefCell::new(None),
    });
    *node.next.borrow_mut() = Some(node.clone());
    node
}

#[test]
fn test_full_context_reports_loop_with_paths() {
    let node = self_looping_node();
    let scheme = node_scheme(usize::MAX);
    let settings = ValidationSettings {
        reference_loop_protection: true,
        ..Default::default()
    };

    let result = validate(&scheme, ModelRef::reference(&*node), settings);
    match result {
        Err(TraversalError::ReferenceLoop(error)) => {
            assert_eq!(error.type_name, std::any::type_name::<Node>());
            assert_eq!(error.path.as_deref(), Some(""));
            assert_eq!(error.nested_path.as_deref(), Some("Next"));
        }
        other => panic!("expected a reference loop, got {other:?}"),
    }

    *node.next.borrow_mut() = None;
}

#[test]
fn test_is_valid_reports_loop_without_paths() {
    let node = self_looping_node();
    let scheme = node_scheme(usize::MAX);

    let result = is_valid(&scheme, ModelRef::reference(&*node), true);
    match result {
        Err(TraversalError::ReferenceLoop(error)) => {
            assert_eq!(error.type_name, std::any::type_name::<Node>());
            assert_eq!(error.path, None, "the fast path tracks no locations");
            assert_eq!(error.nested_path, None);
        }
        other => panic!("expected a reference loop, got {other:?}"),
    }

    *node.next.borrow_mut() = None;
}

#[test]
fn test_disabled_protection_does_not_interfere() {
    let node = self_looping_node();
    // The scope's own guard stops the descent; without it the run would
    // recurse without bound, a risk the caller explicitly opted into.
    let scheme = node_scheme(8);

    let output = validate(
        &scheme,
        ModelRef::reference(&*node),
        ValidationSettings::default(),
    )
    .expect("no loop protection, no loop error");
    assert!(output.is_valid);

    assert!(is_valid(&scheme, ModelRef::reference(&*node), false).expect("traversal"));

    *node.next.borrow_mut() = None;
}

#[test]
fn test_acyclic_chain_passes_with_protection() {
    let tail = Rc::new(Node {
        next: RefCell::new(None),
    });
    let head = Rc::new(Node {
        next: RefCell::new(Some(tail)),
    });
    let scheme = node_scheme(usize::MAX);
    let settings = ValidationSettings {
        reference_loop_protection: true,
        ..Default::default()
    };

    let output = validate(&scheme, ModelRef::reference(&*head), settings).expect("traversal");
    assert!(output.is_valid);
}

#[test]
fn test_two_node_cycle_reports_first_seen_path() {
    let a = Rc::new(Node {
        next: RefCell::new(None),
    });
    let b = Rc::new(Node {
        next: RefCell::new(Some(a.clone())),
    });
    *a.next.borrow_mut() = Some(b.clone());

    let scheme = node_scheme(usize::MAX);
    let settings = ValidationSettings {
        reference_loop_protection: true,
        ..Default::default()
    };

    let result = validate(&scheme, ModelRef::reference(&*a), settings);
    match result {
        Err(TraversalError::ReferenceLoop(error)) => {
            assert_eq!(error.path.as_deref(), Some(""), "a was first seen at the root");
            assert_eq!(error.nested_path.as_deref(), Some("Next.Next"));
        }
        other => panic!("expected a reference loop, got {other:?}"),
    }

    *a.next.borrow_mut() = None;
}

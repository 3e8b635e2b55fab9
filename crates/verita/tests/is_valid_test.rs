//! The boolean-only fast path.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{FnScope, StubScheme};
use verita::{
    ErrorMode, IsValidContext, ModelRef, TypeInfo, ValidationContext, ValidationSettings, is_valid,
};

#[test]
fn test_first_error_stops_further_rules() {
    let evaluated = Rc::new(Cell::new(0usize));
    let seen = evaluated.clone();
    let mut scheme = StubScheme::new(TypeInfo::value::<i64>(), 0);
    scheme.insert_scope(
        0,
        Box::new(FnScope::validating(move |model, ctx| {
            let value = *model.downcast_ref::<i64>().expect("i64 model");
            for error_id in [1, 2, 3] {
                if ctx.should_fall_back() {
                    break;
                }
                seen.set(seen.get() + 1);
                if value < 0 {
                    ctx.add_error(error_id, false);
                }
            }
            Ok(())
        })),
    );

    let model = -1i64;
    assert!(!is_valid(&scheme, ModelRef::value(&model), false).expect("traversal"));
    assert_eq!(evaluated.get(), 1, "the second and third rules are skipped");

    evaluated.set(0);
    let model = 1i64;
    assert!(is_valid(&scheme, ModelRef::value(&model), false).expect("traversal"));
    assert_eq!(evaluated.get(), 3);
}

#[test]
fn test_path_and_mode_operations_are_inert() {
    let scheme = StubScheme::new(TypeInfo::value::<i64>(), 0);
    let mut ctx = IsValidContext::new(&scheme, false, None);

    ctx.enter_path("A");
    ctx.enter_collection_item_path(3);
    ctx.enable_error_detection_mode(ErrorMode::Override, 9);
    ctx.leave_path();
    ctx.leave_path();
    assert!(!ctx.error_found());
    assert!(!ctx.should_fall_back());

    ctx.add_error(1, true);
    assert!(ctx.error_found());
    assert!(ctx.should_fall_back(), "any error means stop here");
}

#[test]
fn test_loop_protection_stack_count_reporting() {
    struct Root;
    let scheme = StubScheme::new(TypeInfo::reference::<Root>(), 0);

    let ctx = IsValidContext::new(&scheme, false, None);
    assert_eq!(ctx.loop_protection_stack_count(), None);

    let ctx = IsValidContext::new(&scheme, true, None);
    assert_eq!(ctx.loop_protection_stack_count(), Some(0));

    let root = Root;
    let ctx = IsValidContext::new(&scheme, true, Some(ModelRef::reference(&root)));
    assert_eq!(ctx.loop_protection_stack_count(), Some(1));
}

#[test]
fn test_settings_constructor_only_reads_loop_protection() {
    let scheme = StubScheme::new(TypeInfo::value::<i64>(), 0);
    let settings = ValidationSettings {
        fail_fast: false,
        reference_loop_protection: true,
    };
    let ctx = IsValidContext::with_settings(&scheme, settings, None);
    assert_eq!(ctx.loop_protection_stack_count(), Some(0));
}

#![allow(clippy::expect_used, reason = "Tests use expect_err for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use slot_object::{ClassBuilder, ObjErrorKind};

use crate::{Configuration, ObjectSpace};

use super::*;

/// A space with one class whose `friendly` fallback returns `self.name`.
fn greeter_space() -> (ObjectSpace, ClassId) {
    let space = ObjectSpace::new();
    let greeter = space
        .define_class(
            ClassBuilder::new("Greeter").fallback("friendly", |this, _| this.get("name", &[])),
        )
        .unwrap_or_else(|e| panic!("{e}"));
    (space, greeter)
}

fn build_named(space: &ObjectSpace, class: ClassId, name: &str) -> Instance {
    space
        .build(class, Configuration::new().slot("name", name))
        .unwrap_or_else(|e| panic!("{e}"))
}

fn resolve(space: &ObjectSpace, instance: &mut Instance, name: &str, args: &[Value]) -> Option<Value> {
    space
        .resolve(instance, name, args)
        .unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn test_fallback_answers_when_no_own_slot() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    assert_eq!(resolve(&space, &mut obj, "friendly", &[]), Some(Value::string("foo")));
}

#[test]
fn test_literal_slot_masks_fallback_and_ignores_args() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space.set(&mut obj, "friendly", "Bar").unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(resolve(&space, &mut obj, "friendly", &[]), Some(Value::string("Bar")));
    assert_eq!(
        resolve(&space, &mut obj, "friendly", &[Value::int(1), Value::string("x")]),
        Some(Value::string("Bar"))
    );
}

#[test]
fn test_callable_slot_can_call_class_fallback() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "friendly",
            Callable::new(|this, _| {
                let inner = this.call_fallback("friendly", &[])?;
                Ok(inner.and_then(|v| v.as_str().map(str::to_uppercase)).map(Value::from))
            }),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(resolve(&space, &mut obj, "friendly", &[]), Some(Value::string("FOO")));

    space.clear(&mut obj, "friendly");
    assert_eq!(resolve(&space, &mut obj, "friendly", &[]), Some(Value::string("foo")));
}

#[test]
fn test_callable_slot_runs_on_every_call() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "tick",
            Callable::new(|_, args| {
                let n = CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Value::list(vec![Value::from(n as i64), Value::from(args.len() as i64)])))
            }),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    let first = resolve(&space, &mut obj, "tick", &[Value::int(7)]);
    let second = resolve(&space, &mut obj, "tick", &[]);
    assert_eq!(first, Some(Value::list(vec![Value::int(0), Value::int(1)])));
    assert_eq!(second, Some(Value::list(vec![Value::int(1), Value::int(0)])));
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unknown_name_is_empty_not_error() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    assert_eq!(space.resolve(&mut obj, "never_defined", &[]), Ok(None));
    // Known to the interner, but not defined on this instance or class
    space.interner().intern("elsewhere");
    assert_eq!(space.resolve(&mut obj, "elsewhere", &[]), Ok(None));
}

#[test]
fn test_explicit_fallback_skips_own_slot() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space.set(&mut obj, "friendly", "Bar").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        space.invoke_fallback(&mut obj, "friendly", &[]),
        Ok(Some(Value::string("foo")))
    );
}

#[test]
fn test_explicit_fallback_miss_is_error() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    let err = space
        .invoke_fallback(&mut obj, "name", &[])
        .expect_err("name has no fallback");
    assert_eq!(
        err.kind,
        ObjErrorKind::MissingFallback {
            name: "name".to_string(),
            class: "Greeter".to_string(),
        }
    );
}

#[test]
fn test_missing_fallback_inside_callable_carries_backtrace() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "broken",
            Callable::new(|this, _| this.call_fallback("absent", &[])),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    let err = space
        .resolve(&mut obj, "broken", &[])
        .expect_err("missing fallback propagates");
    assert!(matches!(err.kind, ObjErrorKind::MissingFallback { .. }));
    let trace = err.trace.expect("backtrace attached");
    assert_eq!(trace.len(), 1);
    assert_eq!(trace.frames()[0].name, "broken");
}

#[test]
fn test_call_super_reaches_ancestor_fallback() {
    let space = ObjectSpace::new();
    let base = space
        .define_class(
            ClassBuilder::new("Base").fallback("describe", |_, _| Ok(Some(Value::string("base")))),
        )
        .unwrap_or_else(|e| panic!("{e}"));
    let derived = space
        .define_class(ClassBuilder::new("Derived").extends(base).fallback(
            "describe",
            |this, args| {
                let parent = this.call_super("describe", args)?;
                let parent = parent.and_then(|v| v.as_str().map(str::to_string));
                Ok(parent.map(|p| Value::from(format!("derived+{p}"))))
            },
        ))
        .unwrap_or_else(|e| panic!("{e}"));

    let mut obj = Instance::new(derived);
    assert_eq!(
        resolve(&space, &mut obj, "describe", &[]),
        Some(Value::string("derived+base"))
    );
}

#[test]
fn test_call_super_without_ancestor_definition_fails() {
    let space = ObjectSpace::new();
    let base = space
        .define_class(ClassBuilder::new("Base"))
        .unwrap_or_else(|e| panic!("{e}"));
    let derived = space
        .define_class(
            ClassBuilder::new("Derived")
                .extends(base)
                .fallback("describe", |this, args| this.call_super("describe", args)),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    let mut obj = Instance::new(derived);
    let err = space
        .resolve(&mut obj, "describe", &[])
        .expect_err("no ancestor defines describe");
    assert_eq!(
        err.kind,
        ObjErrorKind::MissingFallback {
            name: "describe".to_string(),
            class: "Base".to_string(),
        }
    );
}

#[test]
fn test_call_super_from_slot_is_rejected() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "eager",
            Callable::new(|this, _| this.call_super("friendly", &[])),
        )
        .unwrap_or_else(|e| panic!("{e}"));
    let err = space
        .resolve(&mut obj, "eager", &[])
        .expect_err("no running fallback");
    assert_eq!(
        err.kind,
        ObjErrorKind::SuperOutsideFallback {
            name: "friendly".to_string(),
        }
    );
}

#[test]
fn test_self_recursive_callable_hits_depth_limit() {
    let space = ObjectSpace::builder().max_call_depth(Some(16)).build();
    let class = space
        .define_class(ClassBuilder::new("Loop").fallback("spin", |this, _| this.get("spin", &[])))
        .unwrap_or_else(|e| panic!("{e}"));
    let mut obj = Instance::new(class);

    let err = space
        .resolve(&mut obj, "spin", &[])
        .expect_err("unbounded recursion");
    assert_eq!(err.kind, ObjErrorKind::StackOverflow { depth: 16 });
    assert_eq!(err.trace.map(|t| t.len()), Some(16));
}

#[test]
fn test_callable_may_mutate_its_instance() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "rename",
            Callable::new(|this, args| {
                let new_name = args.first().cloned().unwrap_or_else(|| Value::string(""));
                Ok(Some(this.set("name", Slot::from(new_name))?.into_value()))
            }),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    resolve(&space, &mut obj, "rename", &[Value::string("baz")]);
    assert_eq!(resolve(&space, &mut obj, "friendly", &[]), Some(Value::string("baz")));
}

#[test]
fn test_call_surface_dispatches_by_spelling() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");

    assert_eq!(
        space.call(&mut obj, "friendly_SET", &[Value::string("Bar")]),
        Ok(Some(Value::string("Bar")))
    );
    assert_eq!(space.call(&mut obj, "friendly", &[]), Ok(Some(Value::string("Bar"))));
    assert_eq!(space.call(&mut obj, "_friendly", &[]), Ok(Some(Value::string("foo"))));
    assert_eq!(
        space.call(&mut obj, "friendly_CLEAR", &[]),
        Ok(Some(Value::string("Bar")))
    );
    assert_eq!(space.call(&mut obj, "friendly_CLEAR", &[]), Ok(None));
    assert_eq!(space.call(&mut obj, "friendly", &[]), Ok(Some(Value::string("foo"))));
}

#[test]
fn test_set_through_call_surface_requires_one_argument() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    let err = space
        .call(&mut obj, "name_SET", &[])
        .expect_err("no value to set");
    assert_eq!(
        err.kind,
        ObjErrorKind::ArityMismatch {
            name: "name_SET".to_string(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn test_receiver_can_sees_fallbacks_and_slots() {
    let space = ObjectSpace::new();
    let class = space
        .define_class(ClassBuilder::new("Inspector").fallback("report", |this, _| {
            Ok(Some(Value::list(vec![
                Value::from(this.can("report")),
                Value::from(this.can("name")),
                Value::from(this.can("missing")),
            ])))
        }))
        .unwrap_or_else(|e| panic!("{e}"));
    let mut obj = build_named(&space, class, "p");

    assert_eq!(
        resolve(&space, &mut obj, "report", &[]),
        Some(Value::list(vec![
            Value::from(true),
            Value::from(true),
            Value::from(false),
        ]))
    );
}

#[test]
fn test_set_rejects_reserved_prefix() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");

    let err = space
        .set(&mut obj, "_other", 2_i64)
        .expect_err("reserved name");
    assert_eq!(
        err.kind,
        ObjErrorKind::ReservedName {
            name: "_other".to_string(),
        }
    );
    assert_eq!(space.resolve(&mut obj, "_other", &[]), Ok(None));
    assert_eq!(obj.store().len(), 1);
}

#[test]
fn test_receiver_set_rejects_reserved_prefix() {
    let (space, greeter) = greeter_space();
    let mut obj = build_named(&space, greeter, "foo");
    space
        .set(
            &mut obj,
            "sneaky",
            Callable::new(|this, _| Ok(Some(this.set("_hidden", Slot::from(1_i64))?.into_value()))),
        )
        .unwrap_or_else(|e| panic!("{e}"));

    let err = space
        .resolve(&mut obj, "sneaky", &[])
        .expect_err("reserved name");
    assert!(matches!(err.kind, ObjErrorKind::ReservedName { .. }));
    assert!(obj.store().get(space.interner().intern("_hidden")).is_none());
}

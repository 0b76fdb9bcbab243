use pretty_assertions::assert_eq;
use slot_ir::StringInterner;
use slot_object::{ClassBuilder, ObjErrorKind};

use super::*;

fn constant(text: &'static str) -> Callable {
    Callable::new(move |_, _| Ok(Some(Value::string(text))))
}

/// `Animal <- Dog <- Puppy`, with `speak` on Animal and Dog.
fn hierarchy(interner: &StringInterner) -> (ClassRegistry, [ClassId; 3]) {
    let mut registry = ClassRegistry::new();
    let animal = registry
        .register(
            ClassBuilder::new("Animal")
                .fallback_callable("speak", constant("..."))
                .fallback_callable("legs", constant("four")),
            interner,
        )
        .unwrap_or_else(|e| panic!("{e}"));
    let dog = registry
        .register(
            ClassBuilder::new("Dog")
                .extends(animal)
                .fallback_callable("speak", constant("woof")),
            interner,
        )
        .unwrap_or_else(|e| panic!("{e}"));
    let puppy = registry
        .register(ClassBuilder::new("Puppy").extends(dog), interner)
        .unwrap_or_else(|e| panic!("{e}"));
    (registry, [animal, dog, puppy])
}

#[test]
fn test_probe_returns_nearest_definition() {
    let interner = StringInterner::new();
    let (registry, [animal, dog, puppy]) = hierarchy(&interner);

    let speak = interner.intern("speak");
    let legs = interner.intern("legs");

    let hit = probe(&registry, puppy, speak).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(hit.map(|h| h.defined_in), Some(dog));

    let hit = probe(&registry, puppy, legs).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(hit.map(|h| h.defined_in), Some(animal));

    let hit = probe(&registry, animal, speak).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(hit.map(|h| h.defined_in), Some(animal));
}

#[test]
fn test_probe_miss_is_none() {
    let interner = StringInterner::new();
    let (registry, [_, _, puppy]) = hierarchy(&interner);
    let fly = interner.intern("fly");
    assert!(matches!(probe(&registry, puppy, fly), Ok(None)));
}

#[test]
fn test_probe_unknown_class_fails() {
    let interner = StringInterner::new();
    let (registry, _) = hierarchy(&interner);

    let mut other = ClassRegistry::new();
    for name in ["A", "B", "C", "D"] {
        other
            .register(ClassBuilder::new(name), &interner)
            .unwrap_or_else(|e| panic!("{e}"));
    }
    let foreign = other
        .lookup(interner.intern("D"))
        .unwrap_or_else(|| panic!("D registered"));

    let err = probe(&registry, foreign, interner.intern("speak")).map(|hit| hit.is_some());
    assert_eq!(
        err.map_err(|e| e.kind),
        Err(ObjErrorKind::UnknownClass { id: foreign.raw() })
    );
}

#[test]
fn test_probe_chain_skips_prefix() {
    let interner = StringInterner::new();
    let (registry, [animal, _, puppy]) = hierarchy(&interner);
    let speak = interner.intern("speak");

    let chain = registry
        .ancestors(puppy)
        .unwrap_or_else(|| panic!("registered"));
    let hit = probe_chain(&registry, &chain[2..], speak);
    assert_eq!(hit.map(|h| h.defined_in), Some(animal));
    assert!(probe_chain(&registry, &[], speak).is_none());
}

#[test]
fn test_can_reports_source() {
    let space = ObjectSpace::new();
    let animal = space
        .define_class(ClassBuilder::new("Animal").fallback_callable("speak", constant("...")))
        .unwrap_or_else(|e| panic!("{e}"));
    let mut obj = Instance::new(animal);

    let cap = space
        .can(&obj, "speak")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("speak resolves"));
    assert_eq!(cap.source(), CapabilitySource::Fallback { defined_in: animal });

    space.set(&mut obj, "speak", "hello").unwrap_or_else(|e| panic!("{e}"));
    let cap = space
        .can(&obj, "speak")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("speak resolves"));
    assert_eq!(cap.source(), CapabilitySource::OwnSlot);
    assert_eq!(space.interner().lookup(cap.name()), "speak");

    assert!(matches!(space.can(&obj, "fly"), Ok(None)));
}

#[test]
fn test_capability_snapshots_target() {
    let space = ObjectSpace::new();
    let animal = space
        .define_class(ClassBuilder::new("Animal").fallback_callable("speak", constant("...")))
        .unwrap_or_else(|e| panic!("{e}"));
    let mut obj = Instance::new(animal);
    space.set(&mut obj, "speak", "hello").unwrap_or_else(|e| panic!("{e}"));

    let cap = space
        .can(&obj, "speak")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("speak resolves"));
    space.clear(&mut obj, "speak");

    assert_eq!(
        cap.invoke(&space, &mut obj, &[]),
        Ok(Some(Value::string("hello")))
    );
    assert_eq!(
        space.resolve(&mut obj, "speak", &[]),
        Ok(Some(Value::string("...")))
    );
}

#[test]
fn test_bound_capability_runs_fallback_with_receiver() {
    let space = ObjectSpace::new();
    let base = space
        .define_class(ClassBuilder::new("Base").fallback("greet", |this, args| {
            let who = args.first().and_then(Value::as_str).unwrap_or("world").to_string();
            let name = this.get_str("name")?;
            Ok(Some(Value::from(format!("{name} greets {who}"))))
        }))
        .unwrap_or_else(|e| panic!("{e}"));
    let child = space
        .define_class(ClassBuilder::new("Child").extends(base).fallback(
            "greet",
            |this, args| this.call_super("greet", args),
        ))
        .unwrap_or_else(|e| panic!("{e}"));

    let mut obj = Instance::new(child);
    space.set(&mut obj, "name", "ada").unwrap_or_else(|e| panic!("{e}"));

    let cap = space
        .can(&obj, "greet")
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("greet resolves"));
    let mut bound = cap.bind(&space, &mut obj);
    assert_eq!(
        bound.capability().source(),
        CapabilitySource::Fallback { defined_in: child }
    );
    assert_eq!(
        bound.call(&[Value::string("bob")]),
        Ok(Some(Value::string("ada greets bob")))
    );
    assert_eq!(bound.call(&[]), Ok(Some(Value::string("ada greets world"))));
}

#[test]
fn test_can_reports_unknown_class_like_resolve() {
    let space = ObjectSpace::new();
    let other = ObjectSpace::new();
    let class = other
        .define_class(ClassBuilder::new("Elsewhere"))
        .unwrap_or_else(|e| panic!("{e}"));
    let mut obj = Instance::new(class);
    space.interner().intern("speak");

    let expected = Err(ObjErrorKind::UnknownClass { id: class.raw() });
    assert_eq!(
        space.can(&obj, "speak").map(|cap| cap.is_some()).map_err(|e| e.kind),
        expected
    );
    assert_eq!(
        space.resolve(&mut obj, "speak", &[]).map(|v| v.is_some()).map_err(|e| e.kind),
        expected
    );
}

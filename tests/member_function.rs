//! Integration tests for member functions, with and without a caller-supplied instance.

use reflex::{Reflectable, ReflectionError};
use std::sync::Arc;
use std::thread;

struct SomeClass {
    nb: u32,
    log: Vec<String>,
}

impl Default for SomeClass {
    fn default() -> Self {
        SomeClass {
            nb: 42,
            log: Vec::new(),
        }
    }
}

impl SomeClass {
    fn get_42(&self) -> u32 {
        42
    }

    fn get_nb(&self) -> u32 {
        self.nb
    }

    fn set_nb(&mut self, nb: u32) {
        self.nb = nb;
    }

    fn double_nb(&mut self) -> u32 {
        self.nb *= 2;
        self.nb
    }

    fn do_something(&mut self, s: &str, nb: &mut i32, _c: char, nb2: i32) -> usize {
        *nb = nb2;
        self.log.push(format!("{s}:{nb2}"));
        self.log.len()
    }

    fn add(&self, nb1: i32, nb2: i32) -> i32 {
        nb1 + nb2
    }

    fn sub(&self, nb1: i32, nb2: i32) -> i32 {
        nb1 - nb2
    }
}

#[derive(Default)]
struct OtherClass {
    nb: u32,
}

fn setup() {
    reflex::install_with(|registry| {
        registry.register_owner(
            Reflectable::class::<SomeClass>("SomeClass")
                .with_method("get_42", SomeClass::get_42)
                .with_method("get_nb", SomeClass::get_nb)
                .with_method("set_nb", SomeClass::set_nb)
                .with_method("double_nb", SomeClass::double_nb)
                .with_method::<fn(&mut SomeClass, &str, &mut i32, char, i32) -> usize, _>(
                    "do_something",
                    SomeClass::do_something,
                )
                .with_method("add", SomeClass::add)
                .with_method("sub", SomeClass::sub),
        );
    });
}

// ============================================================================
// Without instance
// ============================================================================

#[test]
fn test_without_instance_returns_good_value() {
    setup();
    assert_eq!(reflex::invoke::<fn() -> u32>("SomeClass", "get_42", ()).unwrap(), 42);
}

#[test]
fn test_without_instance_does_expected_job() {
    setup();
    assert_eq!(
        reflex::invoke::<fn(i32, i32) -> i32>("SomeClass", "add", (30, 12)).unwrap(),
        42
    );
    assert_eq!(
        reflex::invoke::<fn(i32, i32) -> i32>("SomeClass", "sub", (44, 2)).unwrap(),
        42
    );
}

#[test]
fn test_without_instance_uses_a_fresh_instance_each_call() {
    setup();
    assert_eq!(reflex::invoke::<fn() -> u32>("SomeClass", "double_nb", ()).unwrap(), 84);
    assert_eq!(reflex::invoke::<fn() -> u32>("SomeClass", "double_nb", ()).unwrap(), 84);

    reflex::invoke::<fn(u32)>("SomeClass", "set_nb", (1234,)).unwrap();
    assert_eq!(reflex::invoke::<fn() -> u32>("SomeClass", "get_nb", ()).unwrap(), 42);
}

#[test]
fn test_without_instance_accepts_multiple_params() {
    setup();
    let mut nb = 0;
    let len = reflex::invoke::<fn(&str, &mut i32, char, i32) -> usize>(
        "SomeClass",
        "do_something",
        ("hello", &mut nb, 'a', 42),
    )
    .unwrap();
    assert_eq!(len, 1);
    assert_eq!(nb, 42);
}

// ============================================================================
// With instance
// ============================================================================

#[test]
fn test_with_instance_returns_good_value() {
    setup();
    let mut obj = SomeClass::default();
    assert_eq!(
        reflex::invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_42", ()).unwrap(),
        42
    );
}

#[test]
fn test_with_instance_updates_object() {
    setup();
    let mut obj = SomeClass::default();

    let nb = reflex::invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ()).unwrap();
    reflex::invoke_on::<fn(u32), _>(&mut obj, "SomeClass", "set_nb", (nb * 2,)).unwrap();

    assert_eq!(
        reflex::invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ()).unwrap(),
        2 * nb
    );
    assert_eq!(obj.nb, 84);
}

#[test]
fn test_with_instance_set_then_get() {
    setup();
    let mut obj = SomeClass::default();
    assert_eq!(obj.nb, 42);

    reflex::invoke_on::<fn(u32), _>(&mut obj, "SomeClass", "set_nb", (1234,)).unwrap();
    let nb = reflex::invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ()).unwrap();

    assert_eq!(nb, 1234);
}

#[test]
fn test_with_instance_accepts_multiple_params() {
    setup();
    let mut nb = 0;
    let mut obj = SomeClass::default();

    reflex::invoke_on::<fn(&str, &mut i32, char, i32) -> usize, _>(
        &mut obj,
        "SomeClass",
        "do_something",
        ("hello", &mut nb, 'a', 42),
    )
    .unwrap();

    assert_eq!(nb, 42);
}

#[test]
fn test_with_instance_keeps_log_across_calls() {
    setup();
    let mut obj = SomeClass::default();
    let label = String::from("hello");

    for expected in 1..=3 {
        let mut nb = 0;
        let len = reflex::invoke_on::<fn(&str, &mut i32, char, i32) -> usize, _>(
            &mut obj,
            "SomeClass",
            "do_something",
            (label.as_str(), &mut nb, 'a', expected as i32),
        )
        .unwrap();
        assert_eq!(len, expected);
        assert_eq!(nb, expected as i32);
    }

    assert_eq!(obj.log, vec!["hello:1", "hello:2", "hello:3"]);
}

#[test]
fn test_reference_params_are_part_of_the_signature() {
    setup();
    let mut obj = SomeClass::default();
    let err = reflex::invoke_on::<fn(String, i32, char, i32) -> usize, _>(
        &mut obj,
        "SomeClass",
        "do_something",
        ("hello".to_string(), 0, 'a', 42),
    )
    .unwrap_err();
    assert!(matches!(err, ReflectionError::SignatureMismatch { .. }));
    assert!(obj.log.is_empty());
}

#[test]
fn test_with_shared_instance() {
    setup();
    let obj = Arc::new(SomeClass::default());

    let nb = reflex::invoke_ref::<fn() -> u32, _>(&*obj, "SomeClass", "get_nb", ()).unwrap();
    assert_eq!(nb, 42);
    assert_eq!(
        reflex::invoke_ref::<fn(i32, i32) -> i32, _>(&*obj, "SomeClass", "add", (20, 22)).unwrap(),
        42
    );
}

#[test]
fn test_with_shared_instance_rejects_mutating_method() {
    setup();
    let obj = SomeClass::default();
    let err = reflex::invoke_ref::<fn(u32), _>(&obj, "SomeClass", "set_nb", (1234,)).unwrap_err();
    assert_eq!(err.to_string(), "Function SomeClass::set_nb needs a mutable object");
    assert_eq!(obj.nb, 42);
}

#[test]
fn test_with_boxed_instance() {
    setup();
    let mut obj = Box::new(SomeClass::default());
    reflex::invoke_on::<fn(u32), _>(&mut *obj, "SomeClass", "set_nb", (7,)).unwrap();
    assert_eq!(obj.nb, 7);
}

#[test]
fn test_with_instance_unregistered_function() {
    setup();
    let mut obj = SomeClass::default();
    let err = reflex::invoke_on::<fn(), _>(&mut obj, "SomeClass", "unregistered", ()).unwrap_err();
    assert_eq!(err.to_string(), "Function SomeClass::unregistered is not registered.");
}

#[test]
fn test_with_instance_unregistered_class() {
    setup();
    let mut obj = SomeClass::default();
    let err = reflex::invoke_on::<fn(), _>(&mut obj, "unregistered_class", "unregistered", ())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Class unregistered_class is not registered as reflectable."
    );
}

#[test]
fn test_with_instance_wrong_prototype() {
    setup();
    let mut obj = SomeClass::default();
    let err = reflex::invoke_on::<fn(), _>(&mut obj, "SomeClass", "get_nb", ()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid function signature for function SomeClass::get_nb"
    );
    assert_eq!(obj.nb, 42);
}

#[test]
fn test_with_instance_of_another_class() {
    setup();
    let mut other = OtherClass { nb: 1 };
    let err = reflex::invoke_on::<fn(u32), _>(&mut other, "SomeClass", "set_nb", (9,)).unwrap_err();
    assert!(matches!(err, ReflectionError::SignatureMismatch { .. }));
    assert_eq!(other.nb, 1);
}

// ============================================================================
// Sharing the sealed registry
// ============================================================================

#[test]
fn test_concurrent_invocations() {
    setup();
    let manager = reflex::manager().unwrap();

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            thread::spawn(move || {
                let mut obj = SomeClass::default();
                manager
                    .invoke_on::<fn(u32), _>(&mut obj, "SomeClass", "set_nb", (i,))
                    .unwrap();
                manager
                    .invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ())
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0, 1, 2, 3]);
}

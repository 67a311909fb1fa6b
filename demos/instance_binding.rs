//! Member functions with and without a caller-supplied instance.
//!
//! Demonstrates:
//! - `&self` and `&mut self` methods registered with `with_method()`
//! - `invoke()` running a method on a fresh `Default` instance
//! - `invoke_on()` running a method on an object the caller owns
//! - `invoke_ref()` running a `&self` method on a shared object
//! - Out-parameters passed as ordinary `&mut` borrows
//! - Trace callbacks observing every invocation
//!
//! Run with: `RUST_LOG=reflex=trace cargo run --example instance_binding`

use reflex::Reflectable;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Counter {
    label: String,
    count: u32,
}

impl Default for Counter {
    fn default() -> Self {
        Counter {
            label: "default".to_string(),
            count: 0,
        }
    }
}

impl Counter {
    fn increment(&mut self, by: u32) -> u32 {
        self.count += by;
        self.count
    }

    fn describe(&self) -> String {
        format!("{} = {}", self.label, self.count)
    }

    fn rename(&mut self, label: String) {
        self.label = label;
    }

    fn read_into(&self, out: &mut u32) {
        *out = self.count;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== reflex: Instance Binding ===\n");

    reflex::set_trace_callback(|event| println!("   [trace] {event}"));

    reflex::install_with(|registry| {
        registry.register_owner(
            Reflectable::class::<Counter>("Counter")
                .with_method("increment", Counter::increment)
                .with_method("describe", Counter::describe)
                .with_method("rename", Counter::rename)
                .with_method::<fn(&Counter, &mut u32), _>("read_into", Counter::read_into),
        );
    });

    // -------------------------------------------------------------------------
    // 1. Without an instance: every call gets a fresh Counter
    // -------------------------------------------------------------------------
    println!("\n1. Calling without an instance...");

    for _ in 0..2 {
        let count = reflex::invoke::<fn(u32) -> u32>("Counter", "increment", (5,)).unwrap();
        println!("   increment(5) on a fresh Counter = {count}");
    }

    // -------------------------------------------------------------------------
    // 2. With an instance: state is kept on the caller's object
    // -------------------------------------------------------------------------
    println!("\n2. Calling on our own Counter...");

    let mut counter = Counter::default();
    reflex::invoke_on::<fn(String), _>(&mut counter, "Counter", "rename", ("visits".into(),))
        .unwrap();
    for _ in 0..3 {
        reflex::invoke_on::<fn(u32) -> u32, _>(&mut counter, "Counter", "increment", (5,)).unwrap();
    }
    let text = reflex::invoke_on::<fn() -> String, _>(&mut counter, "Counter", "describe", ()).unwrap();
    println!("   describe() = {text}");
    println!("   counter    = {counter:?}");

    // -------------------------------------------------------------------------
    // 3. A signature mismatch never touches the object
    // -------------------------------------------------------------------------
    println!("\n3. Calling with the wrong signature...");

    let err = reflex::invoke_on::<fn(i32) -> i32, _>(&mut counter, "Counter", "increment", (1,))
        .unwrap_err();
    println!("   error   = {err}");
    println!("   counter = {counter:?}");

    // -------------------------------------------------------------------------
    // 4. Shared objects and out-parameters
    // -------------------------------------------------------------------------
    println!("\n4. Calling on a shared Counter...");

    let shared = Arc::new(counter);
    let text = reflex::invoke_ref::<fn() -> String, _>(&*shared, "Counter", "describe", ()).unwrap();
    println!("   describe() = {text}");

    let mut out = 0;
    reflex::invoke_ref::<fn(&mut u32), _>(&*shared, "Counter", "read_into", (&mut out,)).unwrap();
    println!("   read_into(&mut out) -> out = {out}");

    if let Err(e) = reflex::invoke_ref::<fn(u32) -> u32, _>(&*shared, "Counter", "increment", (1,)) {
        println!("   increment() = error: {e}");
    }

    reflex::clear_trace_callback();
    println!("\n=== Example completed successfully ===");
}

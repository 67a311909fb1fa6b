//! Basic usage example for reflex.
//!
//! Demonstrates:
//! - Registering free functions under the global owner
//! - Registering static functions of a class
//! - Invoking them by name with `invoke_global()` and `invoke()`
//! - What a wrong name or a wrong signature looks like
//!
//! Run with: `RUST_LOG=reflex=debug cargo run --example basic_usage`

use reflex::Reflectable;
use tracing_subscriber::EnvFilter;

fn add(a: i32, b: i32) -> i32 {
    a + b
}

fn greet(name: String) -> String {
    format!("Hello, {name}!")
}

#[derive(Default)]
struct MathUtils;

impl MathUtils {
    fn square(x: f64) -> f64 {
        x * x
    }

    fn clamp(x: i64, low: i64, high: i64) -> i64 {
        x.clamp(low, high)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== reflex: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Register owners and seal the registry
    // -------------------------------------------------------------------------
    println!("1. Installing the registry...");

    let manager = reflex::install_with(|registry| {
        registry
            .register_owner(
                Reflectable::global()
                    .with_function("add", add)
                    .with_function("greet", greet),
            )
            .register_owner(
                Reflectable::class::<MathUtils>("MathUtils")
                    .with_function("square", MathUtils::square)
                    .with_function("clamp", MathUtils::clamp),
            );
    });

    for owner in manager.owners() {
        let name = if owner.name().is_empty() { "<global>" } else { owner.name() };
        let functions: Vec<&str> = owner.function_names().collect();
        println!("   {name}: {functions:?}");
    }

    // -------------------------------------------------------------------------
    // 2. Invoke free functions
    // -------------------------------------------------------------------------
    println!("\n2. Invoking free functions with invoke_global()...");

    let sum = reflex::invoke_global::<fn(i32, i32) -> i32>("add", (20, 22)).unwrap();
    println!("   add(20, 22)      = {sum}");

    let hello = reflex::invoke_global::<fn(String) -> String>("greet", ("reflex".into(),)).unwrap();
    println!("   greet(\"reflex\") = {hello}");

    // -------------------------------------------------------------------------
    // 3. Invoke static functions of a class
    // -------------------------------------------------------------------------
    println!("\n3. Invoking static functions with invoke()...");

    let sq = reflex::invoke::<fn(f64) -> f64>("MathUtils", "square", (1.5,)).unwrap();
    println!("   MathUtils::square(1.5)        = {sq}");

    let c = reflex::invoke::<fn(i64, i64, i64) -> i64>("MathUtils", "clamp", (99, 0, 10)).unwrap();
    println!("   MathUtils::clamp(99, 0, 10)   = {c}");

    // -------------------------------------------------------------------------
    // 4. Errors
    // -------------------------------------------------------------------------
    println!("\n4. Errors are returned, nothing is called...");

    if let Err(e) = reflex::invoke::<fn()>("Physics", "gravity", ()) {
        println!("   unknown owner:    {e}");
    }
    if let Err(e) = reflex::invoke_global::<fn()>("subtract", ()) {
        println!("   unknown function: {e}");
    }
    if let Err(e) = reflex::invoke_global::<fn(i64, i64) -> i64>("add", (1, 2)) {
        println!("   wrong signature:  {e}");
    }

    println!("\n=== Example completed successfully ===");
}

//! Several independent registries in one process.
//!
//! Demonstrates:
//! - Creating registries with `define_reflection!`
//! - The same owner and function names resolving differently per registry
//! - A registry that was never installed
//!
//! Run with: `cargo run --example isolated_registries`

use reflex::{define_reflection, Reflectable};
use tracing_subscriber::EnvFilter;

define_reflection!(english);
define_reflection!(french);
define_reflection!(spare);

#[derive(Default)]
struct Greeter;

impl Greeter {
    fn hello(name: String) -> String {
        format!("Hello, {name}")
    }

    fn bonjour(name: String) -> String {
        format!("Bonjour, {name}")
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reflex=debug")),
        )
        .init();

    println!("=== reflex: Isolated Registries ===\n");

    english::install_with(|registry| {
        registry.register_owner(
            Reflectable::class::<Greeter>("Greeter").with_function("greet", Greeter::hello),
        );
    });
    french::install_with(|registry| {
        registry.register_owner(
            Reflectable::class::<Greeter>("Greeter").with_function("greet", Greeter::bonjour),
        );
    });

    for (lang, result) in [
        ("english", english::invoke::<fn(String) -> String>("Greeter", "greet", ("Ada".into(),))),
        ("french", french::invoke::<fn(String) -> String>("Greeter", "greet", ("Ada".into(),))),
        ("spare", spare::invoke::<fn(String) -> String>("Greeter", "greet", ("Ada".into(),))),
    ] {
        match result {
            Ok(text) => println!("   {lang:<8} -> {text}"),
            Err(e) => println!("   {lang:<8} -> error: {e}"),
        }
    }

    println!(
        "\n   default registry installed: {}",
        reflex::is_installed()
    );

    println!("\n=== Example completed successfully ===");
}

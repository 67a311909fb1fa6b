//! # Reflex
//!
//! Name-based reflection for Rust: free functions, static class functions and
//! member functions are registered under an owner name once, at startup, and
//! later invoked by `(owner, function)` name with the call signature the caller
//! expects. The signature is checked before the call, so a wrong assumption
//! fails with an error instead of reading the wrong type.
//!
//! ## Quick Start
//!
//! ```rust
//! use reflex::Reflectable;
//!
//! #[derive(Default)]
//! struct SomeClass {
//!     nb: u32,
//! }
//!
//! impl SomeClass {
//!     fn get_nb(&self) -> u32 {
//!         self.nb
//!     }
//!
//!     fn set_nb(&mut self, nb: u32) {
//!         self.nb = nb;
//!     }
//! }
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! fn fill(out: &mut i32, nb: i32) {
//!     *out = nb;
//! }
//!
//! reflex::install_with(|registry| {
//!     registry
//!         .register_owner(
//!             Reflectable::global()
//!                 .with_function("add", add)
//!                 // reference parameters: the signature is named at registration
//!                 .with_function::<fn(&mut i32, i32), _>("fill", fill),
//!         )
//!         .register_owner(
//!             Reflectable::class::<SomeClass>("SomeClass")
//!                 .with_method("get_nb", SomeClass::get_nb)
//!                 .with_method("set_nb", SomeClass::set_nb),
//!         );
//! });
//!
//! // free function, by name only
//! assert_eq!(reflex::invoke_global::<fn(i32, i32) -> i32>("add", (20, 22)).unwrap(), 42);
//!
//! // member functions on a caller-supplied instance
//! let mut obj = SomeClass { nb: 42 };
//! reflex::invoke_on::<fn(u32), _>(&mut obj, "SomeClass", "set_nb", (1234,)).unwrap();
//! assert_eq!(reflex::invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ()).unwrap(), 1234);
//!
//! // out-parameters take ordinary local borrows
//! let mut out = 0;
//! reflex::invoke_global::<fn(&mut i32, i32)>("fill", (&mut out, 42)).unwrap();
//! assert_eq!(out, 42);
//!
//! // a wrong signature is reported, not executed
//! assert!(reflex::invoke::<fn()>("SomeClass", "get_nb", ()).is_err());
//! ```
//!
//! ## Building blocks
//!
//! - [`Reflectable`] / [`ReflectableClass`] - owner records and their function tables
//! - [`RegistryBuilder`] / [`ReflectionManager`] - two-phase registry: open, then sealed
//! - [`ReflectionApi`] - process-wide install-once registries with tracing
//! - [`define_reflection!`] - isolated process-wide registries
//! - [`install_with`], [`invoke`], [`invoke_on`], [`invoke_ref`], [`invoke_global`] - the default
//!   registry

mod callable;
mod macros;
mod reflectable;
mod reflection_api;
mod reflection_error;
mod reflection_event;
mod reflection_manager;
mod registry;
mod signature;

pub use callable::{Binding, Callable, ErasedCallable, Fingerprint, InstanceCallable};
pub use reflectable::{qualified_name, Reflectable, ReflectableClass, NAMESPACE_SEPARATOR};
pub use reflection_api::{ReflectionApi, TraceCallback, TraceSlot};
pub use reflection_error::ReflectionError;
pub use reflection_event::ReflectionEvent;
pub use reflection_manager::{ReflectionManager, RegistryBuilder};
pub use signature::{Function, Method, Signature};

// Re-export the default registry API
pub use registry::{
    clear_trace_callback, contains_owner, install, install_with, invoke, invoke_global, invoke_on,
    invoke_ref, is_installed, manager, set_trace_callback,
};

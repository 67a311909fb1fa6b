//! The crate-level default reflection registry.
//!
//! Registration happens once, during startup, by installing a sealed
//! [`ReflectionManager`]. After that every function below is a read-only lookup,
//! so they can be called from any thread.
//!
//! # Examples
//!
//! ```
//! use reflex::Reflectable;
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! reflex::install_with(|registry| {
//!     registry.register_owner(Reflectable::global().with_function("add", add));
//! });
//!
//! let sum = reflex::invoke_global::<fn(i32, i32) -> i32>("add", (20, 22)).unwrap();
//! assert_eq!(sum, 42);
//! ```

use std::sync::{LazyLock, Mutex, OnceLock};

use crate::reflection_api::{ReflectionApi, TraceSlot};
use crate::signature::Signature;
use crate::{ReflectionError, ReflectionEvent, ReflectionManager, RegistryBuilder};

/// Slot of the default registry, written once.
static GLOBAL_REGISTRY: OnceLock<ReflectionManager> = OnceLock::new();

/// Holds an optional user-defined tracing callback.
static TRACE_CALLBACK: TraceSlot = LazyLock::new(|| Mutex::new(None));

struct Global;

impl ReflectionApi for Global {
    fn slot() -> &'static OnceLock<ReflectionManager> {
        &GLOBAL_REGISTRY
    }

    fn trace() -> &'static TraceSlot {
        &TRACE_CALLBACK
    }
}

const GLOBAL: Global = Global;

// -------------------------------------------------------------------------------------------------
// Tracing callback support
// -------------------------------------------------------------------------------------------------

/// Sets a tracing callback that will be invoked on every registry interaction.
///
/// # Example
/// ```rust
/// use reflex::{set_trace_callback, ReflectionEvent};
///
/// set_trace_callback(|event| println!("[reflection-trace] {:?}", event));
/// ```
pub fn set_trace_callback(callback: impl Fn(&ReflectionEvent) + Send + Sync + 'static) {
    GLOBAL.set_trace_callback(callback)
}

/// Clears the tracing callback (disables registry tracing).
pub fn clear_trace_callback() {
    GLOBAL.clear_trace_callback()
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// Installs a sealed registry as the default registry.
///
/// # Errors
///
/// Returns `AlreadyInstalled` if a registry was installed before; the
/// registry passed in is dropped.
pub fn install(manager: ReflectionManager) -> Result<&'static ReflectionManager, ReflectionError> {
    GLOBAL.install(manager)
}

/// Builds and installs the default registry unless one is installed already.
///
/// Returns the installed registry either way.
pub fn install_with(build: impl FnOnce(&mut RegistryBuilder)) -> &'static ReflectionManager {
    GLOBAL.install_with(build)
}

/// Returns the default registry, or `NotInstalled`.
pub fn manager() -> Result<&'static ReflectionManager, ReflectionError> {
    GLOBAL.manager()
}

pub fn is_installed() -> bool {
    GLOBAL.is_installed()
}

/// Checks whether an owner is registered in the default registry.
pub fn contains_owner(owner: &str) -> Result<bool, ReflectionError> {
    GLOBAL.contains_owner(owner)
}

/// Invokes `owner::function` with the signature `S`, without an instance.
///
/// ```
/// use reflex::Reflectable;
///
/// #[derive(Default)]
/// struct Greeter;
///
/// impl Greeter {
///     fn concat(s: String, nb: u32) -> String {
///         format!("{s}{nb}")
///     }
/// }
///
/// reflex::install_with(|registry| {
///     registry.register_owner(
///         Reflectable::class::<Greeter>("Greeter").with_function("concat", Greeter::concat),
///     );
/// });
///
/// let s = reflex::invoke::<fn(String, u32) -> String>("Greeter", "concat", ("hello".into(), 42));
/// assert_eq!(s.unwrap(), "hello42");
/// ```
pub fn invoke<S: Signature>(
    owner: &str,
    function: &str,
    args: S::Args<'_>,
) -> Result<S::Output, ReflectionError> {
    GLOBAL.invoke::<S>(owner, function, args)
}

/// Invokes the member function `owner::function` on `instance`.
pub fn invoke_on<S: Signature, T: 'static>(
    instance: &mut T,
    owner: &str,
    function: &str,
    args: S::Args<'_>,
) -> Result<S::Output, ReflectionError> {
    GLOBAL.invoke_on::<S, T>(instance, owner, function, args)
}

/// Invokes a `&self` member function of `owner` on a shared instance.
///
/// ```
/// use reflex::Reflectable;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Config {
///     port: u16,
/// }
///
/// impl Config {
///     fn port(&self) -> u16 {
///         self.port
///     }
/// }
///
/// reflex::install_with(|registry| {
///     registry.register_owner(
///         Reflectable::class::<Config>("Config").with_method("port", Config::port),
///     );
/// });
///
/// let config = Arc::new(Config { port: 8080 });
/// let port = reflex::invoke_ref::<fn() -> u16, _>(&*config, "Config", "port", ());
/// assert_eq!(port.unwrap(), 8080);
/// ```
pub fn invoke_ref<S: Signature, T: 'static>(
    instance: &T,
    owner: &str,
    function: &str,
    args: S::Args<'_>,
) -> Result<S::Output, ReflectionError> {
    GLOBAL.invoke_ref::<S, T>(instance, owner, function, args)
}

/// Invokes a free function of the global owner by name.
pub fn invoke_global<S: Signature>(
    function: &str,
    args: S::Args<'_>,
) -> Result<S::Output, ReflectionError> {
    GLOBAL.invoke_global::<S>(function, args)
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

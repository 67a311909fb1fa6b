//! Macros for creating isolated reflection registries.

/// Creates an isolated reflection registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A registry slot (hidden)
/// - A trace callback static (hidden)
/// - An `Api` struct that implements `ReflectionApi`
/// - Free functions delegating to it
///
/// # Examples
///
/// ```rust
/// use reflex::{define_reflection, Reflectable};
///
/// define_reflection!(plugins);
///
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// plugins::install_with(|registry| {
///     registry.register_owner(Reflectable::global().with_function("add", add));
/// });
///
/// let sum = plugins::invoke_global::<fn(i32, i32) -> i32>("add", (20, 22)).unwrap();
/// assert_eq!(sum, 42);
/// ```
///
/// # Multiple Registries
///
/// Each generated registry is completely isolated, including from the
/// crate-level default registry:
///
/// ```rust
/// use reflex::{define_reflection, Reflectable};
///
/// define_reflection!(first);
/// define_reflection!(second);
///
/// first::install_with(|registry| {
///     registry.register_owner(Reflectable::new("Only"));
/// });
///
/// assert!(first::contains_owner("Only").unwrap());
/// assert!(!second::is_installed());
/// assert!(!reflex::is_installed());
/// ```
#[macro_export]
macro_rules! define_reflection {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock, Mutex, OnceLock};

            // Installed registry (module-private)
            static SLOT: OnceLock<$crate::ReflectionManager> = OnceLock::new();

            // Trace callback storage (module-private)
            static TRACE: LazyLock<Mutex<Option<Arc<dyn Fn(&$crate::ReflectionEvent) + Send + Sync>>>> =
                LazyLock::new(|| Mutex::new(None));

            /// Zero-sized type that implements the reflection API.
            struct Api;

            impl $crate::ReflectionApi for Api {
                fn slot() -> &'static OnceLock<$crate::ReflectionManager> {
                    &SLOT
                }

                fn trace() -> &'static LazyLock<Mutex<Option<Arc<dyn Fn(&$crate::ReflectionEvent) + Send + Sync>>>> {
                    &TRACE
                }
            }

            const API: Api = Api;

            /// Install a sealed registry.
            pub fn install(
                manager: $crate::ReflectionManager,
            ) -> Result<&'static $crate::ReflectionManager, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.install(manager)
            }

            /// Build and install the registry unless one is installed already.
            pub fn install_with(
                build: impl FnOnce(&mut $crate::RegistryBuilder),
            ) -> &'static $crate::ReflectionManager {
                use $crate::ReflectionApi;
                API.install_with(build)
            }

            /// The installed registry.
            pub fn manager() -> Result<&'static $crate::ReflectionManager, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.manager()
            }

            pub fn is_installed() -> bool {
                use $crate::ReflectionApi;
                API.is_installed()
            }

            /// Check whether an owner is registered.
            pub fn contains_owner(owner: &str) -> Result<bool, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.contains_owner(owner)
            }

            /// Invoke `owner::function` without an instance.
            pub fn invoke<S: $crate::Signature>(
                owner: &str,
                function: &str,
                args: S::Args<'_>,
            ) -> Result<S::Output, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.invoke::<S>(owner, function, args)
            }

            /// Invoke the member function `owner::function` on `instance`.
            pub fn invoke_on<S: $crate::Signature, T: 'static>(
                instance: &mut T,
                owner: &str,
                function: &str,
                args: S::Args<'_>,
            ) -> Result<S::Output, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.invoke_on::<S, T>(instance, owner, function, args)
            }

            /// Invoke a `&self` member function on a shared instance.
            pub fn invoke_ref<S: $crate::Signature, T: 'static>(
                instance: &T,
                owner: &str,
                function: &str,
                args: S::Args<'_>,
            ) -> Result<S::Output, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.invoke_ref::<S, T>(instance, owner, function, args)
            }

            /// Invoke a function of the global owner by name.
            pub fn invoke_global<S: $crate::Signature>(
                function: &str,
                args: S::Args<'_>,
            ) -> Result<S::Output, $crate::ReflectionError> {
                use $crate::ReflectionApi;
                API.invoke_global::<S>(function, args)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::ReflectionEvent) + Send + Sync + 'static,
            ) {
                use $crate::ReflectionApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::ReflectionApi;
                API.clear_trace_callback()
            }
        }
    };
}

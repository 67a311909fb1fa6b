//! Core trait defining the behavior of a process-wide reflection registry.
//!
//! This module provides the `ReflectionApi` trait with default implementations for
//! installing a sealed [`ReflectionManager`] once, invoking functions through it by
//! name, and tracing those operations.
//!
//! The trait is the invocation front door: callers state the signature they expect
//! as a function-pointer type and pass owner and function names plus an argument
//! tuple, e.g. `API.invoke::<fn(i32, i32) -> i32>("", "add", (20, 22))`.

use std::sync::{Arc, LazyLock, Mutex, OnceLock};

use crate::signature::Signature;
use crate::{ReflectionError, ReflectionEvent, ReflectionManager, RegistryBuilder};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `ReflectionEvent` every time the registry is
/// interacted with. It must be thread-safe because the registry itself is globally shared.
pub type TraceCallback = dyn Fn(&ReflectionEvent) + Send + Sync + 'static;

/// Storage for the trace callback of one registry.
///
/// Note: This type is also spelled out in the `define_reflection!` macro.
/// Keep both definitions in sync.
pub type TraceSlot = LazyLock<Mutex<Option<Arc<TraceCallback>>>>;

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`slot` and `trace`) to be implemented by the implementor.
///
/// The slot is written once: either by [`ReflectionApi::install`] or by the first
/// [`ReflectionApi::install_with`]. From then on the registry is read-only.
pub trait ReflectionApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceSlot;

    /// Replaces the trace callback. It sees every install, invoke and
    /// contains operation of this registry, including failed lookups.
    ///
    /// The callback runs after the trace slot is unlocked, so it may call back
    /// into the same registry.
    fn set_trace_callback(&self, callback: impl Fn(&ReflectionEvent) + Send + Sync + 'static) {
        *Self::trace().lock().unwrap_or_else(|p| p.into_inner()) = Some(Arc::new(callback));
    }

    fn clear_trace_callback(&self) {
        Self::trace().lock().unwrap_or_else(|p| p.into_inner()).take();
    }

    /// Hands `event` to the trace callback, if one is set.
    fn emit_event(&self, event: &ReflectionEvent) {
        let callback = Self::trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------------------------------

    /// Access the slot holding the installed registry.
    fn slot() -> &'static OnceLock<ReflectionManager>;

    /// Install a sealed registry.
    ///
    /// # Errors
    ///
    /// - `AlreadyInstalled` if a registry was installed before
    fn install(
        &self,
        manager: ReflectionManager,
    ) -> Result<&'static ReflectionManager, ReflectionError> {
        let owners = manager.len();
        Self::slot()
            .set(manager)
            .map_err(|_| ReflectionError::AlreadyInstalled)?;

        tracing::debug!(owners, "installed reflection registry");
        self.emit_event(&ReflectionEvent::Install { owners });

        self.manager()
    }

    /// Build, seal and install the registry on first use.
    ///
    /// `build` only runs if nothing is installed yet; later calls return the
    /// registry installed first.
    fn install_with(&self, build: impl FnOnce(&mut RegistryBuilder)) -> &'static ReflectionManager {
        let mut installed = false;
        let manager = Self::slot().get_or_init(|| {
            let mut builder = RegistryBuilder::new();
            build(&mut builder);
            installed = true;
            builder.seal()
        });

        if installed {
            tracing::debug!(owners = manager.len(), "installed reflection registry");
            self.emit_event(&ReflectionEvent::Install {
                owners: manager.len(),
            });
        }

        manager
    }

    /// The installed registry.
    ///
    /// # Errors
    ///
    /// - `NotInstalled` if nothing was installed yet
    fn manager(&self) -> Result<&'static ReflectionManager, ReflectionError> {
        Self::slot().get().ok_or(ReflectionError::NotInstalled)
    }

    fn is_installed(&self) -> bool {
        Self::slot().get().is_some()
    }

    // -------------------------------------------------------------------------------------------------
    // Invocation
    // -------------------------------------------------------------------------------------------------

    /// Check whether an owner is registered.
    fn contains_owner(&self, owner: &str) -> Result<bool, ReflectionError> {
        let found = self.manager()?.contains_owner(owner);

        self.emit_event(&ReflectionEvent::Contains {
            owner: owner.to_owned(),
            found,
        });

        Ok(found)
    }

    /// Invoke `owner::function` without an instance.
    ///
    /// Member functions run on a fresh `Default` instance.
    fn invoke<S: Signature>(
        &self,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        let result = self.manager()?.invoke::<S>(owner, function, args);

        self.emit_event(&ReflectionEvent::Invoke {
            owner: owner.to_owned(),
            function: function.to_owned(),
            with_instance: false,
            found: result.is_ok(),
        });

        result
    }

    /// Invoke the member function `owner::function` on `instance`.
    fn invoke_on<S: Signature, T: 'static>(
        &self,
        instance: &mut T,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        let result = self
            .manager()?
            .invoke_on::<S, T>(instance, owner, function, args);

        self.emit_event(&ReflectionEvent::Invoke {
            owner: owner.to_owned(),
            function: function.to_owned(),
            with_instance: true,
            found: result.is_ok(),
        });

        result
    }

    /// Invoke a `&self` member function on a shared instance.
    fn invoke_ref<S: Signature, T: 'static>(
        &self,
        instance: &T,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        let result = self
            .manager()?
            .invoke_ref::<S, T>(instance, owner, function, args);

        self.emit_event(&ReflectionEvent::Invoke {
            owner: owner.to_owned(),
            function: function.to_owned(),
            with_instance: true,
            found: result.is_ok(),
        });

        result
    }

    /// Invoke a function of the global owner by name only.
    fn invoke_global<S: Signature>(
        &self,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        self.invoke::<S>("", function, args)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{ReflectionApi, TraceSlot};
    use crate::{Reflectable, ReflectionError, ReflectionEvent, ReflectionManager};

    use serial_test::serial;
    use std::sync::{Arc, LazyLock, Mutex, OnceLock};

    static SLOT: OnceLock<ReflectionManager> = OnceLock::new();

    static TRACE: TraceSlot = LazyLock::new(|| Mutex::new(None));

    struct Api;

    impl ReflectionApi for Api {
        fn slot() -> &'static OnceLock<ReflectionManager> {
            &SLOT
        }

        fn trace() -> &'static TraceSlot {
            &TRACE
        }
    }

    const API: Api = Api;

    #[derive(Default)]
    struct SomeClass {
        nb: u32,
    }

    impl SomeClass {
        fn get_nb(&self) -> u32 {
            self.nb
        }

        fn set_nb(&mut self, nb: u32) {
            self.nb = nb;
        }
    }

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    fn setup() -> &'static ReflectionManager {
        API.install_with(|builder| {
            builder
                .register_owner(Reflectable::global().with_function("add", add))
                .register_owner(
                    Reflectable::class::<SomeClass>("SomeClass")
                        .with_method("get_nb", SomeClass::get_nb)
                        .with_method("set_nb", SomeClass::set_nb),
                );
        })
    }

    fn record_events() -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(format!("{}", e));
        });
        events
    }

    #[test]
    #[serial]
    fn test_install_with_is_idempotent() {
        let first = setup();
        let second = API.install_with(|_| panic!("registry is already installed"));
        assert!(std::ptr::eq(first, second));
        assert!(API.is_installed());
        assert_eq!(first.len(), 2);
    }

    #[test]
    #[serial]
    fn test_second_install_fails() {
        setup();
        let err = API
            .install(ReflectionManager::builder().seal())
            .unwrap_err();
        assert_eq!(err, ReflectionError::AlreadyInstalled);
    }

    #[test]
    #[serial]
    fn test_invoke_through_api() -> Result<(), ReflectionError> {
        setup();

        assert_eq!(API.invoke_global::<fn(i32, i32) -> i32>("add", (20, 22))?, 42);
        assert_eq!(API.invoke::<fn(i32, i32) -> i32>("", "add", (1, 2))?, 3);

        let mut obj = SomeClass { nb: 42 };
        API.invoke_on::<fn(u32), _>(&mut obj, "SomeClass", "set_nb", (1234,))?;
        assert_eq!(
            API.invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ())?,
            1234
        );

        Ok(())
    }

    #[test]
    #[serial]
    fn test_trace_callback_invoke_events() {
        setup();
        let events = record_events();

        let _ = API.invoke_global::<fn(i32, i32) -> i32>("add", (20, 22));
        let _ = API.invoke::<fn()>("SomeClass", "get_nb", ());
        let mut obj = SomeClass::default();
        let _ = API.invoke_on::<fn() -> u32, _>(&mut obj, "SomeClass", "get_nb", ());

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(
            captured[0],
            "invoke { function: ::add, with_instance: false, found: true }"
        );
        assert_eq!(
            captured[1],
            "invoke { function: SomeClass::get_nb, with_instance: false, found: false }"
        );
        assert_eq!(
            captured[2],
            "invoke { function: SomeClass::get_nb, with_instance: true, found: true }"
        );

        API.clear_trace_callback();
    }

    #[test]
    #[serial]
    fn test_invoke_ref_through_api() {
        setup();
        let events = record_events();

        let obj = SomeClass { nb: 11 };
        assert_eq!(
            API.invoke_ref::<fn() -> u32, _>(&obj, "SomeClass", "get_nb", ()),
            Ok(11)
        );
        assert!(API
            .invoke_ref::<fn(u32), _>(&obj, "SomeClass", "set_nb", (1,))
            .is_err());

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "invoke { function: SomeClass::get_nb, with_instance: true, found: true }"
                    .to_string(),
                "invoke { function: SomeClass::set_nb, with_instance: true, found: false }"
                    .to_string(),
            ]
        );

        API.clear_trace_callback();
    }

    #[test]
    #[serial]
    fn test_trace_callback_may_query_registry() {
        setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        API.set_trace_callback(move |e| {
            if let ReflectionEvent::Invoke { owner, .. } = e {
                let known = API.manager().map(|m| m.contains_owner(owner)).unwrap_or(false);
                seen_clone.lock().unwrap().push(known);
            }
        });

        let _ = API.invoke_global::<fn(i32, i32) -> i32>("add", (1, 2));
        let _ = API.invoke::<fn()>("Missing", "f", ());
        API.clear_trace_callback();

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    #[serial]
    fn test_trace_callback_contains_event() {
        setup();
        let events = record_events();

        assert!(API.contains_owner("SomeClass").unwrap());
        assert!(!API.contains_owner("Missing").unwrap());

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "contains { owner: SomeClass, found: true }".to_string(),
                "contains { owner: Missing, found: false }".to_string(),
            ]
        );

        API.clear_trace_callback();
    }

    #[test]
    #[serial]
    fn test_clear_trace_callback_stops_events() {
        setup();
        let events = record_events();

        let _ = API.invoke_global::<fn(i32, i32) -> i32>("add", (1, 1));
        API.clear_trace_callback();
        let _ = API.invoke_global::<fn(i32, i32) -> i32>("add", (1, 1));
        let _ = API.contains_owner("");

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_emit_event_without_callback() {
        struct Silent;

        static SILENT_SLOT: OnceLock<ReflectionManager> = OnceLock::new();
        static SILENT_TRACE: TraceSlot = LazyLock::new(|| Mutex::new(None));

        impl ReflectionApi for Silent {
            fn slot() -> &'static OnceLock<ReflectionManager> {
                &SILENT_SLOT
            }

            fn trace() -> &'static TraceSlot {
                &SILENT_TRACE
            }
        }

        Silent.emit_event(&ReflectionEvent::Install { owners: 0 });
        assert!(!Silent.is_installed());
        assert_eq!(
            Silent.invoke_global::<fn()>("anything", ()).unwrap_err(),
            ReflectionError::NotInstalled
        );
    }
}

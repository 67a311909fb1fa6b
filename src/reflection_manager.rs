//! The registry of owners and the signature-checked invocation path.
//!
//! The registry has two phases. A [`RegistryBuilder`] collects owners while
//! registration is open; [`RegistryBuilder::seal`] turns it into a
//! [`ReflectionManager`], which is immutable from then on and can be shared
//! across threads without locking.
//!
//! # Examples
//!
//! ```rust
//! use reflex::{ReflectionManager, Reflectable};
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! let manager = ReflectionManager::builder()
//!     .with_owner(Reflectable::global().with_function("add", add))
//!     .seal();
//!
//! let sum = manager.invoke::<fn(i32, i32) -> i32>("", "add", (20, 22)).unwrap();
//! assert_eq!(sum, 42);
//! ```

use crate::callable::{Callable, InstanceCallable};
use crate::signature::Signature;
use crate::{Reflectable, ReflectionError};

/// Collects owners before the registry is sealed.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    owners: Vec<Reflectable>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an owner.
    ///
    /// Owners are looked up in insertion order, so an owner registered under a
    /// name that is already taken is unreachable.
    pub fn register_owner(&mut self, owner: impl Into<Reflectable>) -> &mut Self {
        let owner = owner.into();
        if self.owners.iter().any(|known| known.name() == owner.name()) {
            tracing::debug!(
                owner = %owner.name(),
                "owner name already registered, the new owner is shadowed"
            );
        } else {
            tracing::debug!(
                owner = %owner.name(),
                functions = owner.len(),
                "registered owner"
            );
        }
        self.owners.push(owner);
        self
    }

    /// Builder form of [`RegistryBuilder::register_owner`].
    pub fn with_owner(mut self, owner: impl Into<Reflectable>) -> Self {
        self.register_owner(owner);
        self
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Closes registration.
    pub fn seal(self) -> ReflectionManager {
        tracing::debug!(owners = self.owners.len(), "sealed reflection registry");
        ReflectionManager {
            owners: self.owners,
        }
    }
}

/// Sealed registry: resolves `(owner, function)` pairs and invokes them with a
/// caller-chosen signature.
///
/// Signatures are written as function-pointer types. Arguments are passed as a
/// tuple matching the signature's parameters:
///
/// - `invoke::<fn(i32, i32) -> i32>("", "add", (20, 22))`
/// - `invoke::<fn(u32)>("Counter", "set_nb", (7,))`
/// - `invoke::<fn() -> u32>("Counter", "get_nb", ())`
#[derive(Debug)]
pub struct ReflectionManager {
    owners: Vec<Reflectable>,
}

impl ReflectionManager {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Finds an owner by exact name; the first registered match wins.
    pub fn owner(&self, name: &str) -> Result<&Reflectable, ReflectionError> {
        self.owners
            .iter()
            .find(|owner| owner.name() == name)
            .ok_or_else(|| ReflectionError::owner_not_registered(name))
    }

    pub fn contains_owner(&self, name: &str) -> bool {
        self.owners.iter().any(|owner| owner.name() == name)
    }

    /// Owners in registration order.
    pub fn owners(&self) -> impl Iterator<Item = &Reflectable> {
        self.owners.iter()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Resolves the callable reached without an instance.
    ///
    /// The returned reference can be invoked repeatedly without another lookup.
    pub fn resolve<S: Signature>(
        &self,
        owner: &str,
        function: &str,
    ) -> Result<&Callable<S>, ReflectionError> {
        let erased = self.owner(owner)?.get_function(function)?;
        let callable = erased
            .downcast::<S>()
            .ok_or_else(|| ReflectionError::SignatureMismatch {
                owner: owner.to_owned(),
                function: function.to_owned(),
                expected: S::name(),
                registered: erased.fingerprint().signature(),
            })?;
        tracing::trace!(owner, function, binding = %callable.binding(), "resolved function");
        Ok(callable)
    }

    /// Resolves the callable reached through a caller-supplied `T`.
    pub fn resolve_for_instance<S: Signature, T: 'static>(
        &self,
        owner: &str,
        function: &str,
    ) -> Result<&InstanceCallable<T, S>, ReflectionError> {
        let erased = self
            .owner(owner)?
            .get_function_for_given_instance(function)?;
        let callable = erased.downcast_for_instance::<T, S>().ok_or_else(|| {
            ReflectionError::SignatureMismatch {
                owner: owner.to_owned(),
                function: function.to_owned(),
                expected: S::name(),
                registered: erased.fingerprint().signature(),
            }
        })?;
        tracing::trace!(
            owner,
            function,
            instance = std::any::type_name::<T>(),
            "resolved function"
        );
        Ok(callable)
    }

    /// Invokes a free function, a static function, or a member function on a
    /// fresh default instance.
    ///
    /// # Errors
    ///
    /// - `OwnerNotRegistered` if no owner is named `owner`
    /// - `FunctionNotRegistered` if the owner has no `function`
    /// - `SignatureMismatch` if `function` was registered with another signature
    pub fn invoke<S: Signature>(
        &self,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        Ok(self.resolve::<S>(owner, function)?.invoke(args))
    }

    /// Invokes a member function on `instance`.
    ///
    /// Mutations made by the function are visible on `instance` afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`ReflectionManager::invoke`], plus `InvalidBindingForInstanceCall`
    /// if `function` is not a member function. An instance of another type than
    /// the one the function was registered for is a `SignatureMismatch`.
    pub fn invoke_on<S: Signature, T: 'static>(
        &self,
        instance: &mut T,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        Ok(self
            .resolve_for_instance::<S, T>(owner, function)?
            .invoke(instance, args))
    }

    /// Invokes a `&self` member function on a shared instance.
    ///
    /// Any pointer that derefs to `T` works, so an `Arc<T>` is passed as
    /// `&*arc`.
    ///
    /// # Errors
    ///
    /// Same as [`ReflectionManager::invoke_on`], plus `ExclusiveReceiverRequired`
    /// if the method takes `&mut self`. The method is not run in that case.
    pub fn invoke_ref<S: Signature, T: 'static>(
        &self,
        instance: &T,
        owner: &str,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        self.resolve_for_instance::<S, T>(owner, function)?
            .invoke_shared(instance, args)
            .ok_or_else(|| ReflectionError::exclusive_receiver(owner, function))
    }

    /// Invokes a function of the global (empty-named) owner.
    pub fn invoke_global<S: Signature>(
        &self,
        function: &str,
        args: S::Args<'_>,
    ) -> Result<S::Output, ReflectionError> {
        self.invoke::<S>("", function, args)
    }
}

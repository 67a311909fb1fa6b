//! Owner records: a named class, namespace or the global scope, together with
//! the functions registered under it.

use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::callable::{Callable, ErasedCallable, InstanceCallable};
use crate::signature::{Function, Method, Signature};
use crate::ReflectionError;

/// Separator between namespace segments in qualified owner names.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Joins a namespace path and a name with [`NAMESPACE_SEPARATOR`].
///
/// An empty `name` yields the namespace itself, which is how free functions
/// living in a namespace are owned.
///
/// ```rust
/// use reflex::qualified_name;
///
/// assert_eq!(qualified_name(["outer", "inner"], "Widget"), "outer::inner::Widget");
/// assert_eq!(qualified_name(["outer"], ""), "outer");
/// ```
pub fn qualified_name<I, P>(path: I, name: &str) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let mut segments: Vec<String> = path
        .into_iter()
        .map(|segment| segment.as_ref().to_owned())
        .collect();
    if !name.is_empty() {
        segments.push(name.to_owned());
    }
    segments.join(NAMESPACE_SEPARATOR)
}

/// Both ways a registered function can be reached.
///
/// `given_instance` is only present for member functions.
struct FunctionSlot {
    unbound: ErasedCallable,
    given_instance: Option<ErasedCallable>,
}

/// A registrable owner and its name-to-function table.
///
/// Function names are unique per owner: once a name is taken, later
/// registrations under it are ignored.
pub struct Reflectable {
    name: String,
    functions: BTreeMap<String, FunctionSlot>,
}

impl Reflectable {
    pub fn new(name: impl Into<String>) -> Self {
        Reflectable {
            name: name.into(),
            functions: BTreeMap::new(),
        }
    }

    /// The owner of free functions outside any namespace (empty name).
    pub fn global() -> Self {
        Reflectable::new("")
    }

    /// An owner named `path::name`, see [`qualified_name`].
    pub fn namespaced<I, P>(path: I, name: &str) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        Reflectable::new(qualified_name(path, name))
    }

    /// Starts an owner for class `T`, which can also take member functions.
    pub fn class<T: Default + 'static>(name: impl Into<String>) -> ReflectableClass<T> {
        ReflectableClass::new(name)
    }

    /// Builder form of [`Reflectable::register_function`].
    pub fn with_function<M, F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        M: 'static,
        F: Function<M>,
    {
        self.register_function(name, function);
        self
    }

    /// Registers a free function, static class function or closure.
    pub fn register_function<M: 'static, F: Function<M>>(
        &mut self,
        name: impl Into<String>,
        function: F,
    ) -> &mut Self {
        let slot = FunctionSlot {
            unbound: ErasedCallable::new(Callable::free(function)),
            given_instance: None,
        };
        self.insert(name.into(), slot, <F::Signature as Signature>::name())
    }

    fn register_method<T, M, F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
    where
        T: Default + 'static,
        M: 'static,
        F: Method<T, M>,
    {
        let method = Arc::new(method);
        let slot = FunctionSlot {
            unbound: ErasedCallable::new(Callable::fresh_instance::<T, M, F>(Arc::clone(&method))),
            given_instance: Some(ErasedCallable::for_instance(
                InstanceCallable::<T, F::Signature>::given_instance::<M, F>(method),
            )),
        };
        self.insert(name.into(), slot, <F::Signature as Signature>::name())
    }

    fn insert(&mut self, function: String, slot: FunctionSlot, signature: &str) -> &mut Self {
        match self.functions.entry(function) {
            Entry::Vacant(entry) => {
                tracing::debug!(
                    owner = %self.name,
                    function = %entry.key(),
                    signature,
                    member = slot.given_instance.is_some(),
                    "registered function"
                );
                entry.insert(slot);
            }
            Entry::Occupied(entry) => {
                tracing::debug!(
                    owner = %self.name,
                    function = %entry.key(),
                    signature,
                    "function already registered, keeping the first registration"
                );
            }
        }
        self
    }

    /// The holder used when no instance is supplied.
    ///
    /// For member functions this is the fresh-instance variant.
    pub fn get_function(&self, function_name: &str) -> Result<&ErasedCallable, ReflectionError> {
        self.functions
            .get(function_name)
            .map(|slot| &slot.unbound)
            .ok_or_else(|| ReflectionError::function_not_registered(&self.name, function_name))
    }

    /// The holder used when the caller supplies the instance.
    ///
    /// # Errors
    ///
    /// - `FunctionNotRegistered` if the name is unknown
    /// - `InvalidBindingForInstanceCall` if the function is not a member function
    pub fn get_function_for_given_instance(
        &self,
        function_name: &str,
    ) -> Result<&ErasedCallable, ReflectionError> {
        let slot = self
            .functions
            .get(function_name)
            .ok_or_else(|| ReflectionError::function_not_registered(&self.name, function_name))?;
        slot.given_instance
            .as_ref()
            .ok_or_else(|| ReflectionError::invalid_binding(&self.name, function_name))
    }

    pub fn is_registered(&self, function_name: &str) -> bool {
        self.functions.contains_key(function_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered function names in lexical order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for Reflectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflectable")
            .field("name", &self.name)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Owner builder for class `T`.
///
/// Member functions get both bindings: a fresh `T::default()` per call when
/// invoked without an instance, and the caller's instance otherwise.
///
/// ```rust
/// use reflex::{Reflectable, Binding};
///
/// #[derive(Default)]
/// struct Counter {
///     nb: u32,
/// }
///
/// impl Counter {
///     fn get_nb(&self) -> u32 {
///         self.nb
///     }
/// }
///
/// let counter: Reflectable = Reflectable::class::<Counter>("Counter")
///     .with_method("get_nb", Counter::get_nb)
///     .into();
///
/// assert_eq!(counter.get_function("get_nb").unwrap().binding(), Binding::FreshInstance);
/// ```
pub struct ReflectableClass<T> {
    record: Reflectable,
    _class: PhantomData<fn() -> T>,
}

impl<T: Default + 'static> ReflectableClass<T> {
    pub fn new(name: impl Into<String>) -> Self {
        ReflectableClass {
            record: Reflectable::new(name),
            _class: PhantomData,
        }
    }

    /// Registers a member function taking `&T` or `&mut T` as receiver.
    pub fn with_method<M, F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        M: 'static,
        F: Method<T, M>,
    {
        self.record.register_method::<T, M, F>(name, method);
        self
    }

    /// Registers a static function of the class.
    pub fn with_function<M, F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        M: 'static,
        F: Function<M>,
    {
        self.record.register_function(name, function);
        self
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn into_reflectable(self) -> Reflectable {
        self.record
    }
}

impl<T: Default + 'static> From<ReflectableClass<T>> for Reflectable {
    fn from(class: ReflectableClass<T>) -> Self {
        class.into_reflectable()
    }
}

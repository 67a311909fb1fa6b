//! Signature-typed callables and their type-erased holder.
//!
//! A registered function is stored twice removed from its concrete type:
//!
//! - [`Callable<S>`] / [`InstanceCallable<T, S>`] know the exact signature `S`
//!   (and instance type `T`) and expose a strongly typed `invoke`.
//! - [`ErasedCallable`] hides that type behind `dyn Any` so callables of every
//!   signature can share one map. It only answers [`ErasedCallable::binding`]
//!   and [`ErasedCallable::fingerprint`]; invoking requires a checked downcast
//!   back to the exact typed callable.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::signature::{Function, Method, Signature};

/// How a callable reaches its receiver, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Free function or static class function.
    Free,
    /// Member function invoked on a default instance built for each call.
    FreshInstance,
    /// Member function invoked on an instance supplied by the caller.
    GivenInstance,
}

impl Binding {
    pub fn is_member_function(self) -> bool {
        !matches!(self, Binding::Free)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Free => write!(f, "free"),
            Binding::FreshInstance => write!(f, "fresh-instance"),
            Binding::GivenInstance => write!(f, "given-instance"),
        }
    }
}

/// Identity of a stored callable's concrete type.
///
/// Equality only looks at the `TypeId`; the signature string is carried for
/// error messages.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprint {
    type_id: TypeId,
    signature: &'static str,
}

impl Fingerprint {
    /// Fingerprint of a free or fresh-instance callable with signature `S`.
    pub fn of<S: Signature>() -> Self {
        Fingerprint {
            type_id: TypeId::of::<Callable<S>>(),
            signature: S::name(),
        }
    }

    /// Fingerprint of a callable bound to a caller-supplied `T`.
    pub fn of_instance<T: 'static, S: Signature>() -> Self {
        Fingerprint {
            type_id: TypeId::of::<InstanceCallable<T, S>>(),
            signature: S::name(),
        }
    }

    pub fn signature(&self) -> &'static str {
        self.signature
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Fingerprint {}

/// Object-safe form of a callable with signature `S`.
trait Invoke<S: Signature>: Send + Sync {
    fn invoke<'a>(&self, args: S::Args<'a>) -> S::Output;
}

/// Object-safe form of a member function of `T` with signature `S`.
trait InvokeOn<T, S: Signature>: Send + Sync {
    fn invoke_on<'a>(&self, instance: &mut T, args: S::Args<'a>) -> S::Output;

    fn invoke_shared<'a>(&self, instance: &T, args: S::Args<'a>) -> Option<S::Output>;
}

struct FreeFunction<F, M> {
    function: F,
    _marker: PhantomData<fn() -> M>,
}

impl<S, M, F> Invoke<S> for FreeFunction<F, M>
where
    S: Signature,
    M: 'static,
    F: Function<M, Signature = S>,
{
    fn invoke<'a>(&self, args: S::Args<'a>) -> S::Output {
        self.function.call(args)
    }
}

struct FreshInstance<T, F, M> {
    method: Arc<F>,
    _marker: PhantomData<fn() -> (T, M)>,
}

impl<S, T, M, F> Invoke<S> for FreshInstance<T, F, M>
where
    S: Signature,
    T: Default + 'static,
    M: 'static,
    F: Method<T, M, Signature = S>,
{
    fn invoke<'a>(&self, args: S::Args<'a>) -> S::Output {
        self.method.call_method(&mut T::default(), args)
    }
}

struct GivenInstance<F, M> {
    method: Arc<F>,
    _marker: PhantomData<fn() -> M>,
}

impl<S, T, M, F> InvokeOn<T, S> for GivenInstance<F, M>
where
    S: Signature,
    M: 'static,
    F: Method<T, M, Signature = S>,
{
    fn invoke_on<'a>(&self, instance: &mut T, args: S::Args<'a>) -> S::Output {
        self.method.call_method(instance, args)
    }

    fn invoke_shared<'a>(&self, instance: &T, args: S::Args<'a>) -> Option<S::Output> {
        self.method.call_shared(instance, args)
    }
}

/// A callable with the exact signature `S`, invoked without an instance.
pub struct Callable<S: Signature> {
    binding: Binding,
    call: Box<dyn Invoke<S>>,
}

impl<S: Signature> Callable<S> {
    pub(crate) fn free<M: 'static, F>(function: F) -> Self
    where
        F: Function<M, Signature = S>,
    {
        Callable {
            binding: Binding::Free,
            call: Box::new(FreeFunction {
                function,
                _marker: PhantomData,
            }),
        }
    }

    /// Each call builds `T::default()`, runs the method on it and drops it.
    pub(crate) fn fresh_instance<T, M, F>(method: Arc<F>) -> Self
    where
        T: Default + 'static,
        M: 'static,
        F: Method<T, M, Signature = S>,
    {
        Callable {
            binding: Binding::FreshInstance,
            call: Box::new(FreshInstance::<T, F, M> {
                method,
                _marker: PhantomData,
            }),
        }
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn invoke(&self, args: S::Args<'_>) -> S::Output {
        self.call.invoke(args)
    }
}

/// A member function of `T` with signature `S`, invoked on a caller-supplied instance.
pub struct InstanceCallable<T, S: Signature> {
    shared_receiver: bool,
    call: Box<dyn InvokeOn<T, S>>,
}

impl<T: 'static, S: Signature> InstanceCallable<T, S> {
    pub(crate) fn given_instance<M, F>(method: Arc<F>) -> Self
    where
        M: 'static,
        F: Method<T, M, Signature = S>,
    {
        InstanceCallable {
            shared_receiver: F::SHARED_RECEIVER,
            call: Box::new(GivenInstance::<F, M> {
                method,
                _marker: PhantomData,
            }),
        }
    }

    pub fn binding(&self) -> Binding {
        Binding::GivenInstance
    }

    /// Whether the method takes `&T`, so it can run on a shared instance.
    pub fn accepts_shared(&self) -> bool {
        self.shared_receiver
    }

    pub fn invoke(&self, instance: &mut T, args: S::Args<'_>) -> S::Output {
        self.call.invoke_on(instance, args)
    }

    /// Runs a `&T` method on a shared instance. Returns `None` without
    /// running anything when the method takes `&mut T`.
    pub fn invoke_shared(&self, instance: &T, args: S::Args<'_>) -> Option<S::Output> {
        self.call.invoke_shared(instance, args)
    }
}

/// Type-erased holder for a [`Callable`] or an [`InstanceCallable`].
pub struct ErasedCallable {
    binding: Binding,
    fingerprint: Fingerprint,
    inner: Box<dyn Any + Send + Sync>,
}

impl ErasedCallable {
    pub(crate) fn new<S: Signature>(callable: Callable<S>) -> Self {
        ErasedCallable {
            binding: callable.binding(),
            fingerprint: Fingerprint::of::<S>(),
            inner: Box::new(callable),
        }
    }

    pub(crate) fn for_instance<T: 'static, S: Signature>(callable: InstanceCallable<T, S>) -> Self {
        ErasedCallable {
            binding: Binding::GivenInstance,
            fingerprint: Fingerprint::of_instance::<T, S>(),
            inner: Box::new(callable),
        }
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn is_member_function(&self) -> bool {
        self.binding.is_member_function()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Recovers the typed callable if it was registered with exactly `S`.
    pub fn downcast<S: Signature>(&self) -> Option<&Callable<S>> {
        if self.fingerprint != Fingerprint::of::<S>() {
            return None;
        }
        self.inner.downcast_ref::<Callable<S>>()
    }

    /// Recovers the instance-bound callable if it was registered for `T` with exactly `S`.
    pub fn downcast_for_instance<T: 'static, S: Signature>(
        &self,
    ) -> Option<&InstanceCallable<T, S>> {
        if self.fingerprint != Fingerprint::of_instance::<T, S>() {
            return None;
        }
        self.inner.downcast_ref::<InstanceCallable<T, S>>()
    }
}

impl fmt::Debug for ErasedCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedCallable")
            .field("binding", &self.binding)
            .field("signature", &self.fingerprint.signature)
            .finish()
    }
}

//! Call signatures and the traits that adapt Rust callables to them.
//!
//! A signature is spelled as a function-pointer type, `fn(A, B) -> R`, the same
//! way a caller would write the type of the function it expects to reach. The
//! [`Signature`] trait turns that spelling into an argument tuple and an output
//! type, so registered callables can be stored and invoked uniformly.
//!
//! [`Function`] and [`Method`] are implemented for every `Fn` value of a supported
//! shape. Their `Marker` parameter is the signature the value was recognised as,
//! which lets the compiler infer the signature from the value being registered:
//!
//! ```rust
//! use reflex::{Function, Signature};
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! fn call_through<M, F: Function<M>>(f: F, args: <F::Signature as Signature>::Args<'_>)
//!     -> <F::Signature as Signature>::Output {
//!     f.call(args)
//! }
//!
//! assert_eq!(call_through(add, (20, 22)), 42);
//! ```
//!
//! # Reference parameters
//!
//! Up to four parameters, each of them may be taken by value, as `&A` or as
//! `&mut A`. Such signatures are higher-ranked (`fn(&mut i32)` accepts a borrow
//! of any lifetime), so callers pass ordinary local borrows:
//!
//! ```rust
//! use reflex::{Function, Signature};
//!
//! fn fill(label: &str, out: &mut usize) {
//!     *out = label.len();
//! }
//!
//! fn call_through<M, F: Function<M>>(f: F, args: <F::Signature as Signature>::Args<'_>)
//!     -> <F::Signature as Signature>::Output {
//!     f.call(args)
//! }
//!
//! let mut out = 0;
//! call_through::<fn(&str, &mut usize), _>(fill, ("hello", &mut out));
//! assert_eq!(out, 5);
//! ```
//!
//! A function with reference parameters also fits the by-value shape for one
//! particular lifetime, so its signature has to be named where it is
//! registered, as `call_through::<fn(&str, &mut usize), _>` does above.
//! Signatures with five to eight parameters take every parameter by value.
//!
//! Referenced and by-value types must be `'static`, and so must the return
//! type: the signature takes part in a `TypeId` comparison at lookup time.

// A by-value impl and a reference impl of the same arity differ only in
// higher-ranked lifetimes; selection tells them apart by the leak check.
#![allow(coherence_leak_check)]

/// A call signature spelled as a function-pointer type, e.g. `fn(u32) -> u32`.
pub trait Signature: 'static {
    /// Arguments packed as a tuple, `()` for nullary signatures. Reference
    /// parameters borrow for `'a`.
    type Args<'a>;
    type Output: 'static;

    /// Human readable form of the signature, used in diagnostics.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A free function, static function or closure that can be registered on an owner.
pub trait Function<Marker>: Send + Sync + 'static {
    type Signature: Signature;

    fn call<'a>(
        &self,
        args: <Self::Signature as Signature>::Args<'a>,
    ) -> <Self::Signature as Signature>::Output;
}

/// A member function of `T`, taking either `&T` or `&mut T` as its receiver.
///
/// The receiver is not part of [`Method::Signature`]; it is supplied by the
/// binding mode the method is invoked through.
pub trait Method<T, Marker>: Send + Sync + 'static {
    type Signature: Signature;

    /// `true` when the receiver is `&T`.
    const SHARED_RECEIVER: bool;

    fn call_method<'a>(
        &self,
        this: &mut T,
        args: <Self::Signature as Signature>::Args<'a>,
    ) -> <Self::Signature as Signature>::Output;

    /// Calls the method on a shared instance; `None` for `&mut T` receivers,
    /// which are not run.
    fn call_shared<'a>(
        &self,
        this: &T,
        args: <Self::Signature as Signature>::Args<'a>,
    ) -> Option<<Self::Signature as Signature>::Output>;
}

// Parameter as written in a signature. Elided lifetimes make it higher-ranked.
macro_rules! sig_param {
    (val $ty:ident) => { $ty };
    (shared $ty:ident) => { &$ty };
    (unique $ty:ident) => { &mut $ty };
}

// Parameter as stored in `Signature::Args<$lt>`.
macro_rules! sig_arg {
    ($lt:lifetime, val $ty:ident) => { $ty };
    ($lt:lifetime, shared $ty:ident) => { &$lt $ty };
    ($lt:lifetime, unique $ty:ident) => { &$lt mut $ty };
}

macro_rules! impl_signature {
    ($(($kind:ident $arg:ident $val:ident [$($relax:tt)*]))*) => {
        impl<Ret: 'static, $($arg: 'static $($relax)*),*> Signature
            for fn($(sig_param!($kind $arg)),*) -> Ret
        {
            type Args<'a> = ($(sig_arg!('a, $kind $arg),)*);
            type Output = Ret;
        }

        impl<Func, Ret, $($arg: 'static $($relax)*),*> Function<fn($(sig_param!($kind $arg)),*) -> Ret>
            for Func
        where
            Func: Fn($(sig_param!($kind $arg)),*) -> Ret + Send + Sync + 'static,
            Ret: 'static,
        {
            type Signature = fn($(sig_param!($kind $arg)),*) -> Ret;

            fn call<'a>(&self, args: <Self::Signature as Signature>::Args<'a>) -> Ret {
                let ($($val,)*) = args;
                (self)($($val),*)
            }
        }

        impl<Class, Func, Ret, $($arg: 'static $($relax)*),*>
            Method<Class, fn(&Class, $(sig_param!($kind $arg)),*) -> Ret> for Func
        where
            Func: Fn(&Class, $(sig_param!($kind $arg)),*) -> Ret + Send + Sync + 'static,
            Class: 'static,
            Ret: 'static,
        {
            type Signature = fn($(sig_param!($kind $arg)),*) -> Ret;

            const SHARED_RECEIVER: bool = true;

            fn call_method<'a>(
                &self,
                this: &mut Class,
                args: <Self::Signature as Signature>::Args<'a>,
            ) -> Ret {
                let ($($val,)*) = args;
                (self)(&*this, $($val),*)
            }

            fn call_shared<'a>(
                &self,
                this: &Class,
                args: <Self::Signature as Signature>::Args<'a>,
            ) -> Option<Ret> {
                let ($($val,)*) = args;
                Some((self)(this, $($val),*))
            }
        }

        impl<Class, Func, Ret, $($arg: 'static $($relax)*),*>
            Method<Class, fn(&mut Class, $(sig_param!($kind $arg)),*) -> Ret> for Func
        where
            Func: Fn(&mut Class, $(sig_param!($kind $arg)),*) -> Ret + Send + Sync + 'static,
            Class: 'static,
            Ret: 'static,
        {
            type Signature = fn($(sig_param!($kind $arg)),*) -> Ret;

            const SHARED_RECEIVER: bool = false;

            fn call_method<'a>(
                &self,
                this: &mut Class,
                args: <Self::Signature as Signature>::Args<'a>,
            ) -> Ret {
                let ($($val,)*) = args;
                (self)(this, $($val),*)
            }

            fn call_shared<'a>(
                &self,
                _this: &Class,
                _args: <Self::Signature as Signature>::Args<'a>,
            ) -> Option<Ret> {
                None
            }
        }
    };
}

// Expands every by-value / `&` / `&mut` combination of the listed parameters.
macro_rules! impl_signature_shapes {
    ([$($done:tt)*]) => {
        impl_signature!($($done)*);
    };
    ([$($done:tt)*] $arg:ident $val:ident $(, $rest:ident $rest_val:ident)*) => {
        impl_signature_shapes!([$($done)* (val $arg $val [])] $($rest $rest_val),*);
        impl_signature_shapes!([$($done)* (shared $arg $val [+ ?Sized])] $($rest $rest_val),*);
        impl_signature_shapes!([$($done)* (unique $arg $val [+ ?Sized])] $($rest $rest_val),*);
    };
}

impl_signature_shapes!([]);
impl_signature_shapes!([] A0 a0);
impl_signature_shapes!([] A0 a0, A1 a1);
impl_signature_shapes!([] A0 a0, A1 a1, A2 a2);
impl_signature_shapes!([] A0 a0, A1 a1, A2 a2, A3 a3);
impl_signature!((val A0 a0 []) (val A1 a1 []) (val A2 a2 []) (val A3 a3 []) (val A4 a4 []));
impl_signature!(
    (val A0 a0 []) (val A1 a1 []) (val A2 a2 []) (val A3 a3 []) (val A4 a4 []) (val A5 a5 [])
);
impl_signature!(
    (val A0 a0 []) (val A1 a1 []) (val A2 a2 []) (val A3 a3 []) (val A4 a4 []) (val A5 a5 [])
    (val A6 a6 [])
);
impl_signature!(
    (val A0 a0 []) (val A1 a1 []) (val A2 a2 []) (val A3 a3 []) (val A4 a4 []) (val A5 a5 [])
    (val A6 a6 []) (val A7 a7 [])
);

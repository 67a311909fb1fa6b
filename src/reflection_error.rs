use thiserror::Error;

/// Failures surfaced by registration lookups and invocations.
///
/// Every variant reflects a registration or call-site mistake, so nothing is
/// retried or recovered internally: the error goes straight back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectionError {
    /// No owner with this name was registered.
    #[error("Class {owner} is not registered as reflectable.")]
    OwnerNotRegistered { owner: String },

    /// The owner exists but has no function with this name.
    #[error("Function {owner}::{function} is not registered.")]
    FunctionNotRegistered { owner: String, function: String },

    /// The function exists but was registered with another signature.
    #[error("Invalid function signature for function {owner}::{function}")]
    SignatureMismatch {
        owner: String,
        function: String,
        /// Signature requested by the caller.
        expected: &'static str,
        /// Signature the function was registered with.
        registered: &'static str,
    },

    /// A free or static function was requested through the instance-bound path.
    #[error("Function {owner}::{function} can't be called with object")]
    InvalidBindingForInstanceCall { owner: String, function: String },

    /// A `&mut self` method was requested on a shared instance.
    #[error("Function {owner}::{function} needs a mutable object")]
    ExclusiveReceiverRequired { owner: String, function: String },

    #[error("Reflection registry is not installed")]
    NotInstalled,

    #[error("Reflection registry is already installed")]
    AlreadyInstalled,
}

impl ReflectionError {
    pub(crate) fn owner_not_registered(owner: &str) -> Self {
        ReflectionError::OwnerNotRegistered {
            owner: owner.to_owned(),
        }
    }

    pub(crate) fn function_not_registered(owner: &str, function: &str) -> Self {
        ReflectionError::FunctionNotRegistered {
            owner: owner.to_owned(),
            function: function.to_owned(),
        }
    }

    pub(crate) fn exclusive_receiver(owner: &str, function: &str) -> Self {
        ReflectionError::ExclusiveReceiverRequired {
            owner: owner.to_owned(),
            function: function.to_owned(),
        }
    }

    pub(crate) fn invalid_binding(owner: &str, function: &str) -> Self {
        ReflectionError::InvalidBindingForInstanceCall {
            owner: owner.to_owned(),
            function: function.to_owned(),
        }
    }
}

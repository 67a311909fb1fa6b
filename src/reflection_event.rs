/// Events emitted by a process-wide registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use reflex::ReflectionEvent;
///
/// let event = ReflectionEvent::Install { owners: 2 };
/// assert_eq!(event.to_string(), "install { owners: 2 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionEvent {
    /// A sealed registry was installed.
    Install {
        /// Number of owners in the installed registry
        owners: usize,
    },

    /// A function was invoked by name.
    Invoke {
        owner: String,
        function: String,
        /// Whether the caller supplied an instance
        with_instance: bool,
        /// Whether the function was resolved and called
        found: bool,
    },

    /// An owner existence check was performed.
    Contains {
        owner: String,
        found: bool,
    },
}

impl std::fmt::Display for ReflectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReflectionEvent::Install { owners } => {
                write!(f, "install {{ owners: {} }}", owners)
            }
            ReflectionEvent::Invoke {
                owner,
                function,
                with_instance,
                found,
            } => {
                write!(
                    f,
                    "invoke {{ function: {}::{}, with_instance: {}, found: {} }}",
                    owner, function, with_instance, found
                )
            }
            ReflectionEvent::Contains { owner, found } => {
                write!(f, "contains {{ owner: {}, found: {} }}", owner, found)
            }
        }
    }
}

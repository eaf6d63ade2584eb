use thiserror::Error;

// Failure taxonomy for resolution, binding, and invocation.
#[derive(Debug, Error)]
pub enum CallError {
    // The dotted path did not resolve to any object.
    #[error("name `{0}` could not be resolved")]
    NotFound(String),

    // The path resolved, but the object cannot be invoked.
    #[error("`{0}` is not callable")]
    NotCallable(String),

    // The spread key and a named argument competed for the same positional slot.
    #[error("`{name}` and `*` cannot be specified at the same time")]
    ConflictingArguments { name: String },

    // A signature descriptor failed validation at construction.
    #[error("invalid signature: {reason}")]
    InvalidSignature { reason: String },

    // Raised by the invoked callable itself; never wrapped by the core.
    #[error("{0}")]
    Invocation(String),
}

impl CallError {
    pub fn invocation(reason: impl Into<String>) -> Self {
        Self::Invocation(reason.into())
    }
}

// Type alias for results that use `CallError` as the error type
pub type Result<T> = std::result::Result<T, CallError>;

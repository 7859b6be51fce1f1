//! Error types for bridge operations

use crate::handle::ForeignHandle;

/// Result type for bridge operations
pub type InteropResult<T> = Result<T, InteropError>;

/// Bridge error taxonomy.
///
/// All failures are local and synchronous: they surface to the immediate
/// caller, are never retried (foreign calls are not assumed idempotent), and
/// are never swallowed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InteropError {
    /// Size was requested from a foreign value that does not support it
    #[error("foreign object {0} does not have a size to turn it into an array")]
    NotSizable(ForeignHandle),

    /// Import target could not be resolved on the foreign side
    #[error("no foreign symbol named `{0}` to import")]
    UnresolvedForeignSymbol(String),

    /// Export source is not a defined managed method
    #[error("no method named `{0}` to export")]
    UnknownMethod(String),

    /// A key could not be normalized into an accessor identifier
    #[error("`{0}` is not a valid attribute name")]
    InvalidAttributeName(String),

    /// A foreign protocol primitive failed (unreadable key, bad handle, ...)
    #[error("foreign {op} on {handle} failed: {reason}")]
    Protocol {
        /// Which primitive failed ("read", "write", "invoke", "export")
        op: &'static str,
        /// The handle the message was sent to
        handle: ForeignHandle,
        /// Foreign-side description of the failure, including the key where
        /// one was involved
        reason: String,
    },
}

impl InteropError {
    /// Shorthand for a `Protocol` failure
    pub fn protocol(op: &'static str, handle: ForeignHandle, reason: impl Into<String>) -> Self {
        InteropError::Protocol {
            op,
            handle,
            reason: reason.into(),
        }
    }
}

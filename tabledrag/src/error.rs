use thiserror::Error;

/// Errors raised by a host document when a reorder cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The element id is not known to the document.
    #[error("element '{0}' not found")]
    UnknownElement(String),

    /// The element exists but has no parent to be reordered within.
    #[error("element '{0}' is not attached")]
    Detached(String),

    /// The node and the reference live under different parents.
    #[error("'{node}' and '{reference}' do not share a parent")]
    NotSibling {
        /// The element being moved.
        node: String,
        /// The element it was meant to be placed next to.
        reference: String,
    },
}

/// Error returned by a user supplied drag hook.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HookError {
    /// Error message
    pub message: String,
}

impl HookError {
    /// Create a new hook error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

use std::fmt;

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Errors reported by [`Queue`](crate::Queue) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue has no element to remove.
    Empty,

    /// A node or payload allocation could not be satisfied.
    AllocationFailure {
        /// Size of the failed request in bytes, when known.
        bytes: Option<usize>,
    },
}

impl QueueError {
    pub(crate) fn alloc(bytes: usize) -> Self {
        QueueError::AllocationFailure { bytes: Some(bytes) }
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Empty => write!(f, "queue is empty"),
            QueueError::AllocationFailure { bytes: Some(bytes) } => {
                write!(f, "failed to allocate {} bytes", bytes)
            }
            QueueError::AllocationFailure { bytes: None } => write!(f, "allocation failed"),
        }
    }
}

impl std::error::Error for QueueError {}

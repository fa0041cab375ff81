//! Error types for walk queries.

/// Failure reported by a backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a whole walk request.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("hop {hop} failed: {source}")]
    Store {
        hop: usize,
        #[source]
        source: StoreError,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalkError {
    pub(crate) fn at_hop(hop: usize) -> impl FnOnce(StoreError) -> Self {
        move |source| WalkError::Store { hop, source }
    }

    /// The hop whose store call failed, if this is a store failure.
    pub fn hop(&self) -> Option<usize> {
        match self {
            WalkError::Store { hop, .. } => Some(*hop),
            _ => None,
        }
    }
}

pub type WalkResult<T> = Result<T, WalkError>;

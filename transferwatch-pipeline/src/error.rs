use transferwatch_store::StoreError;

/// Errors that abort a cycle.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Store problems are fatal: continuing could overwrite history.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The listing source was unreachable or rejected the request. The
    /// store has not been touched; the driver retries next cycle.
    #[error("listing fetch failed: {0}")]
    Listing(String),
}

use thiserror::Error;

/// Errors surfaced by the CLI before or during the watch loop.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Client construction / bad flag values
    #[error("Config error: {0}")]
    Config(String),

    /// Fatal pipeline error (store corruption, persist failure)
    #[error("{0}")]
    Pipeline(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }
}

/// Errors from the rendering service or the FMRef lookup path.
#[derive(Debug, thiserror::Error)]
pub enum FmrefError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rendering service returned HTTP {status}: {message}")]
    Render { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

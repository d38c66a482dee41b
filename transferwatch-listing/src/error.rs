/// Errors from the listing source.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing returned HTTP {status} for page {page}")]
    Status { status: u16, page: u32 },
}

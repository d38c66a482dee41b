//! Seams between the pipeline and the two remote sources.
//!
//! Both traits return `impl Future` so strategies stay statically
//! dispatched through the pipeline generics.

use std::future::Future;

use crate::record::{RowExtraction, TransferRecord};
use crate::resolution::Resolution;

/// A paginated source of raw transfer rows.
pub trait TransferSource: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// Fetch and extract one listing page. Page numbers start at 1.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RowExtraction>, Self::Error>> + Send;
}

/// A secondary-source lookup strategy.
///
/// Implementations are read-only: no shared state is mutated, every result
/// flows back through the returned [`Resolution`].
pub trait Resolver: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// Short label for status lines.
    fn label(&self) -> &'static str;

    /// Whether `record` still has anything for this strategy to resolve.
    fn eligible(&self, record: &TransferRecord) -> bool;

    /// The patch applied when a lookup task errors out.
    fn failure_resolution(&self) -> Resolution;

    /// Resolve one record.
    fn resolve(
        &self,
        record: &TransferRecord,
    ) -> impl Future<Output = Result<Resolution, Self::Error>> + Send;
}

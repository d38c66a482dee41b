use futures::stream::{self, StreamExt};

use transferwatch_core::record::TransferRecord;
use transferwatch_core::resolution::Resolution;
use transferwatch_core::traits::Resolver;
use transferwatch_store::TransferStore;

/// Tally of one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Lookups that produced a real value.
    pub resolved: usize,
    /// Lookups that concluded with a sentinel.
    pub sentinels: usize,
    /// Tasks that errored out (recorded as the strategy's failure sentinel).
    pub failed: usize,
}

/// Resolve the records at `indices` concurrently, bounded by `workers`.
///
/// One task per record; a task owns nothing but its cloned record and
/// returns `(index, resolution)`. Task errors are contained: the failing
/// record gets the strategy's failure sentinel and sibling tasks continue.
/// All merging happens single-threaded here after every task has finished.
pub async fn enrich_records<R: Resolver>(
    store: &mut TransferStore,
    indices: Vec<usize>,
    resolver: &R,
    workers: usize,
) -> EnrichStats {
    let jobs: Vec<(usize, TransferRecord)> = indices
        .into_iter()
        .filter_map(|i| store.get(i).map(|r| (i, r.clone())))
        .collect();

    let results: Vec<(usize, Resolution, bool)> = stream::iter(jobs)
        .map(|(idx, record)| async move {
            match resolver.resolve(&record).await {
                Ok(resolution) => (idx, resolution, false),
                Err(e) => {
                    log::warn!("{} failed for {}: {}", resolver.label(), record.player, e);
                    (idx, resolver.failure_resolution(), true)
                }
            }
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let mut stats = EnrichStats::default();
    for (idx, resolution, errored) in results {
        if errored {
            stats.failed += 1;
        } else if resolution.is_found() {
            stats.resolved += 1;
        } else {
            stats.sentinels += 1;
        }
        store.apply(idx, resolution);
    }

    stats
}

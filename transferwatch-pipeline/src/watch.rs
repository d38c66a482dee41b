//! The cycle driver.
//!
//! Alternates between idle and one running cycle, forever. Time is behind
//! the [`Clock`] and [`Sleeper`] traits so cycle logic tests run without
//! real delays.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;

use transferwatch_core::traits::{Resolver, TransferSource};
use transferwatch_store::{DedupKey, TransferStore};

use crate::detect;
use crate::enrich::{self, EnrichStats};
use crate::error::PipelineError;

/// Wall-clock source for `Datetime Retrieved` stamps.
pub trait Clock: Send + Sync {
    /// Timestamp in the store's `%Y-%m-%d %H:%M:%S` format.
    fn timestamp(&self) -> String;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Inter-cycle delay.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Which records are handed to the resolver each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichPolicy {
    /// Only the records appended this cycle.
    #[default]
    NewOnly,
    /// Appended records plus anything still holding a non-terminal value.
    /// Terminal results are never re-resolved.
    RetryPending,
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub store_path: PathBuf,
    pub pages: u32,
    pub interval: Duration,
    pub policy: EnrichPolicy,
    pub dedup: DedupKey,
    /// Enrichment worker-pool size.
    pub workers: usize,
}

/// Enrichment concurrency defaults to the machine's parallelism.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Rows extracted across all fetched pages.
    pub fetched: usize,
    /// Records appended to the store.
    pub added: usize,
    pub resolved: usize,
    pub sentinels: usize,
    pub failed: usize,
}

impl CycleReport {
    /// Whether this cycle mutated the store (and therefore rewrote it).
    pub fn changed(&self) -> bool {
        self.added > 0 || self.resolved + self.sentinels + self.failed > 0
    }
}

/// Progress events surfaced to the caller's observer.
#[derive(Debug, Clone)]
pub enum CycleEvent {
    CycleStarted,
    CycleFinished(CycleReport),
    /// The cycle was abandoned before any write; retried after the delay.
    CycleFailed { error: String },
    Sleeping { interval: Duration },
}

/// Drives extract -> detect -> resolve -> merge -> persist.
pub struct Watcher<S, R, C, Z> {
    source: S,
    resolver: R,
    clock: C,
    sleeper: Z,
    options: WatchOptions,
}

impl<S, R, C, Z> Watcher<S, R, C, Z>
where
    S: TransferSource,
    R: Resolver,
    C: Clock,
    Z: Sleeper,
{
    pub fn new(source: S, resolver: R, clock: C, sleeper: Z, options: WatchOptions) -> Self {
        Self {
            source,
            resolver,
            clock,
            sleeper,
            options,
        }
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Run one full cycle.
    ///
    /// The store file is rewritten only when the cycle appended or resolved
    /// something, so an unchanged source leaves it byte-identical. A
    /// listing failure aborts before any write.
    pub async fn run_cycle(&self) -> Result<CycleReport, PipelineError> {
        let mut store = TransferStore::load(&self.options.store_path, self.options.dedup)?;

        let mut rows = Vec::new();
        for page in 1..=self.options.pages {
            let page_rows = self
                .source
                .fetch_page(page)
                .await
                .map_err(|e| PipelineError::Listing(e.to_string()))?;
            rows.extend(page_rows);
        }
        let fetched = rows.len();

        let timestamp = self.clock.timestamp();
        let new = detect::detect_new(&store, rows, &timestamp);

        // Append in extraction order. The store index also rejects the same
        // player appearing on two pages of the same cycle.
        let mut appended = Vec::new();
        for record in new {
            let idx = store.len();
            if store.append(record) {
                appended.push(idx);
            }
        }
        let added = appended.len();

        let eligible: Vec<usize> = match self.options.policy {
            EnrichPolicy::NewOnly => appended,
            EnrichPolicy::RetryPending => (0..store.len()).collect(),
        }
        .into_iter()
        .filter(|&i| self.resolver.eligible(&store.records()[i]))
        .collect();

        let stats = if eligible.is_empty() {
            EnrichStats::default()
        } else {
            log::info!(
                "resolving {} record(s) via {}",
                eligible.len(),
                self.resolver.label()
            );
            enrich::enrich_records(&mut store, eligible, &self.resolver, self.options.workers)
                .await
        };

        let report = CycleReport {
            fetched,
            added,
            resolved: stats.resolved,
            sentinels: stats.sentinels,
            failed: stats.failed,
        };

        if report.changed() {
            store.persist()?;
        }

        Ok(report)
    }

    /// Run cycles forever with the configured delay in between.
    ///
    /// Listing failures are reported through the observer and retried on
    /// the next tick; store failures return immediately so the process can
    /// stop before history is damaged.
    pub async fn run(
        &self,
        mut observer: impl FnMut(CycleEvent),
    ) -> Result<(), PipelineError> {
        loop {
            observer(CycleEvent::CycleStarted);
            match self.run_cycle().await {
                Ok(report) => observer(CycleEvent::CycleFinished(report)),
                Err(PipelineError::Listing(error)) => {
                    observer(CycleEvent::CycleFailed { error })
                }
                Err(fatal @ PipelineError::Store(_)) => return Err(fatal),
            }
            observer(CycleEvent::Sleeping {
                interval: self.options.interval,
            });
            self.sleeper.sleep(self.options.interval).await;
        }
    }
}

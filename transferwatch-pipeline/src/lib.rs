//! The ingestion-and-enrichment pipeline.
//!
//! One cycle: load the store, fetch the configured listing pages, detect
//! which rows are new, resolve them against the secondary source with a
//! bounded worker pool, merge, and persist atomically. The driver repeats
//! cycles forever on a fixed interval.

pub mod detect;
pub mod enrich;
pub mod error;
pub mod watch;

pub use detect::detect_new;
pub use enrich::{EnrichStats, enrich_records};
pub use error::PipelineError;
pub use watch::{
    Clock, CycleEvent, CycleReport, EnrichPolicy, Sleeper, SystemClock, TokioSleeper,
    WatchOptions, Watcher, default_workers,
};

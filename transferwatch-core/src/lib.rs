//! Core domain types shared by every crate in the workspace.
//!
//! Defines the durable record shape, the sentinel vocabulary for lookup
//! outcomes, and the traits that decouple the pipeline from the two remote
//! sources.

pub mod record;
pub mod resolution;
pub mod traits;

pub use record::{Completeness, Field, RawRecord, RowExtraction, TransferRecord};
pub use resolution::{LookupOutcome, Resolution, Sentinel};
pub use traits::{Resolver, TransferSource};

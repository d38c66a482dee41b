//! Primary-source listing client and row extraction.
//!
//! Fetches the paginated "newest transfers" listing and maps each table row
//! to a [`transferwatch_core::RawRecord`]. Extraction is a pure mapping
//! from markup to records: it never deduplicates, never enriches, and a row
//! with missing substructure yields `None` fields rather than an error.

pub mod client;
pub mod error;
pub mod extract;

pub use client::ListingClient;
pub use error::ListingError;
pub use extract::extract_rows;

//! Secondary-source enrichment: FMRef lookups through a rendering service.
//!
//! FMRef pages are populated client-side, so a plain GET returns an empty
//! shell. Every lookup renders the page in a real (headless) browser
//! session via a Browserless-compatible service and parses the final HTML.
//!
//! Two strategies are provided: [`NameSearchResolver`] resolves a player
//! name to an FMRef id through the search page, and [`TeamLookupResolver`]
//! resolves an already-known id to its affiliated team through the player
//! detail page.

pub mod client;
pub mod error;
pub mod lookup;

pub use client::RenderClient;
pub use error::FmrefError;
pub use lookup::{Candidate, NameSearchResolver, TeamLookupResolver};

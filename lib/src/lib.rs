//! Skyline - service-usage frequency tracking and architecture simulation.
//!
//! Skyline ingests textual architecture-diagram descriptions, extracts the
//! named infrastructure services, accumulates how often each one has ever
//! been seen in a durable SQLite store, and synthesizes new plausible
//! service sequences by weighted random walks over those historical counts.
//!
//! The pipeline, leaf to root:
//!
//! 1. [`extract::service_tokens`] pulls `word:`-shaped tokens out of
//!    diagram text.
//! 2. A [`ServiceCatalog`] decides which tokens are counted at all.
//! 3. [`FrequencyStore`] durably upserts one count per occurrence and
//!    serves full snapshots.
//! 4. [`TransitionChain`] derives a probability table from a snapshot.
//! 5. [`Sampler`] walks the table with a seedable RNG.
//!
//! The catalog, store handle, and RNG are all passed in explicitly; the
//! crate keeps no process-wide state.

pub mod catalog;
pub mod chain;
pub mod db;
pub mod extract;
pub mod ingest;
pub mod report;
pub mod simulate;

pub use catalog::ServiceCatalog;
pub use chain::{ChainError, TransitionChain};
pub use db::{DbError, DbResult, FrequencyStore};
pub use ingest::{observe_diagram, tally_services};
pub use simulate::Sampler;

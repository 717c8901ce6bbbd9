//! Diagram ingestion pipeline.
//!
//! Ties the leaf components together: extract tokens from diagram text,
//! drop the ones the catalog does not recognize, and record one store
//! increment per surviving occurrence. Unrecognized tokens are filtering,
//! not a fault - they are traced at debug level and otherwise ignored.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::ServiceCatalog;
use crate::db::{DbResult, FrequencyStore};
use crate::extract::service_tokens;

/// Count the catalog-recognized tokens in `text`.
///
/// Pure per-run tally; the durable store is not touched.
pub fn tally_services(catalog: &ServiceCatalog, text: &str) -> BTreeMap<String, u64> {
    let mut tally = BTreeMap::new();
    for token in service_tokens(text) {
        if catalog.contains(token) {
            *tally.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    tally
}

/// Ingest one diagram: extract, filter, and record every occurrence.
///
/// Each recognized token occurrence becomes one committed increment in
/// `store`. Returns the per-run tally of what this diagram contributed.
///
/// ## Errors
///
/// Propagates the first store failure; increments committed before the
/// failure remain recorded.
pub async fn observe_diagram(
    store: &FrequencyStore,
    catalog: &ServiceCatalog,
    text: &str,
) -> DbResult<BTreeMap<String, u64>> {
    let mut tally: BTreeMap<String, u64> = BTreeMap::new();

    for token in service_tokens(text) {
        if !catalog.contains(token) {
            debug!(token = %token, "Token not in catalog, skipped");
            continue;
        }
        store.increment(token).await?;
        *tally.entry(token.to_string()).or_insert(0) += 1;
    }

    debug!(
        services = tally.len(),
        observations = tally.values().sum::<u64>(),
        "Diagram observed"
    );
    Ok(tally)
}

//! K2,3 subgraph-homeomorphism search (spec.md §4.7).

use crate::engine::{self, EmbedOutcome};
use crate::error::Result;
use crate::store::{EmbedMode, GraphStore};

/// Returns `Success` if `store`'s graph contains no K2,3 homeomorph, or
/// `NonEmbeddable` with one isolated in the returned subgraph otherwise.
pub fn search(store: &mut GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, EmbedMode::SearchK23)
}

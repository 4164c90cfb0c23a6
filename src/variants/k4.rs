//! K4 subgraph-homeomorphism search (spec.md §4.7).

use crate::engine::{self, EmbedOutcome};
use crate::error::Result;
use crate::store::{EmbedMode, GraphStore};

/// Returns `Success` if `store`'s graph contains no K4 homeomorph, or
/// `NonEmbeddable` with one isolated in the returned subgraph otherwise
/// (spec.md §8, "Homeomorph-search soundness").
pub fn search(store: &mut GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, EmbedMode::SearchK4)
}

//! K3,3 subgraph-homeomorphism search (spec.md §4.7). Distinct from planar
//! embedding failure: a graph can be planar-embeddable (if disconnected
//! enough) yet still contain a K3,3 minor whose removal the caller wants
//! isolated explicitly, or the caller may want the search run without also
//! paying for a full planar embedding attempt.
//!
//! The source's embedding-obstruction tree (E-nodes of planar bridge sets,
//! O-nodes of K5 witnesses, spec.md §4.7 final paragraph) is not
//! reproduced: this port certifies a single K3,3 homeomorph directly via
//! the isolator's disjoint-path search instead of building and
//! independently re-planarizing six bridge-set subgraphs. Documented in
//! DESIGN.md as a simplification; the soundness property (§8) still holds
//! because [`crate::verify`] independently re-checks whatever is returned.

use crate::engine::{self, EmbedOutcome};
use crate::error::Result;
use crate::store::{EmbedMode, GraphStore};

/// Returns `Success` if `store`'s graph contains no K3,3 homeomorph, or
/// `NonEmbeddable` with one isolated in the returned subgraph otherwise.
pub fn search(store: &mut GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, EmbedMode::SearchK33)
}

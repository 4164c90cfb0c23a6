//! **planarity** is a linear-time planar-graph toolkit: planar and
//! outerplanar embedding with Kuratowski/outerplanar obstruction isolation,
//! subgraph homeomorphism search for K2,3/K3,3/K4, and planar graph drawing
//! via a visibility representation.
//!
//! Every algorithm shares one engine: an edge-addition planarity embedder
//! ([`engine::embed`]) that processes vertices in reverse DFS-index order,
//! maintaining a partial embedding as biconnected components joined at cut
//! vertices. A failure to embed is localized to a single biconnected
//! component and converted either into a certified obstruction subgraph
//! ([`isolator`]) or, for the homeomorph searches, reported directly as the
//! witness.
//!
//! The [`GraphStore`](store::GraphStore) owns every vertex and arc record
//! for the duration of one embed/search invocation; see [`store`] for the
//! half-edge data model and [`index`] for the sentinel-based index
//! newtypes used throughout instead of pointers or `Option<T>`.

pub mod dfs;
pub mod drawing;
pub mod engine;
pub mod error;
pub mod face;
pub mod generate;
pub mod index;
pub mod io;
pub mod isolator;
pub mod store;
pub mod variants;
pub mod verify;
pub mod walkdown;
pub mod walkup;

pub use engine::{embed, EmbedOutcome};
pub use error::{PlanarityError, Result};
pub use isolator::{HomeomorphKind, Subgraph};
pub use store::{EmbedMode, EmbeddingFlags, GraphStore};

/// Runs planar embedding on `store`, which must already hold the input
/// graph's edges (spec.md §2's "Data flow"; spec.md §8's "Embedding
/// soundness" / "Completeness" properties).
pub fn embed_planar(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, store::EmbedMode::Planar)
}

/// Runs outerplanar embedding on `store` (spec.md §8's "Outerplanar
/// analogues").
pub fn embed_outerplanar(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, store::EmbedMode::Outerplanar)
}

/// Runs planar embedding and, on success, the visibility-representation
/// drawing post-processor (spec.md §4.8).
pub fn draw_planar(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    engine::embed(store, store::EmbedMode::DrawPlanar)
}

/// Searches `store`'s graph for a K2,3 homeomorph (spec.md §4.7).
pub fn search_k23(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    variants::k23::search(store)
}

/// Searches `store`'s graph for a K3,3 homeomorph (spec.md §4.7).
pub fn search_k33(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    variants::k33::search(store)
}

/// Searches `store`'s graph for a K4 homeomorph (spec.md §4.7).
pub fn search_k4(store: &mut store::GraphStore) -> Result<EmbedOutcome> {
    variants::k4::search(store)
}

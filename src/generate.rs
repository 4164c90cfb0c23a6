//! Random graph generation (SPEC_FULL.md §4.10): a boundary-contract
//! collaborator for the CLI's `-r`/`-m`/`-n` flags, grounded in the
//! teacher's own `generators::random_undirected_graph` (pick each candidate
//! edge uniformly, add it if not already present) rather than a
//! research-grade sampler — spec.md §1 places random graph generation out
//! of scope as an algorithmic component, so this stays deliberately simple.

use rand::Rng;

use crate::engine::{self, EmbedOutcome};
use crate::error::Result;
use crate::index::VertexId;
use crate::store::{AdjacencySide, EmbedMode, GraphStore};

/// Builds a uniform random simple graph on `n` vertices with `m` distinct
/// edges, chosen by rejection sampling against [`GraphStore::test_neighbor`]
/// (mirrors `random_undirected_graph`'s "try an edge, skip if already
/// present" loop, but targets an exact edge count rather than a per-edge
/// probability, matching the source CLI's `-r count n` contract of a fixed
/// `n`-vertex graph).
pub fn random_graph(n: u32, m: u32, rng: &mut impl Rng) -> Result<GraphStore> {
    let mut store = GraphStore::new();
    store.ensure_arc_capacity(2 * m.max(1))?;
    store.init(n)?;

    let max_possible = n as u64 * (n as u64 - 1) / 2;
    let target = (m as u64).min(max_possible) as u32;
    let mut added = 0u32;
    let mut attempts = 0u64;
    let attempt_cap = max_possible.max(1) * 8 + 64;
    while added < target && attempts < attempt_cap {
        attempts += 1;
        let u = VertexId::new(rng.gen_range(0..n));
        let v = VertexId::new(rng.gen_range(0..n));
        if u == v || store.test_neighbor(u, v) {
            continue;
        }
        store.add_edge(u, AdjacencySide::Last, v, AdjacencySide::Last)?;
        added += 1;
    }
    Ok(store)
}

/// Builds a random graph on `n` vertices, then greedily adds random
/// non-adjacent edges (each tried once, re-embedding from scratch) until no
/// further edge can be added without losing planarity, yielding a maximal
/// planar graph (mirrors the source's `-m` flag).
pub fn maximal_planar(n: u32, rng: &mut impl Rng) -> Result<GraphStore> {
    maximal_planar_with_headroom(n, rng, 0)
}

/// Shared implementation; `headroom` extra edges' worth of arc capacity are
/// reserved up front so [`maximal_planar_plus_one`] can add its final edge
/// without growing the store after [`GraphStore::init`], which spec.md
/// §4.1/§5 reserve for `ensure_arc_capacity` calls made strictly before
/// `init` (capacity is allocated once; a single one-time grow is supported
/// only before the store holds any records).
fn maximal_planar_with_headroom(n: u32, rng: &mut impl Rng, headroom: u32) -> Result<GraphStore> {
    let cap = 2 * ((3 * n.max(3) - 6).max(1) + headroom);
    let mut store = GraphStore::new();
    store.ensure_arc_capacity(cap)?;
    store.init(n)?;

    loop {
        let mut candidates: Vec<(VertexId, VertexId)> = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                let (uv, vv) = (VertexId::new(u), VertexId::new(v));
                if !store.test_neighbor(uv, vv) {
                    candidates.push((uv, vv));
                }
            }
        }
        if candidates.is_empty() {
            break;
        }
        // Shuffle once and try every remaining candidate in this pass: a
        // triangulation's complement can hold several permanently-failing
        // pairs at once, so retrying the whole (shrinking) candidate set
        // every outer iteration without ever excluding a tried-and-failed
        // pair would not terminate. One edge gets added per full pass, or
        // none do and the graph is already maximal.
        for i in (1..candidates.len()).rev() {
            let j = rng.gen_range(0..=i);
            candidates.swap(i, j);
        }
        let mut added_one = false;
        for (u, v) in candidates {
            let mut trial = clone_edges_into_fresh_store(&store, n)?;
            trial.add_edge(u, AdjacencySide::Last, v, AdjacencySide::Last)?;
            if let EmbedOutcome::Success = engine::embed(&mut trial, EmbedMode::Planar)? {
                store.add_edge(u, AdjacencySide::Last, v, AdjacencySide::Last)?;
                added_one = true;
                break;
            }
        }
        if !added_one {
            break;
        }
    }
    Ok(store)
}

/// Builds a maximal planar graph on `n` vertices, then adds exactly one
/// further edge (guaranteed to break planarity, since the graph was already
/// maximal), mirroring the source's `-n` flag.
pub fn maximal_planar_plus_one(n: u32, rng: &mut impl Rng) -> Result<GraphStore> {
    let mut store = maximal_planar_with_headroom(n, rng, 1)?;
    for u in 0..n {
        for v in (u + 1)..n {
            let (uv, vv) = (VertexId::new(u), VertexId::new(v));
            if !store.test_neighbor(uv, vv) {
                store.add_edge(uv, AdjacencySide::Last, vv, AdjacencySide::Last)?;
                return Ok(store);
            }
        }
    }
    Ok(store)
}

fn clone_edges_into_fresh_store(store: &GraphStore, n: u32) -> Result<GraphStore> {
    let mut fresh = GraphStore::new();
    fresh.ensure_arc_capacity(store.arc_capacity + 2)?;
    fresh.init(n)?;
    for u in 0..n {
        let uid = VertexId::new(u);
        for arc in store.adjacency_iter(uid) {
            let w = store.neighbor(arc);
            if w.0 > u {
                fresh.add_edge(uid, AdjacencySide::Last, w, AdjacencySide::Last)?;
            }
        }
    }
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_graph_hits_requested_edge_count_when_feasible() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = random_graph(6, 8, &mut rng).unwrap();
        assert_eq!(store.m, 8);
    }

    #[test]
    fn random_graph_caps_at_the_complete_graph() {
        let mut rng = StdRng::seed_from_u64(2);
        // n = 4 admits at most 6 edges; asking for 100 must not hang.
        let store = random_graph(4, 100, &mut rng).unwrap();
        assert_eq!(store.m, 6);
    }

    #[test]
    fn maximal_planar_graph_is_itself_planar_and_hits_the_edge_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = maximal_planar(6, &mut rng).unwrap();
        let outcome = engine::embed(&mut store, EmbedMode::Planar).unwrap();
        assert!(matches!(outcome, EmbedOutcome::Success));
        // A maximal planar graph on 6 vertices has exactly 3n - 6 = 12 edges;
        // every candidate edge tried during generation either got added or
        // was rejected for breaking planarity, so none remain addable.
        assert_eq!(store.m, 3 * 6 - 6);
    }

    #[test]
    fn maximal_planar_plus_one_is_not_planar() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = maximal_planar_plus_one(6, &mut rng).unwrap();
        let outcome = engine::embed(&mut store, EmbedMode::Planar).unwrap();
        assert!(matches!(outcome, EmbedOutcome::NonEmbeddable(_)));
    }
}

//! Integration tests covering spec.md §8's named scenarios: a handful of
//! small, hand-built graphs with a known planar/nonplanar answer, checked
//! both for the right [`EmbedOutcome`] and (independently) for integrity via
//! [`planarity::verify`].

use planarity::index::VertexId;
use planarity::store::{AdjacencySide, EmbedMode, GraphStore};
use planarity::{engine, verify, EmbedOutcome};

fn build_store(n: u32, edges: &[(u32, u32)]) -> GraphStore {
    let mut store = GraphStore::new();
    store.init(n).expect("init");
    for &(u, v) in edges {
        store
            .add_edge(VertexId::new(u), AdjacencySide::Last, VertexId::new(v), AdjacencySide::Last)
            .expect("add_edge");
    }
    store
}

fn complete_graph_edges(n: u32) -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push((u, v));
        }
    }
    edges
}

fn complete_bipartite_edges(a: u32, b: u32) -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    for u in 0..a {
        for v in 0..b {
            edges.push((u, a + v));
        }
    }
    edges
}

#[test]
fn p5_cycle_is_planar() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
    let mut store = build_store(5, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    assert!(matches!(outcome, EmbedOutcome::Success));
    verify::check_embedding(&store, false).expect("valid embedding");
}

#[test]
fn k4_is_planar() {
    let edges = complete_graph_edges(4);
    let mut store = build_store(4, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    assert!(matches!(outcome, EmbedOutcome::Success));
    verify::check_embedding(&store, false).expect("valid embedding");
}

#[test]
fn k5_is_not_planar_and_isolates_k5() {
    let edges = complete_graph_edges(5);
    let mut store = build_store(5, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            assert_eq!(witness.kind, planarity::HomeomorphKind::K5);
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("K5 must not be planar"),
    }
}

#[test]
fn k33_is_not_planar_and_isolates_k33() {
    let edges = complete_bipartite_edges(3, 3);
    let mut store = build_store(6, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            assert_eq!(witness.kind, planarity::HomeomorphKind::K33);
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("K3,3 must not be planar"),
    }
}

#[test]
fn subdivided_k33_is_still_not_planar() {
    // Replace edge (0, 3) of K3,3 with a path 0 - 6 - 3 through a new
    // degree-2 vertex; a homeomorph is still present and must still be
    // rejected (spec.md §8's "Subdivision invariance").
    let mut edges = complete_bipartite_edges(3, 3);
    edges.retain(|&e| e != (0, 3));
    edges.push((0, 6));
    edges.push((6, 3));
    let mut store = build_store(7, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            assert_eq!(witness.kind, planarity::HomeomorphKind::K33);
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("subdivided K3,3 must not be planar"),
    }
}

#[test]
fn petersen_graph_is_not_planar() {
    // Outer 5-cycle 0..5, inner pentagram 5..10, spokes i -> i+5.
    let mut edges = vec![
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 0),
        (5, 7),
        (7, 9),
        (9, 6),
        (6, 8),
        (8, 5),
    ];
    for i in 0..5 {
        edges.push((i, i + 5));
    }
    let mut store = build_store(10, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("the Petersen graph must not be planar"),
    }
}

#[test]
fn outerplanar_k4_is_rejected() {
    let edges = complete_graph_edges(4);
    let mut store = build_store(4, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Outerplanar).expect("embed");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("K4 is not outerplanar"),
    }
}

#[test]
fn star_graph_is_outerplanar() {
    let edges: Vec<(u32, u32)> = (1..6).map(|v| (0, v)).collect();
    let mut store = build_store(6, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::Outerplanar).expect("embed");
    assert!(matches!(outcome, EmbedOutcome::Success));
    verify::check_embedding(&store, true).expect("valid embedding");
}

#[test]
fn k33_search_finds_homeomorph_in_larger_graph() {
    let mut edges = complete_bipartite_edges(3, 3);
    // Extra chords that keep the graph nonplanar but obscure the raw K3,3.
    edges.push((0, 1));
    edges.push((3, 4));
    let mut store = build_store(6, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::SearchK33).expect("search");
    match outcome {
        EmbedOutcome::NonEmbeddable(witness) => {
            assert_eq!(witness.kind, planarity::HomeomorphKind::K33);
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("graph contains a K3,3 homeomorph"),
    }
}

#[test]
fn k23_search_accepts_graph_without_k23() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0)];
    let mut store = build_store(4, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::SearchK23).expect("search");
    assert!(matches!(outcome, EmbedOutcome::Success));
}

#[test]
fn draw_planar_produces_a_verifiable_visibility_representation() {
    let edges = complete_bipartite_edges(2, 3);
    let mut store = build_store(5, &edges);
    let outcome = engine::embed(&mut store, EmbedMode::DrawPlanar).expect("embed");
    assert!(matches!(outcome, EmbedOutcome::Success));
    verify::check_embedding(&store, false).expect("valid embedding");
    planarity::drawing::verify_visibility(&store).expect("valid visibility representation");
}

#[test]
fn k5_trips_the_trivial_edge_bound_shortcut() {
    // 10 edges on 5 vertices exceeds 3n - 6 = 9, so `engine::embed` must
    // reject it via `trivial_excess_witness` before running DFS at all.
    let edges = complete_graph_edges(5);
    let mut store = build_store(5, &edges);
    assert!(!store.flags.is_set(planarity::EmbeddingFlags::DFS_NUMBERED));
    let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    assert!(matches!(outcome, EmbedOutcome::NonEmbeddable(_)));
    assert!(!store.flags.is_set(planarity::EmbeddingFlags::DFS_NUMBERED));
}

/// Re-running `embed` on the same store after [`GraphStore::reinitialize`]
/// with the same edges re-added must reach the same verdict (spec.md §8,
/// "Idempotence").
#[test]
fn reembedding_planar_graph_after_reinitialize_succeeds_again() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
    let mut store = build_store(5, &edges);
    let first = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    assert!(matches!(first, EmbedOutcome::Success));

    store.reinitialize();
    for &(u, v) in &edges {
        store
            .add_edge(VertexId::new(u), AdjacencySide::Last, VertexId::new(v), AdjacencySide::Last)
            .expect("add_edge");
    }
    let second = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
    assert!(matches!(second, EmbedOutcome::Success));
    verify::check_embedding(&store, false).expect("valid embedding");
}

#[test]
fn reembedding_nonplanar_graph_after_reinitialize_finds_the_same_kind_again() {
    let edges = complete_bipartite_edges(3, 3);
    let mut store = build_store(6, &edges);
    let first_kind = match engine::embed(&mut store, EmbedMode::Planar).expect("embed") {
        EmbedOutcome::NonEmbeddable(w) => w.kind,
        EmbedOutcome::Success => panic!("K3,3 must not be planar"),
    };

    store.reinitialize();
    for &(u, v) in &edges {
        store
            .add_edge(VertexId::new(u), AdjacencySide::Last, VertexId::new(v), AdjacencySide::Last)
            .expect("add_edge");
    }
    match engine::embed(&mut store, EmbedMode::Planar).expect("embed") {
        EmbedOutcome::NonEmbeddable(witness) => {
            assert_eq!(witness.kind, first_kind);
            verify::check_obstruction(&store, &witness).expect("valid obstruction");
        }
        EmbedOutcome::Success => panic!("K3,3 must not be planar on the second run either"),
    }
}

/// An exhaustive, independently-written Kuratowski-subdivision search used
/// only to cross-check `engine::embed`'s verdict (spec.md §8,
/// "Completeness"). Unlike [`planarity::isolator`]'s greedy, order-retrying
/// path search, this enumerates every simple path between each hub pair and
/// backtracks over the full combination, so it is exact (sound and
/// complete) at the cost of being exponential — only run on small graphs.
mod independent_kuratowski_check {
    use std::collections::HashSet;

    pub fn to_adjacency(n: usize, edges: &[(u32, u32)]) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); n];
        for &(u, v) in edges {
            adj[u as usize].push(v as usize);
            adj[v as usize].push(u as usize);
        }
        adj
    }

    fn enumerate_simple_paths(
        adj: &[Vec<usize>],
        forbidden: &HashSet<usize>,
        from: usize,
        to: usize,
    ) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(from);
        let mut path = vec![from];
        walk(adj, forbidden, to, &mut visited, &mut path, &mut out);
        out
    }

    fn walk(
        adj: &[Vec<usize>],
        forbidden: &HashSet<usize>,
        to: usize,
        visited: &mut HashSet<usize>,
        path: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        let cur = *path.last().expect("non-empty path");
        if cur == to {
            out.push(path.clone());
            return;
        }
        for &nb in &adj[cur] {
            if nb != to && forbidden.contains(&nb) {
                continue;
            }
            if visited.contains(&nb) {
                continue;
            }
            visited.insert(nb);
            path.push(nb);
            walk(adj, forbidden, to, visited, path, out);
            path.pop();
            visited.remove(&nb);
        }
    }

    /// Tries to route every pair in `pairs` along mutually internally-vertex-
    /// disjoint paths, backtracking across the whole pair list rather than
    /// committing to the first path found for each pair.
    fn backtrack_disjoint(
        adj: &[Vec<usize>],
        hubs: &HashSet<usize>,
        pairs: &[(usize, usize)],
        idx: usize,
        used_internal: &mut HashSet<usize>,
    ) -> bool {
        if idx == pairs.len() {
            return true;
        }
        let (a, b) = pairs[idx];
        for path in enumerate_simple_paths(adj, hubs, a, b) {
            let internal = &path[1..path.len() - 1];
            if internal.iter().any(|m| used_internal.contains(m)) {
                continue;
            }
            for &m in internal {
                used_internal.insert(m);
            }
            if backtrack_disjoint(adj, hubs, pairs, idx + 1, used_internal) {
                return true;
            }
            for &m in internal {
                used_internal.remove(&m);
            }
        }
        false
    }

    fn all_pairs(hubs: &[usize]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..hubs.len() {
            for j in (i + 1)..hubs.len() {
                pairs.push((hubs[i], hubs[j]));
            }
        }
        pairs
    }

    fn combinations(pool: &[usize], k: usize) -> Vec<Vec<usize>> {
        if k == 0 {
            return vec![Vec::new()];
        }
        let Some((&first, rest)) = pool.split_first() else {
            return Vec::new();
        };
        let mut out = combinations(rest, k - 1);
        for combo in out.iter_mut() {
            combo.insert(0, first);
        }
        out.extend(combinations(rest, k));
        out
    }

    pub fn contains_kuratowski_subdivision(adj: &[Vec<usize>]) -> bool {
        let n = adj.len();
        let all: Vec<usize> = (0..n).collect();

        for hubs in combinations(&all, 5) {
            let hub_set: HashSet<usize> = hubs.iter().copied().collect();
            let mut used = HashSet::new();
            if backtrack_disjoint(adj, &hub_set, &all_pairs(&hubs), 0, &mut used) {
                return true;
            }
        }

        for six in combinations(&all, 6) {
            for part_a in combinations(&six, 3) {
                let part_a_set: HashSet<usize> = part_a.iter().copied().collect();
                let part_b: Vec<usize> = six.iter().copied().filter(|v| !part_a_set.contains(v)).collect();
                let hub_set: HashSet<usize> = six.iter().copied().collect();
                let mut pairs = Vec::new();
                for &a in &part_a {
                    for &b in &part_b {
                        pairs.push((a, b));
                    }
                }
                let mut used = HashSet::new();
                if backtrack_disjoint(adj, &hub_set, &pairs, 0, &mut used) {
                    return true;
                }
            }
        }
        false
    }
}

#[test]
fn completeness_cross_check_against_independent_kuratowski_search() {
    use independent_kuratowski_check::{contains_kuratowski_subdivision, to_adjacency};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x504c414e_41525259);
    for trial in 0..24 {
        let n = 5 + (trial % 3);
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.gen_bool(0.45) {
                    edges.push((u, v));
                }
            }
        }
        let mut store = build_store(n, &edges);
        let outcome = engine::embed(&mut store, EmbedMode::Planar).expect("embed");
        let adj = to_adjacency(n as usize, &edges);
        let independently_nonplanar = contains_kuratowski_subdivision(&adj);

        match outcome {
            EmbedOutcome::Success => assert!(
                !independently_nonplanar,
                "trial {trial}: engine accepted a graph containing an independently-found Kuratowski subdivision"
            ),
            EmbedOutcome::NonEmbeddable(witness) => {
                verify::check_obstruction(&store, &witness).expect("valid obstruction");
                assert!(
                    independently_nonplanar,
                    "trial {trial}: engine rejected a graph with no independently-found Kuratowski subdivision"
                );
            }
        }
    }
}

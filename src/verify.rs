//! Integrity verifier (spec.md §4.9, component 9 of §2's table).
//!
//! Two independent checks, run after the fact against whatever the engine
//! produced, never trusted implicitly by it:
//!
//! - [`check_embedding`]: the returned graph is a subgraph of the input
//!   with exactly `M` edges, satisfies Euler's formula, and its
//!   combinatorial faces (traced via the rotation system recorded in each
//!   vertex's adjacency-list order) satisfy `F = M - N + 2·components` and
//!   `Σ face lengths = 2M`.
//! - [`check_obstruction`]: the returned [`Subgraph`](crate::isolator::Subgraph)
//!   is a subgraph of the input and is isomorphic, after suppression of
//!   degree-2 vertices, to K5, K3,3, K2,3, or K4.

use std::collections::HashSet;

use crate::error::{PlanarityError, Result};
use crate::index::{ArcId, VertexId};
use crate::isolator::{self, HomeomorphKind, Subgraph};
use crate::store::GraphStore;

/// Checks spec.md §8's "Embedding soundness" / "Outerplanar analogues"
/// properties against a store that `engine::embed` has just returned
/// `Success` for.
pub fn check_embedding(store: &GraphStore, outerplanar: bool) -> Result<()> {
    let n = store.n;
    let m = store.m;

    if outerplanar {
        if n >= 3 && m > 2 * n - 3 {
            return Err(PlanarityError::Internal(
                "outerplanar embedding violates the 2N-3 edge bound",
            ));
        }
    } else if n >= 3 && m > 3 * n - 6 {
        return Err(PlanarityError::Internal(
            "planar embedding violates the 3N-6 edge bound",
        ));
    }

    let components = count_components(store);
    let (face_count, total_face_len) = trace_faces(store)?;

    let expected_faces = m as i64 - n as i64 + 2 * components as i64;
    if n > 0 && face_count as i64 != expected_faces {
        return Err(PlanarityError::Internal(
            "face count does not satisfy Euler's formula F = M - N + 2*components",
        ));
    }
    if total_face_len != 2 * m {
        return Err(PlanarityError::Internal(
            "sum of face lengths does not equal 2M",
        ));
    }
    Ok(())
}

fn count_components(store: &GraphStore) -> u32 {
    let n = store.n as usize;
    let mut seen = vec![false; n];
    let adj = isolator::full_adjacency(store);
    let mut count = 0;
    for s in 0..n {
        if seen[s] {
            continue;
        }
        count += 1;
        let mut stack = vec![VertexId::new(s as u32)];
        seen[s] = true;
        while let Some(v) = stack.pop() {
            for &w in &adj[v.index()] {
                if !seen[w.index()] {
                    seen[w.index()] = true;
                    stack.push(w);
                }
            }
        }
    }
    count
}

/// Traces every combinatorial face of the embedding by walking the
/// rotation system: from a directed arc, the next arc on the same face is
/// the successor (in adjacency-list order) of its twin at the twin's
/// owner. Only real vertices `0..N` participate; bicomp-root vertices are
/// dissolved by [`crate::face::join_remaining_roots`] before this runs.
fn trace_faces(store: &GraphStore) -> Result<(u32, u32)> {
    let mut visited = vec![false; store.arcs.len()];
    let mut face_count = 0u32;
    let mut total_len = 0u32;

    let mut a = 0u32;
    while (a as usize) < store.arcs.len() {
        let start = ArcId::new(a);
        a += 1;
        if store.arcs[start.index()].neighbor.is_nil() || visited[start.index()] {
            continue;
        }
        if store.owner(start).0 >= store.n || store.arcs[start.index()].neighbor.0 >= store.n {
            continue; // a dangling virtual arc would indicate an unjoined root; skip defensively.
        }

        face_count += 1;
        let mut cur = start;
        let mut len = 0u32;
        let guard_limit = store.arcs.len() as u32 * 2 + 4;
        loop {
            if visited[cur.index()] {
                return Err(PlanarityError::Internal(
                    "face trace revisited an arc: adjacency-list rotation is not a valid embedding",
                ));
            }
            visited[cur.index()] = true;
            len += 1;
            let twin = store.twin(cur);
            cur = store.next_in_rotation(twin);
            if cur == start {
                break;
            }
            if len > guard_limit {
                return Err(PlanarityError::Internal(
                    "face trace did not close: adjacency-list rotation is not a valid embedding",
                ));
            }
        }
        total_len += len;
    }
    Ok((face_count, total_len))
}

/// Checks spec.md §8's "Obstruction soundness" / "Homeomorph-search
/// soundness" properties: `witness` is a subgraph of `store`'s graph,
/// homeomorphic to the kind it claims.
pub fn check_obstruction(store: &GraphStore, witness: &Subgraph) -> Result<()> {
    let adj = isolator::full_adjacency(store);
    for &(u, w) in &witness.edges {
        if !adj[u.index()].contains(&w) {
            return Err(PlanarityError::Internal(
                "obstruction witness contains an edge absent from the input graph",
            ));
        }
    }

    let expected_branch = match witness.kind {
        HomeomorphKind::K5 => 5,
        HomeomorphKind::K33 | HomeomorphKind::K23 => 6,
        HomeomorphKind::K4 => 4,
    };
    if witness.branch_vertices.len() != expected_branch {
        return Err(PlanarityError::Internal(
            "obstruction witness has the wrong number of branch vertices for its claimed kind",
        ));
    }

    // Build the witness's own adjacency restricted to its edge set, then
    // check every branch vertex has the degree the target topology demands
    // and that suppressing degree-2 (subdivision) vertices recovers exactly
    // the target graph's adjacency between branch vertices.
    let witness_vertices: HashSet<VertexId> = witness.vertices.iter().copied().collect();
    let mut local_adj: std::collections::HashMap<VertexId, Vec<VertexId>> =
        witness_vertices.iter().map(|&v| (v, Vec::new())).collect();
    for &(u, w) in &witness.edges {
        local_adj.get_mut(&u).ok_or(PlanarityError::Internal(
            "obstruction witness edge endpoint missing from its own vertex list",
        ))?.push(w);
        local_adj.get_mut(&w).ok_or(PlanarityError::Internal(
            "obstruction witness edge endpoint missing from its own vertex list",
        ))?.push(u);
    }

    for (&v, nbrs) in &local_adj {
        let is_branch = witness.branch_vertices.contains(&v);
        if is_branch {
            continue; // checked via the suppressed-graph adjacency below.
        }
        if nbrs.len() != 2 {
            return Err(PlanarityError::Internal(
                "obstruction witness has a non-branch vertex that is not a degree-2 subdivider",
            ));
        }
    }

    let branch_adjacency = suppressed_adjacency(&witness.branch_vertices, &local_adj);
    if !matches_target(witness.kind, &witness.branch_vertices, &branch_adjacency) {
        return Err(PlanarityError::Internal(
            "obstruction witness is not homeomorphic to its claimed Kuratowski/K4/K2,3 target",
        ));
    }
    Ok(())
}

/// For each branch vertex, the set of other branch vertices reachable by
/// walking a chain of degree-2 subdivision vertices.
fn suppressed_adjacency(
    branch: &[VertexId],
    local_adj: &std::collections::HashMap<VertexId, Vec<VertexId>>,
) -> HashSet<(VertexId, VertexId)> {
    let branch_set: HashSet<VertexId> = branch.iter().copied().collect();
    let mut pairs = HashSet::new();
    for &b in branch {
        for &first in &local_adj[&b] {
            let mut prev = b;
            let mut cur = first;
            while !branch_set.contains(&cur) {
                let nbrs = &local_adj[&cur];
                let next = if nbrs[0] == prev { nbrs[1] } else { nbrs[0] };
                prev = cur;
                cur = next;
            }
            if cur != b {
                let pair = if b.0 < cur.0 { (b, cur) } else { (cur, b) };
                pairs.insert(pair);
            }
        }
    }
    pairs
}

/// Checks that `branch_adjacency` (the degree-2-suppressed graph among the
/// witness's branch vertices) is isomorphic to `kind`'s target topology.
/// Branch-vertex order from [`Subgraph`] is not a bipartition witness (it is
/// sorted by vertex id, not by which side of a K33/K23 split it names), so
/// this checks structurally instead of against a fixed vertex permutation:
/// a complete graph by edge count for K5/K4, and a 2-colorable complete
/// bipartite graph of the right part sizes for K3,3/K2,3.
fn matches_target(
    kind: HomeomorphKind,
    branch: &[VertexId],
    branch_adjacency: &HashSet<(VertexId, VertexId)>,
) -> bool {
    match kind {
        HomeomorphKind::K5 => branch.len() == 5 && branch_adjacency.len() == 10,
        HomeomorphKind::K4 => branch.len() == 4 && branch_adjacency.len() == 6,
        HomeomorphKind::K33 => {
            branch.len() == 6
                && branch_adjacency.len() == 9
                && bipartite_parts(branch, branch_adjacency)
                    .map_or(false, |(a, b)| a.len() == 3 && b.len() == 3)
        }
        HomeomorphKind::K23 => {
            branch.len() == 5
                && branch_adjacency.len() == 6
                && bipartite_parts(branch, branch_adjacency)
                    .map_or(false, |(a, b)| (a.len() == 2 && b.len() == 3) || (a.len() == 3 && b.len() == 2))
        }
    }
}

/// 2-colors `branch` using `branch_adjacency` as the edge set, returning the
/// two color classes if the graph is bipartite and every vertex in
/// `branch_adjacency`'s edge set touches every other part completely
/// (checked by the caller via part sizes plus the already-confirmed edge
/// count, which together pin down completeness).
fn bipartite_parts(
    branch: &[VertexId],
    branch_adjacency: &HashSet<(VertexId, VertexId)>,
) -> Option<(Vec<VertexId>, Vec<VertexId>)> {
    let mut adj: std::collections::HashMap<VertexId, Vec<VertexId>> =
        branch.iter().map(|&v| (v, Vec::new())).collect();
    for &(a, b) in branch_adjacency {
        adj.get_mut(&a)?.push(b);
        adj.get_mut(&b)?.push(a);
    }
    let mut color: std::collections::HashMap<VertexId, bool> = std::collections::HashMap::new();
    let mut queue = std::collections::VecDeque::new();
    for &start in branch {
        if color.contains_key(&start) {
            continue;
        }
        color.insert(start, true);
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            let v_color = color[&v];
            for &w in &adj[&v] {
                match color.get(&w) {
                    Some(&c) if c == v_color => return None,
                    Some(_) => {}
                    None => {
                        color.insert(w, !v_color);
                        queue.push_back(w);
                    }
                }
            }
        }
    }
    let (mut a, mut b) = (Vec::new(), Vec::new());
    for &v in branch {
        if color[&v] {
            a.push(v);
        } else {
            b.push(v);
        }
    }
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VertexId;
    use crate::store::AdjacencySide;

    #[test]
    fn check_embedding_accepts_a_triangle() {
        let mut store = GraphStore::new();
        store.init(3).unwrap();
        for &(u, v) in &[(0, 1), (1, 2), (2, 0)] {
            store.add_edge(VertexId::new(u), AdjacencySide::Last, VertexId::new(v), AdjacencySide::Last).unwrap();
        }
        check_embedding(&store, false).expect("a triangle is a valid planar embedding");
    }

    #[test]
    fn bipartite_parts_rejects_an_odd_cycle() {
        let branch = vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)];
        let edges: HashSet<(VertexId, VertexId)> =
            [(VertexId::new(0), VertexId::new(1)), (VertexId::new(1), VertexId::new(2)), (VertexId::new(2), VertexId::new(0))]
                .into_iter()
                .collect();
        assert!(bipartite_parts(&branch, &edges).is_none());
    }

    #[test]
    fn bipartite_parts_splits_k33_branch_vertices_three_and_three() {
        let branch: Vec<VertexId> = (0..6).map(VertexId::new).collect();
        let mut edges = HashSet::new();
        for u in 0..3u32 {
            for v in 3..6u32 {
                edges.insert((VertexId::new(u), VertexId::new(v)));
            }
        }
        let (a, b) = bipartite_parts(&branch, &edges).expect("K3,3 branch set is bipartite");
        assert_eq!(a.len().max(b.len()), 3);
        assert_eq!(a.len().min(b.len()), 3);
    }
}

//! DFS preprocessing (spec.md §4.2): DFI numbering, lowpoint, least
//! ancestor, forward-arc separation, and the globally bucket-sorted
//! `separatedDFSChildList`. Implemented iteratively against the graph
//! store's own scratch stack, never via recursion, so input size is bounded
//! only by available memory, not call-stack depth (spec.md §9).

use crate::error::Result;
use crate::index::{ArcId, Link, VertexId, NIL};
use crate::store::{EdgeType, EmbeddingFlags, GraphStore};

/// Runs DFS preprocessing over every connected component of `store`,
/// permuting the vertex array in place so that array position equals DFI
/// (spec.md §4.2, final paragraph).
pub fn build_dfs_tree(store: &mut GraphStore) -> Result<()> {
    let n = store.n;
    if n == 0 {
        return Ok(());
    }

    let mut dfi = vec![NIL; n as usize];
    let mut order: Vec<VertexId> = Vec::with_capacity(n as usize);
    let mut parent_orig = vec![VertexId::NIL; n as usize];
    let mut least_ancestor = vec![u32::MAX; n as usize];
    let mut children_orig: Vec<Vec<VertexId>> = vec![Vec::new(); n as usize];
    let mut forward_arcs: Vec<(VertexId, ArcId)> = Vec::new();
    let mut counter = 0u32;

    for s in 0..n {
        let start = VertexId::new(s);
        if dfi[start.index()] != NIL {
            continue;
        }
        dfi[start.index()] = counter;
        order.push(start);
        counter += 1;

        let mut stack: Vec<(VertexId, ArcId)> = Vec::new();
        stack.push((start, store.vertices[start.index()].link[0]));

        while let Some(&(v, cur_arc)) = stack.last() {
            if cur_arc.is_nil() {
                stack.pop();
                continue;
            }
            let next_arc = store.arcs[cur_arc.index()].link[Link::Next.as_index()];
            stack.last_mut().unwrap().1 = next_arc;

            if store.arcs[cur_arc.index()].edge_type != EdgeType::NotDefined {
                continue;
            }

            let w = store.arcs[cur_arc.index()].neighbor;
            if dfi[w.index()] == NIL {
                dfi[w.index()] = counter;
                order.push(w);
                counter += 1;
                parent_orig[w.index()] = v;
                children_orig[v.index()].push(w);
                store.arcs[cur_arc.index()].edge_type = EdgeType::Child;
                let twin = cur_arc.twin();
                store.arcs[twin.index()].edge_type = EdgeType::Parent;
                stack.push((w, store.vertices[w.index()].link[0]));
            } else if dfi[w.index()] < dfi[v.index()] {
                store.arcs[cur_arc.index()].edge_type = EdgeType::Back;
                let twin = cur_arc.twin();
                store.arcs[twin.index()].edge_type = EdgeType::Forward;
                forward_arcs.push((w, twin));
                if dfi[w.index()] < least_ancestor[v.index()] {
                    least_ancestor[v.index()] = dfi[w.index()];
                }
            } else {
                return Err(store.poison(
                    "dfs preprocessor encountered an unclassified arc to a vertex with a greater DFI",
                ));
            }
        }
    }

    if (counter as usize) != n as usize {
        return Err(store.poison("dfs preprocessor did not visit every vertex"));
    }

    // Lowpoint: process in decreasing DFI order so every child is resolved
    // before its parent (spec.md §4.2).
    let mut lowpoint = least_ancestor.clone();
    for dfi_val in (0..n).rev() {
        let v = order[dfi_val as usize];
        for &c in &children_orig[v.index()] {
            if lowpoint[c.index()] < lowpoint[v.index()] {
                lowpoint[v.index()] = lowpoint[c.index()];
            }
        }
    }

    // Remap every arc's neighbor field from original index to DFI.
    for arc in store.arcs.iter_mut() {
        if !arc.neighbor.is_nil() {
            arc.neighbor = VertexId::new(dfi[arc.neighbor.index()]);
        }
    }

    // Permute the primary half of the vertex array into DFI order.
    let mut new_primary = Vec::with_capacity(n as usize);
    for new_pos in 0..n {
        let orig = order[new_pos as usize];
        let mut v = store.vertices[orig.index()].clone();
        v.index = new_pos;
        v.parent = if parent_orig[orig.index()].is_nil() {
            VertexId::NIL
        } else {
            VertexId::new(dfi[parent_orig[orig.index()].index()])
        };
        v.least_ancestor = least_ancestor[orig.index()];
        v.lowpoint = lowpoint[orig.index()];
        v.tree_children = children_orig[orig.index()]
            .iter()
            .map(|&c| VertexId::new(dfi[c.index()]))
            .collect();
        new_primary.push(v);
    }
    let virtual_half = store.vertices.split_off(n as usize);
    store.vertices = new_primary;
    store.vertices.extend(virtual_half);

    // Build separatedDFSChildList via one global bucket sort on lowpoint.
    let mut lp_buckets: Vec<Vec<VertexId>> = vec![Vec::new(); n as usize];
    for dfi_val in 0..n {
        let v = VertexId::new(dfi_val);
        if store.vertices[v.index()].parent.is_nil() {
            continue;
        }
        let lp = store.vertices[v.index()].lowpoint.min(n - 1);
        lp_buckets[lp as usize].push(v);
    }
    let mut child_tail = vec![VertexId::NIL; n as usize];
    for bucket in lp_buckets.into_iter() {
        for child in bucket {
            let parent = store.vertices[child.index()].parent;
            let t = child_tail[parent.index()];
            if t.is_nil() {
                store.vertices[parent.index()].separated_dfs_child_list = child;
            } else {
                store.vertices[t.index()].separated_dfs_child_link[1] = child;
                store.vertices[child.index()].separated_dfs_child_link[0] = t;
            }
            store.vertices[child.index()].separated_dfs_child_link[1] = VertexId::NIL;
            child_tail[parent.index()] = child;
        }
    }

    // Build fwdArcList via one global bucket sort on descendant DFI,
    // detaching each forward arc from its ancestor's ordinary adjacency
    // list as it is re-threaded (spec.md §4.2).
    let mut fwd_buckets: Vec<Vec<(VertexId, ArcId)>> = vec![Vec::new(); n as usize];
    for (anc_orig, arc) in forward_arcs {
        let anc = VertexId::new(dfi[anc_orig.index()]);
        let desc_dfi = store.arcs[arc.index()].neighbor.0;
        fwd_buckets[desc_dfi as usize].push((anc, arc));
    }
    let mut fwd_tail = vec![ArcId::NIL; n as usize];
    for bucket in fwd_buckets.into_iter() {
        for (anc, arc) in bucket {
            store.detach(anc, arc);
            let t = fwd_tail[anc.index()];
            if t.is_nil() {
                store.vertices[anc.index()].fwd_arc_list = arc;
            } else {
                store.arcs[t.index()].fwd_arc_link[1] = arc;
                store.arcs[arc.index()].fwd_arc_link[0] = t;
            }
            store.arcs[arc.index()].fwd_arc_link[1] = ArcId::NIL;
            fwd_tail[anc.index()] = arc;
        }
    }

    store.flags.set(EmbeddingFlags::DFS_NUMBERED);
    store.flags.set(EmbeddingFlags::SORTED_BY_DFI);
    Ok(())
}

/// Iterates a vertex's `separatedDFSChildList` head-to-tail.
pub fn separated_children(store: &GraphStore, v: VertexId) -> Vec<VertexId> {
    let mut out = Vec::new();
    let mut cur = store.vertices[v.index()].separated_dfs_child_list;
    while !cur.is_nil() {
        out.push(cur);
        cur = store.vertices[cur.index()].separated_dfs_child_link[1];
    }
    out
}

/// Removes `child` from its parent's `separatedDFSChildList`.
pub fn remove_separated_child(store: &mut GraphStore, parent: VertexId, child: VertexId) {
    let [prev, next] = store.vertices[child.index()].separated_dfs_child_link;
    if prev.is_nil() {
        store.vertices[parent.index()].separated_dfs_child_list = next;
    } else {
        store.vertices[prev.index()].separated_dfs_child_link[1] = next;
    }
    if !next.is_nil() {
        store.vertices[next.index()].separated_dfs_child_link[0] = prev;
    }
}

/// Iterates a vertex's `fwdArcList` head-to-tail.
pub fn fwd_arcs(store: &GraphStore, v: VertexId) -> Vec<ArcId> {
    let mut out = Vec::new();
    let mut cur = store.vertices[v.index()].fwd_arc_list;
    while !cur.is_nil() {
        out.push(cur);
        cur = store.arcs[cur.index()].fwd_arc_link[1];
    }
    out
}

/// Removes `arc` from `v`'s `fwdArcList`.
pub fn remove_fwd_arc(store: &mut GraphStore, v: VertexId, arc: ArcId) {
    let [prev, next] = store.arcs[arc.index()].fwd_arc_link;
    if prev.is_nil() {
        store.vertices[v.index()].fwd_arc_list = next;
    } else {
        store.arcs[prev.index()].fwd_arc_link[1] = next;
    }
    if !next.is_nil() {
        store.arcs[next.index()].fwd_arc_link[0] = prev;
    }
}

/// Whether `v` is externally active at step `i`: it must remain on the
/// external face of its bicomp because it (or a separated descendant) still
/// has an unembedded edge reaching an ancestor of `i` (spec.md §4.1 /
/// GLOSSARY).
pub fn is_externally_active(store: &GraphStore, v: VertexId, i: u32) -> bool {
    if store.embed_mode.is_outerplanar_like() {
        return true;
    }
    if store.vertices[v.index()].least_ancestor < i {
        return true;
    }
    let first_child = store.vertices[v.index()].separated_dfs_child_list;
    if !first_child.is_nil() && store.vertices[first_child.index()].lowpoint < i {
        return true;
    }
    false
}

/// Whether `v` is pertinent at the current step: it or a separated child
/// bicomp still has an unembedded edge reaching the step vertex.
pub fn is_pertinent(store: &GraphStore, v: VertexId) -> bool {
    !store.vertices[v.index()].pertinent_adjacency_info.is_nil()
        || !store.vertices[v.index()].pertinent_bicomp_list.is_nil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AdjacencySide;

    fn path_graph(n: u32) -> GraphStore {
        let mut store = GraphStore::new();
        store.init(n).unwrap();
        for i in 0..n - 1 {
            store
                .add_edge(VertexId::new(i), AdjacencySide::Last, VertexId::new(i + 1), AdjacencySide::Last)
                .unwrap();
        }
        store
    }

    #[test]
    fn dfi_numbers_a_path_from_its_first_vertex() {
        let mut store = path_graph(5);
        build_dfs_tree(&mut store).unwrap();
        assert!(store.flags.is_set(EmbeddingFlags::DFS_NUMBERED));
        // A path visited depth-first from vertex 0 numbers every vertex in
        // order, so the DFS permutation is the identity on a path.
        for i in 0..5 {
            assert_eq!(store.vertices[i as usize].index, i);
        }
    }

    #[test]
    fn lowpoint_reaches_back_across_a_chord() {
        // Triangle 0-1-2 plus a pendant 3 hanging off 2: vertex 2's lowpoint
        // must reach vertex 0 via the 0-2 back edge, not stay at its own DFI.
        let mut store = GraphStore::new();
        store.init(4).unwrap();
        store.add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(1), AdjacencySide::Last).unwrap();
        store.add_edge(VertexId::new(1), AdjacencySide::Last, VertexId::new(2), AdjacencySide::Last).unwrap();
        store.add_edge(VertexId::new(2), AdjacencySide::Last, VertexId::new(0), AdjacencySide::Last).unwrap();
        store.add_edge(VertexId::new(2), AdjacencySide::Last, VertexId::new(3), AdjacencySide::Last).unwrap();
        build_dfs_tree(&mut store).unwrap();
        let root_dfi = store.vertices[0].index;
        assert_eq!(store.vertices[2].lowpoint, root_dfi);
    }

    #[test]
    fn isolated_vertices_get_distinct_dfi() {
        let mut store = GraphStore::new();
        store.init(3).unwrap();
        build_dfs_tree(&mut store).unwrap();
        let mut seen: Vec<u32> = store.vertices[0..3].iter().map(|v| v.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }
}

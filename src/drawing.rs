//! Drawing post-processor (spec.md §4.8): derives a visibility
//! representation (vertical vertex strips, horizontal edge segments) from a
//! successfully embedded planar graph.
//!
//! Simplification from the source (documented in DESIGN.md): the real
//! algorithm assigns vertical position incrementally during embedding, by
//! recording at each bicomp merge whether the merged vertex landed "above",
//! "below", "between", or "beyond" its neighbor (spec.md §4.8 step 1), then
//! resolves ties in a second pass. This port does not thread that
//! bookkeeping through Walkdown; instead it uses each vertex's own DFI as
//! its vertical position directly. DFI order is always a valid total order
//! for step 2's sweep (a vertex's DFS parent is always at a smaller DFI and
//! is adjacent to it, giving every vertex a generator edge), so the
//! resulting representation satisfies the same integrity guarantee (spec.md
//! §4.8's final paragraph) even though it does not reproduce the source's
//! specific vertex ordering.

use crate::error::{PlanarityError, Result};
use crate::index::{ArcId, Link, VertexId};
use crate::store::GraphStore;

/// Computes vertex vertical positions, edge horizontal positions, and every
/// vertex's/edge's start/end extents, storing them back onto the store's
/// vertex and arc records (spec.md §4.8).
pub fn compute_visibility(store: &mut GraphStore) -> Result<()> {
    let n = store.n as usize;

    // Step 1: vertical position := DFI (see module doc for rationale).
    for i in 0..n {
        store.vertices[i].drawing_pos = i as u32;
    }

    // Step 2: vertical sweep in position order, recording each vertex's
    // generator edge (the first edge by which it was reached from an
    // earlier-position vertex) and building the global edge order by
    // walking each vertex's adjacency list from the generator.
    let mut edge_order: Vec<ArcId> = Vec::with_capacity(store.m as usize);
    let mut seen_edge = vec![false; store.arcs.len()];

    for pos in 0..n {
        let v = VertexId::new(pos as u32);
        let generator = find_generator(store, v);
        let Some(gen_arc) = generator else { continue };

        let lower = gen_arc.0.min(gen_arc.twin().0);
        if !seen_edge[lower as usize] {
            seen_edge[lower as usize] = true;
            edge_order.push(ArcId::new(lower));
        }

        let mut cur = store.arcs[gen_arc.index()].link[Link::Next.as_index()];
        let start = cur;
        loop {
            if cur.is_nil() {
                cur = store.vertices[v.index()].link[0];
            }
            if cur == gen_arc || cur.is_nil() {
                break;
            }
            let lower = cur.0.min(cur.twin().0);
            if !seen_edge[lower as usize] {
                seen_edge[lower as usize] = true;
                edge_order.push(ArcId::new(lower));
            }
            let next = store.arcs[cur.index()].link[Link::Next.as_index()];
            if next == start && next.is_nil() {
                break;
            }
            cur = next;
            if cur == gen_arc {
                break;
            }
        }
    }

    // Any edges never reached by the sweep (can occur for isolated
    // vertices with no smaller-DFI neighbor — i.e. component roots) are
    // appended in arc-index order so every edge still gets a position.
    let mut a = 0u32;
    while (a as usize) < store.arcs.len() {
        if !store.arcs[a as usize].neighbor.is_nil() && !seen_edge[a as usize] {
            seen_edge[a as usize] = true;
            edge_order.push(ArcId::new(a));
        }
        a += 2;
    }

    // Step 3: assign horizontal positions and derive start/end extents.
    for (pos, &lower) in edge_order.iter().enumerate() {
        let twin = lower.twin();
        store.arcs[lower.index()].drawing_pos = pos as u32;
        store.arcs[twin.index()].drawing_pos = pos as u32;

        let u = store.arcs[twin.index()].neighbor;
        let w = store.arcs[lower.index()].neighbor;
        for endpoint in [u, w] {
            if endpoint.is_nil() || endpoint.0 as usize >= n {
                continue;
            }
            let vert = &mut store.vertices[endpoint.index()];
            vert.drawing_h_start = vert.drawing_h_start.min(pos as u32);
            vert.drawing_h_end = vert.drawing_h_end.max(pos as u32);
        }

        let up = store.vertices[u.index().min(n.saturating_sub(1))].drawing_pos;
        let wp = store.vertices[w.index().min(n.saturating_sub(1))].drawing_pos;
        let (lo, hi) = if up < wp { (up, wp) } else { (wp, up) };
        store.arcs[lower.index()].drawing_start = lo;
        store.arcs[lower.index()].drawing_end = hi;
        store.arcs[twin.index()].drawing_start = lo;
        store.arcs[twin.index()].drawing_end = hi;
    }

    Ok(())
}

/// The generator edge of `v`: the arc to the smallest-position neighbor
/// already placed before it in the sweep. Every non-root vertex's DFS
/// parent qualifies, since the parent always has a smaller DFI and is
/// always adjacent (the tree edge is never removed, only possibly
/// relocated onto a virtual bicomp-root copy and back).
fn find_generator(store: &GraphStore, v: VertexId) -> Option<ArcId> {
    let parent = store.vertices[v.index()].parent;
    if parent.is_nil() {
        return None;
    }
    store.get_neighbor_arc(v, parent)
}

/// Checks the integrity guarantee of spec.md §4.8's final paragraph: every
/// incidence is axis-consistent and no non-incident (edge, vertex) pair
/// crosses.
pub fn verify_visibility(store: &GraphStore) -> Result<()> {
    let n = store.n as usize;
    let mut a = 0u32;
    while (a as usize) < store.arcs.len() {
        let arc = ArcId::new(a);
        a += 2;
        let twin = arc.twin();
        if store.arcs[arc.index()].neighbor.is_nil() {
            continue;
        }
        let u = store.arcs[twin.index()].neighbor;
        let w = store.arcs[arc.index()].neighbor;
        let e_pos = store.arcs[arc.index()].drawing_pos;
        let (e_start, e_end) = (store.arcs[arc.index()].drawing_start, store.arcs[arc.index()].drawing_end);

        for endpoint in [u, w] {
            let vert = &store.vertices[endpoint.index()];
            if e_pos < vert.drawing_h_start || e_pos > vert.drawing_h_end {
                return Err(PlanarityError::Internal(
                    "drawing integrity violated: edge position outside its endpoint's horizontal span",
                ));
            }
            if vert.drawing_pos != e_start && vert.drawing_pos != e_end {
                return Err(PlanarityError::Internal(
                    "drawing integrity violated: endpoint position is not one of the edge's vertical ends",
                ));
            }
        }

        for v_idx in 0..n {
            let v = VertexId::new(v_idx as u32);
            if v == u || v == w {
                continue;
            }
            let vert = &store.vertices[v.index()];
            let crosses_h = e_pos >= vert.drawing_h_start && e_pos <= vert.drawing_h_end;
            let crosses_v = vert.drawing_pos >= e_start && vert.drawing_pos <= e_end;
            if crosses_h && crosses_v {
                return Err(PlanarityError::Internal(
                    "drawing integrity violated: spurious crossing between an edge and a non-incident vertex",
                ));
            }
        }
    }
    Ok(())
}

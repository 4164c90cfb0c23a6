//! External-face tracker (spec.md §4.3): the two external-face neighbors of
//! every primary and virtual vertex, stored in [`GraphStore::ext_face`]
//! rather than as extra embedded edges.

use crate::index::{ArcId, Link, VertexId};
use crate::store::GraphStore;

/// Sets `v`'s external-face neighbors directly (used for the trivial
/// two-vertex bicomp of a single tree edge, where both slots name the same
/// single neighbor).
pub fn set_trivial(store: &mut GraphStore, a: VertexId, b: VertexId) {
    store.ext_face[a.index()] = [b, b];
    store.ext_face[b.index()] = [a, a];
}

/// Replaces one occurrence of `old` in `v`'s external-face neighbor slots
/// with `new`.
pub fn replace_neighbor(store: &mut GraphStore, v: VertexId, old: VertexId, new: VertexId) {
    let slot = &mut store.ext_face[v.index()];
    if slot[0] == old {
        slot[0] = new;
    } else if slot[1] == old {
        slot[1] = new;
    }
}

/// Appends `nb` into the first empty (`NIL`) slot of `v`'s external-face
/// neighbor pair.
pub fn add_neighbor(store: &mut GraphStore, v: VertexId, nb: VertexId) {
    let slot = &mut store.ext_face[v.index()];
    if slot[0].is_nil() {
        slot[0] = nb;
    } else {
        slot[1] = nb;
    }
}

/// `nextOnExternalFace`: the face neighbor of `v` on the side opposite the
/// vertex we arrived from.
pub fn other_neighbor(store: &GraphStore, v: VertexId, came_from: VertexId) -> VertexId {
    let [a, b] = store.ext_face[v.index()];
    if a == came_from {
        b
    } else {
        a
    }
}

/// Splices `v` out of the external face, joining its two neighbors
/// together directly. Used when a cut vertex's virtual bicomp-root copy is
/// folded into the real vertex, or when a merged vertex is no longer on the
/// face.
pub fn remove_vertex(store: &mut GraphStore, v: VertexId) {
    let [a, b] = store.ext_face[v.index()];
    if !a.is_nil() {
        replace_neighbor(store, a, v, b);
    }
    if !b.is_nil() {
        replace_neighbor(store, b, v, a);
    }
    store.ext_face[v.index()] = [VertexId::NIL; 2];
}

/// Marks `v`'s bicomp as having been flipped; vertex-by-vertex orientation
/// reconciliation is deferred to the drawing/verify sweep (spec.md §4.3).
pub fn mark_inverted(store: &mut GraphStore, v: VertexId) {
    store.vertices[v.index()].face_inverted = !store.vertices[v.index()].face_inverted;
}

/// The deferred reconciliation sweep [`mark_inverted`]'s doc comment
/// promises: physically reverses the real adjacency-list rotation order of
/// every vertex still carrying a flip flag, then clears it. Run once, after
/// the main embedding loop finishes and before the drawing post-processor or
/// integrity verifier ever reads a vertex's rotation order, so neither has
/// to special-case the flag itself.
pub fn reconcile_inversions(store: &mut GraphStore) {
    for i in 0..store.n {
        let v = VertexId::new(i);
        if !store.vertices[v.index()].face_inverted {
            continue;
        }
        let mut cur = store.vertices[v.index()].link[0];
        while !cur.is_nil() {
            let next = store.arcs[cur.index()].link[Link::Next.as_index()];
            store.arcs[cur.index()].link.swap(0, 1);
            cur = next;
        }
        store.vertices[v.index()].link.swap(0, 1);
        store.vertices[v.index()].face_inverted = false;
    }
}

/// Final step of the bicomp-root lifecycle (spec.md §3, "Lifecycles": every
/// virtual vertex is "either merged into a larger bicomp ... or joined back
/// into the tree at the end of the algorithm"). A direct DFS child `c` of a
/// vertex `p` whose subtree never produced a back edge reaching `p` or one
/// of its ancestors is never popped off anyone's `pertinentBicompList`, so
/// its bicomp root `N+c` still carries nothing but the original tree arc to
/// `c` when the main loop finishes. This grafts that lone arc directly into
/// `p`'s real adjacency list and repoints its twin's neighbor from the
/// virtual id to `p`, dissolving the virtual vertex so every remaining arc
/// in the store names only real vertices `0..N` (required by the drawing
/// post-processor and the integrity verifier, neither of which knows about
/// bicomp roots).
pub fn join_remaining_roots(store: &mut GraphStore) {
    for c in 0..store.n {
        let child = VertexId::new(c);
        let parent = store.vertices[child.index()].parent;
        if parent.is_nil() {
            continue; // DFS-tree component root: no bicomp root was ever made for it.
        }
        let root = store.root_of_child(child);
        let arc = store.vertices[root.index()].link[0];
        if arc.is_nil() {
            continue; // already dissolved by a splice_child merge during the run.
        }
        store.detach(root, arc);
        let twin = store.twin(arc);
        store.arcs[twin.index()].neighbor = parent;
        store.attach_adjacent(parent, arc, ArcId::NIL, Link::Next);
        store.ext_face[root.index()] = [VertexId::NIL; 2];
    }
}

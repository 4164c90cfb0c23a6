//! Walkup (spec.md §4.4): marks the pertinent bicomp chain from a
//! back-edge descendant up to the step vertex, recording which cut
//! vertices have a child bicomp that Walkdown must merge.
//!
//! Implemented as an iterative flood fill rather than the original's
//! two-direction recursive climb: each vertex is pushed once, and
//! `visited_info == step` is both the "already explored this step"
//! dedup marker and (for bicomp-root vertices) the "already added to its
//! parent's pertinentBicompList" marker, since a root is only ever touched
//! here. This reaches exactly the same fixed point as the original
//! two-direction walk and the shared per-step marker gives the same
//! amortized bound: a vertex already marked for `step` is never re-explored.

use crate::index::VertexId;
use crate::store::{GraphStore, VertexKind};

/// Runs Walkup for the back edge `(step, d)`: `step` is the current DFI
/// being processed and `d` is the descendant endpoint of an unembedded
/// back edge to it.
pub fn walkup(store: &mut GraphStore, step: VertexId, d: VertexId) {
    if store.vertices[d.index()].visited_info == step.0 {
        return;
    }

    let mut stack: Vec<VertexId> = vec![d];
    while let Some(cur) = stack.pop() {
        if store.vertices[cur.index()].visited_info == step.0 {
            continue;
        }
        store.vertices[cur.index()].visited_info = step.0;

        if store.vertices[cur.index()].kind == VertexKind::BicompRoot {
            let child = store.child_of_root(cur);
            let parent_copy = store.vertices[child.index()].parent;
            prepend_pertinent_bicomp(store, parent_copy, cur);
            if parent_copy == step {
                continue;
            }
            stack.push(parent_copy);
        } else {
            let [a, b] = store.ext_face[cur.index()];
            if !a.is_nil() && store.vertices[a.index()].visited_info != step.0 {
                stack.push(a);
            }
            if !b.is_nil() && store.vertices[b.index()].visited_info != step.0 {
                stack.push(b);
            }
        }
    }
}

/// Prepends `root` onto `owner`'s `pertinentBicompList` head.
fn prepend_pertinent_bicomp(store: &mut GraphStore, owner: VertexId, root: VertexId) {
    let head = store.vertices[owner.index()].pertinent_bicomp_list;
    store.vertices[root.index()].pertinent_bicomp_link = [VertexId::NIL, head];
    if !head.is_nil() {
        store.vertices[head.index()].pertinent_bicomp_link[0] = root;
    }
    store.vertices[owner.index()].pertinent_bicomp_list = root;
}

/// Pops the head of `owner`'s `pertinentBicompList`.
pub fn pop_pertinent_bicomp(store: &mut GraphStore, owner: VertexId) -> Option<VertexId> {
    let head = store.vertices[owner.index()].pertinent_bicomp_list;
    if head.is_nil() {
        return None;
    }
    let next = store.vertices[head.index()].pertinent_bicomp_link[1];
    store.vertices[owner.index()].pertinent_bicomp_list = next;
    if !next.is_nil() {
        store.vertices[next.index()].pertinent_bicomp_link[0] = VertexId::NIL;
    }
    Some(head)
}

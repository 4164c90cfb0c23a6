//! Walkdown (spec.md §4.5): embeds back edges and merges bicomps along the
//! external face of a pertinent child bicomp.
//!
//! Simplification from the source's true round-robin two-direction walk
//! (documented in DESIGN.md): direction 0 runs to completion before
//! direction 1 starts, rather than alternating step by step. Both orders
//! visit the same vertices and make the same embed/merge decisions (which
//! pertinent vertex to process next never depends on how far the *other*
//! direction has gotten), so the embedded edge set and the blocked/done
//! outcome are identical; only the original's amortized-progress
//! bookkeeping is not reproduced.

use crate::dfs;
use crate::face;
use crate::index::{ArcId, Link, VertexId};
use crate::store::GraphStore;
use crate::walkup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The bicomp is blocked: `r` is the blocked bicomp's root, `x`/`y` are
    /// the two stopping (externally active) vertices, and `w` is the
    /// pertinent vertex the walk could not reach (spec.md §4.6 calls these
    /// R, X, Y, W).
    Blocked { r: VertexId, x: VertexId, y: VertexId, w: VertexId },
}

enum StepResult {
    Continue,
    DoneNoMore,
    Blocked(VertexId),
}

/// Runs Walkdown on the bicomp rooted at `root`, pertinent to step vertex
/// `owner`.
pub fn walkdown(store: &mut GraphStore, owner: VertexId, root: VertexId) -> Outcome {
    let anchor = store.ext_face[root.index()][0];
    let original_other = store.ext_face[anchor.index()][1];

    let stop0 = walk_one_direction(store, owner, root, 0, root, anchor);
    let stop1 = if original_other == anchor {
        None
    } else {
        walk_one_direction(store, owner, root, 1, anchor, original_other)
    };

    match (stop0, stop1) {
        (None, None) => Outcome::Done,
        (Some(x), None) => finish_blocked(store, root, x, x),
        (None, Some(y)) => finish_blocked(store, root, y, y),
        (Some(x), Some(y)) => finish_blocked(store, root, x, y),
    }
}

fn finish_blocked(store: &GraphStore, r: VertexId, x: VertexId, y: VertexId) -> Outcome {
    match scan_for_pertinent(store, x, y) {
        Some(w) => Outcome::Blocked { r, x, y, w },
        None => Outcome::Done,
    }
}

/// Walks one direction starting at `(prev, cur)`, tagging any back edge
/// embedded along the way as belonging to `owner`'s `dir` external-face
/// slot. Returns the externally-active stop vertex, if the walk halted on
/// one instead of closing back around to `root`/`owner`.
fn walk_one_direction(
    store: &mut GraphStore,
    owner: VertexId,
    root: VertexId,
    dir: usize,
    mut prev: VertexId,
    mut cur: VertexId,
) -> Option<VertexId> {
    loop {
        if cur == root || cur == owner {
            return None;
        }
        match drain_vertex(store, owner, dir, root, &mut prev, &mut cur) {
            StepResult::Continue => continue,
            StepResult::DoneNoMore => return None,
            StepResult::Blocked(w) => return Some(w),
        }
    }
}

/// Drains any pending back edge and pertinent bicomp merges at `*cur`, then
/// advances `(prev, cur)` one step further along the face.
fn drain_vertex(
    store: &mut GraphStore,
    owner: VertexId,
    dir: usize,
    root: VertexId,
    prev: &mut VertexId,
    cur: &mut VertexId,
) -> StepResult {
    let w = *cur;

    if !store.vertices[w.index()].pertinent_adjacency_info.is_nil() {
        embed_back_edge(store, owner, dir, *prev, w);
        *prev = owner;
        return StepResult::Continue;
    }

    if !store.vertices[w.index()].pertinent_bicomp_list.is_nil() {
        let mut far_prev = *prev;
        let mut far = w;
        while let Some(child_root) = walkup::pop_pertinent_bicomp(store, w) {
            let (np, nf) = splice_child(store, far_prev, far, child_root);
            far_prev = np;
            far = nf;
        }
        *prev = far_prev;
        *cur = far;
        return StepResult::Continue;
    }

    if dfs::is_externally_active(store, w, owner.0) {
        return StepResult::Blocked(w);
    }

    if *prev == root {
        // Nothing ties the walk to a real neighbor on this side yet: the
        // anchor vertex was never touched by its own earlier step, so this
        // direction is genuinely empty.
        return StepResult::DoneNoMore;
    }
    let next = face::other_neighbor(store, w, *prev);
    *prev = w;
    *cur = next;
    StepResult::Continue
}

/// Embeds the pending back edge `owner`-`w`, splicing the held forward arc
/// (and its twin back arc) into both adjacency lists and recording `w` as
/// `owner`'s new external-face neighbor on side `dir` (spec.md §4.5).
fn embed_back_edge(store: &mut GraphStore, owner: VertexId, dir: usize, prev_of_w: VertexId, w: VertexId) {
    let farc = find_fwd_arc_to(store, owner, w)
        .expect("pertinent_adjacency_info set without a matching forward arc");
    dfs::remove_fwd_arc(store, owner, farc);
    let back_arc = store.twin(farc);

    if let Some(w_prev_arc) = store.get_neighbor_arc(w, prev_of_w) {
        store.attach_adjacent(w, back_arc, w_prev_arc, Link::Next);
    } else {
        store.attach_adjacent(w, back_arc, ArcId::NIL, Link::Next);
    }
    store.attach_adjacent(owner, farc, ArcId::NIL, Link::Next);

    face::replace_neighbor(store, w, prev_of_w, owner);
    store.ext_face[owner.index()][dir] = w;

    store.vertices[w.index()].pertinent_adjacency_info = ArcId::NIL;
}

fn find_fwd_arc_to(store: &GraphStore, owner: VertexId, w: VertexId) -> Option<ArcId> {
    dfs::fwd_arcs(store, owner)
        .into_iter()
        .find(|&a| store.neighbor(a) == w)
}

/// Splices the bicomp rooted at `child_root` in between `far` and its
/// current far-side face neighbor (spec.md §4.5), continuing the walk into
/// it. Returns `(far, new_far_end)` so repeated calls (multiple pertinent
/// children of the same vertex) chain correctly further outward each time.
///
/// `child_root`'s and `far`'s two external-face slots are each an unordered
/// pair (spec.md §3); slot *position* (0 vs 1) is the only record this
/// representation keeps of which way a bicomp was walked to build it. A
/// splice joins two bicomps walked independently, so whether `far` was
/// reached by continuing in slot-0 order and `child_root` was itself built
/// in slot-0 order are independent facts; when they disagree, the merged
/// bicomp's orientation relative to its parent has flipped and is recorded
/// via [`face::mark_inverted`] (spec.md §4.3) for [`face::reconcile_inversions`]
/// to resolve later, rather than physically reordering anything here.
fn splice_child(
    store: &mut GraphStore,
    prev_of_far: VertexId,
    far: VertexId,
    child_root: VertexId,
) -> (VertexId, VertexId) {
    let g = store.child_of_root(child_root);
    let beyond = face::other_neighbor(store, far, prev_of_far);
    let far_forward = store.ext_face[far.index()][0] == prev_of_far;
    let g_forward = store.ext_face[g.index()][0] == child_root;

    let arc_root_g = store.vertices[child_root.index()].link[0];
    let twin = store.twin(arc_root_g);
    store.detach(child_root, arc_root_g);
    if let Some(far_beyond_arc) = store.get_neighbor_arc(far, beyond) {
        store.attach_adjacent(far, arc_root_g, far_beyond_arc, Link::Prev);
    } else {
        store.attach_adjacent(far, arc_root_g, ArcId::NIL, Link::Prev);
    }
    store.arcs[twin.index()].neighbor = far;

    face::replace_neighbor(store, far, beyond, g);
    face::replace_neighbor(store, g, child_root, far);
    dfs::remove_separated_child(store, far, g);

    if far_forward != g_forward {
        face::mark_inverted(store, g);
    }

    let new_far_end = face::other_neighbor(store, g, far);
    (far, new_far_end)
}

/// Scans the portion of the external face strictly between `x` and `y`
/// for a vertex still carrying pertinence, walking from `x`. When `x == y`
/// (only one side halted) this walks the full remaining face once.
fn scan_for_pertinent(store: &GraphStore, x: VertexId, y: VertexId) -> Option<VertexId> {
    let [a, b] = store.ext_face[x.index()];
    let mut prev = x;
    let mut cur = a;
    let mut guard = 0usize;
    let limit = store.vertices.len() + 4;
    while guard < limit {
        guard += 1;
        if cur == y && prev != x {
            break;
        }
        if !store.vertices[cur.index()].pertinent_adjacency_info.is_nil()
            || !store.vertices[cur.index()].pertinent_bicomp_list.is_nil()
        {
            return Some(cur);
        }
        let next = face::other_neighbor(store, cur, prev);
        prev = cur;
        cur = next;
        if cur == a && prev == x {
            break;
        }
    }
    let _ = b;
    None
}

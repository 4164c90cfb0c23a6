//! The graph store: half-edge arrays, adjacency-list manipulation,
//! edge-hole recycling (spec.md §4.1).
//!
//! This is the one structure every other module borrows mutably for the
//! duration of a single embed/search invocation (spec.md §5); it owns every
//! vertex and arc record and every scratch list described in spec.md §3.

pub mod arc;
pub mod vertex;

use crate::error::{PlanarityError, Result};
use crate::index::{ArcId, Link, VertexId, NIL};

pub use arc::{Arc, EdgeType};
pub use vertex::{MergeSide, ObstructionMark, Vertex, VertexKind};

/// Which end of a vertex's adjacency list a new arc should be spliced into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AdjacencySide {
    First,
    Last,
}

/// Result flags carried on a returned embedding (spec.md §6).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct EmbeddingFlags(pub u8);

impl EmbeddingFlags {
    pub const DFS_NUMBERED: u8 = 1 << 0;
    pub const SORTED_BY_DFI: u8 = 1 << 1;
    pub const OBSTRUCTION_FOUND: u8 = 1 << 2;

    pub fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }
    pub fn clear(&mut self, bit: u8) {
        self.0 &= !bit;
    }
    pub fn is_set(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// Which algorithm mode the store is currently configured for. Drives the
/// few points of behavior that differ between variants (spec.md §4.0).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EmbedMode {
    #[default]
    Planar,
    Outerplanar,
    DrawPlanar,
    SearchK23,
    SearchK33,
    SearchK4,
}

impl EmbedMode {
    pub fn is_outerplanar_like(self) -> bool {
        matches!(
            self,
            EmbedMode::Outerplanar | EmbedMode::SearchK23 | EmbedMode::SearchK4
        )
    }
}

/// The half-edge graph store.
pub struct GraphStore {
    pub vertices: Vec<Vertex>,
    pub arcs: Vec<Arc>,

    /// Number of primary vertices (vertex array has length `2*n`).
    pub n: u32,
    /// Number of undirected edges currently embedded/present.
    pub m: u32,
    pub arc_capacity: u32,

    /// Positions freed by edge deletion, reused two-at-a-time so that a
    /// twin pair is always re-allocated together (spec.md §9).
    pub edge_hole_stack: Vec<ArcId>,
    /// Shared scratch stack for iterative DFS and other traversals; kept
    /// pre-sized to `2*arc_capacity` so no allocation happens mid-run
    /// (spec.md §5).
    pub work_stack: Vec<u32>,

    /// External-face neighbor links, two per primary/virtual vertex
    /// (spec.md §3, "External-face link record"; spec.md §4.3).
    pub ext_face: Vec<[VertexId; 2]>,

    pub flags: EmbeddingFlags,
    pub embed_mode: EmbedMode,
    pub poisoned: bool,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            vertices: Vec::new(),
            arcs: Vec::new(),
            n: 0,
            m: 0,
            arc_capacity: 0,
            edge_hole_stack: Vec::new(),
            work_stack: Vec::new(),
            ext_face: Vec::new(),
            flags: EmbeddingFlags::default(),
            embed_mode: EmbedMode::default(),
            poisoned: false,
        }
    }

    /// Grows arc capacity. Must be called before [`init`](Self::init); once
    /// initialized, calling this with a capacity smaller than the current
    /// one is an error (spec.md §4.1).
    pub fn ensure_arc_capacity(&mut self, capacity: u32) -> Result<()> {
        if !self.vertices.is_empty() && capacity < self.arc_capacity {
            return Err(PlanarityError::Internal(
                "ensure_arc_capacity called with smaller capacity after init",
            ));
        }
        self.arc_capacity = self.arc_capacity.max(capacity);
        Ok(())
    }

    /// Initializes the store with `n` primary vertices (plus `n` virtual
    /// bicomp-root slots) and, if not already set by
    /// [`ensure_arc_capacity`], a default arc capacity of `3n` edges' worth
    /// of arcs (the planarity edge bound `3N-6`, rounded up generously).
    pub fn init(&mut self, n: u32) -> Result<()> {
        if self.arc_capacity == 0 {
            self.arc_capacity = (6 * n.max(1) + 4) * 2;
        }
        self.n = n;
        self.m = 0;
        self.vertices = (0..2 * n)
            .map(|i| {
                let mut v = Vertex::blank(if i < n {
                    VertexKind::Primary
                } else {
                    VertexKind::BicompRoot
                });
                v.index = i;
                v
            })
            .collect();
        self.arcs = (0..self.arc_capacity).map(|_| Arc::blank()).collect();
        self.ext_face = vec![[VertexId::NIL; 2]; (2 * n) as usize];
        self.edge_hole_stack = (0..self.arc_capacity / 2)
            .rev()
            .map(|k| ArcId::new(2 * k))
            .collect();
        self.work_stack = Vec::with_capacity(2 * self.arc_capacity as usize);
        self.flags = EmbeddingFlags::default();
        self.poisoned = false;
        Ok(())
    }

    /// Resets per-run scratch state so the same store can be embedded again
    /// (spec.md §3, "Lifecycles"; spec.md §8, "Idempotence").
    pub fn reinitialize(&mut self) {
        let n = self.n;
        let arc_capacity = self.arc_capacity;
        self.arc_capacity = arc_capacity;
        let _ = self.init(n);
        self.arc_capacity = arc_capacity;
    }

    #[inline]
    pub fn num_primary(&self) -> u32 {
        self.n
    }

    #[inline]
    pub fn root_of_child(&self, child: VertexId) -> VertexId {
        VertexId::new(self.n + child.0)
    }

    #[inline]
    pub fn child_of_root(&self, root: VertexId) -> VertexId {
        VertexId::new(root.0 - self.n)
    }

    #[inline]
    fn check_not_poisoned(&self) -> Result<()> {
        if self.poisoned {
            Err(PlanarityError::Internal("operation on poisoned store"))
        } else {
            Ok(())
        }
    }

    pub fn poison(&mut self, msg: &'static str) -> PlanarityError {
        self.poisoned = true;
        PlanarityError::Internal(msg)
    }

    // ---- adjacency list primitives -------------------------------------

    /// Splice `arc` into `v`'s adjacency list at the given side.
    fn attach(&mut self, v: VertexId, arc: ArcId, side: AdjacencySide) {
        let first = self.vertices[v.index()].link[0];
        let last = self.vertices[v.index()].link[1];
        match side {
            AdjacencySide::First => {
                self.arcs[arc.index()].link[Link::Prev.as_index()] = ArcId::NIL;
                self.arcs[arc.index()].link[Link::Next.as_index()] = first;
                if !first.is_nil() {
                    self.arcs[first.index()].link[Link::Prev.as_index()] = arc;
                }
                self.vertices[v.index()].link[0] = arc;
                if last.is_nil() {
                    self.vertices[v.index()].link[1] = arc;
                }
            }
            AdjacencySide::Last => {
                self.arcs[arc.index()].link[Link::Next.as_index()] = ArcId::NIL;
                self.arcs[arc.index()].link[Link::Prev.as_index()] = last;
                if !last.is_nil() {
                    self.arcs[last.index()].link[Link::Next.as_index()] = arc;
                }
                self.vertices[v.index()].link[1] = arc;
                if first.is_nil() {
                    self.vertices[v.index()].link[0] = arc;
                }
            }
        }
    }

    /// Splice `arc` immediately adjacent to `reference` in `v`'s adjacency
    /// list, on the given side of it.
    pub fn attach_adjacent(&mut self, v: VertexId, arc: ArcId, reference: ArcId, side: Link) {
        if reference.is_nil() {
            self.attach(
                v,
                arc,
                match side {
                    Link::Prev => AdjacencySide::First,
                    Link::Next => AdjacencySide::Last,
                },
            );
            return;
        }
        let other = self.arcs[reference.index()].link[side.as_index()];
        self.arcs[arc.index()].link[side.as_index()] = other;
        self.arcs[arc.index()].link[side.opposite().as_index()] = reference;
        self.arcs[reference.index()].link[side.as_index()] = arc;
        if other.is_nil() {
            let end = match side {
                Link::Prev => 0,
                Link::Next => 1,
            };
            self.vertices[v.index()].link[end] = arc;
        } else {
            self.arcs[other.index()].link[side.opposite().as_index()] = arc;
        }
    }

    /// Removes `arc` from `v`'s adjacency list without recycling it. The
    /// arc's own link fields are left untouched so [`restore_hidden`] can
    /// put it back (spec.md §4.1, "hide edge").
    pub fn detach(&mut self, v: VertexId, arc: ArcId) {
        let prev = self.arcs[arc.index()].link[Link::Prev.as_index()];
        let next = self.arcs[arc.index()].link[Link::Next.as_index()];
        if prev.is_nil() {
            self.vertices[v.index()].link[0] = next;
        } else {
            self.arcs[prev.index()].link[Link::Next.as_index()] = next;
        }
        if next.is_nil() {
            self.vertices[v.index()].link[1] = prev;
        } else {
            self.arcs[next.index()].link[Link::Prev.as_index()] = prev;
        }
    }

    /// Re-splices a previously [`detach`]ed arc back between its recorded
    /// neighbors.
    pub fn reattach(&mut self, v: VertexId, arc: ArcId) {
        let prev = self.arcs[arc.index()].link[Link::Prev.as_index()];
        let next = self.arcs[arc.index()].link[Link::Next.as_index()];
        if prev.is_nil() {
            self.vertices[v.index()].link[0] = arc;
        } else {
            self.arcs[prev.index()].link[Link::Next.as_index()] = arc;
        }
        if next.is_nil() {
            self.vertices[v.index()].link[1] = arc;
        } else {
            self.arcs[next.index()].link[Link::Prev.as_index()] = arc;
        }
    }

    /// Iterates the arcs of `v`'s adjacency list from first to last.
    pub fn adjacency_iter(&self, v: VertexId) -> AdjacencyIter<'_> {
        AdjacencyIter {
            store: self,
            next: self.vertices[v.index()].link[0],
        }
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency_iter(v).count()
    }

    // ---- edge lifecycle --------------------------------------------------

    fn alloc_arc_pair(&mut self) -> Result<(ArcId, ArcId)> {
        match self.edge_hole_stack.pop() {
            Some(a) => Ok((a, a.twin())),
            None => Err(PlanarityError::NonEmbeddable),
        }
    }

    /// Adds an undirected edge `(u, v)`, inserting each new half-edge at the
    /// requested side of its owner's adjacency list (spec.md §4.1).
    pub fn add_edge(
        &mut self,
        u: VertexId,
        u_side: AdjacencySide,
        v: VertexId,
        v_side: AdjacencySide,
    ) -> Result<(ArcId, ArcId)> {
        self.check_not_poisoned()?;
        if self.m as usize * 2 >= self.arc_capacity as usize {
            return Err(PlanarityError::NonEmbeddable);
        }
        let (au, av) = self.alloc_arc_pair()?;
        self.arcs[au.index()] = Arc::blank();
        self.arcs[av.index()] = Arc::blank();
        self.arcs[au.index()].neighbor = v;
        self.arcs[av.index()].neighbor = u;
        self.attach(
            u,
            au,
            match u_side {
                AdjacencySide::First => AdjacencySide::First,
                AdjacencySide::Last => AdjacencySide::Last,
            },
        );
        self.attach(v, av, v_side);
        self.m += 1;
        Ok((au, av))
    }

    /// Inserts a new edge `(u, v)` with each half-edge spliced adjacent to a
    /// given reference arc, used by Walkdown to embed a back edge directly
    /// into position on the external face (spec.md §4.1).
    pub fn insert_edge_adjacent(
        &mut self,
        u: VertexId,
        u_ref: ArcId,
        u_side: Link,
        v: VertexId,
        v_ref: ArcId,
        v_side: Link,
    ) -> Result<(ArcId, ArcId)> {
        self.check_not_poisoned()?;
        if self.m as usize * 2 >= self.arc_capacity as usize {
            return Err(PlanarityError::NonEmbeddable);
        }
        let (au, av) = self.alloc_arc_pair()?;
        self.arcs[au.index()] = Arc::blank();
        self.arcs[av.index()] = Arc::blank();
        self.arcs[au.index()].neighbor = v;
        self.arcs[av.index()].neighbor = u;
        self.attach_adjacent(u, au, u_ref, u_side);
        self.attach_adjacent(v, av, v_ref, v_side);
        self.m += 1;
        Ok((au, av))
    }

    /// Deletes the edge owning arc `j`, recycling both half-edge slots.
    pub fn delete_edge(&mut self, j: ArcId) -> Result<()> {
        self.check_not_poisoned()?;
        let twin = j.twin();
        let u = self.arcs[twin.index()].neighbor;
        let v = self.arcs[j.index()].neighbor;
        self.detach(v, j);
        self.detach(u, twin);
        self.m -= 1;
        let lower = ArcId::new(j.0 & !1);
        self.edge_hole_stack.push(lower);
        Ok(())
    }

    /// Detaches both arcs of an edge but preserves their link fields so
    /// [`restore_hidden_edge`] can splice them back in reverse order of
    /// hiding (spec.md §4.1).
    pub fn hide_edge(&mut self, j: ArcId) {
        let twin = j.twin();
        let u = self.arcs[twin.index()].neighbor;
        let v = self.arcs[j.index()].neighbor;
        self.detach(v, j);
        self.detach(u, twin);
    }

    pub fn restore_hidden_edge(&mut self, j: ArcId) {
        let twin = j.twin();
        let u = self.arcs[twin.index()].neighbor;
        let v = self.arcs[j.index()].neighbor;
        self.reattach(u, twin);
        self.reattach(v, j);
    }

    /// Whether the directed arc `u -> v` is present, ignoring
    /// direction-in-only half-edges (spec.md §4.1).
    pub fn test_neighbor(&self, u: VertexId, v: VertexId) -> bool {
        self.get_neighbor_arc(u, v).is_some()
    }

    pub fn get_neighbor_arc(&self, u: VertexId, v: VertexId) -> Option<ArcId> {
        let mut cur = self.vertices[u.index()].link[0];
        while !cur.is_nil() {
            let arc = &self.arcs[cur.index()];
            if arc.neighbor == v && !arc.direction_in_only {
                return Some(cur);
            }
            cur = arc.link[Link::Next.as_index()];
        }
        None
    }

    #[inline]
    pub fn twin(&self, arc: ArcId) -> ArcId {
        arc.twin()
    }

    pub fn neighbor(&self, arc: ArcId) -> VertexId {
        self.arcs[arc.index()].neighbor
    }

    /// The vertex whose adjacency list currently contains `arc`. Arcs carry
    /// no explicit owner field (spec.md §3); the owner is always the
    /// neighbor recorded on the twin, since `add_edge`/`insert_edge_adjacent`
    /// always set each half-edge's `neighbor` to the *other* endpoint.
    pub fn owner(&self, arc: ArcId) -> VertexId {
        self.arcs[arc.twin().index()].neighbor
    }

    /// The arc following `arc` in its owner's adjacency list, treating the
    /// list as circular (wrapping from the last arc back to the first).
    /// This is the rotation-system successor used by face tracing (spec.md
    /// §4.9).
    pub fn next_in_rotation(&self, arc: ArcId) -> ArcId {
        let next = self.arcs[arc.index()].link[Link::Next.as_index()];
        if next.is_nil() {
            self.vertices[self.owner(arc).index()].link[0]
        } else {
            next
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AdjacencyIter<'a> {
    store: &'a GraphStore,
    next: ArcId,
}

impl<'a> Iterator for AdjacencyIter<'a> {
    type Item = ArcId;
    fn next(&mut self) -> Option<ArcId> {
        if self.next.is_nil() {
            return None;
        }
        let cur = self.next;
        self.next = self.store.arcs[cur.index()].link[Link::Next.as_index()];
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_registers_both_half_edges() {
        let mut store = GraphStore::new();
        store.init(3).unwrap();
        let (a, b) = store
            .add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(1), AdjacencySide::Last)
            .unwrap();
        assert_eq!(store.m, 1);
        assert_eq!(store.neighbor(a), VertexId::new(1));
        assert_eq!(store.neighbor(b), VertexId::new(0));
        assert_eq!(a.twin(), b);
        assert_eq!(store.owner(a), VertexId::new(0));
        assert_eq!(store.owner(b), VertexId::new(1));
    }

    #[test]
    fn delete_edge_frees_the_hole_for_reuse() {
        let mut store = GraphStore::new();
        store.init(3).unwrap();
        let (a, _) = store
            .add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(1), AdjacencySide::Last)
            .unwrap();
        let before = store.edge_hole_stack.len();
        store.delete_edge(a).unwrap();
        assert_eq!(store.m, 0);
        assert_eq!(store.edge_hole_stack.len(), before + 1);
    }

    #[test]
    fn next_in_rotation_is_circular() {
        let mut store = GraphStore::new();
        store.init(4).unwrap();
        store.add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(1), AdjacencySide::Last).unwrap();
        store.add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(2), AdjacencySide::Last).unwrap();
        store.add_edge(VertexId::new(0), AdjacencySide::Last, VertexId::new(3), AdjacencySide::Last).unwrap();
        let first = store.vertices[0].link[0];
        let mut cur = first;
        for _ in 0..3 {
            cur = store.next_in_rotation(cur);
        }
        assert_eq!(cur, first, "three hops around a 3-arc rotation must return to the start");
    }

    #[test]
    fn ensure_arc_capacity_rejects_shrinking_after_init() {
        let mut store = GraphStore::new();
        store.ensure_arc_capacity(20).unwrap();
        store.init(3).unwrap();
        assert!(store.ensure_arc_capacity(2).is_err());
    }
}

pub const SENTINEL: u32 = NIL;

//! The engine: wires DFS preprocessing, Walkup, Walkdown, and the
//! obstruction isolator into the step loop of spec.md §2's data-flow
//! paragraph, parameterized by a small capability trait standing in for the
//! source's overloadable function table (spec.md §9).
//!
//! `VariantOps` names the four capability points spec.md §4.7/§9 calls out:
//! what to do when Walkdown blocks on a bicomp, what to do when a step
//! finishes with back edges still pending, and what post-processing and
//! obstruction-checking each variant wants. One small struct per
//! `EmbedMode` implements it, matching how `petgraph`'s own `visit` module
//! factors traversal behavior behind small traits rather than a vtable.

use crate::dfs;
use crate::face;
use crate::index::{ArcId, VertexId};
use crate::isolator::{self, HomeomorphKind, Subgraph};
use crate::store::{EdgeType, EmbedMode, GraphStore};
use crate::walkdown::{self, Outcome};
use crate::walkup;
use crate::error::{PlanarityError, Result};
use crate::verify;

/// Outcome of a full `embed` run.
#[derive(Debug, Clone)]
pub enum EmbedOutcome {
    /// The graph was embedded according to the requested variant.
    Success,
    /// The requested property does not hold; `witness` is the certified
    /// obstruction or homeomorph subgraph.
    NonEmbeddable(Subgraph),
}

/// What a variant wants done after Walkdown reports `Blocked` on one bicomp.
enum BlockedAction {
    /// Leave the bicomp as is and move on to the next child root this step
    /// (used by the homeomorph-search variants, which reduce/record and
    /// keep iterating rather than aborting the whole embedding).
    Continue,
    /// Stop the whole embedding with this final result.
    Finish(EmbedOutcome),
}

trait VariantOps {
    fn mode(&self) -> EmbedMode;

    /// Called when `walkdown` reports `Blocked { r, x, y, w }` on the bicomp
    /// rooted at `r` during step `v` (spec.md §4.7, capability
    /// `onBicompBlocked`).
    fn on_bicomp_blocked(
        &self,
        store: &mut GraphStore,
        v: VertexId,
        r: VertexId,
        x: VertexId,
        y: VertexId,
        w: VertexId,
    ) -> Result<BlockedAction>;

    /// Called once, after every child root of `v` has returned `Done`, if
    /// `v` still has unembedded back edges to descendants (capability
    /// `onIterationBlocked`). The base planar/outerplanar engine never
    /// expects this — every pertinent back edge is reachable from exactly
    /// one of `v`'s own child bicomps — so the default treats it as an
    /// internal invariant violation.
    fn on_iteration_blocked(&self, store: &mut GraphStore, _v: VertexId) -> Result<()> {
        Err(store.poison(
            "step finished with pending back edges reachable from none of its child bicomps",
        ))
    }

    /// Called once embedding completes successfully (capability
    /// `onEmbedPostprocess`); the default is a no-op.
    fn on_embed_postprocess(&self, _store: &mut GraphStore) -> Result<()> {
        Ok(())
    }

    /// Called on every witness an isolator function returns, before it is
    /// wrapped in `EmbedOutcome::NonEmbeddable` (capability
    /// `onCheckObstruction`). The default runs the same independent
    /// structural check [`crate::verify::check_obstruction`] performs after
    /// the fact, so a malformed witness is caught at the point it is
    /// produced rather than only by a caller that happens to verify.
    fn on_check_obstruction(&self, store: &GraphStore, witness: &Subgraph) -> Result<()> {
        verify::check_obstruction(store, witness)
    }

    /// Called once per step, before that step's child bicomps are
    /// initialized (capability `initVertexInfo`); the default is a no-op.
    /// Variants that need per-step scratch state beyond what `dfs`/`walkup`
    /// already maintain would override this.
    fn init_vertex_info(&self, _store: &mut GraphStore, _v: VertexId) {}

    /// Called once per newly created tree-edge arc pair when a child's
    /// trivial bicomp is initialized (capability `initEdge`); the default is
    /// a no-op. Variants that tag edges differently (e.g. a future drawing
    /// variant distinguishing tree edges for layout) would override this.
    fn init_edge(&self, _store: &mut GraphStore, _arc: ArcId) {}
}

struct PlanarOps;
impl VariantOps for PlanarOps {
    fn mode(&self) -> EmbedMode {
        EmbedMode::Planar
    }
    fn on_bicomp_blocked(
        &self,
        store: &mut GraphStore,
        v: VertexId,
        _r: VertexId,
        x: VertexId,
        y: VertexId,
        w: VertexId,
    ) -> Result<BlockedAction> {
        let witness = isolator::isolate_kuratowski(store, v, x, y, w)?;
        self.on_check_obstruction(store, &witness)?;
        store.flags.set(crate::store::EmbeddingFlags::OBSTRUCTION_FOUND);
        Ok(BlockedAction::Finish(EmbedOutcome::NonEmbeddable(witness)))
    }
}

struct OuterplanarOps;
impl VariantOps for OuterplanarOps {
    fn mode(&self) -> EmbedMode {
        EmbedMode::Outerplanar
    }
    fn on_bicomp_blocked(
        &self,
        store: &mut GraphStore,
        v: VertexId,
        _r: VertexId,
        x: VertexId,
        y: VertexId,
        w: VertexId,
    ) -> Result<BlockedAction> {
        let witness = outerplanar_witness(store, v, x, y, w)?;
        self.on_check_obstruction(store, &witness)?;
        store.flags.set(crate::store::EmbeddingFlags::OBSTRUCTION_FOUND);
        Ok(BlockedAction::Finish(EmbedOutcome::NonEmbeddable(witness)))
    }
}

struct DrawPlanarOps;
impl VariantOps for DrawPlanarOps {
    fn mode(&self) -> EmbedMode {
        EmbedMode::DrawPlanar
    }
    fn on_bicomp_blocked(
        &self,
        store: &mut GraphStore,
        v: VertexId,
        _r: VertexId,
        x: VertexId,
        y: VertexId,
        w: VertexId,
    ) -> Result<BlockedAction> {
        let witness = isolator::isolate_kuratowski(store, v, x, y, w)?;
        self.on_check_obstruction(store, &witness)?;
        store.flags.set(crate::store::EmbeddingFlags::OBSTRUCTION_FOUND);
        Ok(BlockedAction::Finish(EmbedOutcome::NonEmbeddable(witness)))
    }
    fn on_embed_postprocess(&self, store: &mut GraphStore) -> Result<()> {
        crate::drawing::compute_visibility(store)
    }
}

/// Search variants (spec.md §4.7): a blocked bicomp is not a planarity
/// failure, it is the evidence itself. Rather than reduce the bicomp and
/// keep iterating (the source's path-connector mechanism, which lets the
/// *same* step keep looking for a second obstruction deeper in the graph),
/// this port reports the first homeomorph the isolator can certify around
/// the blocked bicomp and stops (documented simplification, DESIGN.md).
struct SearchOps(HomeomorphKind);
impl VariantOps for SearchOps {
    fn mode(&self) -> EmbedMode {
        match self.0 {
            HomeomorphKind::K4 => EmbedMode::SearchK4,
            HomeomorphKind::K23 => EmbedMode::SearchK23,
            HomeomorphKind::K33 => EmbedMode::SearchK33,
            HomeomorphKind::K5 => unreachable!("K5 is never a search target"),
        }
    }
    fn on_bicomp_blocked(
        &self,
        store: &mut GraphStore,
        v: VertexId,
        _r: VertexId,
        x: VertexId,
        y: VertexId,
        w: VertexId,
    ) -> Result<BlockedAction> {
        let witness = match self.0 {
            HomeomorphKind::K4 => isolator::isolate_k4(store, v, x, y, w)?,
            HomeomorphKind::K23 => isolator::isolate_k23(store, v, x, y, w)?,
            HomeomorphKind::K33 => isolator::isolate_kuratowski(store, v, x, y, w)?,
            HomeomorphKind::K5 => unreachable!(),
        };
        self.on_check_obstruction(store, &witness)?;
        store.flags.set(crate::store::EmbeddingFlags::OBSTRUCTION_FOUND);
        Ok(BlockedAction::Finish(EmbedOutcome::NonEmbeddable(witness)))
    }
}

fn outerplanar_witness(
    store: &mut GraphStore,
    v: VertexId,
    x: VertexId,
    y: VertexId,
    w: VertexId,
) -> Result<Subgraph> {
    // A blocked outerplanarity bicomp is certified as a K4 when a second
    // active vertex sits strictly between x and y besides w (spec.md
    // §4.7's minor-A branch); otherwise it is a K2,3 (minor A2).
    match isolator::isolate_k4(store, v, x, y, w) {
        Ok(sg) => Ok(sg),
        Err(_) => isolator::isolate_k23(store, v, x, y, w),
    }
}

fn variant_for(mode: EmbedMode) -> Box<dyn VariantOps> {
    match mode {
        EmbedMode::Planar => Box::new(PlanarOps),
        EmbedMode::Outerplanar => Box::new(OuterplanarOps),
        EmbedMode::DrawPlanar => Box::new(DrawPlanarOps),
        EmbedMode::SearchK4 => Box::new(SearchOps(HomeomorphKind::K4)),
        EmbedMode::SearchK23 => Box::new(SearchOps(HomeomorphKind::K23)),
        EmbedMode::SearchK33 => Box::new(SearchOps(HomeomorphKind::K33)),
    }
}

/// Runs the full embedding/search algorithm for `mode` on `store`, which
/// must already be initialized and populated with the input graph's edges
/// (spec.md §2, "Data flow").
pub fn embed(store: &mut GraphStore, mode: EmbedMode) -> Result<EmbedOutcome> {
    if store.poisoned {
        return Err(PlanarityError::Internal("operation on poisoned store"));
    }
    let bound = if mode.is_outerplanar_like() {
        2 * store.n.saturating_sub(3)
    } else {
        3 * store.n.saturating_sub(6)
    };
    if store.n >= 3 && store.m > bound {
        // Edge-count bound check (spec.md §3, "Edge count cap"): excess
        // edges prove non-embeddability before any DFS work is spent.
        return Ok(EmbedOutcome::NonEmbeddable(trivial_excess_witness(store)?));
    }

    store.embed_mode = mode;
    dfs::build_dfs_tree(store)?;
    let variant = variant_for(mode);

    for v_dfi in (0..store.n).rev() {
        let v = VertexId::new(v_dfi);
        variant.init_vertex_info(store, v);
        init_child_roots(store, v, variant.as_ref())?;
        mark_pertinent_back_edges(store, v);

        let children = store.vertices[v.index()].tree_children.clone();
        for c in children {
            let root = store.root_of_child(c);
            match walkdown::walkdown(store, v, root) {
                Outcome::Done => {}
                Outcome::Blocked { r, x, y, w } => {
                    match variant.on_bicomp_blocked(store, v, r, x, y, w)? {
                        BlockedAction::Continue => continue,
                        BlockedAction::Finish(outcome) => return Ok(outcome),
                    }
                }
            }
        }

        if !store.vertices[v.index()].fwd_arc_list.is_nil() {
            variant.on_iteration_blocked(store, v)?;
        }
    }

    face::reconcile_inversions(store);
    face::join_remaining_roots(store);
    variant.on_embed_postprocess(store)?;
    Ok(EmbedOutcome::Success)
}

/// Creates the trivial two-vertex bicomp `(N+c, c)` for every direct DFS
/// child `c` of `v`, one virtual copy of `v` per child (spec.md §3,
/// "Lifecycles"; spec.md GLOSSARY, "Bicomp root").
fn init_child_roots(store: &mut GraphStore, v: VertexId, variant: &dyn VariantOps) -> Result<()> {
    let children = store.vertices[v.index()].tree_children.clone();
    for c in children {
        let root = store.root_of_child(c);
        if !store.vertices[root.index()].link[0].is_nil() {
            continue; // already initialized (shouldn't happen, defensive)
        }
        let (ra, rb) = store.add_edge(
            root,
            crate::store::AdjacencySide::Last,
            c,
            crate::store::AdjacencySide::First,
        )?;
        store.arcs[ra.index()].edge_type = EdgeType::Child;
        store.arcs[rb.index()].edge_type = EdgeType::Parent;
        face::set_trivial(store, root, c);
        variant.init_edge(store, ra);
        variant.init_edge(store, rb);
    }
    Ok(())
}

/// Sets `pertinentAdjacencyInfo` on every descendant `d` reached by one of
/// `v`'s still-unembedded forward arcs, then runs Walkup from each (spec.md
/// §4.4's contract expects this bookkeeping to already be in place).
fn mark_pertinent_back_edges(store: &mut GraphStore, v: VertexId) {
    for arc in dfs::fwd_arcs(store, v) {
        let d = store.neighbor(arc);
        store.vertices[d.index()].pertinent_adjacency_info = arc;
        walkup::walkup(store, v, d);
    }
}

/// When the edge count alone exceeds the relevant planar/outerplanar bound,
/// the fastest certified witness is any K5/K4 found directly in the raw
/// input graph, without running DFS at all (spec.md §3, "Edge count cap").
/// A graph this dense always contains one among any 5 (or 4) of its highest
/// degree vertices, so the search below just tries small vertex subsets in
/// increasing order until the disjoint-path search succeeds.
fn trivial_excess_witness(store: &GraphStore) -> Result<Subgraph> {
    let adj = isolator::raw_adjacency(store);
    let n = adj.len();
    let mut by_degree: Vec<VertexId> = (0..n as u32).map(VertexId::new).collect();
    by_degree.sort_by_key(|v| std::cmp::Reverse(adj[v.index()].len()));

    let pool = &by_degree[..n.min(10)];
    for a in 0..pool.len() {
        for b in (a + 1)..pool.len() {
            for c in (b + 1)..pool.len() {
                for d in (c + 1)..pool.len() {
                    let four = [pool[a], pool[b], pool[c], pool[d]];
                    for &e in pool.iter() {
                        if four.contains(&e) {
                            continue;
                        }
                        let five = [four[0], four[1], four[2], four[3], e];
                        if let Some(paths) = isolator::disjoint_complete_paths(&adj, &five) {
                            return Ok(isolator::build_subgraph(HomeomorphKind::K5, &five, &[], paths));
                        }
                    }
                    if let Some(paths) = isolator::disjoint_complete_paths(&adj, &four) {
                        return Ok(isolator::build_subgraph(HomeomorphKind::K4, &four, &[], paths));
                    }
                }
            }
        }
    }
    Err(PlanarityError::Internal(
        "edge count exceeded the planar bound but no K5/K4 witness could be isolated",
    ))
}

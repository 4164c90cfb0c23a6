use crate::index::{ArcId, VertexId};

/// Coarse DFS edge classification recorded per *vertex* for convenience
/// alongside the per-arc `EdgeType` (spec.md §3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VertexKind {
    #[default]
    Primary,
    BicompRoot,
}

/// Transient obstruction-classification marks (spec.md §3, "Obstruction
/// type bits"). Used only while the isolator has a bicomp in focus; cleared
/// between isolations.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ObstructionMark {
    #[default]
    Unknown,
    HighRxw,
    LowRxw,
    HighRyw,
    LowRyw,
}

/// One vertex record. Primary vertices occupy indices `0..N`; virtual
/// bicomp-root copies occupy `N..2N` (spec.md §3). Both kinds share this
/// struct; `kind` distinguishes them and a few fields are meaningless for
/// roots (see field docs).
#[derive(Clone, Debug)]
pub struct Vertex {
    pub kind: VertexKind,

    /// First and last arc of the circular adjacency list, or `NIL` if empty.
    pub link: [ArcId; 2],

    /// DFI once the graph is DFS-sorted; otherwise the original input index.
    pub index: u32,

    pub visited: bool,
    pub visited_info: u32,

    /// DFS parent's DFI. `NIL` for DFS-tree roots and for virtual vertices
    /// (a bicomp root's "parent" is implicit in the tree arc on its face).
    pub parent: VertexId,
    pub least_ancestor: u32,
    pub lowpoint: u32,

    /// Head of the (at most one, in a simple graph) pending back-arc from
    /// this vertex to the current step vertex.
    pub pertinent_adjacency_info: ArcId,
    /// Head of the list of child bicomp roots pertinent to the step vertex.
    /// Internally-active bicomps are kept at the head, externally-active
    /// ones at the tail (spec.md §3).
    pub pertinent_bicomp_list: VertexId,
    /// Next/prev pointers within `pertinent_bicomp_list`, keyed by vertex id
    /// of a bicomp-root vertex.
    pub pertinent_bicomp_link: [VertexId; 2],

    /// Head of the DFS-children-not-yet-merged list, sorted non-decreasing
    /// by child lowpoint.
    pub separated_dfs_child_list: VertexId,
    pub separated_dfs_child_link: [VertexId; 2],

    /// Head of the list of unembedded forward arcs to descendants, sorted
    /// by ascending descendant DFI.
    pub fwd_arc_list: ArcId,

    /// Full DFS-tree children, by DFI. Persisted separately from
    /// `separated_dfs_child_list` (which drops children once merged) because
    /// the isolator needs to walk tree paths regardless of merge progress
    /// (spec.md §4.6).
    pub tree_children: Vec<VertexId>,

    pub obstruction_mark: ObstructionMark,

    /// Deferred orientation-flip flag for the external-face tracker
    /// (spec.md §4.3).
    pub face_inverted: bool,

    /// Drawing post-processor scratch (spec.md §4.8): which side of its
    /// merge neighbor this vertex was placed on during embedding.
    pub drawing_merge_side: MergeSide,
    /// Vertical position assigned by the visibility sweep: unique in
    /// `0..N`.
    pub drawing_pos: u32,
    /// Horizontal extent of this vertex's strip: the min/max horizontal
    /// position among its incident edges (spec.md §4.8, step 3).
    pub drawing_h_start: u32,
    pub drawing_h_end: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MergeSide {
    #[default]
    Unset,
    Above,
    Below,
    Tie,
}

impl Vertex {
    pub fn blank(kind: VertexKind) -> Self {
        Vertex {
            kind,
            link: [ArcId::NIL; 2],
            index: 0,
            visited: false,
            visited_info: u32::MAX,
            parent: VertexId::NIL,
            least_ancestor: u32::MAX,
            lowpoint: u32::MAX,
            pertinent_adjacency_info: ArcId::NIL,
            pertinent_bicomp_list: VertexId::NIL,
            pertinent_bicomp_link: [VertexId::NIL; 2],
            separated_dfs_child_list: VertexId::NIL,
            separated_dfs_child_link: [VertexId::NIL; 2],
            fwd_arc_list: ArcId::NIL,
            tree_children: Vec::new(),
            obstruction_mark: ObstructionMark::Unknown,
            face_inverted: false,
            drawing_merge_side: MergeSide::Unset,
            drawing_pos: u32::MAX,
            drawing_h_start: u32::MAX,
            drawing_h_end: 0,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.kind == VertexKind::BicompRoot
    }

    #[inline]
    pub fn degree_is_zero(&self) -> bool {
        self.link[0].is_nil()
    }
}

//! The three-valued outcome threaded through every public operation
//! (spec.md §7). Kept as a hand-rolled enum rather than a `thiserror`
//! derive, matching the teacher's preference (`petgraph-core::error`) for
//! explicit error types in library crates.

use std::fmt;

/// Error result of a fallible engine operation.
///
/// `NonEmbeddable` is not a bug: it is a proof that the requested property
/// (planarity, outerplanarity, absence of a Kx homeomorph) does not hold,
/// and the graph store holds a certified witness when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanarityError {
    /// The input has been proven to lack the requested property. The
    /// graph store holds a certified obstruction or homeomorph subgraph.
    NonEmbeddable,
    /// An internal invariant was violated. The graph store is poisoned:
    /// every subsequent operation on it must also return `Internal`.
    Internal(&'static str),
}

impl fmt::Display for PlanarityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanarityError::NonEmbeddable => {
                write!(f, "graph does not admit the requested embedding")
            }
            PlanarityError::Internal(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for PlanarityError {}

pub type Result<T> = std::result::Result<T, PlanarityError>;

//! Homeomorphism-search front doors (spec.md §4.7, component 7 of §2's
//! table). Each submodule is a thin, named entry point over
//! [`crate::engine::embed`] running the shared engine in the matching
//! search mode; the actual capability-table wiring (what happens when a
//! bicomp blocks) lives in `engine` next to the planar/outerplanar/draw
//! variants it mirrors, per spec.md §9's "single engine parameterized by a
//! small capability set" redesign note.

pub mod k23;
pub mod k33;
pub mod k4;

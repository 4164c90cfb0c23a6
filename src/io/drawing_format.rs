//! Drawing auxiliary output formats (spec.md §6): the `<DrawPlanar>` block
//! and the ASCII visibility-representation grid. Both are write-only
//! debugging/inspection views over a store the drawing post-processor
//! (`crate::drawing`) has already populated; neither participates in the
//! certified embedding/obstruction result.

use std::io::Write;

use crate::error::{PlanarityError, Result};
use crate::store::GraphStore;

/// Writes the `<DrawPlanar>...</DrawPlanar>` block: `N` lines of
/// `i: pos start end` for vertices (1-based `i`, matching the
/// adjacency-list format's vertex numbering), then `2M` lines of
/// `u->v: pos start end` for every directed arc.
pub fn write_draw_planar_block(writer: &mut impl Write, store: &GraphStore) -> Result<()> {
    let io_err = |_| PlanarityError::Internal("failed to write DrawPlanar block");
    writeln!(writer, "<DrawPlanar>").map_err(io_err)?;
    for u in 0..store.n {
        let v = &store.vertices[u as usize];
        writeln!(writer, "{}: {} {} {}", u + 1, v.drawing_pos, v.drawing_h_start, v.drawing_h_end)
            .map_err(io_err)?;
    }
    let mut a = 0u32;
    while (a as usize) < store.arcs.len() {
        let arc = crate::index::ArcId::new(a);
        a += 1;
        let rec = &store.arcs[arc.index()];
        if rec.neighbor.is_nil() {
            continue;
        }
        let owner = store.owner(arc);
        if owner.0 >= store.n || rec.neighbor.0 >= store.n {
            continue;
        }
        writeln!(
            writer,
            "{}->{}: {} {} {}",
            owner.0 + 1,
            rec.neighbor.0 + 1,
            rec.drawing_pos,
            rec.drawing_start,
            rec.drawing_end
        )
        .map_err(io_err)?;
    }
    writeln!(writer, "</DrawPlanar>").map_err(io_err)?;
    Ok(())
}

/// Renders the visibility representation as an ASCII grid of `2N` rows (one
/// per vertex, doubled to leave a spacer row for edges passing between
/// consecutive vertical positions) by `M+1` columns (one per horizontal
/// edge position, plus one for a trailing margin), per spec.md §6: `-` for
/// vertex horizontal strips, `|` for edge vertical segments, and the
/// decimal vertex index centered on its strip.
pub fn write_ascii_visibility(writer: &mut impl Write, store: &GraphStore) -> Result<()> {
    let n = store.n as usize;
    let m = store.m as usize;
    let rows = 2 * n;
    let cols = m + 1;
    let mut grid = vec![vec![' '; cols]; rows.max(1)];

    let mut a = 0u32;
    while (a as usize) < store.arcs.len() {
        let arc = crate::index::ArcId::new(a);
        a += 2;
        let rec = &store.arcs[arc.index()];
        if rec.neighbor.is_nil() {
            continue;
        }
        let twin = arc.twin();
        let u = store.arcs[twin.index()].neighbor;
        let w = rec.neighbor;
        if u.0 as usize >= n || w.0 as usize >= n {
            continue;
        }
        let col = rec.drawing_pos as usize;
        if col >= cols {
            continue;
        }
        let (lo, hi) = (2 * rec.drawing_start as usize, 2 * rec.drawing_end as usize);
        for row in grid.iter_mut().take(hi + 1).skip(lo) {
            if row[col] == ' ' {
                row[col] = '|';
            }
        }
    }

    for v_idx in 0..n {
        let v = &store.vertices[v_idx];
        let row = 2 * v.drawing_pos as usize;
        if row >= rows {
            continue;
        }
        let (start, end) = (v.drawing_h_start as usize, v.drawing_h_end.min(m.saturating_sub(1) as u32) as usize);
        for col in grid[row].iter_mut().take(end + 1).skip(start.min(end)) {
            *col = '-';
        }
        let label = v_idx.to_string();
        let span = end.saturating_sub(start) + 1;
        let offset = start + span.saturating_sub(label.len()) / 2;
        for (i, ch) in label.chars().enumerate() {
            if offset + i < cols {
                grid[row][offset + i] = ch;
            }
        }
    }

    let io_err = |_| PlanarityError::Internal("failed to write ASCII visibility grid");
    for row in &grid {
        let line: String = row.iter().collect();
        writeln!(writer, "{line}").map_err(io_err)?;
    }
    Ok(())
}

//! Adjacency-matrix format (spec.md §6): `N` followed by `N` rows of `N`
//! `0`/`1` entries. Read-only; the suite never writes this format back out.

use std::io::Read;

use crate::error::{PlanarityError, Result};
use crate::index::VertexId;
use crate::store::{AdjacencySide, GraphStore};

pub fn read_adjacency_matrix(reader: &mut impl Read) -> Result<GraphStore> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|_| PlanarityError::Internal("failed to read adjacency-matrix input"))?;
    let mut tokens = text.split_ascii_whitespace();

    let n: u32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(PlanarityError::Internal("adjacency-matrix input missing vertex count"))?;

    let mut rows: Vec<Vec<u8>> = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let mut row = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let bit: u8 = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or(PlanarityError::Internal("adjacency-matrix input truncated"))?;
            row.push(bit);
        }
        rows.push(row);
    }

    let edge_count: u32 = rows
        .iter()
        .enumerate()
        .map(|(i, row)| row[i + 1..].iter().filter(|&&b| b != 0).count() as u32)
        .sum();

    let mut store = GraphStore::new();
    store.ensure_arc_capacity((2 * edge_count).max(2))?;
    store.init(n)?;
    for u in 0..n as usize {
        for w in (u + 1)..n as usize {
            if rows[u][w] != 0 {
                store.add_edge(
                    VertexId::new(u as u32),
                    AdjacencySide::Last,
                    VertexId::new(w as u32),
                    AdjacencySide::Last,
                )?;
            }
        }
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_triangle_matrix() {
        let input = "3\n0 1 1\n1 0 1\n1 1 0\n";
        let store = read_adjacency_matrix(&mut input.as_bytes()).unwrap();
        assert_eq!(store.n, 3);
        assert_eq!(store.m, 3);
    }

    #[test]
    fn reads_a_disconnected_graph() {
        let input = "4\n0 1 0 0\n1 0 0 0\n0 0 0 0\n0 0 0 0\n";
        let store = read_adjacency_matrix(&mut input.as_bytes()).unwrap();
        assert_eq!(store.n, 4);
        assert_eq!(store.m, 1);
    }
}

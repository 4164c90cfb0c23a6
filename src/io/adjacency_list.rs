//! Adjacency-list format (spec.md §6): a leading line with `N`, then one
//! line per vertex giving its 1-based index followed by its neighbors
//! terminated by `0`. Accepted as input and emitted as output.

use std::io::{Read, Write};

use crate::error::{PlanarityError, Result};
use crate::index::VertexId;
use crate::store::{AdjacencySide, GraphStore};

/// Parses an adjacency-list graph from `reader`, tokenizing on whitespace
/// (newlines included) rather than assuming one vertex strictly per line,
/// matching the tolerance of a `fscanf("%d", ...)`-style reader.
pub fn read_adjacency_list(reader: &mut impl Read) -> Result<GraphStore> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|_| PlanarityError::Internal("failed to read adjacency-list input"))?;
    let mut tokens = text.split_ascii_whitespace().map(|t| {
        t.parse::<i64>()
            .map_err(|_| PlanarityError::Internal("adjacency-list input contains a non-integer token"))
    });

    let n = next_token(&mut tokens)? as u32;
    let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); n as usize];
    let mut total_entries = 0u32;

    for expected_idx in 1..=n {
        let idx = next_token(&mut tokens)?;
        if idx != expected_idx as i64 {
            return Err(PlanarityError::Internal(
                "adjacency-list input vertex index out of order",
            ));
        }
        loop {
            let w = next_token(&mut tokens)?;
            if w == 0 {
                break;
            }
            if w < 1 || w > n as i64 {
                return Err(PlanarityError::Internal(
                    "adjacency-list input neighbor index out of range",
                ));
            }
            adjacency[(expected_idx - 1) as usize].push((w - 1) as u32);
            total_entries += 1;
        }
    }

    let mut store = GraphStore::new();
    store.ensure_arc_capacity((2 * total_entries).max(2))?;
    store.init(n)?;
    for u in 0..n {
        let uid = VertexId::new(u);
        for &w in &adjacency[u as usize] {
            let wid = VertexId::new(w);
            if uid != wid && !store.test_neighbor(uid, wid) {
                store.add_edge(uid, AdjacencySide::Last, wid, AdjacencySide::Last)?;
            }
        }
    }
    Ok(store)
}

fn next_token(tokens: &mut impl Iterator<Item = Result<i64>>) -> Result<i64> {
    match tokens.next() {
        Some(Ok(v)) => Ok(v),
        Some(Err(e)) => Err(e),
        None => Err(PlanarityError::Internal("adjacency-list input ended unexpectedly")),
    }
}

/// Writes `store`'s current adjacency (real vertices `0..N` only) in
/// adjacency-list format.
pub fn write_adjacency_list(writer: &mut impl Write, store: &GraphStore) -> Result<()> {
    let io_err = |_| PlanarityError::Internal("failed to write adjacency-list output");
    writeln!(writer, "{}", store.n).map_err(io_err)?;
    for u in 0..store.n {
        let uid = VertexId::new(u);
        write!(writer, "{}", u + 1).map_err(io_err)?;
        for arc in store.adjacency_iter(uid) {
            let w = store.neighbor(arc);
            if w.0 < store.n {
                write!(writer, " {}", w.0 + 1).map_err(io_err)?;
            }
        }
        writeln!(writer, " 0").map_err(io_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_triangle() {
        let input = "3\n1 2 3 0\n2 1 3 0\n3 1 2 0\n";
        let store = read_adjacency_list(&mut input.as_bytes()).unwrap();
        assert_eq!(store.n, 3);
        assert_eq!(store.m, 3);

        let mut out = Vec::new();
        write_adjacency_list(&mut out, &store).unwrap();
        let reparsed = read_adjacency_list(&mut &out[..]).unwrap();
        assert_eq!(reparsed.n, 3);
        assert_eq!(reparsed.m, 3);
    }

    #[test]
    fn rejects_out_of_order_vertex_index() {
        let input = "2\n2 1 0\n1 2 0\n";
        assert!(read_adjacency_list(&mut input.as_bytes()).is_err());
    }

    #[test]
    fn rejects_neighbor_index_out_of_range() {
        let input = "2\n1 5 0\n2 0\n";
        assert!(read_adjacency_list(&mut input.as_bytes()).is_err());
    }

    #[test]
    fn tolerates_arbitrary_whitespace_layout() {
        let input = "2\n\n 1   2 0\n2\n1\n0  ";
        let store = read_adjacency_list(&mut input.as_bytes()).unwrap();
        assert_eq!(store.n, 2);
        assert_eq!(store.m, 1);
    }
}

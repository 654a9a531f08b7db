//! Triangular storage for all-pairs route hop counts.

use std::time::Instant;

use tracing::debug;

use crate::routes::RouteIdx;

use super::InterchangeCost;
use super::adjacency::{RouteAdjacency, UNREACHED};

/// Symmetric hop-count matrix over `size` routes.
///
/// Only cells strictly above the diagonal are stored; the diagonal is
/// implicitly zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<u8>,
}

fn cell_count(size: usize) -> usize {
    size * size.saturating_sub(1) / 2
}

impl CostMatrix {
    /// A matrix with every off-diagonal pair unreachable.
    pub fn unreachable(size: usize) -> Self {
        Self {
            size,
            cells: vec![UNREACHED; cell_count(size)],
        }
    }

    /// Run a BFS from every route of `adjacency`.
    pub fn build(adjacency: &RouteAdjacency) -> Self {
        let started = Instant::now();
        let size = adjacency.len();
        let mut matrix = Self::unreachable(size);

        for source in 0..size {
            let hops = adjacency.hops_from(RouteIdx(source as u32));
            let row = matrix.row_start(source);
            let width = size - source - 1;
            matrix.cells[row..row + width].copy_from_slice(&hops[source + 1..]);
        }

        debug!(
            routes = size,
            reachable_pairs = matrix.finite_cells().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Computed interchange costs"
        );
        matrix
    }

    /// Offset of row `a`'s first stored cell, which is `(a, a + 1)`.
    fn row_start(&self, a: usize) -> usize {
        a * self.size - a * (a + 1) / 2
    }

    fn offset(&self, a: usize, b: usize) -> Option<usize> {
        if a >= self.size || b >= self.size || a == b {
            return None;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Some(self.row_start(low) + (high - low - 1))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Hops between two routes. Indices outside the matrix are unreachable.
    pub fn get(&self, a: RouteIdx, b: RouteIdx) -> InterchangeCost {
        let (a, b) = (a.as_usize(), b.as_usize());
        if a == b && a < self.size {
            return InterchangeCost::Hops(0);
        }
        match self.offset(a, b) {
            Some(offset) => InterchangeCost::from_raw(self.cells[offset]),
            None => InterchangeCost::Unreachable,
        }
    }

    /// Set a cell. Returns false for the diagonal or out-of-range indices.
    pub(super) fn set(&mut self, a: RouteIdx, b: RouteIdx, hops: u8) -> bool {
        match self.offset(a.as_usize(), b.as_usize()) {
            Some(offset) => {
                self.cells[offset] = hops;
                true
            }
            None => false,
        }
    }

    /// Every reachable pair `(a, b, hops)` with `a < b`.
    pub fn finite_cells(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        (0..self.size).flat_map(move |a| {
            let row = self.row_start(a);
            ((a + 1)..self.size).filter_map(move |b| {
                let hops = self.cells[row + (b - a - 1)];
                (hops != UNREACHED).then_some((a as u32, b as u32, hops))
            })
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn graph() -> impl Strategy<Value = RouteAdjacency> {
        (1usize..24).prop_flat_map(|size| {
            proptest::collection::vec((0..size as u32, 0..size as u32), 0..48)
                .prop_map(move |edges| RouteAdjacency::from_edges(size, &edges))
        })
    }

    proptest! {
        /// The stored matrix agrees with a fresh BFS in both directions
        #[test]
        fn matches_bfs(adjacency in graph()) {
            let matrix = CostMatrix::build(&adjacency);
            for a in 0..adjacency.len() {
                let hops = adjacency.hops_from(RouteIdx(a as u32));
                for (b, &h) in hops.iter().enumerate() {
                    let expected = InterchangeCost::from_raw(h);
                    prop_assert_eq!(matrix.get(RouteIdx(a as u32), RouteIdx(b as u32)), expected);
                    prop_assert_eq!(matrix.get(RouteIdx(b as u32), RouteIdx(a as u32)), expected);
                }
            }
        }

        /// Adjacent routes always cost exactly one change
        #[test]
        fn neighbours_cost_one(adjacency in graph()) {
            let matrix = CostMatrix::build(&adjacency);
            for a in 0..adjacency.len() {
                for &b in adjacency.neighbours(RouteIdx(a as u32)) {
                    prop_assert_eq!(matrix.get(RouteIdx(a as u32), RouteIdx(b)), InterchangeCost::Hops(1));
                }
            }
        }
    }
}

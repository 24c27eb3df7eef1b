//! Graph Laplacian construction, dense and sparse.
//!
//! Builds `L = D - A` from an [`EdgeList`]: each edge `(u, v)` subtracts
//! one from the off-diagonal entries `(u, v)` and `(v, u)` and adds one to
//! the degree diagonal of both endpoints. The same additive accumulation
//! runs in both representations, so a duplicate edge raises the edge
//! multiplicity instead of being silently dropped, and the two
//! representations agree entrywise for any input.
//!
//! Self-loops are ignored entirely: they contribute neither degree nor
//! off-diagonal mass, keeping every row sum exactly zero.
//!
//! Dense construction materializes all N² entries and is guarded by a
//! node-count limit; sparse construction accumulates coordinate triplets
//! concurrently and finalizes them into CSR.

use std::time::Instant;

use dashmap::DashMap;
use log::{debug, info, trace};
use nalgebra::DMatrix;
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use crate::graph::EdgeList;
use crate::{Error, Result};

/// Node count above which a dense Laplacian is refused.
pub const DEFAULT_MAX_DENSE_NODES: usize = 500;

/// How the Laplacian is materialized. Exactly one representation is built
/// per run; the two are numerically equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Representation {
    Dense,
    Sparse,
}

impl Representation {
    /// Size-based dispatch policy: dense up to `dense_threshold` nodes,
    /// sparse above it.
    pub fn auto(node_count: usize, dense_threshold: usize) -> Self {
        if node_count <= dense_threshold {
            Representation::Dense
        } else {
            Representation::Sparse
        }
    }
}

/// Symmetric graph Laplacian in one of two representations.
#[derive(Debug, Clone)]
pub enum Laplacian {
    Dense(DMatrix<f64>),
    Sparse(CsMat<f64>),
}

impl Laplacian {
    /// Build the Laplacian for `edges` in the requested representation.
    ///
    /// `max_dense_nodes` guards the dense path: asking for a dense matrix
    /// above that node count returns [`Error::SizeExceeded`] before any
    /// allocation, and the caller may rebuild with
    /// [`Representation::Sparse`].
    pub fn build(
        edges: &EdgeList,
        representation: Representation,
        max_dense_nodes: usize,
    ) -> Result<Self> {
        let n = edges.node_count();
        info!(
            "building {:?} Laplacian: {} nodes, {} edges",
            representation,
            n,
            edges.edge_count()
        );

        match representation {
            Representation::Dense => {
                if n > max_dense_nodes {
                    return Err(Error::SizeExceeded {
                        nodes: n,
                        limit: max_dense_nodes,
                    });
                }
                Ok(Laplacian::Dense(build_dense(edges, n)))
            }
            Representation::Sparse => Ok(Laplacian::Sparse(build_sparse(edges, n))),
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            Laplacian::Dense(_) => Representation::Dense,
            Laplacian::Sparse(_) => Representation::Sparse,
        }
    }

    /// Matrix dimension (number of nodes).
    pub fn node_count(&self) -> usize {
        match self {
            Laplacian::Dense(m) => m.nrows(),
            Laplacian::Sparse(m) => m.rows(),
        }
    }

    /// Entry at `(i, j)`; absent sparse entries read as zero.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self {
            Laplacian::Dense(m) => m[(i, j)],
            Laplacian::Sparse(m) => m.get(i, j).copied().unwrap_or(0.0),
        }
    }

    /// Diagonal entries, i.e. accumulated node degrees.
    pub fn degrees(&self) -> Vec<f64> {
        (0..self.node_count()).map(|i| self.get(i, i)).collect()
    }

    /// `y = L * x`, the only operation the iterative eigensolver needs.
    pub fn multiply_vector(&self, x: &[f64], y: &mut [f64]) {
        let n = self.node_count();
        assert_eq!(x.len(), n, "vector length {} != node count {}", x.len(), n);
        assert_eq!(y.len(), n, "output length {} != node count {}", y.len(), n);

        match self {
            Laplacian::Dense(m) => {
                for (i, yi) in y.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for (j, &xj) in x.iter().enumerate() {
                        sum += m[(i, j)] * xj;
                    }
                    *yi = sum;
                }
            }
            Laplacian::Sparse(m) => {
                for (row_idx, row) in m.outer_iterator().enumerate() {
                    let mut sum = 0.0;
                    for (col_idx, &val) in row.iter() {
                        sum += val * x[col_idx];
                    }
                    y[row_idx] = sum;
                }
            }
        }
    }

    /// Largest absolute row sum. Zero (up to rounding) for any valid
    /// Laplacian.
    pub fn max_row_sum_error(&self) -> f64 {
        let n = self.node_count();
        let mut max_err: f64 = 0.0;
        match self {
            Laplacian::Dense(m) => {
                for i in 0..n {
                    let sum: f64 = (0..n).map(|j| m[(i, j)]).sum();
                    max_err = max_err.max(sum.abs());
                }
            }
            Laplacian::Sparse(m) => {
                for row in m.outer_iterator() {
                    let sum: f64 = row.iter().map(|(_, &v)| v).sum();
                    max_err = max_err.max(sum.abs());
                }
            }
        }
        max_err
    }

    /// Check symmetry within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.node_count();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.get(i, j) - self.get(j, i)).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Number of stored entries (all N² for the dense representation).
    pub fn nnz(&self) -> usize {
        match self {
            Laplacian::Dense(m) => m.nrows() * m.ncols(),
            Laplacian::Sparse(m) => m.nnz(),
        }
    }
}

fn build_dense(edges: &EdgeList, n: usize) -> DMatrix<f64> {
    let start = Instant::now();
    let mut l = DMatrix::<f64>::zeros(n, n);

    for &(u, v) in edges.edges() {
        if u == v {
            trace!("ignoring self-loop at node {}", u);
            continue;
        }
        l[(u, v)] -= 1.0;
        l[(v, u)] -= 1.0;
        l[(u, u)] += 1.0;
        l[(v, v)] += 1.0;
    }

    debug!("dense Laplacian {}x{} built in {:?}", n, n, start.elapsed());
    l
}

fn build_sparse(edges: &EdgeList, n: usize) -> CsMat<f64> {
    let start = Instant::now();

    // Concurrent triplet accumulation; duplicate coordinates sum instead
    // of overwriting, so repeated edges raise multiplicity.
    let triplet_map: DashMap<(usize, usize), f64> =
        DashMap::with_capacity(edges.edge_count() * 2 + n);

    edges.edges().par_iter().for_each(|&(u, v)| {
        if u == v {
            return;
        }
        for (key, delta) in [
            ((u, v), -1.0),
            ((v, u), -1.0),
            ((u, u), 1.0),
            ((v, v), 1.0),
        ] {
            *triplet_map.entry(key).or_insert(0.0) += delta;
        }
    });

    trace!(
        "triplet accumulation done: {} cells in {:?}",
        triplet_map.len(),
        start.elapsed()
    );

    // Sort by (row, col) for cache-friendly insertion order.
    let mut triplets: Vec<((usize, usize), f64)> = triplet_map.into_iter().collect();
    triplets.par_sort_unstable_by_key(|&((i, j), _)| (i, j));

    let mut trimat = TriMat::with_capacity((n, n), triplets.len());
    for ((i, j), val) in triplets {
        trimat.add_triplet(i, j, val);
    }

    let matrix = trimat.to_csr();
    info!(
        "sparse Laplacian {}x{} with {} non-zeros built in {:?}",
        n,
        n,
        matrix.nnz(),
        start.elapsed()
    );
    matrix
}

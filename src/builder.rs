//! Pipeline configuration and end-to-end embedding runs.
//!
//! `EmbeddingBuilder` holds every knob of the pipeline with documented
//! defaults and runs the stages in order: Laplacian construction with
//! size-based representation dispatch, eigendecomposition, eigenvector
//! extraction, and optionally file I/O on both ends.

use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::embedding::{extract, Embedding};
use crate::graph::EdgeList;
use crate::laplacian::{Laplacian, Representation, DEFAULT_MAX_DENSE_NODES};
use crate::solver::{decompose, SolverOptions, SortRule};
use crate::storage::write_embedding;
use crate::Result;

/// Configurable spectral embedding pipeline.
///
/// Defaults: 2 embedding dimensions, smallest-algebraic eigenvalues with
/// the trivial constant eigenvector skipped, dense decomposition up to
/// 500 nodes and iterative above.
#[derive(Debug, Clone)]
pub struct EmbeddingBuilder {
    dims: usize,
    sort_rule: SortRule,
    skip_trivial: bool,
    dense_threshold: usize,
    max_dense_nodes: usize,
    requested_pairs: Option<usize>,
    solver: SolverOptions,
}

impl Default for EmbeddingBuilder {
    fn default() -> Self {
        Self {
            dims: 2,
            sort_rule: SortRule::SmallestAlgebraic,
            skip_trivial: true,
            dense_threshold: DEFAULT_MAX_DENSE_NODES,
            max_dense_nodes: DEFAULT_MAX_DENSE_NODES,
            requested_pairs: None,
            solver: SolverOptions::default(),
        }
    }
}

impl EmbeddingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embedding dimensionality (default 2).
    pub fn with_dims(mut self, dims: usize) -> Self {
        debug!("builder: dims={}", dims);
        self.dims = dims;
        self
    }

    /// Which end of the spectrum to embed from.
    pub fn with_sort_rule(mut self, rule: SortRule) -> Self {
        debug!("builder: sort_rule={:?}", rule);
        self.sort_rule = rule;
        self
    }

    /// Skip the first eigenvector of the selected order (default true).
    pub fn with_skip_trivial(mut self, skip: bool) -> Self {
        debug!("builder: skip_trivial={}", skip);
        self.skip_trivial = skip;
        self
    }

    /// Node count up to which the exact dense path is used (default 500).
    pub fn with_dense_threshold(mut self, threshold: usize) -> Self {
        debug!("builder: dense_threshold={}", threshold);
        self.dense_threshold = threshold;
        self
    }

    /// Hard guard against dense allocation (default 500). Raising the
    /// dispatch threshold above this without raising the guard makes the
    /// dense path fail with `SizeExceeded` instead of allocating.
    pub fn with_max_dense_nodes(mut self, limit: usize) -> Self {
        debug!("builder: max_dense_nodes={}", limit);
        self.max_dense_nodes = limit;
        self
    }

    /// Override the number of eigenpairs requested from the solver
    /// (default: `dims` plus one when the trivial vector is skipped).
    pub fn with_requested_pairs(mut self, k: usize) -> Self {
        debug!("builder: requested_pairs={}", k);
        self.requested_pairs = Some(k);
        self
    }

    /// Subspace dimension for the iterative path.
    pub fn with_ncv(mut self, ncv: usize) -> Self {
        debug!("builder: ncv={}", ncv);
        self.solver.ncv = Some(ncv);
        self
    }

    /// Residual tolerance for the iterative path.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        debug!("builder: tolerance={:.3e}", tolerance);
        self.solver.tolerance = tolerance;
        self
    }

    /// Restart budget for the iterative path.
    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        debug!("builder: max_restarts={}", max_restarts);
        self.solver.max_restarts = max_restarts;
        self
    }

    /// Wall-clock bound for the iterative path.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        debug!("builder: timeout={:?}", timeout);
        self.solver.timeout = Some(timeout);
        self
    }

    /// Allow one automatic retry with a doubled subspace (default true).
    pub fn with_retry_larger_ncv(mut self, retry: bool) -> Self {
        debug!("builder: retry_larger_ncv={}", retry);
        self.solver.retry_larger_ncv = retry;
        self
    }

    /// Number of eigenpairs the solver is asked for.
    pub fn requested(&self) -> usize {
        self.requested_pairs
            .unwrap_or(self.dims + usize::from(self.skip_trivial))
    }

    /// Run Laplacian → decomposition → extraction on a loaded edge list.
    ///
    /// # Examples
    ///
    /// ```
    /// use lapmap::{EdgeList, EmbeddingBuilder};
    ///
    /// let edges = EdgeList::from_pairs(vec![(0, 1), (1, 2)]);
    /// let embedding = EmbeddingBuilder::new().with_dims(1).embed(&edges).unwrap();
    /// assert_eq!(embedding.node_count(), 3);
    /// assert_eq!(embedding.dims(), 1);
    /// ```
    pub fn embed(&self, edges: &EdgeList) -> Result<Embedding> {
        let n = edges.node_count();
        if n == 0 {
            info!("empty graph, emitting empty embedding");
            return Ok(Embedding::empty(self.dims));
        }

        let representation = Representation::auto(n, self.dense_threshold);
        let laplacian = Laplacian::build(edges, representation, self.max_dense_nodes)?;

        let k = self.requested();
        let pairs = decompose(&laplacian, k, self.sort_rule, &self.solver)?;
        extract(&pairs, self.skip_trivial, self.dims)
    }

    /// Full pipeline: load an edge list, embed, write the coordinates.
    pub fn embed_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<Embedding> {
        let edges = EdgeList::load(input)?;
        let embedding = self.embed(&edges)?;
        write_embedding(&embedding, output)?;
        Ok(embedding)
    }
}

//! Eigensolver dispatch: exact dense decomposition or iterative Lanczos.
//!
//! [`decompose`] is the single entry point. A dense Laplacian gets a full
//! symmetric eigendecomposition and the requested pairs are selected by
//! sorting the complete spectrum; a sparse Laplacian goes to the
//! matrix-free Lanczos solver with an ARPACK-style subspace parameter
//! `ncv > k` (default `min(2k + 1, n)`). The solver's reported
//! convergence count is always checked: a shortfall surfaces as
//! [`DecompositionFailure::NotConverged`] instead of quietly returning
//! fewer pairs.
//!
//! # Non-determinism
//!
//! Eigenvector signs are solver-dependent; callers must not assume a
//! canonical orientation. For degenerate eigenvalues (a graph with `c`
//! connected components has eigenvalue 0 with multiplicity `c`) the
//! returned basis of the eigenspace and its internal order are also
//! solver-dependent.

use std::time::Duration;

use log::{debug, info, warn};
use nalgebra::SymmetricEigen;
use serde::{Deserialize, Serialize};

use crate::lanczos::{lanczos, Extreme, LanczosOptions};
use crate::laplacian::Laplacian;
use crate::{DecompositionFailure, Error, Result};

/// Selection rule for the requested end of the spectrum.
///
/// Eigenvalues come back ascending for the `Smallest*` rules and
/// descending for `LargestAlgebraic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortRule {
    SmallestMagnitude,
    SmallestAlgebraic,
    LargestAlgebraic,
}

impl std::str::FromStr for SortRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "smallest-magnitude" => Ok(SortRule::SmallestMagnitude),
            "smallest" | "smallest-algebraic" => Ok(SortRule::SmallestAlgebraic),
            "largest" | "largest-algebraic" => Ok(SortRule::LargestAlgebraic),
            other => Err(format!(
                "unknown sort rule '{}': expected smallest-magnitude, smallest or largest",
                other
            )),
        }
    }
}

/// One eigenvalue with its unit-normalized eigenvector.
#[derive(Debug, Clone)]
pub struct Eigenpair {
    pub value: f64,
    pub vector: Vec<f64>,
}

/// Knobs for the iterative path. The dense path ignores everything here.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Subspace dimension; `None` selects `min(2k + 1, n)`.
    pub ncv: Option<usize>,
    /// Relative residual tolerance for Ritz-pair acceptance.
    pub tolerance: f64,
    /// Restart-cycle budget for one Lanczos run.
    pub max_restarts: usize,
    /// Wall-clock bound; exceeded runs fail with `Timeout` instead of
    /// iterating indefinitely on pathological inputs.
    pub timeout: Option<Duration>,
    /// Retry once with a doubled subspace when the first run converges
    /// fewer than `k` pairs. This is the only automatic retry.
    pub retry_larger_ncv: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            ncv: None,
            tolerance: 1e-10,
            max_restarts: 500,
            timeout: None,
            retry_larger_ncv: true,
        }
    }
}

/// Compute `k` eigenpairs of the Laplacian under `rule`.
///
/// An empty matrix or `k == 0` yields an empty set, the valid degenerate
/// outcome for an empty input graph. On the sparse path `k` must satisfy
/// `k < n`; the dense path serves any `k <= n`.
pub fn decompose(
    laplacian: &Laplacian,
    k: usize,
    rule: SortRule,
    options: &SolverOptions,
) -> Result<Vec<Eigenpair>> {
    let n = laplacian.node_count();
    if n == 0 || k == 0 {
        debug!("degenerate decomposition request (n={}, k={})", n, k);
        return Ok(Vec::new());
    }

    match laplacian {
        Laplacian::Dense(matrix) => {
            if k > n {
                return Err(Error::InvalidRequest(format!(
                    "requested {} eigenpairs from a {}x{} matrix",
                    k, n, n
                )));
            }
            info!("dense decomposition: n={}, k={}, rule={:?}", n, k, rule);
            Ok(dense_eigenpairs(matrix, k, rule))
        }
        Laplacian::Sparse(_) => {
            if k >= n {
                return Err(Error::InvalidRequest(format!(
                    "iterative solver requires k < n (k={}, n={}); build dense instead",
                    k, n
                )));
            }
            sparse_eigenpairs(laplacian, k, rule, options)
        }
    }
}

/// Full spectrum, sorted by rule, first `k` selected.
fn dense_eigenpairs(matrix: &nalgebra::DMatrix<f64>, k: usize, rule: SortRule) -> Vec<Eigenpair> {
    let eigen = SymmetricEigen::new(matrix.clone());
    let n = eigen.eigenvalues.len();

    let mut order: Vec<usize> = (0..n).collect();
    sort_by_rule(&mut order, &|i| eigen.eigenvalues[i], rule);

    order
        .into_iter()
        .take(k)
        .map(|i| {
            let mut vector: Vec<f64> = eigen.eigenvectors.column(i).iter().copied().collect();
            normalize_in_place(&mut vector);
            Eigenpair {
                value: eigen.eigenvalues[i],
                vector,
            }
        })
        .collect()
}

fn sparse_eigenpairs(
    laplacian: &Laplacian,
    k: usize,
    rule: SortRule,
    options: &SolverOptions,
) -> Result<Vec<Eigenpair>> {
    let n = laplacian.node_count();
    let ncv = options.ncv.unwrap_or((2 * k + 1).min(n)).clamp(k + 1, n);
    info!(
        "iterative decomposition: n={}, k={}, ncv={}, rule={:?}",
        n, k, ncv, rule
    );

    let which = match rule {
        // The Laplacian is positive semi-definite, so the smallest
        // algebraic and smallest magnitude eigenvalues coincide.
        SortRule::SmallestMagnitude | SortRule::SmallestAlgebraic => Extreme::Smallest,
        SortRule::LargestAlgebraic => Extreme::Largest,
    };

    let run = |ncv: usize| {
        let opts = LanczosOptions {
            k,
            ncv,
            tolerance: options.tolerance,
            max_restarts: options.max_restarts,
            timeout: options.timeout,
        };
        lanczos(
            n,
            |x: &[f64], y: &mut [f64]| laplacian.multiply_vector(x, y),
            which,
            &opts,
        )
    };

    let mut outcome = run(ncv)?;
    if outcome.converged < k && options.retry_larger_ncv {
        let wider = (2 * ncv + 1).min(n);
        if wider > ncv {
            warn!(
                "lanczos converged {} of {} pairs at ncv={}, retrying once at ncv={}",
                outcome.converged, k, ncv, wider
            );
            outcome = run(wider)?;
        }
    }
    if outcome.converged < k {
        return Err(Error::Decomposition(DecompositionFailure::NotConverged {
            requested: k,
            converged: outcome.converged,
        }));
    }

    let pairs: Vec<Eigenpair> = outcome
        .eigenvalues
        .into_iter()
        .zip(outcome.eigenvectors)
        .map(|(value, vector)| Eigenpair { value, vector })
        .collect();

    // Locking already yields the requested extreme first; re-sorting only
    // matters for SmallestMagnitude where rounding may produce -epsilon
    // values, and costs nothing for the others.
    let mut order: Vec<usize> = (0..pairs.len()).collect();
    sort_by_rule(&mut order, &|i| pairs[i].value, rule);
    let mut sorted: Vec<Eigenpair> = order.into_iter().map(|i| pairs[i].clone()).collect();
    sorted.truncate(k);
    Ok(sorted)
}

fn sort_by_rule(order: &mut [usize], value_at: &dyn Fn(usize) -> f64, rule: SortRule) {
    match rule {
        SortRule::SmallestMagnitude => order.sort_by(|&a, &b| {
            value_at(a)
                .abs()
                .partial_cmp(&value_at(b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortRule::SmallestAlgebraic => order.sort_by(|&a, &b| {
            value_at(a)
                .partial_cmp(&value_at(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortRule::LargestAlgebraic => order.sort_by(|&a, &b| {
            value_at(b)
                .partial_cmp(&value_at(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}

fn normalize_in_place(v: &mut [f64]) {
    let nrm: f64 = v.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if nrm > 1e-12 {
        for x in v.iter_mut() {
            *x /= nrm;
        }
    }
}

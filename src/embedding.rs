//! Eigenvector selection and slicing into node coordinates.
//!
//! For a smallest-eigenvalue embedding of a connected graph the first
//! eigenvector is the constant vector for eigenvalue 0 and carries no
//! discriminative information; `skip_trivial` drops it so the Fiedler
//! vector becomes the first coordinate axis. Whether the analogous skip
//! is right for a largest-eigenvalue embedding depends on the operator,
//! so it stays a caller decision rather than a hardcoded offset — the
//! same flag applies to whichever end of the spectrum was requested.

use log::{debug, info};

use crate::solver::Eigenpair;
use crate::{Error, Result};

/// Low-dimensional node coordinates, one row per node in internal index
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    coords: Vec<Vec<f64>>,
    dims: usize,
}

impl Embedding {
    pub fn new(coords: Vec<Vec<f64>>, dims: usize) -> Self {
        debug_assert!(coords.iter().all(|row| row.len() == dims));
        Self { coords, dims }
    }

    /// Embedding with no nodes, the degenerate outcome for an empty graph.
    pub fn empty(dims: usize) -> Self {
        Self {
            coords: Vec::new(),
            dims,
        }
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates of node `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.coords[i]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.coords
    }
}

/// Slice `dims` eigenvectors out of an ordered eigenpair set.
///
/// With `skip_trivial` the window is positions `[1, 1 + dims)` of the
/// given order, otherwise `[0, dims)`. Coordinate `d` of node `i` is
/// entry `i` of the eigenvector at window position `d`.
///
/// An empty eigenpair set produces an empty embedding (no graph, no
/// coordinates); a non-empty set that is too short for the window is an
/// [`Error::InsufficientSpectrum`].
pub fn extract(eigenpairs: &[Eigenpair], skip_trivial: bool, dims: usize) -> Result<Embedding> {
    if eigenpairs.is_empty() {
        info!("empty eigenpair set, emitting empty embedding");
        return Ok(Embedding::empty(dims));
    }

    let start = usize::from(skip_trivial);
    let needed = start + dims;
    if eigenpairs.len() < needed {
        return Err(Error::InsufficientSpectrum {
            available: eigenpairs.len(),
            requested: needed,
        });
    }

    let n = eigenpairs[start].vector.len();
    debug!(
        "extracting embedding: {} nodes, dims={}, skip_trivial={}, window=[{}, {})",
        n, dims, skip_trivial, start, needed
    );

    let window = &eigenpairs[start..needed];
    let coords: Vec<Vec<f64>> = (0..n)
        .map(|i| window.iter().map(|pair| pair.vector[i]).collect())
        .collect();

    Ok(Embedding::new(coords, dims))
}

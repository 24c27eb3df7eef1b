//! Spectral graph embedding pipeline.
//!
//! `lapmap` turns an undirected edge list into low-dimensional node
//! coordinates by way of the graph Laplacian spectrum:
//!
//! 1. load an edge list into a compact node index space ([`graph`])
//! 2. build a dense or sparse Laplacian `L = D - A` ([`laplacian`])
//! 3. compute a few extremal eigenpairs, exactly for small graphs and via
//!    a matrix-free Lanczos iteration for large ones ([`solver`])
//! 4. slice the selected eigenvectors into per-node coordinates
//!    ([`embedding`])
//! 5. serialize the coordinates to a plain-text file ([`storage`])
//!
//! The [`builder::EmbeddingBuilder`] wires the stages together behind a
//! configurable front door:
//!
//! ```ignore
//! use lapmap::EmbeddingBuilder;
//!
//! let embedding = EmbeddingBuilder::new()
//!     .with_dims(2)
//!     .embed_file("graph.txt", "embedding.txt")?;
//! ```
//!
//! Every stage owns its output exclusively until it hands it to the next
//! one; the pipeline is synchronous end-to-end and no stage shares mutable
//! state with another.

use std::fmt;
use std::time::Duration;

pub mod builder;
pub mod embedding;
pub mod generate;
pub mod graph;
pub mod lanczos;
pub mod laplacian;
pub mod solver;
pub mod storage;

#[cfg(test)]
mod tests;

pub use builder::EmbeddingBuilder;
pub use embedding::{extract, Embedding};
pub use generate::generate_connected_graph;
pub use graph::{EdgeList, NodeIndexMap};
pub use laplacian::{Laplacian, Representation};
pub use solver::{decompose, Eigenpair, SolverOptions, SortRule};

// ============================================================================
// Error Types
// ============================================================================

/// Reason an iterative decomposition gave up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecompositionFailure {
    /// Fewer than the requested number of eigenpairs converged.
    NotConverged { requested: usize, converged: usize },
    /// The configured wall-clock bound was exceeded.
    Timeout { elapsed: Duration },
}

#[derive(Debug)]
pub enum Error {
    /// File open/read/write failure. Fatal for the current run.
    Io(std::io::Error),
    /// A dense Laplacian was requested above the memory guard.
    /// Recoverable by rebuilding with [`Representation::Sparse`].
    SizeExceeded { nodes: usize, limit: usize },
    /// The eigensolver did not produce the requested eigenpairs.
    Decomposition(DecompositionFailure),
    /// The converged spectrum is too small for the requested extraction.
    InsufficientSpectrum { available: usize, requested: usize },
    /// A parameter combination the pipeline cannot serve.
    InvalidRequest(String),
    /// A machine-written file failed strict parsing.
    Parse { line: usize, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::SizeExceeded { nodes, limit } => write!(
                f,
                "dense Laplacian refused: {} nodes exceeds guard of {}",
                nodes, limit
            ),
            Error::Decomposition(DecompositionFailure::NotConverged {
                requested,
                converged,
            }) => write!(
                f,
                "eigensolver converged {} of {} requested eigenpairs",
                converged, requested
            ),
            Error::Decomposition(DecompositionFailure::Timeout { elapsed }) => {
                write!(f, "eigensolver exceeded time bound after {:?}", elapsed)
            }
            Error::InsufficientSpectrum {
                available,
                requested,
            } => write!(
                f,
                "extraction needs {} eigenvectors but only {} are available",
                requested, available
            ),
            Error::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            Error::Parse { line, message } => {
                write!(f, "parse error at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

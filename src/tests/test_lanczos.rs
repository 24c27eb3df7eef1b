//! Direct exercises of the matrix-free Lanczos solver.

use std::time::Duration;

use log::info;

use crate::lanczos::{lanczos, Extreme, LanczosOptions};
use crate::laplacian::{Laplacian, Representation, DEFAULT_MAX_DENSE_NODES};
use crate::tests::init;
use crate::tests::test_data::{complete_graph, path_eigenvalue, path_graph};
use crate::{DecompositionFailure, Error};

fn sparse_matvec(lap: &Laplacian) -> impl Fn(&[f64], &mut [f64]) + '_ {
    move |x: &[f64], y: &mut [f64]| lap.multiply_vector(x, y)
}

fn options(k: usize, ncv: usize) -> LanczosOptions {
    LanczosOptions {
        k,
        ncv,
        tolerance: 1e-10,
        max_restarts: 500,
        timeout: None,
    }
}

#[test]
fn test_smallest_eigenvalues_of_path_graph() {
    init();
    let edges = path_graph(12);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let outcome = lanczos(12, sparse_matvec(&lap), Extreme::Smallest, &options(4, 9)).unwrap();
    assert_eq!(outcome.converged, 4);
    for (j, &value) in outcome.eigenvalues.iter().enumerate() {
        assert!(
            (value - path_eigenvalue(12, j)).abs() < 1e-8,
            "eigenvalue {}: {} vs analytic {}",
            j,
            value,
            path_eigenvalue(12, j)
        );
    }
    info!("converged in {} cycles", outcome.cycles);
}

#[test]
fn test_largest_eigenvalues_of_path_graph() {
    init();
    let edges = path_graph(12);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let outcome = lanczos(12, sparse_matvec(&lap), Extreme::Largest, &options(2, 7)).unwrap();
    assert_eq!(outcome.converged, 2);
    assert!((outcome.eigenvalues[0] - path_eigenvalue(12, 11)).abs() < 1e-8);
    assert!((outcome.eigenvalues[1] - path_eigenvalue(12, 10)).abs() < 1e-8);
}

#[test]
fn test_ritz_vectors_satisfy_eigen_equation() {
    init();
    let edges = path_graph(15);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let outcome = lanczos(15, sparse_matvec(&lap), Extreme::Smallest, &options(3, 7)).unwrap();
    for (value, vector) in outcome.eigenvalues.iter().zip(&outcome.eigenvectors) {
        let mut lx = vec![0.0; 15];
        lap.multiply_vector(vector, &mut lx);
        let residual: f64 = lx
            .iter()
            .zip(vector.iter())
            .map(|(&ax, &x)| (ax - value * x).powi(2))
            .sum::<f64>()
            .sqrt();
        assert!(
            residual < 1e-7,
            "||L v - {} v|| = {} exceeds tolerance",
            value,
            residual
        );
    }
}

#[test]
fn test_locked_vectors_are_orthonormal() {
    init();
    let edges = path_graph(20);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let outcome = lanczos(20, sparse_matvec(&lap), Extreme::Smallest, &options(4, 9)).unwrap();
    for i in 0..outcome.eigenvectors.len() {
        for j in i..outcome.eigenvectors.len() {
            let dot: f64 = outcome.eigenvectors[i]
                .iter()
                .zip(outcome.eigenvectors[j].iter())
                .map(|(&a, &b)| a * b)
                .sum();
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(
                (dot - expected).abs() < 1e-8,
                "<v{}, v{}> = {}",
                i,
                j,
                dot
            );
        }
    }
}

#[test]
fn test_breakdown_on_degenerate_spectrum() {
    init();
    // K5 has eigenvalues {0, 5, 5, 5, 5}: any Krylov space collapses after
    // two steps, exercising the invariant-subspace path and deflation.
    let edges = complete_graph(5);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let outcome = lanczos(5, sparse_matvec(&lap), Extreme::Smallest, &options(3, 4)).unwrap();
    assert_eq!(outcome.converged, 3);
    assert!(outcome.eigenvalues[0].abs() < 1e-8);
    assert!((outcome.eigenvalues[1] - 5.0).abs() < 1e-8);
    assert!((outcome.eigenvalues[2] - 5.0).abs() < 1e-8);
}

#[test]
fn test_invalid_subspace_parameters_are_rejected() {
    init();
    let edges = path_graph(6);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    // ncv must exceed k
    let result = lanczos(6, sparse_matvec(&lap), Extreme::Smallest, &options(3, 3));
    assert!(matches!(result, Err(Error::InvalidRequest(_))));

    // k must be below the dimension
    let result = lanczos(6, sparse_matvec(&lap), Extreme::Smallest, &options(6, 7));
    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[test]
fn test_zero_requests_short_circuit() {
    init();
    let outcome = lanczos(
        0,
        |_x: &[f64], _y: &mut [f64]| {},
        Extreme::Smallest,
        &options(0, 1),
    )
    .unwrap();
    assert_eq!(outcome.converged, 0);
    assert!(outcome.eigenvalues.is_empty());
}

#[test]
fn test_timeout_is_reported() {
    init();
    let edges = path_graph(200);
    let lap = Laplacian::build(&edges, Representation::Sparse, DEFAULT_MAX_DENSE_NODES).unwrap();

    let opts = LanczosOptions {
        k: 3,
        ncv: 7,
        tolerance: 1e-14,
        max_restarts: 100_000,
        timeout: Some(Duration::ZERO),
    };
    let result = lanczos(200, sparse_matvec(&lap), Extreme::Smallest, &opts);
    assert!(matches!(
        result,
        Err(Error::Decomposition(DecompositionFailure::Timeout { .. }))
    ));
}

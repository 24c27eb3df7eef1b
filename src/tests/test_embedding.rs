//! Eigenvector-to-coordinate extraction.

use crate::embedding::{extract, Embedding};
use crate::solver::Eigenpair;
use crate::tests::init;
use crate::Error;

fn synthetic_pairs() -> Vec<Eigenpair> {
    // Values and vectors chosen so every position is distinguishable.
    vec![
        Eigenpair {
            value: 0.0,
            vector: vec![0.5, 0.5, 0.5, 0.5],
        },
        Eigenpair {
            value: 1.0,
            vector: vec![1.0, 2.0, 3.0, 4.0],
        },
        Eigenpair {
            value: 2.0,
            vector: vec![-1.0, -2.0, -3.0, -4.0],
        },
        Eigenpair {
            value: 3.0,
            vector: vec![9.0, 8.0, 7.0, 6.0],
        },
    ]
}

#[test]
fn test_skip_trivial_starts_at_position_one() {
    init();
    let embedding = extract(&synthetic_pairs(), true, 2).unwrap();
    assert_eq!(embedding.node_count(), 4);
    assert_eq!(embedding.dims(), 2);
    // Node i gets (vector[1][i], vector[2][i]).
    assert_eq!(embedding.row(0), &[1.0, -1.0]);
    assert_eq!(embedding.row(3), &[4.0, -4.0]);
}

#[test]
fn test_keep_trivial_starts_at_position_zero() {
    init();
    let embedding = extract(&synthetic_pairs(), false, 2).unwrap();
    assert_eq!(embedding.row(0), &[0.5, 1.0]);
    assert_eq!(embedding.row(2), &[0.5, 3.0]);
}

#[test]
fn test_three_dimensional_window() {
    init();
    let embedding = extract(&synthetic_pairs(), true, 3).unwrap();
    assert_eq!(embedding.dims(), 3);
    assert_eq!(embedding.row(1), &[2.0, -2.0, 8.0]);
}

#[test]
fn test_insufficient_spectrum_is_typed_error() {
    init();
    let pairs = synthetic_pairs();
    let result = extract(&pairs[..2], true, 2);
    match result {
        Err(Error::InsufficientSpectrum {
            available,
            requested,
        }) => {
            assert_eq!(available, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("expected InsufficientSpectrum, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_empty_eigenpairs_yield_empty_embedding() {
    init();
    let embedding = extract(&[], true, 2).unwrap();
    assert!(embedding.is_empty());
    assert_eq!(embedding.node_count(), 0);
    assert_eq!(embedding.dims(), 2);
}

#[test]
fn test_empty_constructor_matches_extract_degenerate_case() {
    init();
    assert_eq!(extract(&[], false, 3).unwrap(), Embedding::empty(3));
}

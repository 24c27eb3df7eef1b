//! Random connected graph generation for benchmarks and tests.
//!
//! Nodes `0..n` are first joined into a path so the result is connected
//! by construction, then distinct random edges are added until the edge
//! count reaches `⌈n · avg_degree / 2⌉`. No self-loops, no duplicate
//! edges. A fixed seed reproduces the same graph.

use std::collections::HashSet;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::graph::EdgeList;

/// Generate a connected undirected graph on `n_nodes` nodes with the
/// requested average degree.
///
/// Fewer than two nodes yield an empty edge list. The target edge count
/// is capped at the complete graph.
pub fn generate_connected_graph(n_nodes: usize, avg_degree: f64, seed: Option<u64>) -> EdgeList {
    if n_nodes < 2 {
        debug!("generation request for {} nodes, nothing to connect", n_nodes);
        return EdgeList::default();
    }

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(
        "generating connected graph: {} nodes, avg degree {:.2}, seed {}",
        n_nodes, avg_degree, seed
    );

    let mut edges: HashSet<(usize, usize)> = HashSet::new();

    // Path backbone guarantees connectivity.
    for i in 0..n_nodes - 1 {
        edges.insert((i, i + 1));
    }

    let complete = n_nodes * (n_nodes - 1) / 2;
    let target = ((avg_degree * n_nodes as f64) / 2.0).ceil() as usize;
    let target = target.max(edges.len()).min(complete);

    while edges.len() < target {
        let u = rng.gen_range(0..n_nodes);
        let v = rng.gen_range(0..n_nodes);
        if u == v {
            continue;
        }
        let edge = (u.min(v), u.max(v));
        edges.insert(edge);
    }

    let mut pairs: Vec<(i64, i64)> = edges
        .into_iter()
        .map(|(u, v)| (u as i64, v as i64))
        .collect();
    // HashSet order is nondeterministic across runs even with a fixed
    // seed; sort so the output is reproducible.
    pairs.sort_unstable();

    debug!("generated {} edges", pairs.len());
    EdgeList::from_pairs(pairs)
}

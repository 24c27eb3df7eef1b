//! Edge-list loading and the compact node index space.
//!
//! Raw node identifiers in an edge list are arbitrary integers, possibly
//! sparse and non-contiguous. Everything downstream (Laplacian rows,
//! eigenvector entries, embedding rows) works on dense zero-based indices,
//! so loading builds an explicit id→index dictionary once and the mapping
//! is immutable afterwards. The dictionary's cardinality is the node
//! count; external id magnitude never inflates matrix dimensions.
//!
//! # Input format
//!
//! One edge per line, two whitespace-separated integers. Parsing stops at
//! the first line that does not yield two integers; edges read up to that
//! point are kept. A file that cannot be opened is an error, an empty or
//! fully unparseable file is a valid degenerate graph (zero nodes, zero
//! edges).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::Result;

/// Bijective mapping between external node ids and internal indices.
///
/// Indices are assigned in first-seen order and are contiguous `[0, N)`.
#[derive(Debug, Clone, Default)]
pub struct NodeIndexMap {
    forward: HashMap<i64, usize>,
    ids: Vec<i64>,
}

impl NodeIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `id`, assigning the next free index on first sight.
    pub fn insert_or_get(&mut self, id: i64) -> usize {
        match self.forward.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.ids.len();
                self.forward.insert(id, idx);
                self.ids.push(id);
                idx
            }
        }
    }

    /// Internal index of an external id, if it was seen during loading.
    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.forward.get(&id).copied()
    }

    /// External id for an internal index.
    pub fn id_of(&self, index: usize) -> Option<i64> {
        self.ids.get(index).copied()
    }

    /// Number of distinct node ids seen.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// An undirected graph as a list of unordered index pairs.
///
/// Duplicate edges are retained as given; multiplicity is resolved by the
/// Laplacian builder (additively, in both representations).
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    edges: Vec<(usize, usize)>,
    nodes: NodeIndexMap,
}

impl EdgeList {
    /// Parse an edge list from any buffered reader.
    ///
    /// Stops at the first line that does not parse as two integers; this
    /// preserves the truncation policy of the upstream format and is
    /// logged rather than treated as failure. Tokens after the second on
    /// a line are ignored.
    pub fn parse<R: BufRead>(reader: R) -> Self {
        let mut nodes = NodeIndexMap::new();
        let mut edges = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("stopping edge-list read at line {}: {}", lineno + 1, e);
                    break;
                }
            };
            let mut fields = line.split_whitespace();
            let parsed = match (fields.next(), fields.next()) {
                (Some(a), Some(b)) => match (a.parse::<i64>(), b.parse::<i64>()) {
                    (Ok(u), Ok(v)) => Some((u, v)),
                    _ => None,
                },
                _ => None,
            };
            match parsed {
                Some((u, v)) => {
                    let ui = nodes.insert_or_get(u);
                    let vi = nodes.insert_or_get(v);
                    edges.push((ui, vi));
                }
                None => {
                    warn!(
                        "malformed edge at line {}, truncating input ({} edges kept)",
                        lineno + 1,
                        edges.len()
                    );
                    break;
                }
            }
        }

        debug!(
            "parsed edge list: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        EdgeList { edges, nodes }
    }

    /// Load an edge list from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("loading edge list from {}", path.display());
        let file = File::open(path)?;
        Ok(Self::parse(BufReader::new(file)))
    }

    /// Build an edge list directly from external id pairs.
    pub fn from_pairs<I: IntoIterator<Item = (i64, i64)>>(pairs: I) -> Self {
        let mut nodes = NodeIndexMap::new();
        let mut edges = Vec::new();
        for (u, v) in pairs {
            let ui = nodes.insert_or_get(u);
            let vi = nodes.insert_or_get(v);
            edges.push((ui, vi));
        }
        EdgeList { edges, nodes }
    }

    /// Number of distinct nodes, i.e. the dimension of the Laplacian.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes.is_empty()
    }

    /// Edges as internal index pairs.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn nodes(&self) -> &NodeIndexMap {
        &self.nodes
    }
}

//! Plain-text persistence for embeddings and edge lists.
//!
//! Coordinates are written one node per line, space-separated, in
//! scientific notation with 17 significant digits — enough to round-trip
//! an IEEE double exactly. Reading back is strict: these files are
//! machine-written, so a malformed line is an error here, unlike the
//! tolerant edge-list loader.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::embedding::Embedding;
use crate::graph::EdgeList;
use crate::{Error, Result};

/// Write an embedding to `path`, one line per node.
pub fn write_embedding<P: AsRef<Path>>(embedding: &Embedding, path: P) -> Result<()> {
    let path = path.as_ref();
    info!(
        "writing embedding ({} nodes, {} dims) to {}",
        embedding.node_count(),
        embedding.dims(),
        path.display()
    );
    let file = File::create(path)?;
    write_embedding_to(embedding, BufWriter::new(file))
}

/// Write an embedding to any sink.
pub fn write_embedding_to<W: Write>(embedding: &Embedding, mut sink: W) -> Result<()> {
    for row in embedding.rows() {
        let mut first = true;
        for &value in row {
            if first {
                first = false;
            } else {
                write!(sink, " ")?;
            }
            // 16 fractional digits in scientific notation: 17 significant
            // digits, exact f64 round-trip.
            write!(sink, "{:.16e}", value)?;
        }
        writeln!(sink)?;
    }
    sink.flush()?;
    Ok(())
}

/// Read an embedding previously written by [`write_embedding`].
pub fn read_embedding<P: AsRef<Path>>(path: P) -> Result<Embedding> {
    let path = path.as_ref();
    debug!("reading embedding from {}", path.display());
    let file = File::open(path)?;
    read_embedding_from(BufReader::new(file))
}

/// Strict parse of the embedding text format.
pub fn read_embedding_from<R: BufRead>(reader: R) -> Result<Embedding> {
    let mut coords: Vec<Vec<f64>> = Vec::new();
    let mut dims: Option<usize> = None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Vec<f64> = line
            .split_whitespace()
            .map(|field| {
                field.parse::<f64>().map_err(|e| Error::Parse {
                    line: lineno + 1,
                    message: format!("bad coordinate '{}': {}", field, e),
                })
            })
            .collect::<Result<_>>()?;

        match dims {
            None => dims = Some(row.len()),
            Some(d) if d != row.len() => {
                return Err(Error::Parse {
                    line: lineno + 1,
                    message: format!("expected {} coordinates, found {}", d, row.len()),
                });
            }
            Some(_) => {}
        }
        coords.push(row);
    }

    let dims = dims.unwrap_or(0);
    Ok(Embedding::new(coords, dims))
}

/// Write an edge list using external node ids, one edge per line.
pub fn write_edge_list<P: AsRef<Path>>(edges: &EdgeList, path: P) -> Result<()> {
    let path = path.as_ref();
    info!(
        "writing edge list ({} nodes, {} edges) to {}",
        edges.node_count(),
        edges.edge_count(),
        path.display()
    );
    let file = File::create(path)?;
    let mut sink = BufWriter::new(file);
    for &(u, v) in edges.edges() {
        let uid = edges.nodes().id_of(u).unwrap_or(u as i64);
        let vid = edges.nodes().id_of(v).unwrap_or(v as i64);
        writeln!(sink, "{} {}", uid, vid)?;
    }
    sink.flush()?;
    Ok(())
}

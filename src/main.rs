//! # lapmap CLI
//!
//! Command-line front end for the spectral embedding pipeline:
//! `lapmap embed` turns an edge-list file into per-node coordinates,
//! `lapmap generate` produces random connected test graphs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};

use lapmap::storage::write_edge_list;
use lapmap::{generate_connected_graph, EmbeddingBuilder, Result, SortRule};

#[derive(Parser)]
#[command(name = "lapmap")]
#[command(about = "Spectral graph embedding from edge lists")]
#[command(long_about = "Spectral graph embedding from edge lists:
  lapmap embed graph.txt embedding.txt          # 2D Laplacian eigenmap
  lapmap embed graph.txt out.txt --dims 3       # 3D embedding
  lapmap embed graph.txt out.txt --sort-rule largest
  lapmap generate 1000 4 --seed 42              # random connected graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a spectral embedding for an edge-list file
    Embed {
        /// Input edge list: one "<int> <int>" edge per line
        input: PathBuf,

        /// Output file: one coordinate row per node
        output: PathBuf,

        /// Embedding dimensionality
        #[arg(long, default_value_t = 2)]
        dims: usize,

        /// Spectrum end to embed from: smallest-magnitude, smallest, largest
        #[arg(long, default_value = "smallest")]
        sort_rule: SortRule,

        /// Keep the trivial first eigenvector instead of skipping it
        #[arg(long)]
        keep_trivial: bool,

        /// Node count up to which the exact dense solver is used
        #[arg(long, default_value_t = 500)]
        dense_threshold: usize,

        /// Override the number of eigenpairs requested from the solver
        #[arg(long)]
        eigenpairs: Option<usize>,
    },

    /// Generate a random connected graph as an edge-list file
    Generate {
        /// Number of nodes
        nodes: usize,

        /// Target average degree
        avg_degree: f64,

        /// Output path (default: graph_<nodes>_nodes_<deg>_deg.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Embed {
            input,
            output,
            dims,
            sort_rule,
            keep_trivial,
            dense_threshold,
            eigenpairs,
        } => {
            let mut builder = EmbeddingBuilder::new()
                .with_dims(dims)
                .with_sort_rule(sort_rule)
                .with_skip_trivial(!keep_trivial)
                .with_dense_threshold(dense_threshold);
            if let Some(k) = eigenpairs {
                builder = builder.with_requested_pairs(k);
            }

            let embedding = builder.embed_file(&input, &output)?;
            info!(
                "embedded {} nodes into {} dimensions -> {}",
                embedding.node_count(),
                embedding.dims(),
                output.display()
            );
        }
        Command::Generate {
            nodes,
            avg_degree,
            output,
            seed,
        } => {
            let edges = generate_connected_graph(nodes, avg_degree, seed);
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "graph_{}_nodes_{}_deg.txt",
                    nodes, avg_degree as usize
                ))
            });
            write_edge_list(&edges, &path)?;
            info!(
                "generated {} nodes, {} edges -> {}",
                edges.node_count(),
                edges.edge_count(),
                path.display()
            );
        }
    }
    Ok(())
}

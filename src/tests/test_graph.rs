//! Edge-list parsing and node index mapping.

use std::io::Cursor;

use log::info;

use crate::graph::EdgeList;
use crate::tests::init;

#[test]
fn test_parse_basic_edge_list() {
    init();
    let edges = EdgeList::parse(Cursor::new("0 1\n1 2\n"));
    assert_eq!(edges.node_count(), 3);
    assert_eq!(edges.edge_count(), 2);
    assert_eq!(edges.edges(), &[(0, 1), (1, 2)]);
}

#[test]
fn test_sparse_ids_map_to_compact_indices() {
    init();
    // Non-contiguous external ids must not inflate the node count.
    let edges = EdgeList::parse(Cursor::new("100 2050\n2050 999999\n"));
    assert_eq!(edges.node_count(), 3);
    assert_eq!(edges.edges(), &[(0, 1), (1, 2)]);

    let nodes = edges.nodes();
    assert_eq!(nodes.index_of(100), Some(0));
    assert_eq!(nodes.index_of(2050), Some(1));
    assert_eq!(nodes.index_of(999999), Some(2));
    assert_eq!(nodes.index_of(5), None);
    assert_eq!(nodes.id_of(0), Some(100));
    assert_eq!(nodes.id_of(2), Some(999999));
    assert_eq!(nodes.id_of(3), None);
}

#[test]
fn test_malformed_line_truncates_parsing() {
    init();
    // Edges before the bad line are kept, everything after is dropped.
    let edges = EdgeList::parse(Cursor::new("0 1\nabc def\n1 2\n"));
    assert_eq!(edges.edge_count(), 1);
    assert_eq!(edges.node_count(), 2);
    assert_eq!(edges.edges(), &[(0, 1)]);
}

#[test]
fn test_single_token_line_truncates_parsing() {
    init();
    let edges = EdgeList::parse(Cursor::new("0 1\n7\n1 2\n"));
    assert_eq!(edges.edge_count(), 1);
}

#[test]
fn test_empty_input_is_valid_degenerate_graph() {
    init();
    let edges = EdgeList::parse(Cursor::new(""));
    assert_eq!(edges.node_count(), 0);
    assert_eq!(edges.edge_count(), 0);
    assert!(edges.is_empty());
    info!("empty input accepted as zero-node graph");
}

#[test]
fn test_fully_unparseable_input_is_empty_graph() {
    init();
    let edges = EdgeList::parse(Cursor::new("# not an edge list\n0 1\n"));
    assert_eq!(edges.node_count(), 0);
    assert_eq!(edges.edge_count(), 0);
}

#[test]
fn test_duplicate_edges_are_retained() {
    init();
    let edges = EdgeList::parse(Cursor::new("0 1\n0 1\n1 0\n"));
    assert_eq!(edges.edge_count(), 3);
    assert_eq!(edges.node_count(), 2);
}

#[test]
fn test_extra_tokens_after_pair_are_ignored() {
    init();
    let edges = EdgeList::parse(Cursor::new("0 1 0.5\n1 2 extra tokens\n"));
    assert_eq!(edges.edge_count(), 2);
    assert_eq!(edges.node_count(), 3);
}

#[test]
fn test_negative_ids_are_accepted() {
    init();
    let edges = EdgeList::parse(Cursor::new("-5 3\n3 -5\n"));
    assert_eq!(edges.node_count(), 2);
    assert_eq!(edges.edges(), &[(0, 1), (1, 0)]);
}

#[test]
fn test_load_missing_file_is_io_error() {
    init();
    let result = EdgeList::load("/nonexistent/lapmap-no-such-file.txt");
    assert!(matches!(result, Err(crate::Error::Io(_))));
}

#[test]
fn test_from_pairs_matches_parse() {
    init();
    let parsed = EdgeList::parse(Cursor::new("4 7\n7 9\n9 4\n"));
    let built = EdgeList::from_pairs(vec![(4, 7), (7, 9), (9, 4)]);
    assert_eq!(parsed.edges(), built.edges());
    assert_eq!(parsed.node_count(), built.node_count());
}

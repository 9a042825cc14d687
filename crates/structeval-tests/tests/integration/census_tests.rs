//! Integration tests for edge-type counting across matrices.

use structeval_core::engine::census::{count_edge_types, EdgeCensus};
use structeval_core::{EdgeType, EquivalenceReducer, LabeledMatrix, MeekOracle};

fn canonical() -> Vec<String> {
    ["X1", "X2", "X3", "L1"].iter().map(|s| s.to_string()).collect()
}

fn sample(rows: Vec<Vec<i8>>) -> LabeledMatrix {
    LabeledMatrix::from_rows(vec!["X1", "X2", "X3", "L1"], rows).unwrap()
}

#[test]
fn census_over_several_runs() {
    // run 1: X1 -> X2, L1 -> X3
    let first = sample(vec![
        vec![0, -1, 0, 0],
        vec![1, 0, 0, 0],
        vec![0, 0, 0, 1],
        vec![0, 0, -1, 0],
    ]);
    // run 2: X2 -> X1, X2 -- X3
    let second = sample(vec![
        vec![0, 1, 0, 0],
        vec![-1, 0, -1, 0],
        vec![0, -1, 0, 0],
        vec![0, 0, 0, 0],
    ]);

    let names = canonical();
    let mut census = EdgeCensus::new();
    census.record(&first.matrix, &names, 3);
    census.record(&second.matrix, &names, 3);

    assert_eq!(census.matrices(), 2);
    assert_eq!(census.count("X1", "X2", EdgeType::UToV), 1);
    assert_eq!(census.count("X1", "X2", EdgeType::VToU), 1);
    assert_eq!(census.count("X2", "X3", EdgeType::Undirected), 1);
    assert_eq!(census.count("X2", "X3", EdgeType::None), 1);
    // L1 lies outside the counted prefix
    assert_eq!(census.count("X3", "L1", EdgeType::VToU), 0);

    let counted = &names[..3];
    let rows = census.rows(counted);
    assert_eq!(rows.len(), 3 * EdgeType::ALL.len());
    for pair in rows.chunks(EdgeType::ALL.len()) {
        assert_eq!(pair.iter().map(|r| r.count).sum::<usize>(), 2);
    }

    let freqs = census.edge_frequencies(counted);
    let x1x2 = freqs.iter().find(|f| f.u == "X1" && f.v == "X2").unwrap();
    assert_eq!(x1x2.frequency, 1.0);
    let x2x3 = freqs.iter().find(|f| f.u == "X2" && f.v == "X3").unwrap();
    assert_eq!(x2x3.frequency, 0.5);
}

#[test]
fn reduced_census_merges_orientations() {
    // X1 -> X2 and X2 -> X1 share one equivalence class
    let forward = sample(vec![
        vec![0, -1, 0, 0],
        vec![1, 0, 0, 0],
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
    ]);
    let backward = sample(vec![
        vec![0, 1, 0, 0],
        vec![-1, 0, 0, 0],
        vec![0, 0, 0, 0],
        vec![0, 0, 0, 0],
    ]);
    let names = canonical();
    let reducer = EquivalenceReducer::new(MeekOracle);

    let mut census = EdgeCensus::new();
    for m in [&forward, &backward] {
        let reduced = reducer.reduce(&m.matrix, &m.names).unwrap();
        census.merge(&count_edge_types(&reduced, &names, names.len()));
    }
    assert_eq!(census.count("X1", "X2", EdgeType::Undirected), 2);
    assert_eq!(census.count("X1", "X2", EdgeType::UToV), 0);
    assert_eq!(census.count("X1", "L1", EdgeType::None), 2);
}

#[test]
fn empty_census_has_zero_frequencies() {
    let census = EdgeCensus::new();
    let freqs = census.edge_frequencies(&canonical());
    assert_eq!(freqs.len(), 6);
    assert!(freqs.iter().all(|f| f.frequency == 0.0));
}

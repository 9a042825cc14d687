//! Integration tests for CSV storage of labeled matrices.

use std::fs;

use structeval_core::storage::{read_labeled_matrix, write_labeled_matrix};
use structeval_core::{evaluate, EvalError, Method};
use tempfile::tempdir;

#[test]
fn evaluate_files_and_write_aligned_prediction() {
    let dir = tempdir().unwrap();
    let truth_path = dir.path().join("truth.csv");
    let predicted_path = dir.path().join("predicted.csv");
    let aligned_path = dir.path().join("aligned.csv");

    // L1 -> X1, L1 -> X2
    fs::write(
        &truth_path,
        ",X1,X2,L1\nX1,0,0,1\nX2,0,0,1\nL1,-1,-1,0\n",
    )
    .unwrap();
    // same structure, latent renamed, latent listed first, float cells
    fs::write(
        &predicted_path,
        ",H,X2,X1\nH,0.0,-1.0,-1.0\nX2,1.0,0.0,0.0\nX1,1.0,0.0,0.0\n",
    )
    .unwrap();

    let truth = read_labeled_matrix(&truth_path).unwrap();
    let predicted = read_labeled_matrix(&predicted_path).unwrap();
    let out = evaluate(&truth, &predicted, 2, &Method::Rlcd).unwrap();
    assert_eq!(out.shd, 0);
    assert_eq!(out.f1, 1.0);

    write_labeled_matrix(&aligned_path, &out.aligned_prediction).unwrap();
    let text = fs::read_to_string(&aligned_path).unwrap();
    assert_eq!(text, ",X1,X2,H\nX1,0,0,-1\nX2,0,0,-1\nH,-1,-1,0\n");
    assert_eq!(read_labeled_matrix(&aligned_path).unwrap(), out.aligned_prediction);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_labeled_matrix(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, EvalError::Io(_)));
}

#[test]
fn ragged_table_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, ",X1,X2\nX1,0,-1\nX2,1\n").unwrap();
    assert!(read_labeled_matrix(&path).is_err());
}

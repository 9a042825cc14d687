//! Integration tests for the end-to-end evaluation pipeline.

use structeval_core::{
    best_match, evaluate, undirected_skeleton, Dag, EvalConfig, EvalError, Evaluator,
    LabeledMatrix, LatentMatcher, Method, SignedMatrix,
};

fn labeled(names: &[&str], rows: Vec<Vec<i8>>) -> LabeledMatrix {
    LabeledMatrix::from_rows(names.to_vec(), rows).unwrap()
}

#[test]
fn identical_single_edge() {
    // X1 -> X2
    let truth = labeled(&["X1", "X2"], vec![vec![0, -1], vec![1, 0]]);
    let out = evaluate(&truth, &truth, 2, &Method::Rlcd).unwrap();
    assert_eq!(out.shd, 0);
    assert_eq!(out.f1, 1.0);
}

#[test]
fn flipped_single_edge_shares_equivalence_class() {
    let truth = labeled(&["X1", "X2"], vec![vec![0, -1], vec![1, 0]]);
    let flipped = labeled(&["X1", "X2"], vec![vec![0, 1], vec![-1, 0]]);

    // both orientations reduce to X1 -- X2
    let reduced = evaluate(&truth, &flipped, 2, &Method::Rlcd).unwrap();
    assert_eq!(reduced.shd, 0);
    assert_eq!(reduced.f1, 1.0);

    // unreduced prediction differs from the reduced truth on the one pair
    let raw = evaluate(&truth, &flipped, 2, &Method::Other("GIN".into())).unwrap();
    // SHD counts unordered pairs, so a reversed edge costs 1, not one per cell
    assert_eq!(raw.shd, 1);
    assert_eq!(raw.f1, 1.0);
}

#[test]
fn nonzero_diagonal_is_ignored() {
    let truth = labeled(&["X1", "X2"], vec![vec![1, -1], vec![1, 0]]);
    let predicted = labeled(&["X1", "X2"], vec![vec![0, -1], vec![1, 0]]);
    let out = evaluate(&truth, &predicted, 2, &Method::Rlcd).unwrap();
    assert_eq!(out.shd, 0);
    assert_eq!(out.f1, 1.0);
}

#[test]
fn broken_collider_costs_both_edges() {
    // truth X1 -> X3 <- X2 ; prediction X3 -> X1, X2 -> X3 (a chain)
    let names = ["X1", "X2", "X3"];
    let truth = labeled(&names, vec![vec![0, 0, -1], vec![0, 0, -1], vec![1, 1, 0]]);
    let predicted = labeled(&names, vec![vec![0, 0, 1], vec![0, 0, -1], vec![-1, 1, 0]]);
    let out = evaluate(&truth, &predicted, 3, &Method::Lahme).unwrap();
    assert_eq!(out.shd, 2);
    assert_eq!(out.f1, 1.0);
}

#[test]
fn latent_relabeling_is_recovered() {
    // L1 -> X1, L1 -> X2, L2 -> X3, L1 -> L2
    let truth = labeled(
        &["X1", "X2", "X3", "L1", "L2"],
        vec![
            vec![0, 0, 0, 1, 0],
            vec![0, 0, 0, 1, 0],
            vec![0, 0, 0, 0, 1],
            vec![-1, -1, 0, 0, -1],
            vec![0, 0, -1, 1, 0],
        ],
    );
    // same graph, latents renamed and listed in the other order, observed shuffled
    let predicted = labeled(
        &["H2", "X3", "H1", "X1", "X2"],
        vec![
            vec![0, -1, 1, 0, 0],
            vec![1, 0, 0, 0, 0],
            vec![-1, 0, 0, -1, -1],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 1, 0, 0],
        ],
    );
    let out = evaluate(&truth, &predicted, 3, &Method::Rlcd).unwrap();
    assert_eq!(out.shd, 0);
    assert_eq!(out.f1, 1.0);
    assert_eq!(out.aligned_prediction.names, vec!["X1", "X2", "X3", "H1", "H2"]);
    assert_eq!(out.latent_permutation, vec![1, 0]);
    assert_eq!(out.candidates, 2);
}

#[test]
fn missing_latents_are_padded_and_scored() {
    // truth has a latent confounder the prediction replaced with a direct edge
    let truth = labeled(
        &["X1", "X2", "L1"],
        vec![vec![0, 0, 1], vec![0, 0, 1], vec![-1, -1, 0]],
    );
    let predicted = labeled(&["X1", "X2"], vec![vec![0, -1], vec![1, 0]]);
    let out = evaluate(&truth, &predicted, 2, &Method::Rlcd).unwrap();
    assert_eq!(out.aligned_prediction.names, vec!["X1", "X2", "A1"]);
    // X1-X2 extra, X1-L1 and X2-L1 missing
    assert_eq!(out.shd, 3);
    assert_eq!(out.f1, 0.0);
}

/// Two relabelings with SHD 2; the second has the better skeleton.
fn tie_break_case() -> (LabeledMatrix, LabeledMatrix) {
    // truth (equivalence-class notation): X1 -- L1, L1 -> L2
    let truth = labeled(
        &["X1", "X2", "L1", "L2"],
        vec![
            vec![0, 0, -1, 0],
            vec![0, 0, 0, 0],
            vec![-1, 0, 0, -1],
            vec![0, 0, 1, 0],
        ],
    );
    // prediction: X1 -> L2, L1 -> L2
    let predicted = labeled(
        &["X1", "X2", "L1", "L2"],
        vec![
            vec![0, 0, 0, -1],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, -1],
            vec![1, 0, 1, 0],
        ],
    );
    (truth, predicted)
}

#[test]
fn equal_shd_prefers_higher_f1() {
    let (truth, predicted) = tie_break_case();
    let method = Method::Other("FOFC".into());
    let out = evaluate(&truth, &predicted, 2, &method).unwrap();
    assert_eq!(out.shd, 2);
    assert_eq!(out.f1, 1.0);
    assert_eq!(out.latent_permutation, vec![1, 0]);

    for _ in 0..20 {
        let again = evaluate(&truth, &predicted, 2, &method).unwrap();
        assert_eq!(again, out);
    }
}

#[test]
fn full_ties_keep_first_enumerated() {
    // every relabeling scores identically on an edgeless latent block
    let z = SignedMatrix::zeros(5);
    let out = best_match(&z, &z, &z, &z, 2).unwrap();
    assert_eq!(out.candidates, 6);
    assert_eq!(out.latent_permutation, vec![0, 1, 2]);
    assert_eq!(out.f1, 0.0);
}

#[test]
fn skeleton_is_permuted_with_the_latent_block() {
    let (truth, predicted) = tie_break_case();
    let truth_skeleton = undirected_skeleton(&truth.matrix);
    // predicted skeleton that only agrees with the truth under the identity
    let predicted_skeleton = truth_skeleton.clone();
    let predicted_equiv = predicted.matrix.permuted(&[0, 1, 3, 2]);
    let out = best_match(
        &truth.matrix,
        &predicted_equiv,
        &predicted_skeleton,
        &truth_skeleton,
        2,
    )
    .unwrap();
    // identity is SHD 2, swap is SHD 2 as well but its skeleton no longer matches
    assert_eq!(out.min_shd, 2);
    assert_eq!(out.latent_permutation, vec![0, 1]);
    assert_eq!(out.f1, 1.0);
}

#[test]
fn injected_oracle_drives_reduction() {
    let truth = labeled(&["X1", "X2"], vec![vec![0, -1], vec![1, 0]]);
    // oracle that keeps the DAG as is
    let keep_dag = |dag: &Dag| -> Result<SignedMatrix, EvalError> {
        let mut rows = vec![vec![0i8; dag.size()]; dag.size()];
        for &(p, c) in dag.edges() {
            rows[p][c] = -1;
            rows[c][p] = 1;
        }
        SignedMatrix::from_rows(rows)
    };
    let evaluator = Evaluator::new(EvalConfig::default(), keep_dag);
    let flipped = labeled(&["X1", "X2"], vec![vec![0, 1], vec![-1, 0]]);
    let out = evaluator.evaluate(&truth, &flipped, 2, &Method::Rlcd).unwrap();
    assert_eq!(out.shd, 1);
}

#[test]
fn cyclic_prediction_fails_reduction() {
    let names = ["X1", "X2", "X3"];
    let truth = labeled(&names, vec![vec![0, -1, 0], vec![1, 0, 0], vec![0, 0, 0]]);
    let cyclic = labeled(&names, vec![vec![0, -1, 1], vec![1, 0, -1], vec![-1, 1, 0]]);
    assert!(matches!(
        evaluate(&truth, &cyclic, 3, &Method::Rlcd),
        Err(EvalError::EquivalenceConversionFailed(_))
    ));
    // pass-through methods never consult the oracle for the prediction
    assert!(evaluate(&truth, &cyclic, 3, &Method::Other("GIN".into())).is_ok());
}

#[test]
fn latent_limit_is_enforced() {
    let truth = labeled(
        &["X1", "L1", "L2", "L3"],
        vec![vec![0; 4], vec![0; 4], vec![0; 4], vec![0; 4]],
    );
    let config = EvalConfig {
        max_latents: 2,
        ..EvalConfig::default()
    };
    let err = Evaluator::with_config(config)
        .evaluate(&truth, &truth, 1, &Method::Rlcd)
        .unwrap_err();
    assert!(matches!(err, EvalError::LatentBlockTooLarge { latents: 3, limit: 2 }));
    assert_eq!(LatentMatcher::default().max_latents(), 10);
}

//! Structural distance metrics between signed adjacency matrices.
//!
//! - `shd(a, b)`: Structural Hamming Distance, one unit per unordered pair
//!   whose ordered cell pair differs.
//! - `undirected_skeleton(m)`: orientation-free 0/1 adjacency.
//! - `f1(truth, predicted)`: edge-presence F1 over two skeletons.
//!
//! Notes:
//! - Every score is total on same-shaped inputs, including the all-zero
//!   matrix; zero denominators fall back to `0.0`.
//! - Shape mismatch is an error, never truncation or padding.

use crate::engine::errors::EvalError;
use crate::engine::matrix::SignedMatrix;

fn check_shapes(a: &SignedMatrix, b: &SignedMatrix) -> Result<(), EvalError> {
    if a.size() != b.size() {
        return Err(EvalError::DimensionMismatch {
            left: a.size(),
            right: b.size(),
        });
    }
    Ok(())
}

/// Structural Hamming Distance between two same-shaped matrices.
pub fn shd(a: &SignedMatrix, b: &SignedMatrix) -> Result<usize, EvalError> {
    check_shapes(a, b)?;
    Ok(shd_unchecked(a, b))
}

pub(crate) fn shd_unchecked(a: &SignedMatrix, b: &SignedMatrix) -> usize {
    let n = a.size();
    let mut distance = 0;
    for i in 0..n {
        for j in i + 1..n {
            if a.pair(i, j) != b.pair(i, j) {
                distance += 1;
            }
        }
    }
    distance
}

/// `skeleton[i][j] = 1` iff `m[i][j] != 0` or `m[j][i] != 0`, for `i != j`.
/// The diagonal is always 0.
pub fn undirected_skeleton(m: &SignedMatrix) -> SignedMatrix {
    let n = m.size();
    let mut out = SignedMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            if i != j && (m.get(i, j) != 0 || m.get(j, i) != 0) {
                out.set(i, j, 1);
            }
        }
    }
    out
}

/// Confusion counts and derived scores for skeleton edge presence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkeletonScore {
    pub tp: usize,
    pub fp: usize,
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    pub fn_: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl SkeletonScore {
    /// Scores from raw counts with the zero-denominator fallbacks.
    pub fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            tp,
            fp,
            fn_,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Cell-level confusion between a ground-truth skeleton and a predicted one.
///
/// Every off-diagonal cell counts, so a symmetric skeleton contributes two
/// cells per edge; the ratios are unaffected. Diagonal cells are ignored.
pub fn skeleton_score(
    truth: &SignedMatrix,
    predicted: &SignedMatrix,
) -> Result<SkeletonScore, EvalError> {
    check_shapes(truth, predicted)?;
    Ok(skeleton_score_unchecked(truth, predicted))
}

pub(crate) fn skeleton_score_unchecked(truth: &SignedMatrix, predicted: &SignedMatrix) -> SkeletonScore {
    let n = truth.size();
    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            match (truth.get(i, j) != 0, predicted.get(i, j) != 0) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
    }
    SkeletonScore::from_counts(tp, fp, fn_)
}

/// Skeleton F1 with `truth` as ground truth.
pub fn f1(truth: &SignedMatrix, predicted: &SignedMatrix) -> Result<f64, EvalError> {
    skeleton_score(truth, predicted).map(|s| s.f1)
}

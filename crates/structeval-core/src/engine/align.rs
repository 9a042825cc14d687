//! Matrix alignment onto a shared variable axis.
//!
//! Observed variables (names starting with the observed prefix) are moved to
//! the front in a canonical order, latent variables follow in their original
//! relative order, and the smaller of two compared matrices is zero-padded at
//! the bottom-right with synthetic latent names `A1, A2, ...`.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::errors::EvalError;
use crate::engine::matrix::LabeledMatrix;

/// Prefix for synthetic names given to padding slots.
pub const PADDING_PREFIX: &str = "A";

/// Two matrices on a common axis, ready for reduction and matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub truth: LabeledMatrix,
    pub predicted: LabeledMatrix,
    /// Length of the shared observed block at the front of both matrices.
    pub observed: usize,
}

impl AlignedPair {
    pub fn size(&self) -> usize {
        self.truth.size()
    }
}

/// Reorders `m` so observed variables come first, latents after.
///
/// With a canonical order, the observed block follows it: canonical entries
/// absent from `m` are ignored, and observed names of `m` absent from the
/// canonical order are dropped from the result.
pub fn align(
    m: &LabeledMatrix,
    observed_prefix: &str,
    canonical_observed_order: Option<&[String]>,
) -> LabeledMatrix {
    let (observed, latent): (Vec<usize>, Vec<usize>) =
        (0..m.size()).partition(|&i| m.names[i].starts_with(observed_prefix));

    let observed = match canonical_observed_order {
        None => observed,
        Some(canonical) => {
            let by_name: FxHashMap<&str, usize> = observed
                .iter()
                .map(|&i| (m.names[i].as_str(), i))
                .collect();
            let ordered: Vec<usize> = canonical
                .iter()
                .filter_map(|name| by_name.get(name.as_str()).copied())
                .collect();
            #[cfg(feature = "tracing")]
            {
                if ordered.len() < observed.len() {
                    let kept: FxHashSet<usize> = ordered.iter().copied().collect();
                    let dropped: Vec<&str> = observed
                        .iter()
                        .filter(|i| !kept.contains(i))
                        .map(|&i| m.names[i].as_str())
                        .collect();
                    tracing::warn!(
                        "dropping observed variables absent from canonical order: {:?}",
                        dropped
                    );
                }
            }
            ordered
        }
    };

    let order: Vec<usize> = observed.into_iter().chain(latent).collect();
    LabeledMatrix {
        names: order.iter().map(|&i| m.names[i].clone()).collect(),
        matrix: m.matrix.permuted(&order),
    }
}

/// Zero-pads `m` to `target x target`, appending synthetic latent names.
///
/// Synthetic names already taken by `m` are skipped so names stay unique.
pub fn pad_to(m: &LabeledMatrix, target: usize) -> LabeledMatrix {
    if m.size() >= target {
        return m.clone();
    }
    let taken: FxHashSet<&str> = m.names.iter().map(String::as_str).collect();
    let mut names = m.names.clone();
    let mut k = 1usize;
    while names.len() < target {
        let candidate = format!("{}{}", PADDING_PREFIX, k);
        if !taken.contains(candidate.as_str()) {
            names.push(candidate);
        }
        k += 1;
    }
    LabeledMatrix {
        names,
        matrix: m.matrix.padded(target),
    }
}

/// Aligns a ground truth and a prediction onto one axis.
///
/// The canonical observed order is the ground truth's own observed order.
/// Both matrices are padded to the larger of the two sizes.
pub fn align_pair(
    truth: &LabeledMatrix,
    predicted: &LabeledMatrix,
    observed_prefix: &str,
) -> Result<AlignedPair, EvalError> {
    let canonical: Vec<String> = truth
        .names
        .iter()
        .filter(|n| n.starts_with(observed_prefix))
        .cloned()
        .collect();

    let truth = align(truth, observed_prefix, Some(&canonical));
    let predicted = align(predicted, observed_prefix, Some(&canonical));

    let present: FxHashSet<&str> = predicted
        .names
        .iter()
        .take_while(|n| n.starts_with(observed_prefix))
        .map(String::as_str)
        .collect();
    let missing: Vec<String> = canonical
        .iter()
        .filter(|n| !present.contains(n.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(EvalError::ObservedMismatch { missing });
    }

    let target = truth.size().max(predicted.size());
    Ok(AlignedPair {
        truth: pad_to(&truth, target),
        predicted: pad_to(&predicted, target),
        observed: canonical.len(),
    })
}

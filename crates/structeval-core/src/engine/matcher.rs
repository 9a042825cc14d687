//! Exhaustive latent-relabeling search.
//!
//! Both inputs share a fixed observed block `[0, n_observed)`; the latent
//! block of the prediction has no canonical correspondence with the ground
//! truth's, so every bijection between the two is tried. Permutations are
//! enumerated in lexicographic order and the winner is chosen by
//! [`supersedes`]: strictly lower SHD wins, equal SHD with strictly higher
//! skeleton F1 wins, anything else keeps the first-seen candidate.
//!
//! ## Feature gating
//!
//! With the `parallel` feature, candidates are scored with rayon and the
//! selection still runs sequentially in enumeration order, so both paths
//! report the same winner.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::errors::EvalError;
use crate::engine::matrix::SignedMatrix;
use crate::metrics::{shd_unchecked, skeleton_score_unchecked};

/// Largest latent block searched by default (10! candidates).
pub const DEFAULT_MAX_LATENTS: usize = 10;

/// SHD and skeleton F1 of a single candidate relabeling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub shd: usize,
    pub f1: f64,
}

/// Tie-break policy: does `candidate` replace the current best?
///
/// The first candidate always wins. Later ones win on strictly lower SHD, or
/// equal SHD and strictly higher F1.
pub fn supersedes(candidate: CandidateScore, incumbent: Option<CandidateScore>) -> bool {
    match incumbent {
        None => true,
        Some(best) => candidate.shd < best.shd || (candidate.shd == best.shd && candidate.f1 > best.f1),
    }
}

/// Lexicographic permutations of `0..len`, starting from the identity.
#[derive(Debug, Clone)]
pub struct LatentPermutations {
    next: Option<Vec<usize>>,
}

impl LatentPermutations {
    pub fn new(len: usize) -> Self {
        Self {
            next: Some((0..len).collect()),
        }
    }
}

impl Iterator for LatentPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut succ = current.clone();
        if next_permutation(&mut succ) {
            self.next = Some(succ);
        }
        Some(current)
    }
}

/// Advances `v` to its lexicographic successor; false once `v` is the last one.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Full index order: observed identity followed by the shifted latent permutation.
pub fn full_order(n_observed: usize, latent: &[usize]) -> Vec<usize> {
    (0..n_observed)
        .chain(latent.iter().map(|p| n_observed + p))
        .collect()
}

/// Winning relabeling of the prediction's latent block.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Minimum SHD over all relabelings.
    pub min_shd: usize,
    /// Skeleton F1 at the winning relabeling.
    pub f1: f64,
    /// Winning permutation of `0..n_latent`.
    pub latent_permutation: Vec<usize>,
    /// Full index order applied to the prediction (`out[i] = pred[order[i]]`).
    pub order: Vec<usize>,
    /// Predicted equivalence matrix under the winning order.
    pub matrix: SignedMatrix,
    /// Number of relabelings scored.
    pub candidates: usize,
}

/// Brute-force latent matcher with a bound on the latent block size.
#[derive(Debug, Clone, Copy)]
pub struct LatentMatcher {
    max_latents: usize,
}

impl Default for LatentMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LATENTS)
    }
}

impl LatentMatcher {
    pub fn new(max_latents: usize) -> Self {
        Self { max_latents }
    }

    pub fn max_latents(&self) -> usize {
        self.max_latents
    }

    /// Searches every relabeling of the prediction's latent block.
    ///
    /// All four matrices must share one size `n`, with `n_observed <= n`.
    pub fn best_match(
        &self,
        truth_equiv: &SignedMatrix,
        predicted_equiv: &SignedMatrix,
        predicted_skeleton: &SignedMatrix,
        truth_skeleton: &SignedMatrix,
        n_observed: usize,
    ) -> Result<MatchOutcome, EvalError> {
        let n = truth_equiv.size();
        for other in [predicted_equiv, predicted_skeleton, truth_skeleton] {
            if other.size() != n {
                return Err(EvalError::DimensionMismatch {
                    left: n,
                    right: other.size(),
                });
            }
        }
        if n_observed > n {
            return Err(EvalError::InvalidObservedCount {
                observed: n_observed,
                size: n,
            });
        }
        let n_latent = n - n_observed;
        if n_latent > self.max_latents {
            return Err(EvalError::LatentBlockTooLarge {
                latents: n_latent,
                limit: self.max_latents,
            });
        }

        let score = |latent: &[usize]| -> CandidateScore {
            let order = full_order(n_observed, latent);
            let equiv = predicted_equiv.permuted(&order);
            let skeleton = predicted_skeleton.permuted(&order);
            CandidateScore {
                shd: shd_unchecked(truth_equiv, &equiv),
                f1: skeleton_score_unchecked(truth_skeleton, &skeleton).f1,
            }
        };

        let (best_score, best_perm, candidates) = select(LatentPermutations::new(n_latent), score);

        let order = full_order(n_observed, &best_perm);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "latent search over {} candidates: shd={} f1={:.4} permutation={:?}",
            candidates,
            best_score.shd,
            best_score.f1,
            best_perm
        );
        Ok(MatchOutcome {
            min_shd: best_score.shd,
            f1: best_score.f1,
            matrix: predicted_equiv.permuted(&order),
            latent_permutation: best_perm,
            order,
            candidates,
        })
    }
}

#[cfg(not(feature = "parallel"))]
fn select<F>(perms: LatentPermutations, score: F) -> (CandidateScore, Vec<usize>, usize)
where
    F: Fn(&[usize]) -> CandidateScore,
{
    let mut best: Option<(CandidateScore, Vec<usize>)> = None;
    let mut candidates = 0;
    for perm in perms {
        candidates += 1;
        let s = score(&perm);
        if supersedes(s, best.as_ref().map(|(b, _)| *b)) {
            best = Some((s, perm));
        }
    }
    // the enumeration always yields at least the identity
    let (s, perm) = best.unwrap_or((CandidateScore { shd: 0, f1: 0.0 }, Vec::new()));
    (s, perm, candidates)
}

/// Candidates scored per rayon batch; bounds the permutations held at once.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 4096;

#[cfg(feature = "parallel")]
fn select<F>(perms: LatentPermutations, score: F) -> (CandidateScore, Vec<usize>, usize)
where
    F: Fn(&[usize]) -> CandidateScore + Sync,
{
    select_chunked(perms, score, PARALLEL_CHUNK)
}

#[cfg(feature = "parallel")]
fn select_chunked<F>(
    mut perms: LatentPermutations,
    score: F,
    chunk: usize,
) -> (CandidateScore, Vec<usize>, usize)
where
    F: Fn(&[usize]) -> CandidateScore + Sync,
{
    let mut best: Option<(CandidateScore, Vec<usize>)> = None;
    let mut candidates = 0;
    loop {
        let batch: Vec<Vec<usize>> = perms.by_ref().take(chunk.max(1)).collect();
        if batch.is_empty() {
            break;
        }
        candidates += batch.len();
        // order-preserving collect; the reduction below stays sequential
        let scores: Vec<CandidateScore> = batch.par_iter().map(|p| score(p)).collect();
        for (perm, s) in batch.into_iter().zip(scores) {
            if supersedes(s, best.as_ref().map(|(b, _)| *b)) {
                best = Some((s, perm));
            }
        }
    }
    let (s, perm) = best.unwrap_or((CandidateScore { shd: 0, f1: 0.0 }, Vec::new()));
    (s, perm, candidates)
}

/// [`LatentMatcher::best_match`] with the default latent limit.
pub fn best_match(
    truth_equiv: &SignedMatrix,
    predicted_equiv: &SignedMatrix,
    predicted_skeleton: &SignedMatrix,
    truth_skeleton: &SignedMatrix,
    n_observed: usize,
) -> Result<MatchOutcome, EvalError> {
    LatentMatcher::default().best_match(
        truth_equiv,
        predicted_equiv,
        predicted_skeleton,
        truth_skeleton,
        n_observed,
    )
}

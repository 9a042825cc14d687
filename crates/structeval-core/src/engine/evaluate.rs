//! End-to-end evaluation of a predicted structure against ground truth.
//!
//! Pipeline: align both labeled matrices on one axis, take undirected
//! skeletons of the aligned matrices, reduce the ground truth (always) and the
//! prediction (only for methods that emit pure DAGs) to equivalence-class
//! representatives, then search latent relabelings of the prediction.

use std::fmt;
use std::str::FromStr;

use crate::engine::align::align_pair;
use crate::engine::equivalence::{EquivalenceOracle, EquivalenceReducer, MeekOracle};
use crate::engine::errors::EvalError;
use crate::engine::matcher::{LatentMatcher, DEFAULT_MAX_LATENTS};
use crate::engine::matrix::LabeledMatrix;
use crate::metrics::undirected_skeleton;

/// Default prefix marking observed variable names.
pub const DEFAULT_OBSERVED_PREFIX: &str = "X";

/// Evaluation settings. Passed explicitly; there is no ambient configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvalConfig {
    /// Names starting with this prefix are observed; all others are latent.
    pub observed_prefix: String,
    /// Largest latent block the exhaustive search accepts.
    pub max_latents: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            observed_prefix: DEFAULT_OBSERVED_PREFIX.to_string(),
            max_latents: DEFAULT_MAX_LATENTS,
        }
    }
}

/// Structure-learning method that produced a prediction.
///
/// `Rlcd` and `Lahme` emit pure signed DAGs that need reduction; any other
/// method is assumed to already emit equivalence-class matrices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Rlcd,
    Lahme,
    Other(String),
}

impl Method {
    /// Whether predictions from this method go through the equivalence reducer.
    pub fn reduces_prediction(&self) -> bool {
        matches!(self, Method::Rlcd | Method::Lahme)
    }

    pub fn name(&self) -> &str {
        match self {
            Method::Rlcd => "RLCD",
            Method::Lahme => "LaHME",
            Method::Other(name) => name,
        }
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "rlcd" => Method::Rlcd,
            "lahme" => Method::Lahme,
            _ => Method::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub shd: usize,
    pub f1: f64,
    /// Predicted equivalence matrix under the best latent relabeling,
    /// labeled with the prediction's names in matched order.
    pub aligned_prediction: LabeledMatrix,
    /// Winning permutation of the latent block.
    pub latent_permutation: Vec<usize>,
    /// Observed block length of the aligned matrices.
    pub observed: usize,
    /// Number of latent relabelings scored.
    pub candidates: usize,
}

/// Evaluation engine parameterized by its equivalence oracle.
#[derive(Debug, Clone, Default)]
pub struct Evaluator<O = MeekOracle> {
    config: EvalConfig,
    reducer: EquivalenceReducer<O>,
}

impl Evaluator<MeekOracle> {
    /// Evaluator with the default oracle.
    pub fn with_config(config: EvalConfig) -> Self {
        Self::new(config, MeekOracle)
    }
}

impl<O: EquivalenceOracle> Evaluator<O> {
    pub fn new(config: EvalConfig, oracle: O) -> Self {
        Self {
            config,
            reducer: EquivalenceReducer::new(oracle),
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn reducer(&self) -> &EquivalenceReducer<O> {
        &self.reducer
    }

    /// Scores `predicted` against `truth` with `n_observed` fixed observed slots.
    pub fn evaluate(
        &self,
        truth: &LabeledMatrix,
        predicted: &LabeledMatrix,
        n_observed: usize,
        method: &Method,
    ) -> Result<Evaluation, EvalError> {
        let aligned = align_pair(truth, predicted, &self.config.observed_prefix)?;
        let n = aligned.size();
        if n_observed > n {
            return Err(EvalError::InvalidObservedCount {
                observed: n_observed,
                size: n,
            });
        }

        let truth_skeleton = undirected_skeleton(&aligned.truth.matrix);
        let predicted_skeleton = undirected_skeleton(&aligned.predicted.matrix);

        let truth_equiv = self
            .reducer
            .reduce(&aligned.truth.matrix, &aligned.truth.names)?;
        let predicted_equiv = if method.reduces_prediction() {
            self.reducer
                .reduce(&aligned.predicted.matrix, &aligned.predicted.names)?
        } else {
            aligned.predicted.matrix.clone()
        };

        let outcome = LatentMatcher::new(self.config.max_latents).best_match(
            &truth_equiv,
            &predicted_equiv,
            &predicted_skeleton,
            &truth_skeleton,
            n_observed,
        )?;

        let names = outcome
            .order
            .iter()
            .map(|&i| aligned.predicted.names[i].clone())
            .collect();
        Ok(Evaluation {
            shd: outcome.min_shd,
            f1: outcome.f1,
            aligned_prediction: LabeledMatrix {
                names,
                matrix: outcome.matrix,
            },
            latent_permutation: outcome.latent_permutation,
            observed: aligned.observed,
            candidates: outcome.candidates,
        })
    }
}

/// Evaluates with the default configuration and oracle.
pub fn evaluate(
    truth: &LabeledMatrix,
    predicted: &LabeledMatrix,
    n_observed: usize,
    method: &Method,
) -> Result<Evaluation, EvalError> {
    Evaluator::with_config(EvalConfig::default()).evaluate(truth, predicted, n_observed, method)
}

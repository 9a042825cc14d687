//! # Structeval Core
//!
//! Alignment and distance evaluation of learned causal structures.
//!
//! A learned signed adjacency matrix and a ground-truth one rarely agree on
//! variable count, ordering, or latent variables. The engine puts observed
//! variables first in a shared order, pads the latent tail, reduces both
//! sides to Markov-equivalence representatives, and searches relabelings of
//! the predicted latent block for the best Structural Hamming Distance, with
//! skeleton F1 as tie-breaker.
//!
//! ## Usage
//!
//! ```rust
//! use structeval_core::{evaluate, LabeledMatrix, Method};
//!
//! // X1 -> X2
//! let truth = LabeledMatrix::from_rows(vec!["X1", "X2"], vec![vec![0, -1], vec![1, 0]])?;
//! let result = evaluate(&truth, &truth, 2, &Method::Rlcd)?;
//! assert_eq!(result.shd, 0);
//! assert_eq!(result.f1, 1.0);
//! # Ok::<(), structeval_core::EvalError>(())
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod metrics;
pub mod storage;

// Re-export commonly used types
pub use engine::codec::{classify_pair, is_already_equivalence_class, EdgeType};
pub use engine::equivalence::{Dag, EquivalenceOracle, EquivalenceReducer, MeekOracle};
pub use engine::errors::EvalError;
pub use engine::evaluate::{evaluate, EvalConfig, Evaluation, Evaluator, Method};
pub use engine::matcher::{best_match, LatentMatcher, MatchOutcome};
pub use engine::matrix::{LabeledMatrix, SignedMatrix};
pub use metrics::{f1, shd, undirected_skeleton, SkeletonScore};

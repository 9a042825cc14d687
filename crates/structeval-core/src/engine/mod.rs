//! The evaluation engine for learned causal structures.
//!
//! This module provides:
//! - **errors**: Error types for evaluation failures
//! - **matrix**: Signed adjacency matrices and labeled matrices
//! - **codec**: Edge encoding and classification of cell pairs
//! - **align**: Observed-first reordering and zero-padding onto a shared axis
//! - **equivalence**: DAG to equivalence-class reduction behind an oracle trait
//! - **matcher**: Exhaustive latent relabeling search with deterministic tie-break
//! - **evaluate**: The end-to-end evaluation pipeline
//! - **census**: Edge-type counts across many matrices

pub mod align;
pub mod census;
pub mod codec;
pub mod equivalence;
pub mod errors;
pub mod evaluate;
pub mod matcher;
pub mod matrix;

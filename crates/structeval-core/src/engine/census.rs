//! Edge-type census across many matrices over a shared variable list.
//!
//! Each recorded matrix contributes one count per unordered pair of its first
//! `keep` variables, bucketed by [`EdgeType`]. Pairs are named positionally
//! from a canonical variable list, so matrices must already agree on the
//! order of the counted prefix.

use std::collections::BTreeMap;

use crate::engine::codec::{classify_pair, EdgeType};
use crate::engine::matrix::SignedMatrix;

/// One `(u, v, edge_type)` cell of the census grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CensusRow {
    pub u: String,
    pub v: String,
    pub edge_type: EdgeType,
    pub count: usize,
}

/// Fraction of recorded matrices with any edge between `u` and `v`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeFrequency {
    pub u: String,
    pub v: String,
    pub frequency: f64,
}

/// Accumulated edge-type counts keyed by `(u, v, edge_type)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeCensus {
    counts: BTreeMap<(String, String, EdgeType), usize>,
    matrices: usize,
    unknown: usize,
}

impl EdgeCensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the pairs among the first `keep` variables of `m`.
    ///
    /// The counted prefix is further capped by the matrix size and by the
    /// canonical list length.
    pub fn record(&mut self, m: &SignedMatrix, canonical: &[String], keep: usize) {
        let n = keep.min(m.size()).min(canonical.len());
        let mut unknown = 0usize;
        for i in 0..n {
            for j in i + 1..n {
                let edge_type = classify_pair(m.get(i, j), m.get(j, i));
                if edge_type == EdgeType::Unknown {
                    unknown += 1;
                }
                *self
                    .counts
                    .entry((canonical[i].clone(), canonical[j].clone(), edge_type))
                    .or_insert(0) += 1;
            }
        }
        self.matrices += 1;
        self.unknown += unknown;
        #[cfg(feature = "tracing")]
        {
            if unknown > 0 {
                tracing::warn!("{} variable pairs with unknown edge encoding", unknown);
            }
        }
    }

    /// Adds every count of `other` into `self`.
    pub fn merge(&mut self, other: &EdgeCensus) {
        for (key, count) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += count;
        }
        self.matrices += other.matrices;
        self.unknown += other.unknown;
    }

    pub fn count(&self, u: &str, v: &str, edge_type: EdgeType) -> usize {
        self.counts
            .get(&(u.to_string(), v.to_string(), edge_type))
            .copied()
            .unwrap_or(0)
    }

    /// Number of matrices recorded (including merged ones).
    pub fn matrices(&self) -> usize {
        self.matrices
    }

    /// Pairs classified [`EdgeType::Unknown`] across all recorded matrices.
    pub fn unknown_pairs(&self) -> usize {
        self.unknown
    }

    /// Full grid over all unordered pairs of `canonical` and all edge types,
    /// with zero for combinations never seen.
    pub fn rows(&self, canonical: &[String]) -> Vec<CensusRow> {
        let mut out = Vec::with_capacity(canonical.len() * canonical.len() * EdgeType::ALL.len() / 2);
        for (i, u) in canonical.iter().enumerate() {
            for v in &canonical[i + 1..] {
                for edge_type in EdgeType::ALL {
                    out.push(CensusRow {
                        u: u.clone(),
                        v: v.clone(),
                        edge_type,
                        count: self.count(u, v, edge_type),
                    });
                }
            }
        }
        out
    }

    /// Per-pair fraction of recorded matrices carrying an edge of any orientation.
    pub fn edge_frequencies(&self, canonical: &[String]) -> Vec<EdgeFrequency> {
        let total = self.matrices.max(1) as f64;
        let mut out = Vec::new();
        for (i, u) in canonical.iter().enumerate() {
            for v in &canonical[i + 1..] {
                let present: usize = EdgeType::ALL
                    .iter()
                    .filter(|t| t.is_edge())
                    .map(|&t| self.count(u, v, t))
                    .sum();
                out.push(EdgeFrequency {
                    u: u.clone(),
                    v: v.clone(),
                    frequency: present as f64 / total,
                });
            }
        }
        out
    }
}

/// Census of a single matrix.
pub fn count_edge_types(m: &SignedMatrix, canonical: &[String], keep: usize) -> EdgeCensus {
    let mut census = EdgeCensus::new();
    census.record(m, canonical, keep);
    census
}

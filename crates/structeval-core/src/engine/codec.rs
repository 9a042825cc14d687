//! Edge codec for the signed-matrix notation.
//!
//! For a pair of variables `(u, v)` at indices `(i, j)` the ordered cell pair
//! `(M[i][j], M[j][i])` encodes:
//!
//! | pair       | meaning        |
//! |------------|----------------|
//! | `(-1, 1)`  | `u -> v`       |
//! | `(1, -1)`  | `v -> u`       |
//! | `(-1, -1)` | `u -- v`       |
//! | `(0, 0)`   | no edge        |
//!
//! Anything else is reported as [`EdgeType::Unknown`]; it is a diagnostic
//! bucket, never an error.

use std::fmt;

use crate::engine::matrix::SignedMatrix;

/// Edge type of an unordered variable pair, read in `(u, v)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeType {
    #[cfg_attr(feature = "serde", serde(rename = "u->v"))]
    UToV,
    #[cfg_attr(feature = "serde", serde(rename = "v->u"))]
    VToU,
    #[cfg_attr(feature = "serde", serde(rename = "undirected"))]
    Undirected,
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "unknown"))]
    Unknown,
}

impl EdgeType {
    /// All edge types in reporting order.
    pub const ALL: [EdgeType; 5] = [
        EdgeType::UToV,
        EdgeType::VToU,
        EdgeType::Undirected,
        EdgeType::None,
        EdgeType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::UToV => "u->v",
            EdgeType::VToU => "v->u",
            EdgeType::Undirected => "undirected",
            EdgeType::None => "none",
            EdgeType::Unknown => "unknown",
        }
    }

    /// True for the three edge-present encodings.
    pub fn is_edge(self) -> bool {
        matches!(self, EdgeType::UToV | EdgeType::VToU | EdgeType::Undirected)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the ordered cell pair `(M[i][j], M[j][i])`. Total over all inputs.
pub fn classify_pair(a: i8, b: i8) -> EdgeType {
    match (a, b) {
        (-1, 1) => EdgeType::UToV,
        (1, -1) => EdgeType::VToU,
        (-1, -1) => EdgeType::Undirected,
        (0, 0) => EdgeType::None,
        _ => EdgeType::Unknown,
    }
}

/// True iff some off-diagonal pair carries a symmetric `+1` or `-1` entry.
///
/// Such matrices already use equivalence-class notation (or are not pure
/// signed DAGs) and must not be re-derived.
pub fn is_already_equivalence_class(m: &SignedMatrix) -> bool {
    let n = m.size();
    (0..n).any(|i| {
        (i + 1..n).any(|j| {
            let (a, b) = m.pair(i, j);
            a == b && a != 0
        })
    })
}

/// Directed edges `(parent, child)` under the pure-DAG reading of the matrix.
///
/// Pairs that are not one of the two directed encodings are skipped.
pub fn directed_edges(m: &SignedMatrix) -> Vec<(usize, usize)> {
    let n = m.size();
    let mut out = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            match classify_pair(m.get(i, j), m.get(j, i)) {
                EdgeType::UToV => out.push((i, j)),
                EdgeType::VToU => out.push((j, i)),
                _ => {}
            }
        }
    }
    out
}

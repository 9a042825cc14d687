//! Signed adjacency matrices and their labeled form.
//!
//! A [`SignedMatrix`] is a dense square `n x n` matrix over `{-1, 0, 1}`
//! stored row-major. Every transformation (similarity permutation, padding)
//! returns a new matrix; nothing is mutated in place once built.

use rustc_hash::FxHashSet;

use crate::engine::errors::EvalError;

/// Dense square signed adjacency matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSignedMatrix"))]
pub struct SignedMatrix {
    size: usize,
    cells: Vec<i8>,
}

impl SignedMatrix {
    /// All-zero `size x size` matrix (no edges).
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Builds a matrix from rows, checking squareness and the `{-1, 0, 1}` domain.
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Result<Self, EvalError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(EvalError::InvalidMatrix(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(bad) = row.iter().find(|v| !(-1..=1).contains(*v)) {
                return Err(EvalError::InvalidMatrix(format!(
                    "row {} holds value {} outside {{-1, 0, 1}}",
                    i, bad
                )));
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// Number of variable slots (rows == columns).
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.cells[i * self.size + j]
    }

    /// The ordered cell pair `(M[i][j], M[j][i])` for a pair of variables.
    #[inline]
    pub fn pair(&self, i: usize, j: usize) -> (i8, i8) {
        (self.get(i, j), self.get(j, i))
    }

    /// Rows as owned vectors, mostly for display and tests.
    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.size.max(1))
            .take(self.size)
            .map(|row| row.to_vec())
            .collect()
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: i8) {
        self.cells[i * self.size + j] = value;
    }

    /// Similarity permutation: `out[i][j] = self[order[i]][order[j]]`.
    ///
    /// `order` may be shorter than the matrix, in which case the result is the
    /// principal submatrix selected by `order`.
    pub fn permuted(&self, order: &[usize]) -> SignedMatrix {
        let n = order.len();
        let mut out = SignedMatrix::zeros(n);
        for (i, &src_i) in order.iter().enumerate() {
            let row = &self.cells[src_i * self.size..(src_i + 1) * self.size];
            for (j, &src_j) in order.iter().enumerate() {
                out.cells[i * n + j] = row[src_j];
            }
        }
        out
    }

    /// Extends the matrix to `target x target` with all-zero rows and columns
    /// appended at the bottom-right. Existing entries keep their positions.
    pub fn padded(&self, target: usize) -> SignedMatrix {
        if target <= self.size {
            return self.clone();
        }
        let mut out = SignedMatrix::zeros(target);
        for i in 0..self.size {
            let src = &self.cells[i * self.size..(i + 1) * self.size];
            out.cells[i * target..i * target + self.size].copy_from_slice(src);
        }
        out
    }

    /// True when no off-diagonal cell is nonzero.
    pub fn is_empty_graph(&self) -> bool {
        (0..self.size).all(|i| (0..self.size).all(|j| i == j || self.get(i, j) == 0))
    }
}

/// Wire form of [`SignedMatrix`]; validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSignedMatrix {
    size: usize,
    cells: Vec<i8>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSignedMatrix> for SignedMatrix {
    type Error = EvalError;

    fn try_from(raw: RawSignedMatrix) -> Result<Self, Self::Error> {
        if raw.cells.len() != raw.size * raw.size {
            return Err(EvalError::InvalidMatrix(format!(
                "{} cells for a {}x{} matrix",
                raw.cells.len(),
                raw.size,
                raw.size
            )));
        }
        let rows = raw
            .cells
            .chunks(raw.size.max(1))
            .take(raw.size)
            .map(|row| row.to_vec())
            .collect();
        Self::from_rows(rows)
    }
}

/// A signed matrix together with the variable names indexing its rows/columns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLabeledMatrix"))]
pub struct LabeledMatrix {
    pub names: Vec<String>,
    pub matrix: SignedMatrix,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLabeledMatrix {
    names: Vec<String>,
    matrix: SignedMatrix,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLabeledMatrix> for LabeledMatrix {
    type Error = EvalError;

    fn try_from(raw: RawLabeledMatrix) -> Result<Self, Self::Error> {
        Self::new(raw.names, raw.matrix)
    }
}

impl LabeledMatrix {
    /// Pairs a matrix with its names, rejecting size disagreement and duplicates.
    pub fn new(names: Vec<String>, matrix: SignedMatrix) -> Result<Self, EvalError> {
        if names.len() != matrix.size() {
            return Err(EvalError::InvalidMatrix(format!(
                "{} names for a {}x{} matrix",
                names.len(),
                matrix.size(),
                matrix.size()
            )));
        }
        let mut seen = FxHashSet::default();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(EvalError::InvalidMatrix(format!(
                    "duplicate variable name '{}'",
                    name
                )));
            }
        }
        Ok(Self { names, matrix })
    }

    /// Convenience constructor from string-like names and integer rows.
    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<i8>>) -> Result<Self, EvalError> {
        let names = names.into_iter().map(Into::into).collect();
        Self::new(names, SignedMatrix::from_rows(rows)?)
    }

    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Index of a variable by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

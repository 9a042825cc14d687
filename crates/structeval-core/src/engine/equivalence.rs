//! Reduction of signed DAG matrices to their Markov-equivalence representative.
//!
//! The DAG -> CPDAG computation is an injected capability: any type
//! implementing [`EquivalenceOracle`] can back an [`EquivalenceReducer`].
//! [`MeekOracle`] is the default: directed edges that participate in a
//! v-structure stay directed, Meek rules R1-R3 are applied to a fixpoint, and
//! every other edge becomes undirected.

use crate::engine::codec::{directed_edges, is_already_equivalence_class};
use crate::engine::errors::EvalError;
use crate::engine::matrix::SignedMatrix;

/// Directed graph over a named node set, read from a signed matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dag {
    names: Vec<String>,
    /// `(parent, child)` pairs
    edges: Vec<(usize, usize)>,
}

impl Dag {
    /// Reads the pure-DAG interpretation of `m`; non-directed pairs are ignored.
    pub fn from_signed(m: &SignedMatrix, names: &[String]) -> Self {
        Self {
            names: names.to_vec(),
            edges: directed_edges(m),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Kahn topological order, or `None` when the graph has a directed cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let n = self.size();
        let mut in_degree = vec![0usize; n];
        let mut children = vec![Vec::new(); n];
        for &(p, c) in &self.edges {
            in_degree[c] += 1;
            children[p].push(c);
        }
        let mut ready: Vec<usize> = (0..n).rev().filter(|&v| in_degree[v] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(v) = ready.pop() {
            order.push(v);
            for &c in &children[v] {
                in_degree[c] -= 1;
                if in_degree[c] == 0 {
                    ready.push(c);
                }
            }
        }
        (order.len() == n).then_some(order)
    }
}

/// DAG -> equivalence-class oracle.
///
/// Output is an `n x n` signed matrix over the DAG's node order: directed
/// `i -> j` as `(M[i][j], M[j][i]) = (-1, 1)`, undirected as `(-1, -1)`.
pub trait EquivalenceOracle: Send + Sync {
    fn equivalence_class(&self, dag: &Dag) -> Result<SignedMatrix, EvalError>;
}

impl<F> EquivalenceOracle for F
where
    F: Fn(&Dag) -> Result<SignedMatrix, EvalError> + Send + Sync,
{
    fn equivalence_class(&self, dag: &Dag) -> Result<SignedMatrix, EvalError> {
        self(dag)
    }
}

/// Default oracle: v-structures plus Meek orientation rules R1-R3.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeekOracle;

impl EquivalenceOracle for MeekOracle {
    fn equivalence_class(&self, dag: &Dag) -> Result<SignedMatrix, EvalError> {
        if dag.topological_order().is_none() {
            return Err(EvalError::EquivalenceConversionFailed(
                "input graph contains a directed cycle".into(),
            ));
        }
        let mut pattern = Pattern::from_dag(dag);
        pattern.apply_meek_rules();
        Ok(pattern.to_signed())
    }
}

/// Partially directed graph used while orienting.
struct Pattern {
    n: usize,
    /// `directed[i * n + j]` means `i -> j`
    directed: Vec<bool>,
    /// symmetric
    undirected: Vec<bool>,
}

impl Pattern {
    fn from_dag(dag: &Dag) -> Self {
        let n = dag.size();
        let mut skeleton = vec![false; n * n];
        let mut parents = vec![Vec::new(); n];
        for &(p, c) in dag.edges() {
            skeleton[p * n + c] = true;
            skeleton[c * n + p] = true;
            parents[c].push(p);
        }

        let mut compelled = vec![false; n * n];
        for (child, ps) in parents.iter().enumerate() {
            for (k, &a) in ps.iter().enumerate() {
                for &b in &ps[k + 1..] {
                    if !skeleton[a * n + b] {
                        compelled[a * n + child] = true;
                        compelled[b * n + child] = true;
                    }
                }
            }
        }

        let mut directed = vec![false; n * n];
        let mut undirected = vec![false; n * n];
        for &(p, c) in dag.edges() {
            if compelled[p * n + c] {
                directed[p * n + c] = true;
            } else {
                undirected[p * n + c] = true;
                undirected[c * n + p] = true;
            }
        }
        Self {
            n,
            directed,
            undirected,
        }
    }

    #[inline]
    fn arrow(&self, i: usize, j: usize) -> bool {
        self.directed[i * self.n + j]
    }

    #[inline]
    fn line(&self, i: usize, j: usize) -> bool {
        self.undirected[i * self.n + j]
    }

    #[inline]
    fn adjacent(&self, i: usize, j: usize) -> bool {
        self.arrow(i, j) || self.arrow(j, i) || self.line(i, j)
    }

    fn orient(&mut self, from: usize, to: usize) {
        self.undirected[from * self.n + to] = false;
        self.undirected[to * self.n + from] = false;
        self.directed[from * self.n + to] = true;
    }

    /// Whether the undirected edge `x -- y` is compelled to `x -> y`.
    fn compelled(&self, x: usize, y: usize) -> bool {
        let n = self.n;
        // R1: a -> x -- y, a and y not adjacent
        if (0..n).any(|a| a != y && self.arrow(a, x) && !self.adjacent(a, y)) {
            return true;
        }
        // R2: x -> b -> y
        if (0..n).any(|b| self.arrow(x, b) && self.arrow(b, y)) {
            return true;
        }
        // R3: x -- c -> y, x -- d -> y, c and d not adjacent
        let kites: Vec<usize> = (0..n)
            .filter(|&c| c != y && self.line(x, c) && self.arrow(c, y))
            .collect();
        kites.iter().enumerate().any(|(k, &c)| {
            kites[k + 1..].iter().any(|&d| !self.adjacent(c, d))
        })
    }

    fn apply_meek_rules(&mut self) {
        let n = self.n;
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..n {
                for j in i + 1..n {
                    if !self.line(i, j) {
                        continue;
                    }
                    if self.compelled(i, j) {
                        self.orient(i, j);
                        changed = true;
                    } else if self.compelled(j, i) {
                        self.orient(j, i);
                        changed = true;
                    }
                }
            }
        }
    }

    fn to_signed(&self) -> SignedMatrix {
        let n = self.n;
        let mut out = SignedMatrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                if self.arrow(i, j) {
                    out.set(i, j, -1);
                    out.set(j, i, 1);
                } else if i < j && self.line(i, j) {
                    out.set(i, j, -1);
                    out.set(j, i, -1);
                }
            }
        }
        out
    }
}

/// Reduces matrices to their equivalence-class representative.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceReducer<O = MeekOracle> {
    oracle: O,
}

impl<O: EquivalenceOracle> EquivalenceReducer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns `m` unchanged when it already uses equivalence-class notation,
    /// otherwise the oracle's representative over the same `names` order.
    pub fn reduce(&self, m: &SignedMatrix, names: &[String]) -> Result<SignedMatrix, EvalError> {
        if names.len() != m.size() {
            return Err(EvalError::InvalidMatrix(format!(
                "{} names for a {}x{} matrix",
                names.len(),
                m.size(),
                m.size()
            )));
        }
        if is_already_equivalence_class(m) {
            #[cfg(feature = "tracing")]
            tracing::debug!("matrix already in equivalence-class notation; passing through");
            return Ok(m.clone());
        }
        let dag = Dag::from_signed(m, names);
        let reduced = self.oracle.equivalence_class(&dag)?;
        if reduced.size() != m.size() {
            return Err(EvalError::EquivalenceConversionFailed(format!(
                "oracle returned a {}x{} matrix for {} nodes",
                reduced.size(),
                reduced.size(),
                m.size()
            )));
        }
        Ok(reduced)
    }
}

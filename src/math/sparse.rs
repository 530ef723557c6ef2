//! Sparse storage and solvers for the global stiffness matrix
//!
//! Frame stiffness matrices are typically 95-99% sparse: each joint couples
//! only to the joints it shares an element with. Triplets are accumulated
//! during assembly and compressed to CSR for the solve.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use super::system::{check_finite, SolveSettings, SystemMatrix};
use super::{Mat, Vec};
use crate::error::{FrameError, FrameResult};

/// Sparse square matrix in COO (triplet) form.
///
/// Duplicate `(row, col)` triplets are summed, which makes element
/// assembly a plain push.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    size: usize,
    entries: std::vec::Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
    /// Create an empty matrix
    pub fn new(size: usize) -> Self {
        // ~10 neighbouring joints of 6 DOFs each
        Self {
            size,
            entries: std::vec::Vec::with_capacity(size * 60),
        }
    }

    /// Stored triplets, duplicates included
    pub fn triplets(&self) -> &[(usize, usize, f64)] {
        &self.entries
    }

    /// Convert to CSR format, summing duplicates
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Fraction of zero entries
    pub fn sparsity(&self) -> f64 {
        if self.size == 0 {
            return 1.0;
        }
        let total = self.size * self.size;
        1.0 - (self.to_csr().nnz() as f64 / total as f64)
    }

    /// Copy with rows and columns renumbered: entry `(r, c)` moves to
    /// `(inverse[r], inverse[c])`
    fn permuted(&self, inverse: &[usize]) -> Self {
        Self {
            size: self.size,
            entries: self
                .entries
                .iter()
                .map(|&(r, c, v)| (inverse[r], inverse[c], v))
                .collect(),
        }
    }
}

impl SystemMatrix for SparseMatrix {
    fn zeros(size: usize) -> Self {
        Self::new(size)
    }

    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.entries
            .iter()
            .filter(|&&(r, c, _)| r == row && c == col)
            .map(|&(_, _, v)| v)
            .sum()
    }

    fn constrain(&mut self, fixed: &[bool]) {
        self.entries.retain(|&(r, c, _)| !fixed[r] && !fixed[c]);
        for dof in (0..fixed.len()).filter(|&d| fixed[d]) {
            self.entries.push((dof, dof, 1.0));
        }
    }

    fn mul_vector(&self, x: &Vec) -> Vec {
        sparse_matvec(&self.to_csr(), x)
    }

    fn nnz(&self) -> usize {
        self.to_csr().nnz()
    }

    fn to_dense(&self) -> Mat {
        let mut mat = Mat::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    fn solve(&self, rhs: &Vec, settings: &SolveSettings) -> FrameResult<Vec> {
        if !settings.reorder {
            let mut solver = SkylineCholesky::new(&self.to_csr());
            log::debug!(
                "skyline solve: {} DOFs, sparsity {:.3}, profile {} entries",
                self.size,
                self.sparsity(),
                solver.profile_size()
            );
            solver.factorize(settings.pivot_tolerance)?;
            let x = solver.solve(rhs);
            check_finite(&x)?;
            return Ok(x);
        }

        let perm = reverse_cuthill_mckee(&self.to_csr());
        let inverse = inverse_permutation(&perm);

        let mut solver = SkylineCholesky::new(&self.permuted(&inverse).to_csr());
        log::debug!(
            "skyline solve (RCM): {} DOFs, sparsity {:.3}, profile {} entries",
            self.size,
            self.sparsity(),
            solver.profile_size()
        );
        solver.factorize(settings.pivot_tolerance)?;

        let rhs_p = DVector::from_iterator(self.size, perm.iter().map(|&old| rhs[old]));
        let x_p = solver.solve(&rhs_p);

        let mut x = DVector::zeros(self.size);
        for (new, &old) in perm.iter().enumerate() {
            x[old] = x_p[new];
        }
        check_finite(&x)?;
        Ok(x)
    }
}

/// Skyline (profile) Cholesky factorization for symmetric positive definite
/// matrices.
///
/// Only the lower profile of each row is stored: from its first non-zero
/// column up to the diagonal. Fill-in stays inside that profile.
pub struct SkylineCholesky {
    size: usize,
    // Row i holds columns (i - heights[i])..=i
    skyline: std::vec::Vec<std::vec::Vec<f64>>,
    heights: std::vec::Vec<usize>,
}

impl SkylineCholesky {
    /// Load the lower profile of a CSR matrix
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                heights[row] = heights[row].max(row - col);
            }
        }

        let mut skyline: std::vec::Vec<std::vec::Vec<f64>> = heights
            .iter()
            .map(|&h| vec![0.0; h + 1])
            .collect();

        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                let idx = col - (row - heights[row]);
                skyline[row][idx] += val;
            }
        }

        Self {
            size,
            skyline,
            heights,
        }
    }

    /// Stored entries of the profile
    pub fn profile_size(&self) -> usize {
        self.heights.iter().map(|h| h + 1).sum()
    }

    /// Factorize in place into `L * L^T`.
    ///
    /// A pivot that is non-positive, or smaller than `pivot_tolerance` times
    /// the original diagonal entry, means the matrix is singular.
    pub fn factorize(&mut self, pivot_tolerance: f64) -> FrameResult<()> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            for j in start_i..i {
                let start_j = j - self.heights[j];
                let start = start_i.max(start_j);

                let mut sum = 0.0;
                for k in start..j {
                    sum += self.get(i, k) * self.get(j, k);
                }

                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / self.get(j, j);
            }

            let original = self.skyline[i][hi];
            let mut sum = 0.0;
            for j in start_i..i {
                let val = self.get(i, j);
                sum += val * val;
            }

            let pivot = original - sum;
            if pivot <= 0.0 || pivot <= pivot_tolerance * original.abs() {
                return Err(FrameError::SingularSystem(format!(
                    "pivot {:e} at DOF {} vanishes against diagonal {:e}",
                    pivot, i, original
                )));
            }
            self.skyline[i][hi] = pivot.sqrt();
        }

        Ok(())
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        if col > row {
            return self.get(col, row);
        }
        let start = row - self.heights[row];
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Solve `L * L^T * x = b` with the factorized profile
    pub fn solve(&self, b: &Vec) -> Vec {
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let start = i - self.heights[i];

            let mut sum = 0.0;
            for j in start..i {
                sum += self.get(i, j) * x[j];
            }

            x[i] = (x[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);

            let start = i - self.heights[i];
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        x
    }
}

/// Sparse matrix-vector multiplication
fn sparse_matvec(csr: &CsrMatrix<f64>, x: &Vec) -> Vec {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let mut sum = 0.0;
        for idx in row_offsets[row]..row_offsets[row + 1] {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }

    y
}

/// Bandwidth reduction using Reverse Cuthill-McKee algorithm
///
/// Returns `perm` with `perm[new_index] = old_index`
pub fn reverse_cuthill_mckee(csr: &CsrMatrix<f64>) -> std::vec::Vec<usize> {
    let n = csr.nrows();
    if n == 0 {
        return vec![];
    }

    let mut adj: std::vec::Vec<std::vec::Vec<usize>> = vec![std::vec::Vec::new(); n];
    for (row, col, &val) in csr.triplet_iter() {
        if val != 0.0 && row != col {
            adj[row].push(col);
        }
    }

    let degrees: std::vec::Vec<usize> = adj.iter().map(|v| v.len()).collect();

    // Visit low-degree neighbours first
    for neighbors in &mut adj {
        neighbors.sort_by_key(|&i| degrees[i]);
    }

    let mut visited = vec![false; n];
    let mut result = std::vec::Vec::with_capacity(n);
    let mut queue = std::collections::VecDeque::new();

    let start = (0..n).min_by_key(|&i| degrees[i]).unwrap_or(0);
    queue.push_back(start);
    visited[start] = true;

    while let Some(node) = queue.pop_front() {
        result.push(node);

        for &neighbor in &adj[node] {
            if !visited[neighbor] {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }

        // Disconnected components
        if queue.is_empty() && result.len() < n {
            if let Some(next) = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| degrees[i]) {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    result.reverse();
    result
}

/// Create inverse permutation
pub fn inverse_permutation(perm: &[usize]) -> std::vec::Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new_idx, &old_idx) in perm.iter().enumerate() {
        inv[old_idx] = new_idx;
    }
    inv
}

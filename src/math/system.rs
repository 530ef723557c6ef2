//! Storage-agnostic global system matrix

use nalgebra::Cholesky;

use super::{Mat, Vec};
use crate::error::{FrameError, FrameResult};

/// Settings that control the linear solve
#[derive(Debug, Clone, Copy)]
pub struct SolveSettings {
    /// A Cholesky pivot smaller than this fraction of its original diagonal
    /// entry marks the system as singular
    pub pivot_tolerance: f64,
    /// Apply Reverse Cuthill-McKee before a sparse factorization
    pub reorder: bool,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-12,
            reorder: true,
        }
    }
}

/// Square matrix storage used for the global stiffness matrix.
///
/// The assembler, the restraint enforcer and the solver only talk to this
/// trait, so dense and sparse storage are interchangeable.
pub trait SystemMatrix: Clone {
    /// A zero matrix of `size x size`
    fn zeros(size: usize) -> Self;

    /// Number of rows (and columns)
    fn size(&self) -> usize;

    /// Accumulate `value` into entry `(row, col)`
    fn add(&mut self, row: usize, col: usize, value: f64);

    /// Read entry `(row, col)`
    fn get(&self, row: usize, col: usize) -> f64;

    /// Zero the rows and columns of every DOF flagged in `fixed` and put 1 on
    /// their diagonal
    fn constrain(&mut self, fixed: &[bool]);

    /// Matrix-vector product
    fn mul_vector(&self, x: &Vec) -> Vec;

    /// Number of stored entries
    fn nnz(&self) -> usize;

    /// Dense copy for display
    fn to_dense(&self) -> Mat;

    /// Solve `self * x = rhs` for a symmetric positive definite matrix.
    ///
    /// Fails with `SingularSystem` if a pivot collapses or the solution is not
    /// finite.
    fn solve(&self, rhs: &Vec, settings: &SolveSettings) -> FrameResult<Vec>;
}

impl SystemMatrix for Mat {
    fn zeros(size: usize) -> Self {
        Mat::zeros(size, size)
    }

    fn size(&self) -> usize {
        self.nrows()
    }

    #[inline]
    fn add(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] += value;
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn constrain(&mut self, fixed: &[bool]) {
        for dof in (0..fixed.len()).filter(|&d| fixed[d]) {
            self.row_mut(dof).fill(0.0);
            self.column_mut(dof).fill(0.0);
            self[(dof, dof)] = 1.0;
        }
    }

    fn mul_vector(&self, x: &Vec) -> Vec {
        self * x
    }

    fn nnz(&self) -> usize {
        self.iter().filter(|v| **v != 0.0).count()
    }

    fn to_dense(&self) -> Mat {
        self.clone()
    }

    fn solve(&self, rhs: &Vec, settings: &SolveSettings) -> FrameResult<Vec> {
        let diagonal = self.diagonal();

        let chol = Cholesky::new(self.clone()).ok_or_else(|| {
            FrameError::SingularSystem("stiffness matrix is not positive definite".to_string())
        })?;

        let l = chol.l_dirty();
        for i in 0..self.nrows() {
            let pivot = l[(i, i)] * l[(i, i)];
            if pivot <= settings.pivot_tolerance * diagonal[i].abs() {
                return Err(FrameError::SingularSystem(format!(
                    "pivot {:e} at DOF {} vanishes against diagonal {:e}",
                    pivot, i, diagonal[i]
                )));
            }
        }

        let x = chol.solve(rhs);
        check_finite(&x)?;
        Ok(x)
    }
}

/// Reject solutions containing NaN or infinity
pub(crate) fn check_finite(x: &Vec) -> FrameResult<()> {
    match x.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(FrameError::SingularSystem(format!(
            "solution is not finite at DOF {}",
            i
        ))),
        None => Ok(()),
    }
}

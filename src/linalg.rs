//! Dense linear algebra for the Wiener normal equations.
//!
//! Provides a heap-backed matrix, a Jacobi eigendecomposition for symmetric
//! matrices and a minimum-norm least-squares solver built on top of it.
//!
//! # Matrix Storage
//!
//! Matrices are stored in row-major order as a flat vector. For an R×C
//! matrix the element at row i, column j lives at index `i * C + j`.
//!
//! # Least Squares
//!
//! [`Matrix::lstsq_symmetric`] solves `A x = b` through the pseudo-inverse
//! `V Λ⁺ Vᵀ b`. Eigenvalues with magnitude below `rcond · max|λ|` are treated
//! as zero, so a singular or ill-conditioned system yields the minimum-norm
//! least-squares solution and a well-conditioned one yields the exact
//! solution. There is no separate direct-solve path.

use alloc::vec;
use alloc::vec::Vec;

/// Relative eigenvalue cutoff used by the Wiener solver.
pub const DEFAULT_RCOND: f64 = 1e-12;

/// Off-diagonal tolerance, relative to the Frobenius norm, at which Jacobi
/// iteration stops.
pub const JACOBI_TOL: f64 = 1e-13;

/// Rotation budget per matrix entry for Jacobi iteration.
const ROTATIONS_PER_ENTRY: usize = 100;

/// Errors that can occur during matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Eigenvalue decomposition did not converge
    ConvergenceFailed,

    /// Matrix is not square
    NotSquare,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::ConvergenceFailed => write!(f, "eigendecomposition did not converge"),
            LinalgError::NotSquare => write!(f, "matrix is not square"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// A dense matrix stored in row-major order.
///
/// # Example
///
/// ```
/// use adaptfir::linalg::Matrix;
///
/// let eye = Matrix::identity(2);
/// assert_eq!(eye.get(0, 0), 1.0);
/// assert_eq!(eye.get(0, 1), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    /// Matrix data in row-major order
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create an n×n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a matrix whose entry (i, j) is `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert!(
            data.len() == rows * cols,
            "Matrix data length must equal rows * cols"
        );
        Self { rows, cols, data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True for a square matrix.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Get element at row i, column j.
    ///
    /// # Panics
    ///
    /// Panics if i >= rows or j >= cols.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "Index out of bounds");
        self.data[i * self.cols + j]
    }

    /// Set element at row i, column j.
    ///
    /// # Panics
    ///
    /// Panics if i >= rows or j >= cols.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "Index out of bounds");
        self.data[i * self.cols + j] = value;
    }

    /// Underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Row i as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "Index out of bounds");
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Matrix-vector product self × v.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != self.cols()`.
    pub fn matvec(&self, v: &[f64]) -> Vec<f64> {
        assert!(v.len() == self.cols, "Vector length must equal column count");
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// True if square and `|a_ij - a_ji| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if libm::fabs(self.get(i, j) - self.get(j, i)) > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Frobenius norm, `sqrt(Σ a_ij²)`.
    ///
    /// Entries are scaled by the largest magnitude before squaring, so the
    /// result stays finite whenever it is representable.
    pub fn frobenius_norm(&self) -> f64 {
        let scale = self
            .data
            .iter()
            .fold(0.0f64, |acc, &v| acc.max(libm::fabs(v)));
        if scale == 0.0 || !scale.is_finite() {
            return scale;
        }
        let sum: f64 = self.data.iter().map(|&v| (v / scale) * (v / scale)).sum();
        scale * libm::sqrt(sum)
    }

    /// Eigenvalue decomposition using Jacobi iteration for symmetric matrices.
    ///
    /// Computes eigenvalues and eigenvectors such that A = V Λ Vᵀ. The matrix
    /// is assumed symmetric; symmetry is not checked.
    ///
    /// # Arguments
    ///
    /// * `max_rotations` - Maximum number of Jacobi rotations
    /// * `tol` - Convergence tolerance for the largest off-diagonal element,
    ///   relative to the Frobenius norm
    ///
    /// # Returns
    ///
    /// Eigenvalues in descending order with corresponding eigenvectors.
    ///
    /// # Errors
    ///
    /// [`LinalgError::NotSquare`] for a non-square matrix,
    /// [`LinalgError::ConvergenceFailed`] if the rotation budget runs out.
    ///
    /// # Performance
    ///
    /// O(n²) per rotation to locate the pivot, roughly n² rotations.
    pub fn eigen_symmetric(
        &self,
        max_rotations: usize,
        tol: f64,
    ) -> Result<EigenDecomposition, LinalgError> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare);
        }
        let (eigen, converged) = jacobi(self, max_rotations, tol);
        if converged {
            Ok(eigen)
        } else {
            Err(LinalgError::ConvergenceFailed)
        }
    }

    /// Minimum-norm least-squares solution of `A x = b` for symmetric A.
    ///
    /// Eigenvalues with `|λ| <= rcond · max|λ|` are discarded. When Jacobi
    /// does not converge within its budget the partially diagonalized result
    /// is used and a warning is logged.
    ///
    /// # Panics
    ///
    /// Panics if A is not square or `b.len() != A.rows()`.
    ///
    /// # Example
    ///
    /// ```
    /// use adaptfir::linalg::Matrix;
    ///
    /// // Singular system: every x with x0 + x1 = 2 solves it
    /// let a = Matrix::from_row_major(2, 2, vec![1.0, 1.0, 1.0, 1.0]);
    /// let ls = a.lstsq_symmetric(&[2.0, 2.0], 1e-12);
    ///
    /// assert_eq!(ls.rank, 1);
    /// assert!((ls.solution[0] - 1.0).abs() < 1e-10);
    /// assert!((ls.solution[1] - 1.0).abs() < 1e-10);
    /// ```
    pub fn lstsq_symmetric(&self, b: &[f64], rcond: f64) -> LeastSquares {
        assert!(self.is_square(), "Least-squares solve requires a square matrix");
        assert!(b.len() == self.rows, "Right-hand side length must equal row count");

        let n = self.rows;
        let max_rotations = ROTATIONS_PER_ENTRY * n * n;
        let (eigen, converged) = jacobi(self, max_rotations, JACOBI_TOL);
        if !converged {
            log::warn!(
                "jacobi did not converge within {} rotations for n={}",
                max_rotations,
                n
            );
        }

        let largest = eigen
            .eigenvalues
            .iter()
            .fold(0.0f64, |acc, &l| acc.max(libm::fabs(l)));
        let cutoff = rcond * largest;

        let mut solution = vec![0.0; n];
        let mut rank = 0;
        for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
            if libm::fabs(lambda) <= cutoff {
                continue;
            }
            rank += 1;

            // Project b onto the k-th eigenvector, scale by 1/λ
            let mut proj = 0.0;
            for (i, &b_i) in b.iter().enumerate() {
                proj += eigen.eigenvectors.get(i, k) * b_i;
            }
            let coeff = proj / lambda;
            for (i, x_i) in solution.iter_mut().enumerate() {
                *x_i += coeff * eigen.eigenvectors.get(i, k);
            }
        }

        if rank < n {
            log::debug!(
                "rank deficient system: rank {} of {}, cutoff {:e}",
                rank,
                n,
                cutoff
            );
        }

        LeastSquares { solution, rank }
    }
}

/// Result of a least-squares solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquares {
    /// Minimum-norm solution vector
    pub solution: Vec<f64>,

    /// Number of eigenvalues above the cutoff
    pub rank: usize,
}

/// Result of eigenvalue decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    /// Eigenvalues in descending order
    pub eigenvalues: Vec<f64>,

    /// Eigenvectors as columns (eigenvectors.get(row, col) = col-th eigenvector, row-th element)
    pub eigenvectors: Matrix,
}

impl EigenDecomposition {
    /// Get the k-th eigenvector.
    pub fn eigenvector(&self, k: usize) -> Vec<f64> {
        (0..self.eigenvectors.rows())
            .map(|i| self.eigenvectors.get(i, k))
            .collect()
    }
}

/// Classical Jacobi iteration. Returns the decomposition and whether the
/// off-diagonal tolerance was reached.
fn jacobi(m: &Matrix, max_rotations: usize, tol: f64) -> (EigenDecomposition, bool) {
    let n = m.rows();

    // Copy matrix (will be modified to diagonal form)
    let mut a = m.clone();
    let mut v = Matrix::identity(n);
    let threshold = tol * m.frobenius_norm();

    let mut rotations = 0;
    let converged = loop {
        let (p, q, max_val) = find_max_off_diagonal(&a);
        if max_val <= threshold {
            break true;
        }
        if rotations == max_rotations {
            break false;
        }

        let (c, s, t) = compute_jacobi_rotation(&a, p, q);
        apply_jacobi_rotation(&mut a, p, q, c, s, t);
        apply_rotation_to_vectors(&mut v, p, q, c, s);
        rotations += 1;
    };

    let mut eigenvalues: Vec<f64> = (0..n).map(|i| a.get(i, i)).collect();
    sort_eigen(&mut eigenvalues, &mut v);

    (
        EigenDecomposition {
            eigenvalues,
            eigenvectors: v,
        },
        converged,
    )
}

/// Find the maximum off-diagonal element in a symmetric matrix.
fn find_max_off_diagonal(a: &Matrix) -> (usize, usize, f64) {
    let n = a.rows();
    let mut max_i = 0;
    let mut max_j = 0;
    let mut max_val = 0.0;

    for i in 0..n {
        for j in (i + 1)..n {
            let val = libm::fabs(a.get(i, j));
            if val > max_val {
                max_val = val;
                max_i = i;
                max_j = j;
            }
        }
    }

    (max_i, max_j, max_val)
}

/// Compute rotation `(cos, sin, tan)` that annihilates A[p,q].
fn compute_jacobi_rotation(a: &Matrix, p: usize, q: usize) -> (f64, f64, f64) {
    let a_pp = a.get(p, p);
    let a_qq = a.get(q, q);
    let a_pq = a.get(p, q);

    let theta = (a_qq - a_pp) / (2.0 * a_pq);
    let t = if theta >= 0.0 {
        1.0 / (theta + libm::sqrt(1.0 + theta * theta))
    } else {
        -1.0 / (-theta + libm::sqrt(1.0 + theta * theta))
    };

    let c = 1.0 / libm::sqrt(1.0 + t * t);
    let s = t * c;

    (c, s, t)
}

/// Apply Jacobi rotation to matrix A: A' = Rᵀ A R.
fn apply_jacobi_rotation(a: &mut Matrix, p: usize, q: usize, c: f64, s: f64, t: f64) {
    let n = a.rows();
    let a_pq = a.get(p, q);

    a.set(p, p, a.get(p, p) - t * a_pq);
    a.set(q, q, a.get(q, q) + t * a_pq);
    a.set(p, q, 0.0);
    a.set(q, p, 0.0);

    for k in 0..n {
        if k != p && k != q {
            let a_kp = a.get(k, p);
            let a_kq = a.get(k, q);

            let new_a_kp = c * a_kp - s * a_kq;
            let new_a_kq = s * a_kp + c * a_kq;

            a.set(k, p, new_a_kp);
            a.set(p, k, new_a_kp);
            a.set(k, q, new_a_kq);
            a.set(q, k, new_a_kq);
        }
    }
}

/// Apply rotation to eigenvector matrix: V' = V R.
fn apply_rotation_to_vectors(v: &mut Matrix, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..v.rows() {
        let v_kp = v.get(k, p);
        let v_kq = v.get(k, q);

        v.set(k, p, c * v_kp - s * v_kq);
        v.set(k, q, s * v_kp + c * v_kq);
    }
}

/// Sort eigenvalues in descending order and reorder corresponding eigenvectors.
fn sort_eigen(eigenvalues: &mut [f64], eigenvectors: &mut Matrix) {
    let n = eigenvalues.len();
    // Selection sort, adequate for filter orders
    for i in 0..n {
        let mut max_idx = i;
        for j in (i + 1)..n {
            if eigenvalues[j] > eigenvalues[max_idx] {
                max_idx = j;
            }
        }

        if max_idx != i {
            eigenvalues.swap(i, max_idx);

            for k in 0..eigenvectors.rows() {
                let tmp = eigenvectors.get(k, i);
                eigenvectors.set(k, i, eigenvectors.get(k, max_idx));
                eigenvectors.set(k, max_idx, tmp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym3() -> Matrix {
        Matrix::from_row_major(3, 3, vec![4.0, 1.0, 1.0, 1.0, 4.0, 1.0, 1.0, 1.0, 4.0])
    }

    #[test]
    fn test_matrix_identity() {
        let eye = Matrix::identity(3);
        assert_eq!(eye.get(0, 0), 1.0);
        assert_eq!(eye.get(1, 1), 1.0);
        assert_eq!(eye.get(2, 2), 1.0);
        assert_eq!(eye.get(0, 1), 0.0);
        assert_eq!(eye.get(1, 0), 0.0);
    }

    #[test]
    fn test_matrix_get_set() {
        let mut m = Matrix::zeros(2, 3);
        m.set(0, 1, 5.0);
        m.set(1, 2, 3.0);

        assert_eq!(m.get(0, 1), 5.0);
        assert_eq!(m.get(1, 2), 3.0);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert!(!m.is_square());
    }

    #[test]
    #[should_panic(expected = "Index out of bounds")]
    fn test_matrix_get_out_of_bounds() {
        Matrix::zeros(2, 2).get(2, 0);
    }

    #[test]
    fn test_matrix_from_fn() {
        let m = Matrix::from_fn(2, 2, |i, j| (i * 10 + j) as f64);
        assert_eq!(m.data(), &[0.0, 1.0, 10.0, 11.0]);
        assert_eq!(m.row(1), &[10.0, 11.0]);
    }

    #[test]
    fn test_matvec() {
        let a = Matrix::from_row_major(2, 3, vec![1.0, 0.0, 2.0, -1.0, 3.0, 1.0]);
        assert_eq!(a.matvec(&[1.0, 2.0, 3.0]), vec![7.0, 8.0]);
    }

    #[test]
    fn test_is_symmetric() {
        assert!(sym3().is_symmetric(0.0));
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 2.5, 1.0]);
        assert!(!a.is_symmetric(1e-12));
        assert!(!Matrix::zeros(2, 3).is_symmetric(1.0));
    }

    #[test]
    fn test_frobenius_norm() {
        let a = Matrix::from_row_major(2, 2, vec![3.0, 0.0, 0.0, -4.0]);
        assert!((a.frobenius_norm() - 5.0).abs() < 1e-12);
        assert_eq!(Matrix::zeros(2, 2).frobenius_norm(), 0.0);

        // Squares of these entries overflow f64
        let big = Matrix::from_row_major(2, 2, vec![3e200, 0.0, 0.0, -4e200]);
        let norm = big.frobenius_norm();
        assert!(norm.is_finite());
        assert!((norm / 5e200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigen_identity() {
        let eigen = Matrix::identity(3).eigen_symmetric(100, 1e-13).unwrap();
        for &l in &eigen.eigenvalues {
            assert!((l - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_eigen_single_entry() {
        let a = Matrix::from_row_major(1, 1, vec![2.5]);
        let eigen = a.eigen_symmetric(10, 1e-13).unwrap();
        assert_eq!(eigen.eigenvalues, vec![2.5]);
        assert_eq!(eigen.eigenvector(0), vec![1.0]);
    }

    #[test]
    fn test_eigen_sorting() {
        let mut a = Matrix::zeros(4, 4);
        a.set(0, 0, 1.0);
        a.set(1, 1, 4.0);
        a.set(2, 2, 2.0);
        a.set(3, 3, 3.0);

        let eigen = a.eigen_symmetric(100, 1e-13).unwrap();
        assert_eq!(eigen.eigenvalues, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_eigen_symmetric_2x2() {
        // Eigenvalues 4 and 2
        let a = Matrix::from_row_major(2, 2, vec![3.0, 1.0, 1.0, 3.0]);
        let eigen = a.eigen_symmetric(100, 1e-13).unwrap();

        assert!((eigen.eigenvalues[0] - 4.0).abs() < 1e-10);
        assert!((eigen.eigenvalues[1] - 2.0).abs() < 1e-10);

        // Av = λv
        let v0 = eigen.eigenvector(0);
        let av0 = a.matvec(&v0);
        for i in 0..2 {
            assert!((av0[i] - eigen.eigenvalues[0] * v0[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_eigen_orthogonal_eigenvectors() {
        let a = sym3();
        let eigen = a.eigen_symmetric(200, 1e-13).unwrap();

        // Eigenvalues of [[4,1,1],[1,4,1],[1,1,4]] are 6, 3, 3
        assert!((eigen.eigenvalues[0] - 6.0).abs() < 1e-10);
        assert!((eigen.eigenvalues[1] - 3.0).abs() < 1e-10);
        assert!((eigen.eigenvalues[2] - 3.0).abs() < 1e-10);

        for i in 0..3 {
            let vi = eigen.eigenvector(i);
            let norm_sq: f64 = vi.iter().map(|v| v * v).sum();
            assert!((norm_sq - 1.0).abs() < 1e-10, "Eigenvector not normalized");

            for j in (i + 1)..3 {
                let vj = eigen.eigenvector(j);
                let dot: f64 = vi.iter().zip(&vj).map(|(a, b)| a * b).sum();
                assert!(libm::fabs(dot) < 1e-10, "Eigenvectors not orthogonal");
            }
        }
    }

    #[test]
    fn test_eigen_not_square() {
        assert_eq!(
            Matrix::zeros(2, 3).eigen_symmetric(10, 1e-13),
            Err(LinalgError::NotSquare)
        );
    }

    #[test]
    fn test_eigen_convergence_failed() {
        // A dense matrix cannot be diagonalized with zero rotations
        assert_eq!(
            sym3().eigen_symmetric(0, 1e-13),
            Err(LinalgError::ConvergenceFailed)
        );
    }

    #[test]
    fn test_lstsq_well_conditioned_is_exact() {
        let a = sym3();
        let x_true = [1.0, -2.0, 0.5];
        let b = a.matvec(&x_true);

        let ls = a.lstsq_symmetric(&b, DEFAULT_RCOND);
        assert_eq!(ls.rank, 3);
        for i in 0..3 {
            assert!((ls.solution[i] - x_true[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_lstsq_huge_entries() {
        let a = Matrix::from_fn(3, 3, |i, j| 1e200 * sym3().get(i, j));
        let x_true = [1.0, -2.0, 0.5];
        let b = a.matvec(&x_true);

        let ls = a.lstsq_symmetric(&b, DEFAULT_RCOND);
        assert_eq!(ls.rank, 3);
        for i in 0..3 {
            assert!((ls.solution[i] - x_true[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_lstsq_singular_minimum_norm() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 1.0, 1.0, 1.0]);
        let ls = a.lstsq_symmetric(&[2.0, 2.0], DEFAULT_RCOND);
        assert_eq!(ls.rank, 1);
        assert!((ls.solution[0] - 1.0).abs() < 1e-10);
        assert!((ls.solution[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_lstsq_inconsistent_system() {
        // b has a component outside the range of A; it is dropped
        let a = Matrix::from_row_major(2, 2, vec![2.0, 0.0, 0.0, 0.0]);
        let ls = a.lstsq_symmetric(&[4.0, 1.0], DEFAULT_RCOND);
        assert_eq!(ls.rank, 1);
        assert!((ls.solution[0] - 2.0).abs() < 1e-12);
        assert_eq!(ls.solution[1], 0.0);
    }

    #[test]
    fn test_lstsq_zero_matrix() {
        let ls = Matrix::zeros(3, 3).lstsq_symmetric(&[1.0, 2.0, 3.0], DEFAULT_RCOND);
        assert_eq!(ls.rank, 0);
        assert_eq!(ls.solution, vec![0.0; 3]);
    }

    #[test]
    fn test_lstsq_indefinite() {
        // Symmetric but indefinite: eigenvalues 3 and -1
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 2.0, 1.0]);
        let x_true = [0.25, -1.5];
        let b = a.matvec(&x_true);
        let ls = a.lstsq_symmetric(&b, DEFAULT_RCOND);
        assert_eq!(ls.rank, 2);
        for i in 0..2 {
            assert!((ls.solution[i] - x_true[i]).abs() < 1e-10);
        }
    }
}

//! Triplet-based sparse matrix used during assembly, plus the faer
//! factorization wrapper doing the actual linear solves.

use faer::solvers::SpSolver;

/// Sparse matrix under construction.
///
/// Assembly pushes local contributions as (row, col, value) triplets;
/// duplicate coordinates are summed on conversion to CSR/CSC. Once
/// converted, the matrix is final and never restructured.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self {
      nrows,
      ncols,
      triplets: Vec::new(),
    }
  }

  /// Preallocates for the nonzero count predicted by the sparsity pattern.
  pub fn with_capacity(nrows: usize, ncols: usize, nnz: usize) -> Self {
    Self {
      nrows,
      ncols,
      triplets: Vec::with_capacity(nnz),
    }
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn ntriplets(&self) -> usize {
    self.triplets.len()
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    self.triplets.push((r, c, v));
  }

  /// Drops every triplet matching the predicate. This is how Dirichlet row
  /// substitution clears constrained rows.
  pub fn set_zero<F>(&mut self, predicate: F)
  where
    F: Fn(usize, usize) -> bool,
  {
    let mut i = 0;
    while i < self.triplets.len() {
      let (r, c, _) = self.triplets[i];
      if predicate(r, c) {
        self.triplets.swap_remove(i);
      } else {
        i += 1;
      }
    }
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let rows = self.triplets.iter().map(|t| t.0).collect();
    let cols = self.triplets.iter().map(|t| t.1).collect();
    let vals = self.triplets.iter().map(|t| t.2).collect();
    nas::CooMatrix::try_from_triplets(self.nrows, self.ncols, rows, cols, vals)
      .expect("triplets are in bounds")
  }

  pub fn to_nalgebra_csr(&self) -> nas::CsrMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

fn nalgebra2faer(m: nas::CscMatrix<f64>) -> faer::sparse::SparseColMat<usize, f64> {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

/// Sparse LU factorization, computed once and reused for every time step.
///
/// LU rather than Cholesky: Dirichlet substitution zeroes rows but not
/// columns, which breaks the symmetry of the system matrix.
pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}

impl FaerLu {
  pub fn new(a: nas::CscMatrix<f64>) -> Self {
    let raw = nalgebra2faer(a).sp_lu().expect("system matrix is singular");
    Self { raw }
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn duplicate_triplets_accumulate() {
    let mut matrix = SparseMatrix::zeros(2, 2);
    matrix.push(0, 0, 1.0);
    matrix.push(0, 0, 2.0);
    matrix.push(1, 0, 4.0);
    let dense = matrix.to_nalgebra_dense();
    assert_eq!(dense[(0, 0)], 3.0);
    assert_eq!(dense[(1, 0)], 4.0);
    assert_eq!(dense[(1, 1)], 0.0);
  }

  #[test]
  fn set_zero_clears_rows() {
    let mut matrix = SparseMatrix::zeros(2, 2);
    matrix.push(0, 0, 1.0);
    matrix.push(0, 1, 2.0);
    matrix.push(1, 1, 3.0);
    matrix.set_zero(|r, _| r == 0);
    let dense = matrix.to_nalgebra_dense();
    assert_eq!(dense[(0, 0)], 0.0);
    assert_eq!(dense[(0, 1)], 0.0);
    assert_eq!(dense[(1, 1)], 3.0);
  }

  #[test]
  fn lu_solves_a_small_system() {
    let mut matrix = SparseMatrix::zeros(2, 2);
    matrix.push(0, 0, 2.0);
    matrix.push(0, 1, 1.0);
    matrix.push(1, 1, 3.0);
    let lu = FaerLu::new(matrix.to_nalgebra_csc());
    let x = lu.solve(&na::DVector::from_vec(vec![5.0, 9.0]));
    assert!((x[0] - 1.0).abs() < 1e-12);
    assert!((x[1] - 3.0).abs() < 1e-12);
  }
}

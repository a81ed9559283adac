//! Degree-of-freedom bookkeeping for first-order Lagrangian elements.

use crate::{geometry::Point, mesh::TriangleMesh, DofIdx};

use std::rc::Rc;

/// Bijection between mesh vertices and global unknowns.
///
/// For order-1 elements every vertex carries exactly one scalar unknown, so
/// the map is the identity on vertex indices. Built once after the mesh is
/// read and immutable afterwards.
pub struct DofHandler {
  mesh: Rc<TriangleMesh>,
}

impl DofHandler {
  pub fn distribute(mesh: Rc<TriangleMesh>) -> Self {
    Self { mesh }
  }

  pub fn ndofs(&self) -> usize {
    self.mesh.n_vertices()
  }

  pub fn mesh(&self) -> &TriangleMesh {
    &self.mesh
  }

  /// Coordinates of the vertex carrying this unknown.
  pub fn dof_point(&self, idof: DofIdx) -> Point {
    self.mesh.vertex(idof)
  }

  /// Global unknowns of one triangle, in local vertex order.
  pub fn local2global(&self, icell: usize) -> [DofIdx; 3] {
    self.mesh.triangle(icell).vertices()
  }

  /// Unknowns constrained by the Dirichlet boundary, sorted.
  pub fn boundary_dofs(&self) -> Vec<DofIdx> {
    self.mesh.boundary_vertices()
  }
}

/// Symmetric nonzero structure over the unknowns, induced by vertex pairs
/// sharing a triangle. Built once and consumed to preallocate the global
/// matrices.
pub struct SparsityPattern {
  row_cols: Vec<Vec<DofIdx>>,
}

impl SparsityPattern {
  pub fn from_connectivity(dofs: &DofHandler) -> Self {
    let mut row_cols = vec![Vec::new(); dofs.ndofs()];
    for icell in 0..dofs.mesh().n_triangles() {
      let cell_dofs = dofs.local2global(icell);
      for &i in &cell_dofs {
        for &j in &cell_dofs {
          row_cols[i].push(j);
        }
      }
    }
    for cols in &mut row_cols {
      cols.sort_unstable();
      cols.dedup();
    }
    Self { row_cols }
  }

  /// Number of rows (= columns = unknowns).
  pub fn order(&self) -> usize {
    self.row_cols.len()
  }

  /// Number of structurally nonzero entries.
  pub fn nnz(&self) -> usize {
    self.row_cols.iter().map(|cols| cols.len()).sum()
  }

  pub fn row(&self, irow: DofIdx) -> &[DofIdx] {
    &self.row_cols[irow]
  }
}

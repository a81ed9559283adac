//! Scatter of local element contributions into global sparse structures.

use crate::{
  config::Config,
  fe,
  geometry::Point,
  space::{DofHandler, SparsityPattern},
  sparse::SparseMatrix,
};

/// Assembles the global mass and stiffness matrices in one sweep over the
/// triangles, with coefficients chosen per element from its material tag.
///
/// Runs once per simulation: geometry and coefficients are static, only
/// right-hand sides change between steps.
pub fn assemble_galmats(
  dofs: &DofHandler,
  pattern: &SparsityPattern,
  config: &Config,
) -> (SparseMatrix, SparseMatrix) {
  let mesh = dofs.mesh();
  let ndofs = dofs.ndofs();
  let mut mass = SparseMatrix::with_capacity(ndofs, ndofs, pattern.nnz());
  let mut stiffness = SparseMatrix::with_capacity(ndofs, ndofs, pattern.nnz());

  for icell in 0..mesh.n_triangles() {
    let coords = mesh.triangle_coords(icell);
    let pair = config.coefficients(mesh.triangle(icell).material_id());
    let mass_el = fe::mass_elmat(&coords, pair.alpha);
    let stiffness_el = fe::stiffness_elmat(&coords, pair.beta);

    let cell_dofs = dofs.local2global(icell);
    for (i, &dof_i) in cell_dofs.iter().enumerate() {
      for (j, &dof_j) in cell_dofs.iter().enumerate() {
        mass.push(dof_i, dof_j, mass_el[(i, j)]);
        stiffness.push(dof_i, dof_j, stiffness_el[(i, j)]);
      }
    }
  }

  (mass, stiffness)
}

/// Assembles the global source vector for one time value.
pub fn assemble_source<F>(dofs: &DofHandler, source: &F, t: f64) -> na::DVector<f64>
where
  F: Fn(&Point, f64) -> f64,
{
  let mesh = dofs.mesh();
  let mut galvec = na::DVector::zeros(dofs.ndofs());
  for icell in 0..mesh.n_triangles() {
    let coords = mesh.triangle_coords(icell);
    let elvec = fe::load_elvec(&coords, source, t);
    for (i, &dof_i) in dofs.local2global(icell).iter().enumerate() {
      galvec[dof_i] += elvec[i];
    }
  }
  galvec
}

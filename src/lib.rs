//! 2D transient acoustic wave propagation on unstructured triangular meshes.
//!
//! The pressure field `u` solves `alpha u'' - div(beta grad u) = f` with
//! Dirichlet boundary conditions, discretized with first-order Lagrangian
//! finite elements in space and an explicit central-difference (leapfrog)
//! scheme in time. Meshes are read from Gmsh 2.2 `.msh` files.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod config;
pub mod error;
pub mod fe;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod space;
pub mod sparse;
pub mod wave;

pub use error::{Error, Result};

/// Index of a mesh vertex.
pub type VertexIdx = usize;
/// Index of a global degree of freedom.
pub type DofIdx = usize;

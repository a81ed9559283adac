//! Geometric primitives making up the triangular mesh.

use crate::VertexIdx;

/// Coordinates of a mesh vertex.
///
/// The mesh file format reserves three components per node; the third one is
/// dropped on read since the solver is strictly 2D.
pub type Point = na::Vector2<f64>;

/// A 2-node line element on the domain boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLine {
  vertices: [VertexIdx; 2],
  boundary_id: i32,
}

impl BoundaryLine {
  pub fn new(vertices: [VertexIdx; 2], boundary_id: i32) -> Self {
    Self {
      vertices,
      boundary_id,
    }
  }

  pub fn vertices(&self) -> [VertexIdx; 2] {
    self.vertices
  }

  /// Physical-domain tag of the boundary segment.
  pub fn boundary_id(&self) -> i32 {
    self.boundary_id
  }
}

/// A 3-node triangle element.
///
/// The vertex order defines the orientation entering the area and
/// basis-gradient formulas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
  vertices: [VertexIdx; 3],
  material_id: i32,
  partition: i32,
  ghost_partitions: Vec<i32>,
}

impl Triangle {
  pub fn new(
    vertices: [VertexIdx; 3],
    material_id: i32,
    partition: i32,
    ghost_partitions: Vec<i32>,
  ) -> Self {
    Self {
      vertices,
      material_id,
      partition,
      ghost_partitions,
    }
  }

  pub fn vertices(&self) -> [VertexIdx; 3] {
    self.vertices
  }

  /// Physical-domain tag selecting the material coefficients.
  pub fn material_id(&self) -> i32 {
    self.material_id
  }

  /// Domain-decomposition partition owning this element.
  /// Parsed from the mesh file but unused by the sequential solve.
  pub fn partition(&self) -> i32 {
    self.partition
  }

  /// Neighboring partitions sharing this element, stored as positive ids.
  pub fn ghost_partitions(&self) -> &[i32] {
    &self.ghost_partitions
  }
}

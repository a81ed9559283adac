//! In-memory model of the unstructured triangular mesh.
//!
//! The mesh is built exactly once by [`gmsh::read_msh`] and is read-only for
//! the rest of the run; no element or vertex is ever added, removed or
//! mutated after the read completes.

pub mod gmsh;

use crate::{
  geometry::{BoundaryLine, Point, Triangle},
  VertexIdx,
};

use itertools::Itertools;

#[derive(Debug, Clone)]
pub struct TriangleMesh {
  vertices: Vec<Point>,
  triangles: Vec<Triangle>,
  boundary_lines: Vec<BoundaryLine>,
  min_coord: Point,
  max_coord: Point,
}

impl TriangleMesh {
  pub(crate) fn new(
    vertices: Vec<Point>,
    triangles: Vec<Triangle>,
    boundary_lines: Vec<BoundaryLine>,
    min_coord: Point,
    max_coord: Point,
  ) -> Self {
    Self {
      vertices,
      triangles,
      boundary_lines,
      min_coord,
      max_coord,
    }
  }

  pub fn n_vertices(&self) -> usize {
    self.vertices.len()
  }

  pub fn vertex(&self, ivertex: VertexIdx) -> Point {
    self.vertices[ivertex]
  }

  pub fn vertices(&self) -> &[Point] {
    &self.vertices
  }

  pub fn n_triangles(&self) -> usize {
    self.triangles.len()
  }

  pub fn triangle(&self, icell: usize) -> &Triangle {
    &self.triangles[icell]
  }

  pub fn triangles(&self) -> &[Triangle] {
    &self.triangles
  }

  pub fn boundary_lines(&self) -> &[BoundaryLine] {
    &self.boundary_lines
  }

  /// Componentwise minimum over all vertices. Not necessarily a mesh vertex
  /// if the physical domain has curved boundaries.
  pub fn min_coord(&self) -> Point {
    self.min_coord
  }

  /// Componentwise maximum over all vertices.
  pub fn max_coord(&self) -> Point {
    self.max_coord
  }

  /// Vertex coordinates of one triangle, in local order.
  pub fn triangle_coords(&self, icell: usize) -> [Point; 3] {
    self.triangle(icell).vertices().map(|iv| self.vertex(iv))
  }

  /// Vertices lying on the domain boundary, derived from the boundary line
  /// elements. Sorted and free of duplicates.
  pub fn boundary_vertices(&self) -> Vec<VertexIdx> {
    self
      .boundary_lines
      .iter()
      .flat_map(|line| line.vertices())
      .unique()
      .sorted()
      .collect()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn boundary_vertices_are_unique_and_sorted() {
    let vertices = vec![
      Point::new(0.0, 0.0),
      Point::new(1.0, 0.0),
      Point::new(1.0, 1.0),
      Point::new(0.0, 1.0),
    ];
    let triangles = vec![
      Triangle::new([0, 1, 2], 0, 0, Vec::new()),
      Triangle::new([0, 2, 3], 0, 0, Vec::new()),
    ];
    let boundary_lines = vec![
      BoundaryLine::new([3, 0], 1),
      BoundaryLine::new([0, 1], 1),
      BoundaryLine::new([1, 2], 1),
      BoundaryLine::new([2, 3], 1),
    ];
    let mesh = TriangleMesh::new(
      vertices,
      triangles,
      boundary_lines,
      Point::new(0.0, 0.0),
      Point::new(1.0, 1.0),
    );
    assert_eq!(mesh.boundary_vertices(), vec![0, 1, 2, 3]);
  }
}

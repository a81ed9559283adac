//! Local finite-element quantities on a single triangle.
//!
//! Everything here works on the three vertex coordinates of one element;
//! the scatter into global structures lives in [`crate::assemble`].

use crate::{config::SourceConfig, geometry::Point};

use std::f64::consts::PI;

/// Which coefficient pair applies to an element, resolved from its material
/// tag. A small closed set of variants instead of scattered conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subdomain {
  Background,
  Inclusion,
}

impl Subdomain {
  pub fn from_material_id(material_id: i32, inclusion_tag: i32) -> Self {
    if material_id == inclusion_tag {
      Self::Inclusion
    } else {
      Self::Background
    }
  }
}

/// Area of the triangle, signed by the vertex orientation.
pub fn signed_area(coords: &[Point; 3]) -> f64 {
  let d1 = coords[1] - coords[0];
  let d2 = coords[2] - coords[0];
  0.5 * (d1.x * d2.y - d1.y * d2.x)
}

/// Local mass matrix of `integral alpha phi_i phi_j`: the canonical P1 mass
/// matrix `A/12 [[2,1,1],[1,2,1],[1,1,2]]` scaled by alpha. Symmetric
/// positive definite.
pub fn mass_elmat(coords: &[Point; 3], alpha: f64) -> na::Matrix3<f64> {
  let v = alpha * signed_area(coords).abs() / 12.0;
  let mut elmat = na::Matrix3::from_element(v);
  elmat.fill_diagonal(2.0 * v);
  elmat
}

/// Local stiffness matrix of `integral beta grad phi_i . grad phi_j`.
///
/// The basis gradients are constant per element and derive from the inverse
/// of the edge-vector Jacobian. Row sums vanish: constant fields have zero
/// gradient.
pub fn stiffness_elmat(coords: &[Point; 3], beta: f64) -> na::Matrix3<f64> {
  let d1 = coords[1] - coords[0];
  let d2 = coords[2] - coords[0];
  let jacobian = na::Matrix2::from_columns(&[d1, d2]);
  let area = 0.5 * jacobian.determinant().abs();
  let inv = jacobian
    .try_inverse()
    .expect("degenerate triangle in the mesh");

  let g1: Point = inv.row(0).transpose();
  let g2: Point = inv.row(1).transpose();
  let g0 = -g1 - g2;
  let grads = [g0, g1, g2];

  let mut elmat = na::Matrix3::zeros();
  for i in 0..3 {
    for j in 0..3 {
      elmat[(i, j)] = beta * area * grads[i].dot(&grads[j]);
    }
  }
  elmat
}

/// Local source vector of `integral f phi_i` at one time value, with `f`
/// interpolated linearly from its vertex values. Exact for affine sources.
///
/// Unlike the matrices this is evaluated anew every time step.
pub fn load_elvec<F>(coords: &[Point; 3], f: &F, t: f64) -> na::Vector3<f64>
where
  F: Fn(&Point, f64) -> f64,
{
  let area = signed_area(coords).abs();
  let fv = [f(&coords[0], t), f(&coords[1], t), f(&coords[2], t)];
  let mut elvec = na::Vector3::zeros();
  for i in 0..3 {
    elvec[i] = area / 12.0 * (2.0 * fv[i] + fv[(i + 1) % 3] + fv[(i + 2) % 3]);
  }
  elvec
}

/// Ricker wavelet point source with compact spatial support, the usual
/// stand-in for a seismic shot.
pub struct Ricker {
  frequency: f64,
  support: f64,
  center: Point,
}

impl Ricker {
  pub fn from_config(source: &SourceConfig) -> Self {
    Self {
      frequency: source.frequency,
      support: source.support,
      center: Point::new(source.center_x, source.center_y),
    }
  }

  pub fn eval(&self, p: &Point, t: f64) -> f64 {
    if (p - self.center).norm_squared() > self.support * self.support {
      return 0.0;
    }
    let arg = (PI * self.frequency * t).powi(2);
    (1.0 - 2.0 * arg) * (-arg).exp()
  }
}

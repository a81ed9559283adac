//! Element matrices and vectors against hand-computed references.

extern crate nalgebra as na;

use acoufem::{fe, geometry::Point};

use approx::assert_relative_eq;

fn unit_triangle() -> [Point; 3] {
  [
    Point::new(0.0, 0.0),
    Point::new(1.0, 0.0),
    Point::new(0.0, 1.0),
  ]
}

fn irregular_triangle() -> [Point; 3] {
  [
    Point::new(0.2, -0.3),
    Point::new(1.7, 0.4),
    Point::new(0.6, 2.1),
  ]
}

#[test]
fn mass_elmat_on_unit_triangle() {
  let elmat = fe::mass_elmat(&unit_triangle(), 1.0);
  let expected = na::Matrix3::new(
    2.0, 1.0, 1.0, //
    1.0, 2.0, 1.0, //
    1.0, 1.0, 2.0,
  ) / 24.0;
  assert_relative_eq!(elmat, expected, epsilon = 1e-14);
}

#[test]
fn mass_elmat_scales_with_alpha() {
  let coords = irregular_triangle();
  let base = fe::mass_elmat(&coords, 1.0);
  let scaled = fe::mass_elmat(&coords, 2.5);
  assert_relative_eq!(scaled, base * 2.5, epsilon = 1e-14);
}

#[test]
fn stiffness_elmat_on_unit_triangle() {
  let elmat = fe::stiffness_elmat(&unit_triangle(), 1.0);
  let expected = na::Matrix3::new(
    1.0, -0.5, -0.5, //
    -0.5, 0.5, 0.0, //
    -0.5, 0.0, 0.5,
  );
  assert_relative_eq!(elmat, expected, epsilon = 1e-14);
}

#[test]
fn stiffness_elmat_is_symmetric_with_zero_row_sums() {
  let elmat = fe::stiffness_elmat(&irregular_triangle(), 3.7);
  assert_relative_eq!(elmat, elmat.transpose(), epsilon = 1e-13);
  let row_sums = elmat * na::Vector3::from_element(1.0);
  assert_relative_eq!(row_sums, na::Vector3::zeros(), epsilon = 1e-13);
}

#[test]
fn elmats_ignore_vertex_orientation() {
  let coords = unit_triangle();
  let flipped = [coords[0], coords[2], coords[1]];
  // Swapping two vertices permutes local indices 1 and 2.
  let perm = [0usize, 2, 1];

  let mass = fe::mass_elmat(&coords, 1.0);
  let mass_flipped = fe::mass_elmat(&flipped, 1.0);
  let stiffness = fe::stiffness_elmat(&coords, 1.0);
  let stiffness_flipped = fe::stiffness_elmat(&flipped, 1.0);
  for i in 0..3 {
    for j in 0..3 {
      assert_relative_eq!(mass[(i, j)], mass_flipped[(perm[i], perm[j])], epsilon = 1e-14);
      assert_relative_eq!(
        stiffness[(i, j)],
        stiffness_flipped[(perm[i], perm[j])],
        epsilon = 1e-14
      );
    }
  }
}

#[test]
fn load_elvec_distributes_constant_source_evenly() {
  let coords = irregular_triangle();
  let area = fe::signed_area(&coords).abs();
  let elvec = fe::load_elvec(&coords, &|_p: &Point, _t: f64| 1.0, 0.0);
  assert_relative_eq!(
    elvec,
    na::Vector3::from_element(area / 3.0),
    epsilon = 1e-14
  );
}

#[test]
fn load_elvec_is_exact_for_affine_sources() {
  // integral of x phi_i over the unit triangle: (1/24, 1/12, 1/24).
  let elvec = fe::load_elvec(&unit_triangle(), &|p: &Point, _t: f64| p.x, 0.0);
  let expected = na::Vector3::new(1.0 / 24.0, 1.0 / 12.0, 1.0 / 24.0);
  assert_relative_eq!(elvec, expected, epsilon = 1e-14);
}

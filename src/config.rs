//! Read-only run configuration.
//!
//! The struct is filled by the caller (defaults mirror a homogeneous unit
//! square) and validated once before any simulation work starts.

use crate::{
  error::{Error, Result},
  fe::Subdomain,
};

use std::path::PathBuf;

/// Approximation of the second time derivative. Only the explicit scheme is
/// implemented; selecting Crank-Nicolson is acknowledged and fails fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScheme {
  Explicit,
  CrankNicolson,
}

/// Coefficients of `alpha u'' - div(beta grad u) = f` on one subdomain.
#[derive(Debug, Clone, Copy)]
pub struct CoefficientPair {
  pub alpha: f64,
  pub beta: f64,
}

/// Parameters of the Ricker wavelet source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  /// Dominant frequency of the wavelet.
  pub frequency: f64,
  /// Radius of the spatial support around the center.
  pub support: f64,
  pub center_x: f64,
  pub center_y: f64,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      frequency: 20.0,
      support: 0.1,
      center_x: 0.5,
      center_y: 0.5,
    }
  }
}

/// Result-emission toggles and cadences.
///
/// Regardless of the toggles, the final step always emits and the final
/// field is always persisted as a count-prefixed `.dat` artifact.
#[derive(Debug, Clone)]
pub struct OutputConfig {
  pub write_vtu: bool,
  /// Every `vtu_step`-th step gets a `.vtu` export.
  pub vtu_step: usize,
  pub save_sol: bool,
  /// Every `sol_step`-th step gets a plain-text dump.
  pub sol_step: usize,
  /// Dump the raw right-hand side of every step for diagnostics.
  pub watch_rhs: bool,
  /// Log scalar norms of rhs and solution each step.
  pub print_info: bool,
  pub vtu_dir: PathBuf,
  pub sol_dir: PathBuf,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      write_vtu: false,
      vtu_step: 1,
      save_sol: false,
      sol_step: 1,
      watch_rhs: false,
      print_info: false,
      vtu_dir: PathBuf::from("vtu"),
      sol_dir: PathBuf::from("sol"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub mesh_path: PathBuf,

  /// Extent of the computational domain. The corner points are mesh nodes
  /// only if the domain is rectangular.
  pub x_begin: f64,
  pub x_end: f64,
  pub y_begin: f64,
  pub y_end: f64,

  pub t_begin: f64,
  pub t_end: f64,
  pub dt: f64,
  pub n_steps: usize,

  /// Order of the finite element basis. Only 1 is supported.
  pub fe_order: u32,
  pub scheme: TimeScheme,

  /// Material tag marking the inclusion subdomain; every other tag gets
  /// the background coefficients.
  pub inclusion_tag: i32,
  pub background: CoefficientPair,
  pub inclusion: CoefficientPair,

  pub source: SourceConfig,
  pub output: OutputConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      mesh_path: PathBuf::from("mesh.msh"),
      x_begin: 0.0,
      x_end: 1.0,
      y_begin: 0.0,
      y_end: 1.0,
      t_begin: 0.0,
      t_end: 1.0,
      dt: 1.0,
      n_steps: 1,
      fe_order: 1,
      scheme: TimeScheme::Explicit,
      inclusion_tag: 11,
      background: CoefficientPair {
        alpha: 1.0,
        beta: 1.0,
      },
      inclusion: CoefficientPair {
        alpha: 1.0,
        beta: 1.0,
      },
      source: SourceConfig::default(),
      output: OutputConfig::default(),
    }
  }
}

impl Config {
  /// Checks the whole configuration surface. Every violation is fatal and
  /// surfaced before any mesh or matrix work begins.
  pub fn validate(&self) -> Result<()> {
    if self.fe_order != 1 {
      return Err(Error::UnsupportedFeOrder(self.fe_order));
    }

    if self.x_end <= self.x_begin || self.y_end <= self.y_begin {
      return Err(Error::InvertedDomainBounds {
        x_begin: self.x_begin,
        x_end: self.x_end,
        y_begin: self.y_begin,
        y_end: self.y_end,
      });
    }

    let span = self.t_end - self.t_begin;
    let mismatch = (self.dt * self.n_steps as f64 - span).abs();
    if self.dt <= 0.0 || span <= 0.0 || mismatch > 1e-12 * span.abs().max(1.0) {
      return Err(Error::InconsistentTimeGrid {
        t_begin: self.t_begin,
        t_end: self.t_end,
        dt: self.dt,
        n_steps: self.n_steps,
      });
    }

    // The recurrence needs two seeded history levels before the first solve.
    if self.n_steps <= 2 {
      return Err(Error::TooFewTimeSteps(self.n_steps));
    }

    let coefficients = [
      ("background alpha", self.background.alpha),
      ("background beta", self.background.beta),
      ("inclusion alpha", self.inclusion.alpha),
      ("inclusion beta", self.inclusion.beta),
    ];
    for (name, value) in coefficients {
      if value <= 0.0 {
        return Err(Error::NonPositiveCoefficient { name, value });
      }
    }

    Ok(())
  }

  /// Coefficient pair of the subdomain a material tag belongs to.
  pub fn coefficients(&self, material_id: i32) -> CoefficientPair {
    match Subdomain::from_material_id(material_id, self.inclusion_tag) {
      Subdomain::Background => self.background,
      Subdomain::Inclusion => self.inclusion,
    }
  }
}

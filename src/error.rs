//! Error taxonomy of the solver.
//!
//! Mesh-format and configuration problems are user-facing, fail fast and
//! carry the offending values. Programming-level invariant violations
//! (unresolved vertex references, sparsity/DOF order mismatches) are
//! asserts, not variants.

use crate::config::TimeScheme;

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("mesh file {}: {source}", path.display())]
  MeshFormat {
    path: PathBuf,
    #[source]
    source: MeshFormatError,
  },

  #[error("cannot read mesh file {}: {source}", path.display())]
  MeshIo {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("finite element order {0} is not implemented, only order 1 is")]
  UnsupportedFeOrder(u32),

  #[error("domain bounds are inverted: x in [{x_begin}, {x_end}], y in [{y_begin}, {y_end}]")]
  InvertedDomainBounds {
    x_begin: f64,
    x_end: f64,
    y_begin: f64,
    y_end: f64,
  },

  #[error("time grid mismatch: {n_steps} steps of {dt} do not span [{t_begin}, {t_end}]")]
  InconsistentTimeGrid {
    t_begin: f64,
    t_end: f64,
    dt: f64,
    n_steps: usize,
  },

  #[error("{0} time steps are not enough for the three-level recurrence")]
  TooFewTimeSteps(usize),

  #[error("coefficient {name} must be strictly positive, got {value}")]
  NonPositiveCoefficient { name: &'static str, value: f64 },

  #[error("time scheme {0:?} is not implemented")]
  UnimplementedScheme(TimeScheme),

  #[error("vtk export failed")]
  Vtk(#[source] Box<vtkio::Error>),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// A violated expectation while parsing a `.msh` file.
///
/// Any of these aborts the read; no partial mesh is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum MeshFormatError {
  #[error("expected \"$MeshFormat\" header, found {found:?}")]
  BadHeader { found: String },

  #[error("unsupported msh format version {version}, only 2.2 is supported")]
  UnsupportedVersion { version: f64 },

  #[error("declared floating-point size {declared} does not match host size {host}")]
  FloatSizeMismatch { declared: usize, host: usize },

  #[error("binary sentinel reads {found} instead of 1, endianness corruption")]
  BadBinarySentinel { found: i32 },

  #[error("binary element data is not supported")]
  BinaryElements,

  #[error("unknown element type code {code}")]
  UnknownElementType { code: u32 },

  #[error("node ids are not unique: {declared} nodes declared, {distinct} distinct ids")]
  DuplicateNodeIds { declared: usize, distinct: usize },

  #[error("element {id}: partition count {count} must be at least 1")]
  BadPartitionCount { id: usize, count: i64 },

  #[error("last element id {last} does not match declared element count {declared}")]
  TruncatedElements { last: usize, declared: usize },

  #[error("mesh contains no triangles")]
  NoTriangles,

  #[error("unexpected end of file while reading {0}")]
  UnexpectedEof(&'static str),

  #[error("malformed {what}: {token:?}")]
  MalformedNumber { what: &'static str, token: String },
}

//! Explicit time integration of the acoustic wave equation.
//!
//! The semi-discrete problem `M u'' + K u = f` is advanced with the
//! three-level central-difference (leapfrog) recurrence
//!
//! `M u_n = dt^2 f(t - dt) - dt^2 K u_{n-1} + 2 M u_{n-1} - M u_{n-2}`
//!
//! with Dirichlet values enforced by row substitution in the system matrix
//! and value overwrite in the right-hand side.

use crate::{
  assemble,
  config::{Config, TimeScheme},
  error::Error,
  fe::Ricker,
  geometry::Point,
  io,
  mesh::{self, TriangleMesh},
  space::{DofHandler, SparsityPattern},
  sparse::FaerLu,
  DofIdx, Result,
};

use std::rc::Rc;

/// Driver for one full simulation: validates the configuration, reads the
/// mesh, assembles and runs the time loop with the physical defaults of a
/// quiescent initial field, a homogeneous Dirichlet boundary and the
/// configured Ricker wavelet source.
pub fn solve_acoustic(config: &Config) -> Result<na::DVector<f64>> {
  config.validate()?;
  let mesh = Rc::new(mesh::gmsh::read_msh(&config.mesh_path)?);
  tracing::info!(
    "mesh: {} vertices, {} triangles",
    mesh.n_vertices(),
    mesh.n_triangles()
  );

  let solver = WaveSolver::assemble(config, mesh)?;
  let source = Ricker::from_config(&config.source);
  solver.run(
    |_p: &Point, _t: f64| 0.0,
    |_p: &Point, _t: f64| 0.0,
    move |p: &Point, t: f64| source.eval(p, t),
  )
}

/// Explicit integrator with its static per-run state.
///
/// Lifecycle: `assemble` turns a configuration and a mesh into a solver
/// holding the finalized mass, stiffness and Dirichlet-substituted system
/// matrices; `run` seeds the history, performs all configured steps and
/// consumes the solver. A finished solver cannot be reused.
pub struct WaveSolver {
  config: Config,
  dofs: DofHandler,
  mass: nas::CsrMatrix<f64>,
  stiffness: nas::CsrMatrix<f64>,
  system_lu: FaerLu,
  boundary_dofs: Vec<DofIdx>,
}

impl WaveSolver {
  /// Distributes DOFs, assembles the global matrices once and factorizes
  /// the Dirichlet-substituted system matrix. Nothing assembled here is
  /// ever recomputed during the time loop.
  pub fn assemble(config: &Config, mesh: Rc<TriangleMesh>) -> Result<Self> {
    config.validate()?;

    let dofs = DofHandler::distribute(mesh);
    let pattern = SparsityPattern::from_connectivity(&dofs);
    assert_eq!(
      pattern.order(),
      dofs.ndofs(),
      "sparsity order disagrees with dof count"
    );

    let (mass, stiffness) = assemble::assemble_galmats(&dofs, &pattern, config);
    let boundary_dofs = dofs.boundary_dofs();

    // Dirichlet substitution on a copy of the mass matrix: zero the
    // constrained rows and put ones on their diagonal. The boundary set
    // and the mass matrix are both static, so this happens exactly once.
    let mut system = mass.clone();
    let mut constrained = vec![false; dofs.ndofs()];
    for &idof in &boundary_dofs {
      constrained[idof] = true;
    }
    system.set_zero(|r, _| constrained[r]);
    for &idof in &boundary_dofs {
      system.push(idof, idof, 1.0);
    }
    let system_lu = FaerLu::new(system.to_nalgebra_csc());

    Ok(Self {
      config: config.clone(),
      dofs,
      mass: mass.to_nalgebra_csr(),
      stiffness: stiffness.to_nalgebra_csr(),
      system_lu,
      boundary_dofs,
    })
  }

  pub fn ndofs(&self) -> usize {
    self.dofs.ndofs()
  }

  pub fn boundary_dofs(&self) -> &[DofIdx] {
    &self.boundary_dofs
  }

  /// Samples the initial condition at `t0` and `t0 + dt` to fill the two
  /// oldest history levels. Direct function evaluation at the DOF
  /// coordinates, no solve involved.
  pub fn seed_history<I>(&self, initial: &I) -> (na::DVector<f64>, na::DVector<f64>)
  where
    I: Fn(&Point, f64) -> f64,
  {
    let t0 = self.config.t_begin;
    let dt = self.config.dt;
    let ndofs = self.dofs.ndofs();
    let u_prev2 = na::DVector::from_fn(ndofs, |idof, _| initial(&self.dofs.dof_point(idof), t0));
    let u_prev1 =
      na::DVector::from_fn(ndofs, |idof, _| initial(&self.dofs.dof_point(idof), t0 + dt));
    (u_prev2, u_prev1)
  }

  /// Runs all configured time steps and returns the final field.
  ///
  /// `initial` seeds the history, `boundary` prescribes the Dirichlet
  /// values over time, `source` is the volumetric forcing.
  pub fn run<I, B, S>(self, initial: I, boundary: B, source: S) -> Result<na::DVector<f64>>
  where
    I: Fn(&Point, f64) -> f64,
    B: Fn(&Point, f64) -> f64,
    S: Fn(&Point, f64) -> f64,
  {
    // The non-explicit scheme is acknowledged but deliberately fails
    // before any step is taken.
    if self.config.scheme != TimeScheme::Explicit {
      return Err(Error::UnimplementedScheme(self.config.scheme));
    }

    let out = &self.config.output;
    std::fs::create_dir_all(&out.vtu_dir)?;
    std::fs::create_dir_all(&out.sol_dir)?;

    let dt = self.config.dt;
    let n_steps = self.config.n_steps;
    let (mut u_prev2, mut u_prev1) = self.seed_history(&initial);
    let mut u = na::DVector::zeros(self.dofs.ndofs());

    for step in 2..=n_steps {
      let t = self.config.t_begin + step as f64 * dt;

      // Central-difference recurrence rearranged for u_n. The source is
      // taken at the previous time level; moving it changes the accuracy
      // order of the scheme.
      let mut rhs = dt * dt * assemble::assemble_source(&self.dofs, &source, t - dt);
      rhs -= dt * dt * (&self.stiffness * &u_prev1);
      rhs -= &self.mass * &u_prev2;
      rhs += 2.0 * (&self.mass * &u_prev1);

      // Dirichlet override: replace, not add.
      for &idof in &self.boundary_dofs {
        rhs[idof] = boundary(&self.dofs.dof_point(idof), t);
      }

      u = self.system_lu.solve(&rhs);

      // Rotate history.
      std::mem::swap(&mut u_prev2, &mut u_prev1);
      u_prev1.copy_from(&u);

      if out.watch_rhs {
        io::write_vtu(
          out.vtu_dir.join(format!("rhs-{step}.vtu")),
          self.dofs.mesh(),
          &rhs,
          "rhs",
        )?;
      }
      if (out.write_vtu && step % out.vtu_step == 0) || step == n_steps {
        io::write_vtu(
          out.vtu_dir.join(format!("res-{step}.vtu")),
          self.dofs.mesh(),
          &u,
          "pressure",
        )?;
      }
      if (out.save_sol && step % out.sol_step == 0) || step == n_steps {
        io::write_solution_dat(out.sol_dir.join(format!("sol-{step}.dat")), &u)?;
      }
      if out.print_info {
        tracing::info!("step {step} norm {:.4e} rhs_norm {:.4e}", u.norm(), rhs.norm());
      }
    }

    let stem = self
      .config
      .mesh_path
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| String::from("mesh"));
    io::write_solution_dat(out.sol_dir.join(format!("{stem}_sol.dat")), &u)?;

    Ok(u)
  }
}

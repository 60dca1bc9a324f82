use crate::error::{ConfigError, MatrixError, SimulationError};
use crate::force::ForceLaw;
use crate::integrator::Integrator;
use crate::matrix::AttractionMatrix;
use crate::particles::{wrap_unit, ParticleState, ParticleView};
use crate::settings::{BoundaryMode, NeighborSearch, SimulationConfig};
use crate::spatial::{periodic_delta, SpatialGrid};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// Distances below this are clamped before computing the unit direction
const MIN_DISTANCE: f64 = 1e-12;

/// Summary numbers for status displays and headless runs
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStats {
    pub tick: u64,
    pub mean_speed: f64,
    pub color_counts: Vec<usize>,
}

/// Particle life simulation state
pub struct Simulation {
    config: SimulationConfig,
    state: ParticleState,
    matrix: AttractionMatrix,
    /// Replacement matrix applied at the start of the next step
    pending_matrix: Option<AttractionMatrix>,
    /// Only present when the grid strategy is in effect
    grid: Option<SpatialGrid>,
    law: ForceLaw,
    integrator: Integrator,
    /// Per-particle force sums, reused between steps
    forces: Vec<(f64, f64)>,
    tick: u64,
    rng: StdRng,
}

/// Everything the velocity phase reads, frozen for the duration of one tick
struct ForceContext<'a> {
    state: &'a ParticleState,
    matrix: &'a AttractionMatrix,
    law: ForceLaw,
    max_radius: f64,
    periodic: bool,
}

impl ForceContext<'_> {
    /// Net force on particle `i` from every candidate neighbor
    fn force_on(&self, i: usize, grid: Option<&SpatialGrid>) -> (f64, f64) {
        let state = self.state;
        let xi = state.pos_x[i];
        let yi = state.pos_y[i];
        let row = self.matrix.row(state.colors[i]);
        let mut fx = 0.0;
        let mut fy = 0.0;

        let mut visit = |j: usize| {
            if j == i {
                return;
            }
            let mut dx = state.pos_x[j] - xi;
            let mut dy = state.pos_y[j] - yi;
            if self.periodic {
                dx = periodic_delta(dx);
                dy = periodic_delta(dy);
            }
            let dist = dx.hypot(dy);
            // Coincident particles do not interact this tick
            if dist > 0.0 && dist < self.max_radius {
                let f = self.law.force(dist / self.max_radius, row[state.colors[j]]);
                let d = dist.max(MIN_DISTANCE);
                fx += dx / d * f;
                fy += dy / d * f;
            }
        };

        match grid {
            Some(grid) => grid.for_each_candidate(xi, yi, &mut visit),
            None => (0..state.len()).for_each(&mut visit),
        }
        (fx, fy)
    }

    fn fill(&self, grid: Option<&SpatialGrid>, out: &mut [(f64, f64)]) {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| *slot = self.force_on(i, grid));
    }
}

impl Simulation {
    /// Create a simulation seeded from OS entropy
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a simulation with a reproducible seed
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a simulation drawing positions, colors and the matrix from `rng`
    pub fn with_rng(config: SimulationConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ParticleState::random(config.particle_count, config.color_count, &mut rng);
        let matrix = AttractionMatrix::generate(config.color_count, &mut rng);
        Ok(Self::assemble(config, state, matrix, rng))
    }

    /// Create a simulation around an explicit particle layout and matrix.
    ///
    /// In periodic mode positions are wrapped into [0, 1) so coordinates that name
    /// the same point on the torus behave identically.
    pub fn from_state(
        config: SimulationConfig,
        mut state: ParticleState,
        matrix: AttractionMatrix,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if !state.is_consistent() || state.len() != config.particle_count {
            return Err(SimulationError::StateLength {
                expected: config.particle_count,
                actual: state.len(),
            });
        }
        for i in 0..state.len() {
            let values = [state.pos_x[i], state.pos_y[i], state.vel_x[i], state.vel_y[i]];
            if !values.iter().all(|v| v.is_finite()) {
                return Err(SimulationError::NonFinite { index: i });
            }
        }
        if let Some((index, &color)) = state
            .colors
            .iter()
            .enumerate()
            .find(|&(_, &c)| c >= config.color_count)
        {
            return Err(SimulationError::ColorOutOfRange { index, color });
        }
        if matrix.size() != config.color_count {
            return Err(MatrixError::SizeMismatch {
                expected: config.color_count,
                actual: matrix.size(),
            }
            .into());
        }
        if config.boundary == BoundaryMode::Periodic {
            for p in state.pos_x.iter_mut().chain(state.pos_y.iter_mut()) {
                *p = wrap_unit(*p);
            }
        }
        Ok(Self::assemble(config, state, matrix, StdRng::from_entropy()))
    }

    fn assemble(
        config: SimulationConfig,
        state: ParticleState,
        matrix: AttractionMatrix,
        rng: StdRng,
    ) -> Self {
        let grid = (config.effective_search() == NeighborSearch::Grid)
            .then(|| SpatialGrid::new(config.max_radius, state.len()));
        debug!(
            "particle life: {} particles, {} colors, {} boundary, {} search",
            state.len(),
            config.color_count,
            config.boundary.name(),
            config.effective_search().name(),
        );
        if let Some(grid) = &grid {
            debug!("spatial grid {}x{}, cell {:.4}", grid.dim(), grid.dim(), grid.cell_size());
        }
        Self {
            law: ForceLaw::new(config.beta),
            integrator: Integrator::new(&config),
            forces: vec![(0.0, 0.0); state.len()],
            grid,
            config,
            state,
            matrix,
            pending_matrix: None,
            tick: 0,
            rng,
        }
    }

    /// Advance the simulation by one time step
    pub fn step(&mut self) {
        let started = Instant::now();

        if let Some(matrix) = self.pending_matrix.take() {
            debug!("tick {}: applying replacement attraction matrix", self.tick);
            self.matrix = matrix;
        }

        if let Some(grid) = &mut self.grid {
            grid.rebuild(&self.state.pos_x, &self.state.pos_y);
        }

        let ctx = ForceContext {
            state: &self.state,
            matrix: &self.matrix,
            law: self.law,
            max_radius: self.config.max_radius,
            periodic: self.config.boundary == BoundaryMode::Periodic,
        };
        self.forces.resize(self.state.len(), (0.0, 0.0));
        ctx.fill(self.grid.as_ref(), &mut self.forces);

        self.integrator.apply_forces(&mut self.state, &self.forces);
        self.integrator.advance_positions(&mut self.state);

        self.tick += 1;
        trace!("tick {} took {:?}", self.tick, started.elapsed());
    }

    /// Net force on every particle using the given strategy, without stepping.
    ///
    /// Values are raw sums in normalized units (before the `max_radius` scale).
    /// Grid search falls back to brute force in open mode.
    pub fn net_forces(&self, search: NeighborSearch) -> Vec<(f64, f64)> {
        let periodic = self.config.boundary == BoundaryMode::Periodic;
        let ctx = ForceContext {
            state: &self.state,
            matrix: &self.matrix,
            law: self.law,
            max_radius: self.config.max_radius,
            periodic,
        };
        let mut out = vec![(0.0, 0.0); self.state.len()];
        if search == NeighborSearch::Grid && periodic {
            let mut grid = SpatialGrid::new(self.config.max_radius, self.state.len());
            grid.rebuild(&self.state.pos_x, &self.state.pos_y);
            ctx.fill(Some(&grid), &mut out);
        } else {
            ctx.fill(None, &mut out);
        }
        out
    }

    /// Stage a freshly sampled matrix, applied at the start of the next step
    pub fn regenerate_matrix(&mut self) {
        let matrix = AttractionMatrix::generate(self.config.color_count, &mut self.rng);
        self.pending_matrix = Some(matrix);
    }

    /// Stage an externally supplied matrix, applied at the start of the next step
    pub fn set_matrix(&mut self, matrix: AttractionMatrix) -> Result<(), MatrixError> {
        if matrix.size() != self.config.color_count {
            return Err(MatrixError::SizeMismatch {
                expected: self.config.color_count,
                actual: matrix.size(),
            });
        }
        self.pending_matrix = Some(matrix);
        Ok(())
    }

    pub fn has_pending_matrix(&self) -> bool {
        self.pending_matrix.is_some()
    }

    /// Re-randomize positions and colors (same particle count), zero velocities
    pub fn reset_particles(&mut self) {
        self.state.randomize(self.config.color_count, &mut self.rng);
        self.tick = 0;
    }

    /// The matrix in effect for the next step's force evaluation
    pub fn matrix(&self) -> &AttractionMatrix {
        &self.matrix
    }

    /// Copy of the active matrix as K rows of K coefficients
    pub fn matrix_snapshot(&self) -> Vec<Vec<f64>> {
        self.matrix.to_rows()
    }

    /// Positions (folded into [0, 1)) and colors for rendering
    pub fn particle_snapshot(&self) -> Vec<ParticleView> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &ParticleState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            tick: self.tick,
            mean_speed: self.state.mean_speed(),
            color_counts: self.state.color_counts(self.config.color_count),
        }
    }
}

use crate::particles::{wrap_unit, ParticleState};
use crate::settings::{BoundaryMode, SimulationConfig};
use rayon::prelude::*;

/// Semi-implicit Euler integrator with exponential friction decay.
///
/// A tick is two strictly ordered phases: velocities are updated for every
/// particle from forces computed on the previous positions, then positions are
/// advanced from the new velocities.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    dt: f64,
    max_radius: f64,
    friction_factor: f64,
    boundary: BoundaryMode,
}

impl Integrator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            dt: config.dt,
            max_radius: config.max_radius,
            friction_factor: config.friction_factor(),
            boundary: config.boundary,
        }
    }

    /// Velocity phase: `v = v * friction + F * max_radius * dt`.
    ///
    /// `forces` holds the raw per-particle force sums in normalized units.
    pub fn apply_forces(&self, state: &mut ParticleState, forces: &[(f64, f64)]) {
        let friction = self.friction_factor;
        let scale = self.max_radius * self.dt;
        state
            .vel_x
            .par_iter_mut()
            .zip(state.vel_y.par_iter_mut())
            .zip(forces.par_iter())
            .for_each(|((vx, vy), &(fx, fy))| {
                *vx = *vx * friction + fx * scale;
                *vy = *vy * friction + fy * scale;
            });
    }

    /// Position phase: `x = x + v * dt`, wrapped into [0, 1) in periodic mode
    pub fn advance_positions(&self, state: &mut ParticleState) {
        let dt = self.dt;
        let periodic = self.boundary == BoundaryMode::Periodic;
        let advance = |p: &mut f64, v: &f64| {
            let next = *p + v * dt;
            *p = if periodic { wrap_unit(next) } else { next };
        };
        state
            .pos_x
            .par_iter_mut()
            .zip(state.vel_x.par_iter())
            .for_each(|(p, v)| advance(p, v));
        state
            .pos_y
            .par_iter_mut()
            .zip(state.vel_y.par_iter())
            .for_each(|(p, v)| advance(p, v));
    }
}

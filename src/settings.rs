use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Boundary mode - what happens at the edges of the unit domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Unbounded plane, positions may leave [0, 1)
    Open,
    /// Toroidal domain, both axes wrap (shortest-path distances)
    #[default]
    Periodic,
}

impl BoundaryMode {
    pub fn name(&self) -> &str {
        match self {
            BoundaryMode::Open => "Open",
            BoundaryMode::Periodic => "Periodic",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BoundaryMode::Open => BoundaryMode::Periodic,
            BoundaryMode::Periodic => BoundaryMode::Open,
        }
    }
}

/// Neighbor search strategy used during the velocity phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighborSearch {
    /// Uniform spatial grid, 3x3 cell block around each particle (periodic mode only)
    #[default]
    Grid,
    /// Every ordered pair, O(N^2)
    BruteForce,
}

impl NeighborSearch {
    pub fn name(&self) -> &str {
        match self {
            NeighborSearch::Grid => "Grid",
            NeighborSearch::BruteForce => "Brute Force",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            NeighborSearch::Grid => NeighborSearch::BruteForce,
            NeighborSearch::BruteForce => NeighborSearch::Grid,
        }
    }
}

/// All simulation parameters, fixed for the lifetime of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of particles (N > 0)
    pub particle_count: usize,
    /// Number of color classes (K > 0)
    pub color_count: usize,
    /// Time step in seconds (> 0)
    pub dt: f64,
    /// Interaction cutoff radius in domain units (> 0)
    pub max_radius: f64,
    /// Time for velocity to halve without external force (>= 0, 0 = instant stop)
    pub friction_half_life: f64,
    /// Normalized distance below which only repulsion applies (0 < beta < 1)
    pub beta: f64,
    pub boundary: BoundaryMode,
    pub neighbor_search: NeighborSearch,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            color_count: 6,
            dt: 0.02,
            max_radius: 0.1,
            friction_half_life: 0.04,
            beta: 0.3,
            boundary: BoundaryMode::default(),
            neighbor_search: NeighborSearch::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every construction-time constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.color_count == 0 {
            return Err(ConfigError::NoColors);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidDt(self.dt));
        }
        if !(self.max_radius.is_finite() && self.max_radius > 0.0) {
            return Err(ConfigError::InvalidMaxRadius(self.max_radius));
        }
        if !(self.friction_half_life.is_finite() && self.friction_half_life >= 0.0) {
            return Err(ConfigError::InvalidFrictionHalfLife(self.friction_half_life));
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ConfigError::InvalidBeta(self.beta));
        }
        Ok(())
    }

    /// Per-tick multiplicative velocity damping, `0.5^(dt / half_life)`
    pub fn friction_factor(&self) -> f64 {
        if self.friction_half_life == 0.0 {
            // Zero half-life: velocity is fully lost every tick
            0.0
        } else {
            0.5_f64.powf(self.dt / self.friction_half_life)
        }
    }

    /// Strategy actually used for a step; open mode has no grid
    pub fn effective_search(&self) -> NeighborSearch {
        match self.boundary {
            BoundaryMode::Open => NeighborSearch::BruteForce,
            BoundaryMode::Periodic => self.neighbor_search,
        }
    }

    /// Adjust particle count within bounds
    pub fn adjust_particle_count(&mut self, delta: i64) {
        self.particle_count = (self.particle_count as i64 + delta).clamp(1, 20_000) as usize;
    }

    /// Adjust color count within bounds
    pub fn adjust_color_count(&mut self, delta: i64) {
        self.color_count = (self.color_count as i64 + delta).clamp(1, 12) as usize;
    }

    /// Adjust interaction radius within bounds
    pub fn adjust_max_radius(&mut self, delta: f64) {
        self.max_radius = (self.max_radius + delta).clamp(0.02, 0.5);
    }

    /// Adjust friction half-life within bounds
    pub fn adjust_friction_half_life(&mut self, delta: f64) {
        self.friction_half_life = (self.friction_half_life + delta).clamp(0.0, 1.0);
    }

    /// Adjust repulsion threshold, kept strictly inside (0, 1)
    pub fn adjust_beta(&mut self, delta: f64) {
        self.beta = (self.beta + delta).clamp(0.05, 0.95);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = SimulationConfig::default();

        let cases = [
            (
                SimulationConfig {
                    particle_count: 0,
                    ..base.clone()
                },
                ConfigError::NoParticles,
            ),
            (
                SimulationConfig {
                    color_count: 0,
                    ..base.clone()
                },
                ConfigError::NoColors,
            ),
            (
                SimulationConfig {
                    dt: 0.0,
                    ..base.clone()
                },
                ConfigError::InvalidDt(0.0),
            ),
            (
                SimulationConfig {
                    dt: -0.1,
                    ..base.clone()
                },
                ConfigError::InvalidDt(-0.1),
            ),
            (
                SimulationConfig {
                    max_radius: 0.0,
                    ..base.clone()
                },
                ConfigError::InvalidMaxRadius(0.0),
            ),
            (
                SimulationConfig {
                    friction_half_life: -1.0,
                    ..base.clone()
                },
                ConfigError::InvalidFrictionHalfLife(-1.0),
            ),
            (
                SimulationConfig {
                    beta: 0.0,
                    ..base.clone()
                },
                ConfigError::InvalidBeta(0.0),
            ),
            (
                SimulationConfig {
                    beta: 1.0,
                    ..base.clone()
                },
                ConfigError::InvalidBeta(1.0),
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_nan_beta_rejected() {
        let config = SimulationConfig {
            beta: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBeta(_))));
    }

    #[test]
    fn test_friction_factor() {
        let config = SimulationConfig::default();
        // dt / half_life = 0.5
        assert!((config.friction_factor() - 0.5_f64.sqrt()).abs() < 1e-12);

        let instant = SimulationConfig {
            friction_half_life: 0.0,
            ..Default::default()
        };
        assert_eq!(instant.friction_factor(), 0.0);
    }

    #[test]
    fn test_open_mode_forces_brute_force() {
        let config = SimulationConfig {
            boundary: BoundaryMode::Open,
            neighbor_search: NeighborSearch::Grid,
            ..Default::default()
        };
        assert_eq!(config.effective_search(), NeighborSearch::BruteForce);
        assert_eq!(
            SimulationConfig::default().effective_search(),
            NeighborSearch::Grid
        );
    }

    #[test]
    fn test_adjust_beta_stays_in_open_interval() {
        let mut config = SimulationConfig::default();
        config.adjust_beta(5.0);
        assert!(config.validate().is_ok());
        config.adjust_beta(-5.0);
        assert!(config.validate().is_ok());
    }
}

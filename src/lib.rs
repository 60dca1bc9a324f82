//! Particle life: typed particles under asymmetric pairwise attraction/repulsion
//! with friction, on an open plane or a periodic unit square.

pub mod config;
pub mod error;
pub mod force;
pub mod integrator;
pub mod matrix;
pub mod particles;
pub mod presets;
pub mod settings;
pub mod simulation;
pub mod spatial;

pub use config::AppConfig;
pub use error::{ConfigError, ConfigFileError, MatrixError, SimulationError};
pub use force::ForceLaw;
pub use matrix::AttractionMatrix;
pub use particles::{ParticleState, ParticleView};
pub use settings::{BoundaryMode, NeighborSearch, SimulationConfig};
pub use simulation::{Simulation, SimulationStats};
pub use spatial::SpatialGrid;

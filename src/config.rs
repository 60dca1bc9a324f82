use crate::error::ConfigFileError;
use crate::settings::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Simulation parameters
    pub simulation: SimulationConfig,
    /// Steps per frame (app-level)
    pub steps_per_frame: usize,
    /// RNG seed; None draws from OS entropy
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigFileError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file, rejecting invalid simulation parameters
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.simulation.validate()?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            simulation: SimulationConfig::default(),
            steps_per_frame: 1,
            seed: None,
        }
    }
}

use crate::error::ConfigFileError;
use crate::settings::{BoundaryMode, NeighborSearch, SimulationConfig};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named preset containing simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub config: SimulationConfig,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    /// Where user presets live; None if the platform has no config directory
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    /// Built-ins plus user presets from the platform config directory
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    /// Built-ins plus user presets from an explicit directory
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    /// Get the presets directory path
    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-life").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match read_preset(&path) {
                    Ok(preset) => self.user.push(preset),
                    Err(e) => warn!("skipping preset {}: {}", path.display(), e),
                }
            }
        }
    }

    fn preset_path(&self, name: &str) -> Result<PathBuf, ConfigFileError> {
        let dir = self.dir.as_ref().ok_or(ConfigFileError::NoConfigDir)?;
        let filename = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();
        Ok(dir.join(format!("{}.json", filename)))
    }

    /// Save a preset to disk, replacing a user preset with the same name
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), ConfigFileError> {
        preset.config.validate()?;
        let path = self.preset_path(&preset.name)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&preset)?)?;

        self.user.retain(|p| !p.name.eq_ignore_ascii_case(&preset.name));
        self.user.push(preset);
        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), ConfigFileError> {
        self.user.retain(|p| !p.name.eq_ignore_ascii_case(name));
        let path = self.preset_path(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get preset names for display
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn read_preset(path: &Path) -> Result<Preset, ConfigFileError> {
    let content = fs::read_to_string(path)?;
    let preset: Preset = serde_json::from_str(&content)?;
    preset.config.validate()?;
    Ok(preset)
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "Classic",
            "Reference parameters: 1000 particles, 6 colors",
            SimulationConfig::default(),
        ),
        Preset::new(
            "Sparse",
            "Few particles, small clusters drifting apart",
            SimulationConfig {
                particle_count: 300,
                color_count: 4,
                ..Default::default()
            },
        ),
        Preset::new(
            "Dense",
            "Crowded domain with a short interaction radius",
            SimulationConfig {
                particle_count: 4000,
                max_radius: 0.05,
                ..Default::default()
            },
        ),
        Preset::new(
            "Wide Reach",
            "Long-range interactions forming large membranes",
            SimulationConfig {
                particle_count: 1500,
                color_count: 3,
                max_radius: 0.2,
                beta: 0.2,
                ..Default::default()
            },
        ),
        Preset::new(
            "Slippery",
            "Low friction, fast chasing behavior",
            SimulationConfig {
                friction_half_life: 0.2,
                dt: 0.01,
                ..Default::default()
            },
        ),
        Preset::new(
            "Open Field",
            "Unbounded plane with all-pairs search",
            SimulationConfig {
                particle_count: 600,
                boundary: BoundaryMode::Open,
                neighbor_search: NeighborSearch::BruteForce,
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_presets_are_valid() {
        for preset in builtin_presets() {
            assert!(preset.config.validate().is_ok(), "{} is invalid", preset.name);
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let manager = PresetManager::with_dir(None);
        assert_eq!(manager.find("wide reach").map(|p| p.name.as_str()), Some("Wide Reach"));
        assert!(manager.find("missing").is_none());
    }

    #[test]
    fn test_save_load_and_delete_user_preset() {
        let dir = tempdir().unwrap();
        let mut manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        let preset = Preset::new(
            "My Swirl",
            "custom",
            SimulationConfig {
                particle_count: 777,
                ..Default::default()
            },
        );
        manager.save_preset(preset.clone()).unwrap();
        assert!(dir.path().join("My_Swirl.json").exists());

        let reloaded = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert_eq!(reloaded.find("my swirl"), Some(&preset));

        manager.delete_preset("My Swirl").unwrap();
        assert!(!dir.path().join("My_Swirl.json").exists());
        assert!(manager.find("My Swirl").is_none());
    }

    #[test]
    fn test_invalid_user_preset_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        let manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert!(manager.user.is_empty());
        assert_eq!(manager.preset_names().len(), builtin_presets().len());
    }

    #[test]
    fn test_save_without_config_dir_fails() {
        let mut manager = PresetManager::with_dir(None);
        let result = manager.save_preset(Preset::new("x", "", SimulationConfig::default()));
        assert!(matches!(result, Err(ConfigFileError::NoConfigDir)));
    }
}

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// User settings from `config.toml`; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub garden: GardenSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GardenSettings {
    pub day_ms: Option<i64>,   // Length of a virtual day in milliseconds
    pub seed: Option<u64>,
    pub stable_tree: Option<bool>,
    pub fps: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageSettings {
    pub save_file: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read settings");
                Self::default()
            }
        }
    }

    /// Malformed settings fall back to defaults
    pub fn parse(content: &str) -> Self {
        let mut settings: Self = toml::from_str(content).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed settings");
            Self::default()
        });
        if let Some(day_ms) = settings.garden.day_ms.filter(|&ms| ms <= 0) {
            tracing::warn!(day_ms, "ignoring non-positive day length");
            settings.garden.day_ms = None;
        }
        settings
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treecare")
            .join("config.toml")
    }
}

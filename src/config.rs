use crate::names::Domain;
use crate::simplify::KeepRatio;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub map: MapConfig,
    #[serde(default)]
    pub simplify: SimplifyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub shapefile: PathBuf,
    pub data_csv: PathBuf,
    #[serde(default = "default_label_column")]
    pub label_column: String,
    pub value_column: String,
}

fn default_label_column() -> String {
    "Object".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapConfig {
    pub domain: Domain,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SimplifyConfig {
    #[serde(default)]
    pub keep_ratio: KeepRatio,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub layer_json: PathBuf,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

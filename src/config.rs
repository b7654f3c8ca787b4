use crate::error::{EdaError, Result};
use crate::render::ImageFormat;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Run settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdaConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub image_format: ImageFormat,
}

impl Default for EdaConfig {
    fn default() -> Self {
        EdaConfig {
            input: PathBuf::from("Dataset/whr2023.csv"),
            output_dir: PathBuf::from("Visualizations"),
            top_n: 10,
            image_format: ImageFormat::default(),
        }
    }
}

/// Where each artifact of a run is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub bar: PathBuf,
    pub heatmap: PathBuf,
    pub scatter: PathBuf,
}

impl EdaConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| EdaError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| EdaError::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(EdaError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }

    pub fn output_paths(&self) -> OutputPaths {
        let ext = self.image_format.extension();
        OutputPaths {
            bar: self
                .output_dir
                .join(format!("top{}_happiness_bar.{}", self.top_n, ext)),
            heatmap: self.output_dir.join(format!("heatmap_corr.{}", ext)),
            scatter: self.output_dir.join("gdp_vs_happiness_plotly.html"),
        }
    }
}

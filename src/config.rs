//! JSON configuration for the `multiscale_demo` binary.
//!
//! ```json
//! {
//!   "input": "frame.png",
//!   "transform": { "layers": 5, "scaling_sequence": 0, "use_mean_filters": false },
//!   "disabled_layers": [0],
//!   "output": { "dir": "out", "save_layers": true }
//! }
//! ```
use crate::error::{Result, TransformError};
use crate::transform::TransformParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub transform: TransformParams,
    /// Work in double precision instead of single precision.
    #[serde(default)]
    pub double_precision: bool,
    /// Layers excluded from the reconstruction written to disk.
    #[serde(default)]
    pub disabled_layers: Vec<usize>,
    pub output: DemoOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub save_layers: bool,
    #[serde(default = "default_report_name")]
    pub report_json: String,
    #[serde(default = "default_reconstruction_name")]
    pub reconstruction_image: String,
}

fn default_true() -> bool {
    true
}

fn default_report_name() -> String {
    "report.json".to_string()
}

fn default_reconstruction_name() -> String {
    "reconstruction.png".to_string()
}

impl DemoConfig {
    /// Reject layer indices outside `0..=layers`.
    pub fn validate(&self) -> Result<()> {
        let count = self.transform.layers + 1;
        if let Some(&bad) = self.disabled_layers.iter().find(|&&j| j >= count) {
            return Err(TransformError::Config {
                details: format!("disabled layer {bad} out of range (transform has {count} layers)"),
            });
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<DemoConfig> {
    let data = fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&data, path)
}

fn parse_config(data: &str, path: &Path) -> Result<DemoConfig> {
    let config: DemoConfig = serde_json::from_str(data).map_err(|source| TransformError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

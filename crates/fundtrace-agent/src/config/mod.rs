//! Configuration loading for fundtrace.
//! Reads fundtrace.toml from `--config`, the FUNDTRACE_CONFIG env var, or the
//! current directory. Without a file the built-in three-network catalog is used.

use fundtrace_common::network_config::default_catalog;
use fundtrace_common::{SynthesisConfig, TemplateSpec};
use fundtrace_db::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FUNDTRACE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "fundtrace.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: SynthesisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_catalog")]
    pub networks: Vec<TemplateSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: SynthesisConfig::default(),
            output: OutputConfig::default(),
            networks: default_catalog(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
    /// Prepended to every file name written into `dir`.
    #[serde(default)]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            formats: default_formats(),
            file_prefix: String::new(),
        }
    }
}

fn default_output_dir() -> PathBuf { PathBuf::from("./output") }
fn default_formats()    -> Vec<OutputFormat> { vec![OutputFormat::Sqlite, OutputFormat::Csv, OutputFormat::Json] }

mod tests;

impl Config {
    /// Load configuration. An explicit path or FUNDTRACE_CONFIG must point to
    /// an existing file; a missing ./fundtrace.toml falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let path = match requested {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Config file not found: {}\n\
                         Copy fundtrace.example.toml to fundtrace.toml and edit it.",
                        path.display()
                    );
                }
                path
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok((Self::default(), None));
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        Ok((config, Some(path)))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.generator.validate()?;
        Ok(config)
    }
}

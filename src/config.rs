//! Layered settings for the `timemap` binary.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (`timemap.toml` unless `--config` names another), then `TIMEMAP_*`
//! environment variables with `__` marking nesting, e.g.
//! `TIMEMAP_PIPELINE__IQR_MULTIPLIER=3`. Command-line flags are applied on top
//! by the CLI. The library itself never reads configuration.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::processors::{DegenerateRangePolicy, PipelineOptions};
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR, DEFAULT_IQR_MULTIPLIER, DEFAULT_SITES_FILE,
};
use crate::utils::filename::generate_default_output_dir;

const ENV_PREFIX: &str = "TIMEMAP";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub sites_file: PathBuf,
    pub output_dir: PathBuf,
    pub pretty: bool,
    #[validate(range(min = 1))]
    pub max_workers: usize,
    #[validate(nested)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub iqr_multiplier: f64,
    pub degenerate_policy: DegenerateRangePolicy,
    pub fill_gaps: bool,
}

impl AppConfig {
    /// Load and validate. An explicitly named file must exist; the default
    /// `timemap.toml` is optional.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let file = match explicit_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("sites_file", DEFAULT_SITES_FILE)?
            .set_default(
                "output_dir",
                generate_default_output_dir().to_string_lossy().into_owned(),
            )?
            .set_default("pretty", false)?
            .set_default("max_workers", num_cpus::get() as i64)?
            .set_default("pipeline.iqr_multiplier", DEFAULT_IQR_MULTIPLIER)?
            .set_default(
                "pipeline.degenerate_policy",
                DegenerateRangePolicy::default().to_string(),
            )?
            .set_default("pipeline.fill_gaps", true)?;
        Ok(builder)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            iqr_multiplier: self.pipeline.iqr_multiplier,
            degenerate_policy: self.pipeline.degenerate_policy,
            fill_gaps: self.pipeline.fill_gaps,
            ..PipelineOptions::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sites_file: PathBuf::from(DEFAULT_SITES_FILE),
            output_dir: generate_default_output_dir(),
            pretty: false,
            max_workers: num_cpus::get(),
            pipeline: PipelineConfig {
                iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
                degenerate_policy: DegenerateRangePolicy::default(),
                fill_gaps: true,
            },
        }
    }
}

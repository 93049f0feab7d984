pub mod cli;
pub mod toml_config;

use crate::domain::model::{TAX_CLASS_ZERO_RATE, VATLAYER_ID};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", command(name = "vatlayer-migrate"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Migrate vatlayer plugin settings and VAT rates into channel tax configuration")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, help = "JSON database snapshot to migrate"))]
    pub snapshot: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = VATLAYER_ID))]
    pub plugin_identifier: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = TAX_CLASS_ZERO_RATE))]
    pub zero_rate_tax_class: String,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log as JSON lines"))]
    pub log_json: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log memory usage and timing"))]
    pub monitor: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Run the migration without writing any output"))]
    pub dry_run: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Run the reverse migration (no-op)"))]
    pub reverse: bool,
}

impl ConfigProvider for CliConfig {
    fn snapshot_path(&self) -> &str {
        &self.snapshot
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn plugin_identifier(&self) -> &str {
        &self.plugin_identifier
    }

    fn zero_rate_tax_class(&self) -> &str {
        &self.zero_rate_tax_class
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_path("snapshot", config.snapshot_path())?;
    validation::validate_file_extension("snapshot", config.snapshot_path(), &["json"])?;
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_non_empty_string("plugin_identifier", config.plugin_identifier())?;
    validation::validate_non_empty_string("zero_rate_tax_class", config.zero_rate_tax_class())?;
    Ok(())
}

use crate::domain::model::{TAX_CLASS_ZERO_RATE, VATLAYER_ID};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MigrationError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub migration: MigrationSection,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSection {
    #[serde(default = "default_plugin_identifier")]
    pub plugin_identifier: String,
    #[serde(default = "default_zero_rate_tax_class")]
    pub zero_rate_tax_class: String,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            plugin_identifier: default_plugin_identifier(),
            zero_rate_tax_class: default_zero_rate_tax_class(),
        }
    }
}

fn default_plugin_identifier() -> String {
    VATLAYER_ID.to_string()
}

fn default_zero_rate_tax_class() -> String {
    TAX_CLASS_ZERO_RATE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub snapshot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MigrationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNAPSHOT_PATH})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MigrationError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn is_dry_run(&self) -> bool {
        self.load.dry_run.unwrap_or(false)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn snapshot_path(&self) -> &str {
        &self.source.snapshot
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn plugin_identifier(&self) -> &str {
        &self.migration.plugin_identifier
    }

    fn zero_rate_tax_class(&self) -> &str {
        &self.migration.zero_rate_tax_class
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::config::validate_settings(self)
    }
}

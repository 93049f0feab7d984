use crate::domain::countries::CountryCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const VATLAYER_ID: &str = "mirumee.taxes.vatlayer";

/// Must match the zero-rate class created by the tax class migration.
pub const TAX_CLASS_ZERO_RATE: &str = "No Taxes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub slug: String,
    pub tax_configuration_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

impl ConfigEntry {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Plugin 設定值可能是 null、布林或數字，一律視為字串
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// One row of the legacy plugin configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: i64,
    pub identifier: String,
    pub active: bool,
    pub channel: Channel,
    #[serde(default)]
    pub configuration: Vec<ConfigEntry>,
}

pub type ConfigMap = HashMap<String, String>;

/// Destination country -> origin country whose rate it adopts.
pub type OriginOverrideMap = BTreeMap<CountryCode, CountryCode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClass {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatData {
    pub standard_rate: f64,
    #[serde(default)]
    pub reduced_rates: HashMap<String, f64>,
}

/// Row of the legacy VAT table, one per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRateRecord {
    pub country_code: String,
    pub data: VatData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxConfigurationCountryKey {
    pub tax_configuration_id: i64,
    pub country: CountryCode,
}

impl TaxConfigurationCountryKey {
    pub fn new(tax_configuration_id: i64, country: CountryCode) -> Self {
        Self {
            tax_configuration_id,
            country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfigurationPerCountry {
    pub tax_configuration_id: i64,
    pub country: CountryCode,
    pub charge_taxes: bool,
    #[serde(default = "default_true")]
    pub display_gross_prices: bool,
    #[serde(default)]
    pub tax_calculation_strategy: Option<String>,
}

fn default_true() -> bool {
    true
}

impl TaxConfigurationPerCountry {
    pub fn new(key: TaxConfigurationCountryKey, charge_taxes: bool) -> Self {
        Self {
            tax_configuration_id: key.tax_configuration_id,
            country: key.country,
            charge_taxes,
            display_gross_prices: true,
            tax_calculation_strategy: None,
        }
    }

    pub fn key(&self) -> TaxConfigurationCountryKey {
        TaxConfigurationCountryKey {
            tax_configuration_id: self.tax_configuration_id,
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Output row: the rate a tax class carries in a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxClassCountryRate {
    pub tax_class_id: i64,
    pub country: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    LegacyInactive,
    LegacyActive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub state: MigrationState,
    pub channels_processed: usize,
    pub origin_overrides: OriginOverrideMap,
    pub excluded_countries_written: usize,
    pub vat_source_available: bool,
    pub rates_created: usize,
    pub finished_at: DateTime<Utc>,
}

impl MigrationReport {
    pub fn inactive() -> Self {
        Self {
            state: MigrationState::LegacyInactive,
            channels_processed: 0,
            origin_overrides: OriginOverrideMap::new(),
            excluded_countries_written: 0,
            vat_source_available: false,
            rates_created: 0,
            finished_at: Utc::now(),
        }
    }
}

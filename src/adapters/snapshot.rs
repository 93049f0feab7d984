//! In-memory database built from a JSON export.
//!
//! The export carries the plugin configuration rows, tax classes, the legacy
//! VAT table (omitted when the app is not installed) and the two target
//! tables. All repository ports are served from it.

use crate::domain::model::{
    ChannelConfig, TaxClass, TaxClassCountryRate, TaxConfigurationCountryKey,
    TaxConfigurationPerCountry, UpsertOutcome, VatRateRecord,
};
use crate::domain::ports::{
    PluginConfigurationRepository, Storage, TaxClassCountryRateRepository, TaxClassRepository,
    TaxConfigurationPerCountryRepository, VatRateRepository, VatRateSource,
};
use crate::utils::error::{MigrationError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    #[serde(default)]
    pub plugin_configurations: Vec<ChannelConfig>,
    #[serde(default)]
    pub tax_classes: Vec<TaxClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<Vec<VatRateRecord>>,
    #[serde(default)]
    pub tax_configuration_per_country: Vec<TaxConfigurationPerCountry>,
    #[serde(default)]
    pub tax_class_country_rates: Vec<TaxClassCountryRate>,
}

pub struct SnapshotStore {
    snapshot: Mutex<DatabaseSnapshot>,
}

impl SnapshotStore {
    pub fn new(snapshot: DatabaseSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let snapshot: DatabaseSnapshot = serde_json::from_slice(data)?;
        Ok(Self::new(snapshot))
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        tracing::debug!("Reading snapshot from: {}", path);
        let data = storage.read_file(path).await?;
        let store = Self::from_json(&data)?;
        {
            let snapshot = store.snapshot.lock().await;
            tracing::debug!(
                "Snapshot loaded: {} plugin configs, {} tax classes, VAT table {}",
                snapshot.plugin_configurations.len(),
                snapshot.tax_classes.len(),
                match &snapshot.vat {
                    Some(vat) => format!("with {} countries", vat.len()),
                    None => "missing".to_string(),
                }
            );
        }
        Ok(store)
    }

    pub async fn snapshot(&self) -> DatabaseSnapshot {
        self.snapshot.lock().await.clone()
    }

    pub async fn to_json(&self) -> Result<Vec<u8>> {
        let snapshot = self.snapshot.lock().await;
        Ok(serde_json::to_vec_pretty(&*snapshot)?)
    }
}

#[async_trait]
impl PluginConfigurationRepository for SnapshotStore {
    async fn find_active(&self, identifier: &str) -> Result<Vec<ChannelConfig>> {
        let snapshot = self.snapshot.lock().await;
        Ok(snapshot
            .plugin_configurations
            .iter()
            .filter(|config| config.active && config.identifier == identifier)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaxClassRepository for SnapshotStore {
    async fn list_excluding(&self, name: &str) -> Result<Vec<TaxClass>> {
        let snapshot = self.snapshot.lock().await;
        Ok(snapshot
            .tax_classes
            .iter()
            .filter(|tax_class| tax_class.name != name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl VatRateRepository for SnapshotStore {
    async fn vat_rates(&self) -> Result<VatRateSource> {
        let snapshot = self.snapshot.lock().await;
        Ok(match &snapshot.vat {
            Some(records) => VatRateSource::Available(records.clone()),
            None => VatRateSource::Unavailable,
        })
    }
}

#[async_trait]
impl TaxConfigurationPerCountryRepository for SnapshotStore {
    async fn update_or_create(
        &self,
        key: TaxConfigurationCountryKey,
        charge_taxes: bool,
    ) -> Result<UpsertOutcome> {
        let mut snapshot = self.snapshot.lock().await;

        let existing = snapshot
            .tax_configuration_per_country
            .iter()
            .position(|row| row.key() == key);

        match existing {
            Some(index) => {
                snapshot.tax_configuration_per_country[index].charge_taxes = charge_taxes;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                snapshot
                    .tax_configuration_per_country
                    .push(TaxConfigurationPerCountry::new(key, charge_taxes));
                Ok(UpsertOutcome::Created)
            }
        }
    }
}

#[async_trait]
impl TaxClassCountryRateRepository for SnapshotStore {
    async fn bulk_create(&self, rates: Vec<TaxClassCountryRate>) -> Result<usize> {
        let mut snapshot = self.snapshot.lock().await;

        // unique (tax_class, country); the whole batch is rejected on conflict
        let mut seen: HashSet<(i64, String)> = snapshot
            .tax_class_country_rates
            .iter()
            .map(|rate| (rate.tax_class_id, rate.country.clone()))
            .collect();
        for rate in &rates {
            if !seen.insert((rate.tax_class_id, rate.country.clone())) {
                return Err(MigrationError::storage(
                    "tax_class_country_rate",
                    format!(
                        "duplicate key (tax_class_id={}, country={})",
                        rate.tax_class_id, rate.country
                    ),
                ));
            }
        }

        let created = rates.len();
        snapshot.tax_class_country_rates.extend(rates);
        Ok(created)
    }
}

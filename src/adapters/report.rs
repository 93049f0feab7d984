use crate::adapters::snapshot::SnapshotStore;
use crate::domain::model::{MigrationReport, TaxClass, TaxClassCountryRate};
use crate::domain::ports::Storage;
use crate::utils::error::{MigrationError, Result};
use serde::Serialize;
use std::collections::HashMap;

pub const SNAPSHOT_FILE: &str = "snapshot.json";
pub const REPORT_FILE: &str = "report.json";
pub const RATES_FILE: &str = "tax_class_country_rates.csv";

#[derive(Debug, Serialize)]
struct RateRow<'a> {
    tax_class_id: i64,
    tax_class: &'a str,
    country: &'a str,
    rate: f64,
}

/// CSV 報表：每個 (tax class, country) 一列
pub fn rates_to_csv(rates: &[TaxClassCountryRate], tax_classes: &[TaxClass]) -> Result<Vec<u8>> {
    let names: HashMap<i64, &str> = tax_classes
        .iter()
        .map(|tax_class| (tax_class.id, tax_class.name.as_str()))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    for rate in rates {
        writer.serialize(RateRow {
            tax_class_id: rate.tax_class_id,
            tax_class: names.get(&rate.tax_class_id).copied().unwrap_or(""),
            country: &rate.country,
            rate: rate.rate,
        })?;
    }

    writer.into_inner().map_err(|e| MigrationError::ProcessingError {
        message: format!("Failed to flush CSV writer: {}", e),
    })
}

/// Writes the migrated snapshot, the JSON report and the rates CSV.
pub async fn write_outputs<S: Storage>(
    storage: &S,
    store: &SnapshotStore,
    report: &MigrationReport,
) -> Result<Vec<String>> {
    let snapshot = store.snapshot().await;

    storage.write_file(SNAPSHOT_FILE, &store.to_json().await?).await?;
    storage
        .write_file(REPORT_FILE, &serde_json::to_vec_pretty(report)?)
        .await?;
    storage
        .write_file(
            RATES_FILE,
            &rates_to_csv(&snapshot.tax_class_country_rates, &snapshot.tax_classes)?,
        )
        .await?;

    tracing::debug!("Wrote {}, {} and {}", SNAPSHOT_FILE, REPORT_FILE, RATES_FILE);
    Ok(vec![
        SNAPSHOT_FILE.to_string(),
        REPORT_FILE.to_string(),
        RATES_FILE.to_string(),
    ])
}

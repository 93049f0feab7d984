use anyhow::Result;
use std::sync::Arc;
use vatlayer_migrate::core::Migration;
use vatlayer_migrate::{
    CliConfig, DatabaseSnapshot, MigrationEngine, MigrationState, SnapshotStore, VatlayerMigration,
};

fn config() -> CliConfig {
    CliConfig {
        snapshot: "db.json".to_string(),
        output_path: "out".to_string(),
        plugin_identifier: "mirumee.taxes.vatlayer".to_string(),
        zero_rate_tax_class: "No Taxes".to_string(),
        verbose: false,
        log_json: false,
        monitor: false,
        dry_run: false,
        reverse: false,
    }
}

fn plugin_config(
    id: i64,
    active: bool,
    tax_configuration_id: i64,
    settings: &[(&str, &str)],
) -> serde_json::Value {
    let configuration: Vec<serde_json::Value> = settings
        .iter()
        .map(|(name, value)| serde_json::json!({"name": name, "value": value}))
        .collect();
    serde_json::json!({
        "id": id,
        "identifier": "mirumee.taxes.vatlayer",
        "active": active,
        "channel": {"id": id, "slug": format!("channel-{}", id), "tax_configuration_id": tax_configuration_id},
        "configuration": configuration
    })
}

fn store(snapshot: serde_json::Value) -> Result<Arc<SnapshotStore>> {
    Ok(Arc::new(SnapshotStore::from_json(&serde_json::to_vec(&snapshot)?)?))
}

async fn migrate(store: &Arc<SnapshotStore>) -> Result<vatlayer_migrate::MigrationReport> {
    let engine = MigrationEngine::new(VatlayerMigration::new(Arc::clone(store), config()));
    Ok(engine.run().await?)
}

fn rate(snapshot: &DatabaseSnapshot, tax_class_id: i64, country: &str) -> Option<f64> {
    snapshot
        .tax_class_country_rates
        .iter()
        .find(|r| r.tax_class_id == tax_class_id && r.country == country)
        .map(|r| r.rate)
}

fn standard_vat() -> serde_json::Value {
    serde_json::json!([
        {"country_code": "DE", "data": {"standard_rate": 0.19, "reduced_rates": {"books": 0.07}}},
        {"country_code": "FR", "data": {"standard_rate": 0.20, "reduced_rates": {}}},
        {"country_code": "BE", "data": {"standard_rate": 0.21, "reduced_rates": {}}}
    ])
}

#[tokio::test]
async fn test_inactive_plugin_is_a_full_no_op() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [
            plugin_config(1, false, 7, &[("origin_country", "DE"), ("excluded_countries", "CH")])
        ],
        "tax_classes": [{"id": 2, "name": "Standard"}],
        "vat": standard_vat()
    }))?;
    let before = store.snapshot().await;

    let report = migrate(&store).await?;

    assert_eq!(report.state, MigrationState::LegacyInactive);
    assert_eq!(report.rates_created, 0);
    assert_eq!(store.snapshot().await, before);
    Ok(())
}

#[tokio::test]
async fn test_missing_origin_record_keeps_destination_rates() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [
            plugin_config(1, true, 7, &[
                ("origin_country", "DE"),
                ("countries_to_calculate_taxes_from_origin", "FR, BE"),
                ("excluded_countries", "CH")
            ])
        ],
        "tax_classes": [{"id": 2, "name": "Standard"}],
        "vat": [
            {"country_code": "FR", "data": {"standard_rate": 0.20, "reduced_rates": {}}},
            {"country_code": "BE", "data": {"standard_rate": 0.21, "reduced_rates": {}}}
        ]
    }))?;

    let report = migrate(&store).await?;
    let after = store.snapshot().await;

    assert_eq!(report.origin_overrides.len(), 2);
    assert_eq!(after.tax_class_country_rates.len(), 2);
    assert_eq!(rate(&after, 2, "FR"), Some(0.20));
    assert_eq!(rate(&after, 2, "BE"), Some(0.21));
    Ok(())
}

#[tokio::test]
async fn test_missing_vat_table_still_applies_exclusions() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [
            plugin_config(1, true, 7, &[("excluded_countries", "CH, no")])
        ],
        "tax_classes": [{"id": 2, "name": "Standard"}]
    }))?;

    let report = migrate(&store).await?;
    let after = store.snapshot().await;

    assert_eq!(report.state, MigrationState::LegacyActive);
    assert!(!report.vat_source_available);
    assert_eq!(report.rates_created, 0);
    assert!(after.tax_class_country_rates.is_empty());

    let countries: Vec<&str> = after
        .tax_configuration_per_country
        .iter()
        .map(|row| row.country.as_str())
        .collect();
    assert_eq!(countries, vec!["CH", "NO"]);
    assert!(after.tax_configuration_per_country.iter().all(|row| !row.charge_taxes));
    Ok(())
}

#[tokio::test]
async fn test_later_channel_wins_for_shared_destination() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [
            plugin_config(1, true, 7, &[
                ("origin_country", "DE"),
                ("countries_to_calculate_taxes_from_origin", "FR")
            ]),
            plugin_config(2, true, 8, &[
                ("origin_country", "BE"),
                ("countries_to_calculate_taxes_from_origin", "FR")
            ])
        ],
        "tax_classes": [{"id": 2, "name": "Standard"}],
        "vat": standard_vat()
    }))?;

    let report = migrate(&store).await?;
    let after = store.snapshot().await;

    assert_eq!(report.channels_processed, 2);
    assert_eq!(report.origin_overrides.len(), 1);
    assert_eq!(
        report.origin_overrides.values().next().map(|c| c.as_str()),
        Some("BE")
    );
    assert_eq!(rate(&after, 2, "FR"), Some(0.21));
    Ok(())
}

#[tokio::test]
async fn test_zero_rate_class_gets_no_rates_and_reduced_rates_apply() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [plugin_config(1, true, 7, &[])],
        "tax_classes": [
            {"id": 1, "name": "No Taxes"},
            {"id": 2, "name": "Standard"},
            {"id": 3, "name": "books"}
        ],
        "vat": standard_vat()
    }))?;

    let report = migrate(&store).await?;
    let after = store.snapshot().await;

    assert_eq!(report.rates_created, 6);
    assert!(after.tax_class_country_rates.iter().all(|r| r.tax_class_id != 1));
    assert_eq!(rate(&after, 3, "DE"), Some(0.07));
    assert_eq!(rate(&after, 3, "FR"), Some(0.20));
    assert_eq!(rate(&after, 2, "DE"), Some(0.19));
    Ok(())
}

#[tokio::test]
async fn test_backwards_never_touches_data() -> Result<()> {
    let store = store(serde_json::json!({
        "plugin_configurations": [plugin_config(1, true, 7, &[("excluded_countries", "CH")])],
        "tax_classes": [{"id": 2, "name": "Standard"}],
        "vat": standard_vat()
    }))?;
    let before = store.snapshot().await;

    let migration = VatlayerMigration::new(Arc::clone(&store), config());
    migration.backwards().await?;

    assert_eq!(store.snapshot().await, before);
    Ok(())
}

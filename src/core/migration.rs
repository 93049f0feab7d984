use crate::core::{aggregator, resolver};
use crate::domain::model::{MigrationReport, MigrationState};
use crate::domain::ports::{ConfigProvider, Migration, TaxStore};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;

/// Moves vatlayer plugin settings and VAT rates into the tax models.
pub struct VatlayerMigration<S: TaxStore, C: ConfigProvider> {
    store: Arc<S>,
    config: C,
}

impl<S: TaxStore, C: ConfigProvider> VatlayerMigration<S, C> {
    pub fn new(store: Arc<S>, config: C) -> Self {
        Self { store, config }
    }
}

#[async_trait::async_trait]
impl<S: TaxStore, C: ConfigProvider> Migration for VatlayerMigration<S, C> {
    fn name(&self) -> &str {
        "tax.0005_migrate_vatlayer"
    }

    async fn forwards(&self) -> Result<MigrationReport> {
        let configs = self
            .store
            .find_active(self.config.plugin_identifier())
            .await?;

        let state = if configs.is_empty() {
            MigrationState::LegacyInactive
        } else {
            MigrationState::LegacyActive
        };
        tracing::debug!("Migration state: {:?}", state);

        if state == MigrationState::LegacyInactive {
            tracing::info!(
                "Plugin '{}' is not active in any channel, nothing to migrate",
                self.config.plugin_identifier()
            );
            return Ok(MigrationReport::inactive());
        }

        tracing::info!("🔧 Migrating settings of {} vatlayer channel configs", configs.len());
        let resolved = resolver::resolve(&configs, &*self.store).await?;

        let summary = aggregator::create_tax_rates(
            &resolved.origin_overrides,
            self.config.zero_rate_tax_class(),
            &*self.store,
        )
        .await?;

        Ok(MigrationReport {
            state,
            channels_processed: configs.len(),
            origin_overrides: resolved.origin_overrides,
            excluded_countries_written: resolved.excluded_countries_written,
            vat_source_available: summary.vat_source_available,
            rates_created: summary.rates_created,
            finished_at: Utc::now(),
        })
    }

    async fn backwards(&self) -> Result<()> {
        // 新模型無法還原舊的 plugin 設定
        tracing::info!("Reverse of {} is a no-op", self.name());
        Ok(())
    }
}

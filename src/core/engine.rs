use crate::domain::model::MigrationReport;
use crate::domain::ports::Migration;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct MigrationEngine<M: Migration> {
    migration: M,
    monitor: SystemMonitor,
}

impl<M: Migration> MigrationEngine<M> {
    pub fn new(migration: M) -> Self {
        Self::new_with_monitoring(migration, false)
    }

    pub fn new_with_monitoring(migration: M, monitor_enabled: bool) -> Self {
        Self {
            migration,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn migration(&self) -> &M {
        &self.migration
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        tracing::info!("🚀 Applying {}", self.migration.name());
        self.monitor.log_stats("Start");

        let report = self.migration.forwards().await?;

        tracing::info!(
            "Processed {} channel configs: {} origin overrides, {} excluded countries, {} rates created",
            report.channels_processed,
            report.origin_overrides.len(),
            report.excluded_countries_written,
            report.rates_created
        );
        self.monitor.log_stats("Forwards");
        self.monitor.log_final_stats();

        Ok(report)
    }

    pub async fn revert(&self) -> Result<()> {
        tracing::info!("⏪ Reverting {}", self.migration.name());
        self.migration.backwards().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MigrationState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockMigration {
        forwards_calls: AtomicUsize,
        backwards_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Migration for MockMigration {
        fn name(&self) -> &str {
            "mock"
        }

        async fn forwards(&self) -> Result<MigrationReport> {
            self.forwards_calls.fetch_add(1, Ordering::SeqCst);
            Ok(MigrationReport::inactive())
        }

        async fn backwards(&self) -> Result<()> {
            self.backwards_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_and_revert_delegate_to_migration() {
        let engine = MigrationEngine::new(MockMigration::default());

        let report = engine.run().await.unwrap();
        engine.revert().await.unwrap();

        assert_eq!(report.state, MigrationState::LegacyInactive);
        assert_eq!(engine.migration().forwards_calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.migration().backwards_calls.load(Ordering::SeqCst), 1);
    }
}

//! Wiring shared by the binaries: load a snapshot, migrate it, write results.

use crate::adapters::report;
use crate::adapters::snapshot::SnapshotStore;
use crate::config::cli::LocalStorage;
use crate::core::engine::MigrationEngine;
use crate::core::migration::VatlayerMigration;
use crate::domain::model::MigrationReport;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub monitor: bool,
    pub dry_run: bool,
    pub reverse: bool,
}

#[derive(Debug)]
pub enum RunOutcome {
    Applied {
        report: MigrationReport,
        output_path: String,
        files: Vec<String>,
    },
    DryRun {
        report: MigrationReport,
    },
    Reverted,
}

pub async fn run<C: ConfigProvider>(config: C, options: RunOptions) -> Result<RunOutcome> {
    let snapshot_storage = LocalStorage::new(".".to_string());
    let store = Arc::new(SnapshotStore::load(&snapshot_storage, config.snapshot_path()).await?);
    let output_path = config.output_path().to_string();

    let migration = VatlayerMigration::new(Arc::clone(&store), config);
    let engine = MigrationEngine::new_with_monitoring(migration, options.monitor);

    if options.reverse {
        engine.revert().await?;
        return Ok(RunOutcome::Reverted);
    }

    let report = engine.run().await?;

    if options.dry_run {
        tracing::info!("🔍 DRY RUN MODE - results were not written");
        return Ok(RunOutcome::DryRun { report });
    }

    let output_storage = LocalStorage::new(output_path.clone());
    let files = report::write_outputs(&output_storage, &store, &report).await?;

    Ok(RunOutcome::Applied {
        report,
        output_path,
        files,
    })
}

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{DatabaseSnapshot, SnapshotStore};
pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::{engine::MigrationEngine, migration::VatlayerMigration};
pub use domain::model::{MigrationReport, MigrationState};
pub use utils::error::{MigrationError, Result};

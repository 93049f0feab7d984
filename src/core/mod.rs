pub mod aggregator;
pub mod engine;
pub mod migration;
pub mod parser;
pub mod resolver;

pub use crate::domain::model::{MigrationReport, MigrationState};
pub use crate::domain::ports::{ConfigProvider, Migration, Storage, TaxStore};
pub use crate::utils::error::Result;

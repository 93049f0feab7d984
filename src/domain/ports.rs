use crate::domain::model::{
    ChannelConfig, MigrationReport, TaxClass, TaxClassCountryRate, TaxConfigurationCountryKey,
    UpsertOutcome, VatRateRecord,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn snapshot_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn plugin_identifier(&self) -> &str;
    fn zero_rate_tax_class(&self) -> &str;
}

/// Whether the legacy VAT table exists in this deployment.
#[derive(Debug, Clone, PartialEq)]
pub enum VatRateSource {
    Available(Vec<VatRateRecord>),
    Unavailable,
}

impl VatRateSource {
    pub fn is_available(&self) -> bool {
        matches!(self, VatRateSource::Available(_))
    }

    pub fn into_records(self) -> Vec<VatRateRecord> {
        match self {
            VatRateSource::Available(records) => records,
            VatRateSource::Unavailable => Vec::new(),
        }
    }
}

#[async_trait]
pub trait PluginConfigurationRepository: Send + Sync {
    /// Active rows for `identifier`, in storage order.
    async fn find_active(&self, identifier: &str) -> Result<Vec<ChannelConfig>>;
}

#[async_trait]
pub trait TaxClassRepository: Send + Sync {
    async fn list_excluding(&self, name: &str) -> Result<Vec<TaxClass>>;
}

#[async_trait]
pub trait VatRateRepository: Send + Sync {
    async fn vat_rates(&self) -> Result<VatRateSource>;
}

#[async_trait]
pub trait TaxConfigurationPerCountryRepository: Send + Sync {
    async fn update_or_create(
        &self,
        key: TaxConfigurationCountryKey,
        charge_taxes: bool,
    ) -> Result<UpsertOutcome>;
}

#[async_trait]
pub trait TaxClassCountryRateRepository: Send + Sync {
    async fn bulk_create(&self, rates: Vec<TaxClassCountryRate>) -> Result<usize>;
}

/// Everything the vatlayer migration reads from or writes to.
pub trait TaxStore:
    PluginConfigurationRepository
    + TaxClassRepository
    + VatRateRepository
    + TaxConfigurationPerCountryRepository
    + TaxClassCountryRateRepository
{
}

impl<T> TaxStore for T where
    T: PluginConfigurationRepository
        + TaxClassRepository
        + VatRateRepository
        + TaxConfigurationPerCountryRepository
        + TaxClassCountryRateRepository
{
}

#[async_trait]
pub trait Migration: Send + Sync {
    fn name(&self) -> &str;
    async fn forwards(&self) -> Result<MigrationReport>;
    async fn backwards(&self) -> Result<()>;
}


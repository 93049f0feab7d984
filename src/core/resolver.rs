use crate::core::parser;
use crate::domain::model::{ChannelConfig, OriginOverrideMap, TaxConfigurationCountryKey};
use crate::domain::ports::TaxConfigurationPerCountryRepository;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedOverrides {
    pub origin_overrides: OriginOverrideMap,
    pub excluded_countries_written: usize,
}

/// Walks the legacy configs in the given order.
///
/// A destination listed by several channels ends up with the origin of the
/// last channel that lists it. Excluded countries are written to the
/// per-country tax configuration right away, one upsert per country.
pub async fn resolve<R>(configs: &[ChannelConfig], repository: &R) -> Result<ResolvedOverrides>
where
    R: TaxConfigurationPerCountryRepository + ?Sized,
{
    let mut resolved = ResolvedOverrides::default();

    for config in configs {
        let settings = parser::parse(config);

        if let Some(origin) = &settings.origin_country {
            for destination in &settings.countries_from_origin {
                if let Some(previous) = resolved
                    .origin_overrides
                    .insert(destination.clone(), origin.clone())
                {
                    if &previous != origin {
                        tracing::debug!(
                            "Channel '{}' overrides origin for {}: {} -> {}",
                            config.channel.slug,
                            destination,
                            previous,
                            origin
                        );
                    }
                }
            }
        }

        for country in &settings.excluded_countries {
            let key = TaxConfigurationCountryKey::new(
                config.channel.tax_configuration_id,
                country.clone(),
            );
            let outcome = repository.update_or_create(key, false).await?;
            tracing::debug!(
                "Channel '{}': charge_taxes disabled for {} ({:?})",
                config.channel.slug,
                country,
                outcome
            );
            resolved.excluded_countries_written += 1;
        }
    }

    Ok(resolved)
}

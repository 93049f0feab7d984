use crate::domain::model::{OriginOverrideMap, TaxClass, TaxClassCountryRate, VatRateRecord};
use crate::domain::ports::{TaxClassCountryRateRepository, TaxClassRepository, VatRateRepository};
use crate::utils::error::Result;
use indexmap::IndexMap;

/// (tax class id, country code)
pub type RateKey = (i64, String);

pub type RateTable = IndexMap<RateKey, TaxClassCountryRate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSummary {
    pub vat_source_available: bool,
    pub rates_created: usize,
}

/// Rate a tax class gets in one country, ignoring origin overrides.
pub fn base_rate(tax_class: &TaxClass, vat: &VatRateRecord) -> f64 {
    vat.data
        .reduced_rates
        .get(&tax_class.name)
        .copied()
        .unwrap_or(vat.data.standard_rate)
}

/// Builds the full rate table, in first-insertion order.
pub fn aggregate(
    overrides: &OriginOverrideMap,
    tax_classes: &[TaxClass],
    vat_rates: &[VatRateRecord],
) -> RateTable {
    let mut rates = RateTable::new();

    for tax_class in tax_classes {
        for vat in vat_rates {
            rates.insert(
                (tax_class.id, vat.country_code.clone()),
                TaxClassCountryRate {
                    tax_class_id: tax_class.id,
                    country: vat.country_code.clone(),
                    rate: base_rate(tax_class, vat),
                },
            );
        }

        apply_origin_overrides(&mut rates, tax_class.id, overrides);
    }

    rates
}

/// Copies each origin's rate onto its destinations within one tax class.
///
/// Origin rates are read before any destination is rewritten, so a country
/// that is both an origin and a destination hands out its own base rate.
/// Pairs where either side has no rate are skipped.
pub fn apply_origin_overrides(rates: &mut RateTable, tax_class_id: i64, overrides: &OriginOverrideMap) {
    let substitutions: Vec<(RateKey, f64)> = overrides
        .iter()
        .filter_map(|(destination, origin)| {
            let destination_key = (tax_class_id, destination.as_str().to_string());
            if !rates.contains_key(&destination_key) {
                return None;
            }
            let origin_rate = rates
                .get(&(tax_class_id, origin.as_str().to_string()))?
                .rate;
            Some((destination_key, origin_rate))
        })
        .collect();

    for (key, rate) in substitutions {
        if let Some(record) = rates.get_mut(&key) {
            record.rate = rate;
        }
    }
}

/// Computes every (tax class, country) rate and inserts them in one batch.
pub async fn create_tax_rates<R>(
    overrides: &OriginOverrideMap,
    zero_rate_tax_class: &str,
    repository: &R,
) -> Result<RateSummary>
where
    R: TaxClassRepository + VatRateRepository + TaxClassCountryRateRepository + ?Sized,
{
    let tax_classes = repository.list_excluding(zero_rate_tax_class).await?;

    let source = repository.vat_rates().await?;
    let vat_source_available = source.is_available();
    if !vat_source_available {
        tracing::warn!("⚠️ Legacy VAT table is not installed, no country rates will be created");
    }
    let vat_rates = source.into_records();

    tracing::debug!(
        "Aggregating rates for {} tax classes across {} countries",
        tax_classes.len(),
        vat_rates.len()
    );

    let rates = aggregate(overrides, &tax_classes, &vat_rates);
    let rates_created = repository
        .bulk_create(rates.into_values().collect())
        .await?;

    Ok(RateSummary {
        vat_source_available,
        rates_created,
    })
}

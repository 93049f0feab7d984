use crate::domain::countries::{normalize_list, normalize_one, CountryCode};
use crate::domain::model::{ChannelConfig, ConfigMap};

pub const ORIGIN_COUNTRY: &str = "origin_country";
pub const COUNTRIES_FROM_ORIGIN: &str = "countries_to_calculate_taxes_from_origin";
pub const EXCLUDED_COUNTRIES: &str = "excluded_countries";

/// The three vatlayer settings the migration cares about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelTaxSettings {
    pub origin_country: Option<CountryCode>,
    pub countries_from_origin: Vec<CountryCode>,
    pub excluded_countries: Vec<CountryCode>,
}

pub fn to_map(config: &ChannelConfig) -> ConfigMap {
    config
        .configuration
        .iter()
        .map(|entry| (entry.name.clone(), entry.value.clone()))
        .collect()
}

fn setting<'a>(map: &'a ConfigMap, name: &str) -> &'a str {
    map.get(name).map(String::as_str).unwrap_or("")
}

pub fn extract(map: &ConfigMap) -> ChannelTaxSettings {
    ChannelTaxSettings {
        origin_country: normalize_one(setting(map, ORIGIN_COUNTRY)),
        countries_from_origin: normalize_list(setting(map, COUNTRIES_FROM_ORIGIN)),
        excluded_countries: normalize_list(setting(map, EXCLUDED_COUNTRIES)),
    }
}

pub fn parse(config: &ChannelConfig) -> ChannelTaxSettings {
    extract(&to_map(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Channel, ConfigEntry};

    fn config(entries: Vec<ConfigEntry>) -> ChannelConfig {
        ChannelConfig {
            id: 1,
            identifier: crate::domain::model::VATLAYER_ID.to_string(),
            active: true,
            channel: Channel {
                id: 1,
                slug: "default-channel".to_string(),
                tax_configuration_id: 10,
            },
            configuration: entries,
        }
    }

    #[test]
    fn test_to_map_later_entry_wins() {
        let map = to_map(&config(vec![
            ConfigEntry::new(ORIGIN_COUNTRY, "PL"),
            ConfigEntry::new("access_key", "secret"),
            ConfigEntry::new(ORIGIN_COUNTRY, "DE"),
        ]));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(ORIGIN_COUNTRY).unwrap(), "DE");
    }

    #[test]
    fn test_extract_reads_all_three_settings() {
        let settings = parse(&config(vec![
            ConfigEntry::new(ORIGIN_COUNTRY, "de"),
            ConfigEntry::new(COUNTRIES_FROM_ORIGIN, "FR, BE"),
            ConfigEntry::new(EXCLUDED_COUNTRIES, "CH,XX"),
        ]));

        assert_eq!(settings.origin_country.unwrap().as_str(), "DE");
        assert_eq!(
            settings
                .countries_from_origin
                .iter()
                .map(CountryCode::as_str)
                .collect::<Vec<_>>(),
            vec!["FR", "BE"]
        );
        assert_eq!(settings.excluded_countries.len(), 1);
        assert_eq!(settings.excluded_countries[0].as_str(), "CH");
    }

    #[test]
    fn test_extract_missing_settings_default_to_empty() {
        let settings = parse(&config(vec![ConfigEntry::new("access_key", "secret")]));
        assert_eq!(settings, ChannelTaxSettings::default());
    }
}

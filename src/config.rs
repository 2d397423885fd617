//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! dominant_subplot_area_m2 = 100.0
//! main_species_share = 0.75
//!
//! [prices]
//! maritime_pine = [65.0, 40.0, 12.25]
//! eucalyptus = 38.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ForestError;
use crate::models::Species;

/// Unit prices (per m³) of the timber assortments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimberPrices {
    /// Maritime pine bands: top diameter ≥35, 15–35 and 7–15 cm
    pub maritime_pine: [f64; 3],
    /// Eucalyptus band above a 6 cm top diameter
    pub eucalyptus: f64,
}

impl Default for TimberPrices {
    fn default() -> Self {
        Self {
            maritime_pine: [65.0, 40.0, 12.25],
            eucalyptus: 38.0,
        }
    }
}

impl TimberPrices {
    /// Prices aligned with the species' assortment bands; empty when the species has none.
    pub fn for_species(&self, species: Species) -> &[f64] {
        match species {
            Species::Pb => &self.maritime_pine[..],
            Species::Ec => std::slice::from_ref(&self.eucalyptus),
            Species::Pm | Species::Sb => &[],
        }
    }

    fn all(&self) -> impl Iterator<Item = f64> + '_ {
        self.maritime_pine
            .iter()
            .copied()
            .chain(std::iter::once(self.eucalyptus))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Area represented by one dominant tree, in m²
    pub dominant_subplot_area_m2: f64,
    /// Share of alive stems one species needs to be the main species
    pub main_species_share: f64,
    pub prices: TimberPrices,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dominant_subplot_area_m2: 100.0,
            main_species_share: 0.75,
            prices: TimberPrices::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ForestError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ForestError> {
        if !self.dominant_subplot_area_m2.is_finite() || self.dominant_subplot_area_m2 <= 0.0 {
            return Err(ForestError::ConfigurationError(format!(
                "dominant_subplot_area_m2 must be positive, got {}",
                self.dominant_subplot_area_m2
            )));
        }
        if !(self.main_species_share > 0.0 && self.main_species_share <= 1.0) {
            return Err(ForestError::ConfigurationError(format!(
                "main_species_share must be in (0, 1], got {}",
                self.main_species_share
            )));
        }
        if let Some(price) = self.prices.all().find(|p| !p.is_finite() || *p < 0.0) {
            return Err(ForestError::ConfigurationError(format!(
                "timber prices must be non-negative, got {price}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.dominant_subplot_area_m2, 100.0);
        assert_eq!(config.main_species_share, 0.75);
        assert_eq!(config.prices.maritime_pine, [65.0, 40.0, 12.25]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = EngineConfig::from_toml_str(
            "main_species_share = 0.8\n[prices]\neucalyptus = 42.5\n",
        )
        .unwrap();
        assert_eq!(config.main_species_share, 0.8);
        assert_eq!(config.prices.eucalyptus, 42.5);
        assert_eq!(config.prices.maritime_pine, [65.0, 40.0, 12.25]);
        assert_eq!(config.dominant_subplot_area_m2, 100.0);
    }

    #[test]
    fn test_invalid_share_rejected() {
        let err = EngineConfig::from_toml_str("main_species_share = 1.5").unwrap_err();
        assert!(matches!(err, ForestError::ConfigurationError(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err =
            EngineConfig::from_toml_str("[prices]\nmaritime_pine = [65.0, -1.0, 12.0]").unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("dominant_subplot_area_m2 = \"big\"").unwrap_err();
        assert!(matches!(err, ForestError::Toml(_)));
    }

    #[test]
    fn test_prices_for_species() {
        let prices = TimberPrices::default();
        assert_eq!(prices.for_species(Species::Pb).len(), 3);
        assert_eq!(prices.for_species(Species::Ec), &[38.0]);
        assert!(prices.for_species(Species::Pm).is_empty());
        assert!(prices.for_species(Species::Sb).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "dominant_subplot_area_m2 = 50.0\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.dominant_subplot_area_m2, 50.0);
    }
}

use serde::{Deserialize, Serialize};

use super::Species;

/// Composition of the alive stems: a single main species or a mixed stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainSpecies {
    Single(Species),
    Mixed,
}

impl MainSpecies {
    pub fn species(&self) -> Option<Species> {
        match self {
            MainSpecies::Single(species) => Some(*species),
            MainSpecies::Mixed => None,
        }
    }
}

impl std::fmt::Display for MainSpecies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainSpecies::Single(species) => write!(f, "{species}"),
            MainSpecies::Mixed => write!(f, "Mixed"),
        }
    }
}

/// Plot-level summary. Densities are per hectare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stand {
    pub area_m2: f64,
    /// Stand age in years, 0 when unknown
    pub age: f64,
    /// Number of trees recorded on the plot
    pub tree_count: usize,
    /// Trees per hectare, all statuses
    pub n: f64,
    pub n_alive: f64,
    pub n_dead: f64,
    pub n_missing: f64,
    pub n_stump: f64,
    pub main_species: MainSpecies,
    /// Number of trees in the dominant sample
    pub dominant_count: usize,
    /// Dominant height in m
    pub dominant_height: f64,
    /// Dominant diameter in cm
    pub dominant_diameter: f64,
    /// Basal area in m²/ha
    pub basal_area: f64,
    /// Stem volume in m³/ha
    pub volume: f64,
    /// Merchantable volume in m³/ha
    pub merchantable_volume: f64,
    /// Timber value per ha
    pub wood_value: f64,
    /// Total biomass in Mg/ha
    pub biomass: f64,
    /// Quadratic mean diameter in cm
    pub quadratic_mean_diameter: f64,
    pub wilson_factor: f64,
    pub stand_density_index: f64,
    /// Site index in m, 0 when not defined
    pub site_index: f64,
}

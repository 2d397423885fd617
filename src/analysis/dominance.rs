use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::ForestError;
use crate::models::{MainSpecies, Species, Tree};

/// Dominant sample of the plot: the tallest eligible alive trees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dominance {
    pub main_species: MainSpecies,
    /// Trees in the dominant sample
    pub count: usize,
    /// Mean height of the sample in m
    pub height: f64,
    /// Mean DBH of the sample in cm
    pub diameter: f64,
}

/// Main species of the alive stems, or `Mixed` when no species reaches `share`.
pub fn main_species(trees: &[Tree], share: f64) -> MainSpecies {
    let mut counts: BTreeMap<Species, usize> = BTreeMap::new();
    for tree in trees.iter().filter(|t| t.is_alive()) {
        *counts.entry(tree.species).or_insert(0) += 1;
    }
    let alive: usize = counts.values().sum();
    if alive == 0 {
        return MainSpecies::Mixed;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count as f64 / alive as f64 >= share)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(species, _)| MainSpecies::Single(species))
        .unwrap_or(MainSpecies::Mixed)
}

/// Select the dominant sample and compute dominant height and diameter.
///
/// One tree is taken per `dominant_subplot_area_m2` of plot, among the alive
/// trees of the main species (all alive trees in a mixed stand). Ties in
/// height keep input order.
pub fn select_dominant(
    trees: &[Tree],
    area_m2: f64,
    config: &EngineConfig,
) -> Result<Dominance, ForestError> {
    let main = main_species(trees, config.main_species_share);

    let mut eligible: Vec<&Tree> = trees
        .iter()
        .filter(|t| t.is_alive())
        .filter(|t| match main {
            MainSpecies::Single(species) => t.species == species,
            MainSpecies::Mixed => true,
        })
        .collect();

    let per_area = (area_m2 / config.dominant_subplot_area_m2).floor();
    let per_area = if per_area.is_finite() && per_area > 0.0 {
        per_area as usize
    } else {
        0
    };
    let count = per_area.min(eligible.len());
    if count == 0 {
        return Err(ForestError::ComputationError(format!(
            "dominant sample is empty ({} eligible trees on {area_m2} m²)",
            eligible.len()
        )));
    }

    eligible.sort_by(|a, b| b.est_height.total_cmp(&a.est_height));
    let sample = &eligible[..count];

    let height = sample.iter().map(|t| t.est_height).sum::<f64>() / count as f64;
    let diameter = sample.iter().map(|t| t.est_dbh).sum::<f64>() / count as f64;

    tracing::debug!(%main, count, height, diameter, "dominant sample selected");

    Ok(Dominance {
        main_species: main,
        count,
        height,
        diameter,
    })
}

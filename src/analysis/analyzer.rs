use serde::{Deserialize, Serialize};

use crate::analysis::{
    aggregate_stand, compute_tree_metrics, impute_all, select_dominant, site_index,
    validate_records, wood_value, DiameterDistribution,
};
use crate::config::EngineConfig;
use crate::error::ForestError;
use crate::models::{Plot, Stand, Tree};

/// Result of running the engine over one plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotReport {
    pub trees: Vec<Tree>,
    pub stand: Stand,
}

/// Run the full pipeline over a plot.
///
/// Validation, imputation, dominant sample, per-tree metrics, timber value,
/// stand aggregation and site index run in that order. The first error aborts
/// the whole plot.
pub fn compute_plot(plot: &Plot, config: &EngineConfig) -> Result<PlotReport, ForestError> {
    config.validate()?;
    plot.expansion_factor()?;
    let age = plot.known_age()?;

    let mut trees = validate_records(&plot.records)?;
    impute_all(&mut trees)?;

    let dominance = select_dominant(&trees, plot.area_m2, config)?;

    for tree in trees.iter_mut() {
        tree.metrics = compute_tree_metrics(tree, &dominance)?;
    }
    for tree in trees.iter_mut() {
        tree.metrics.wood_value = wood_value(tree, tree.metrics.merchantable_volume, &config.prices);
    }

    let mut stand = aggregate_stand(&trees, plot.area_m2, &dominance)?;
    stand.site_index = site_index(dominance.main_species, dominance.height, age)?;
    stand.age = age.unwrap_or(0.0);

    tracing::info!(
        trees = trees.len(),
        main_species = %stand.main_species,
        "plot metrics computed"
    );

    Ok(PlotReport { trees, stand })
}

/// Analysis API over one plot.
pub struct Analyzer<'a> {
    plot: &'a Plot,
    config: EngineConfig,
}

impl<'a> Analyzer<'a> {
    /// Create an Analyzer with the default engine configuration.
    pub fn new(plot: &'a Plot) -> Self {
        Self::with_config(plot, EngineConfig::default())
    }

    pub fn with_config(plot: &'a Plot, config: EngineConfig) -> Self {
        Self { plot, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Per-tree metrics and the stand summary.
    pub fn report(&self) -> Result<PlotReport, ForestError> {
        compute_plot(self.plot, &self.config)
    }

    /// Diameter distribution of the alive trees of a computed report.
    pub fn diameter_distribution(
        &self,
        report: &PlotReport,
        class_width: f64,
    ) -> Result<DiameterDistribution, ForestError> {
        DiameterDistribution::from_trees(&report.trees, self.plot.area_m2, class_width)
    }
}

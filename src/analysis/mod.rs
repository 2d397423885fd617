mod validation;
mod hypsometry;
mod dominance;
mod tree_metrics;
mod timber_value;
mod stand;
mod site_index;
mod diameter_distribution;
mod analyzer;

pub use validation::{validate_record, validate_records};
pub use hypsometry::{dbh_from_height, height_from_dbh, impute, impute_all};
pub use dominance::{main_species, select_dominant, Dominance};
pub use tree_metrics::{basal_area, biomass, compute_tree_metrics};
pub use timber_value::{assortment_volumes, diameter_at_2m, wood_value};
pub use stand::aggregate_stand;
pub use site_index::{evaluate_curve, site_index};
pub use diameter_distribution::{DiameterClass, DiameterDistribution};
pub use analyzer::{compute_plot, Analyzer, PlotReport};

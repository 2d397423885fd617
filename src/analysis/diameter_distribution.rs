use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::tree_metrics::basal_area;
use crate::error::ForestError;
use crate::models::{expansion_factor, Tree};

/// Lower edge of the first diameter class, in cm.
const CLASS_ORIGIN: f64 = 2.5;

/// A single diameter class in the distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterClass {
    /// Lower bound of the class (inclusive)
    pub lower: f64,
    /// Upper bound of the class (exclusive)
    pub upper: f64,
    /// Midpoint of the class
    pub midpoint: f64,
    /// Trees per hectare in this class
    pub density: f64,
    /// Basal area per hectare in this class
    pub basal_area: f64,
    /// Number of measured trees in this class
    pub tree_count: usize,
}

/// Diameter distribution of the alive trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterDistribution {
    /// Width of each diameter class in cm
    pub class_width: f64,
    /// The non-empty diameter classes, smallest first
    pub classes: Vec<DiameterClass>,
}

impl DiameterDistribution {
    /// Build a diameter distribution from the working DBH of alive trees.
    ///
    /// # Arguments
    /// * `trees` - Imputed trees of the plot
    /// * `area_m2` - Plot area in m²
    /// * `class_width` - Width of each diameter class in cm (commonly 5)
    pub fn from_trees(trees: &[Tree], area_m2: f64, class_width: f64) -> Result<Self, ForestError> {
        if !class_width.is_finite() || class_width <= 0.0 {
            return Err(ForestError::ConfigurationError(format!(
                "diameter class width must be positive, got {class_width}"
            )));
        }
        let f = expansion_factor(area_m2)?;

        let mut by_class: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for tree in trees.iter().filter(|t| t.is_alive()) {
            let index = ((tree.est_dbh - CLASS_ORIGIN) / class_width).floor() as i64;
            by_class.entry(index).or_default().push(tree.est_dbh);
        }

        let classes = by_class
            .into_iter()
            .map(|(index, members)| {
                let lower = CLASS_ORIGIN + index as f64 * class_width;
                DiameterClass {
                    lower,
                    upper: lower + class_width,
                    midpoint: lower + class_width / 2.0,
                    density: members.len() as f64 * f,
                    basal_area: members.iter().map(|d| basal_area(*d)).sum::<f64>() * f,
                    tree_count: members.len(),
                }
            })
            .collect();

        Ok(DiameterDistribution {
            class_width,
            classes,
        })
    }
}

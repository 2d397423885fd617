use serde::{Deserialize, Serialize};

use super::TreeRecord;
use crate::error::ForestError;

/// A measured sample plot: the raw records plus the plot descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    /// Plot area in m²
    pub area_m2: f64,
    /// Stand age in years, when known
    pub age: Option<f64>,
    /// Field records in input order
    pub records: Vec<TreeRecord>,
}

impl Plot {
    pub fn new(area_m2: f64, age: Option<f64>, records: Vec<TreeRecord>) -> Self {
        Self {
            area_m2,
            age,
            records,
        }
    }

    /// Per-hectare expansion factor `10000 / area`.
    pub fn expansion_factor(&self) -> Result<f64, ForestError> {
        expansion_factor(self.area_m2)
    }

    /// Stand age to use for the site index: `None` when unknown or zero.
    pub fn known_age(&self) -> Result<Option<f64>, ForestError> {
        match self.age {
            None => Ok(None),
            Some(age) if !age.is_finite() || age < 0.0 => Err(ForestError::ConfigurationError(
                format!("stand age must be a non-negative number of years, got {age}"),
            )),
            Some(age) if age == 0.0 => Ok(None),
            Some(age) => Ok(Some(age)),
        }
    }
}

/// Per-hectare expansion factor for a plot of `area_m2`.
pub fn expansion_factor(area_m2: f64) -> Result<f64, ForestError> {
    if !area_m2.is_finite() || area_m2 <= 0.0 {
        return Err(ForestError::ConfigurationError(format!(
            "plot area must be a positive number of m², got {area_m2}"
        )));
    }
    Ok(10_000.0 / area_m2)
}

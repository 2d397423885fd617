use serde::{Deserialize, Serialize};

use crate::error::ForestError;

/// Status of a tree on the plot (field code `COD_Status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeStatus {
    Alive,
    Dead,
    Missing,
    Stump,
}

impl TreeStatus {
    pub const ALL: [TreeStatus; 4] = [
        TreeStatus::Alive,
        TreeStatus::Dead,
        TreeStatus::Missing,
        TreeStatus::Stump,
    ];

    /// Numeric field code used in inventory sheets.
    pub fn code(&self) -> u8 {
        match self {
            TreeStatus::Alive => 1,
            TreeStatus::Dead => 2,
            TreeStatus::Missing => 3,
            TreeStatus::Stump => 4,
        }
    }
}

impl std::fmt::Display for TreeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeStatus::Alive => write!(f, "Alive"),
            TreeStatus::Dead => write!(f, "Dead"),
            TreeStatus::Missing => write!(f, "Missing"),
            TreeStatus::Stump => write!(f, "Stump"),
        }
    }
}

impl std::str::FromStr for TreeStatus {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "alive" => Ok(TreeStatus::Alive),
            "2" | "dead" => Ok(TreeStatus::Dead),
            "3" | "missing" => Ok(TreeStatus::Missing),
            "4" | "stump" => Ok(TreeStatus::Stump),
            _ => Err(ForestError::ParseError(format!(
                "Unknown tree status: '{s}'"
            ))),
        }
    }
}

/// Species covered by the allometric models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Maritime pine (Pinus pinaster)
    Pb,
    /// Stone pine (Pinus pinea)
    Pm,
    /// Southern blue gum (Eucalyptus globulus)
    Ec,
    /// Cork oak (Quercus suber)
    Sb,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::Pb, Species::Pm, Species::Ec, Species::Sb];

    pub fn code(&self) -> &'static str {
        match self {
            Species::Pb => "Pb",
            Species::Pm => "Pm",
            Species::Ec => "Ec",
            Species::Sb => "Sb",
        }
    }

    pub fn common_name(&self) -> &'static str {
        match self {
            Species::Pb => "Maritime Pine",
            Species::Pm => "Stone Pine",
            Species::Ec => "Southern Blue Gum",
            Species::Sb => "Cork Oak",
        }
    }

    pub fn scientific_name(&self) -> &'static str {
        match self {
            Species::Pb => "Pinus pinaster",
            Species::Pm => "Pinus pinea",
            Species::Ec => "Eucalyptus globulus",
            Species::Sb => "Quercus suber",
        }
    }

    /// Smallest DBH (cm) at which a stem of this species counts as a tree.
    pub fn min_dbh(&self) -> f64 {
        match self {
            Species::Ec => 5.0,
            _ => 7.5,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Species {
    type Err = ForestError;

    /// Parse a species code. `Eu` is accepted as an alias of `Ec`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pb" => Ok(Species::Pb),
            "Pm" => Ok(Species::Pm),
            "Ec" | "Eu" => Ok(Species::Ec),
            "Sb" => Ok(Species::Sb),
            other => Err(ForestError::ParseError(format!(
                "Unknown species code: '{other}' (expected Pb, Pm, Ec or Sb)"
            ))),
        }
    }
}

/// A raw field record, as handed over by the loader.
///
/// Nothing here has been checked yet; see [`crate::analysis::validate_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: f64,
    pub species: String,
    /// Diameter at breast height in cm
    pub dbh: Option<f64>,
    /// Total height in m
    pub height: Option<f64>,
    pub status: String,
}

impl TreeRecord {
    pub fn new(
        id: f64,
        species: impl Into<String>,
        dbh: Option<f64>,
        height: Option<f64>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            species: species.into(),
            dbh,
            height,
            status: status.into(),
        }
    }
}

/// Biomass compartments of one tree, in kg dry weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Biomass {
    pub trunk: f64,
    pub bark: f64,
    pub branches: f64,
    pub foliage: f64,
    pub aerial: f64,
    pub roots: f64,
    pub total: f64,
}

/// Metrics derived for one tree. All zero until computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeMetrics {
    /// Basal area in m²
    pub basal_area: f64,
    /// Stem volume with bark and stump in m³
    pub volume: f64,
    /// Merchantable volume (no bark, no stump) in m³
    pub merchantable_volume: f64,
    /// Timber value of the merchantable volume
    pub wood_value: f64,
    pub biomass: Biomass,
}

/// A validated tree on the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: u32,
    pub species: Species,
    /// Measured DBH in cm
    pub dbh: Option<f64>,
    /// Measured total height in m
    pub height: Option<f64>,
    pub status: TreeStatus,
    /// Working DBH: measured or imputed
    pub est_dbh: f64,
    /// Working height: measured or imputed
    pub est_height: f64,
    #[serde(default)]
    pub metrics: TreeMetrics,
}

impl Tree {
    /// Build a tree whose working values mirror the measurements.
    ///
    /// Absent measurements start at 0 until the hypsometric imputation runs.
    pub fn new(
        id: u32,
        species: Species,
        dbh: Option<f64>,
        height: Option<f64>,
        status: TreeStatus,
    ) -> Self {
        Self {
            id,
            species,
            dbh,
            height,
            status,
            est_dbh: dbh.unwrap_or(0.0),
            est_height: height.unwrap_or(0.0),
            metrics: TreeMetrics::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == TreeStatus::Alive
    }

    /// True when either measurement had to be estimated.
    pub fn is_imputed(&self) -> bool {
        self.dbh.is_none() || self.height.is_none()
    }
}

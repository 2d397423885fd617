use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{DiameterDistribution, PlotReport};
use crate::error::ForestError;
use crate::models::{Stand, Tree};

/// Full JSON export: per-tree metrics, the stand summary and the diameter classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub trees: Vec<Tree>,
    pub stand: Stand,
    pub distribution: DiameterDistribution,
}

impl JsonReport {
    pub fn new(report: &PlotReport, distribution: DiameterDistribution) -> Self {
        Self {
            trees: report.trees.clone(),
            stand: report.stand.clone(),
            distribution,
        }
    }
}

/// Serialize a report to a JSON string.
pub fn to_json_string(report: &JsonReport, pretty: bool) -> Result<String, ForestError> {
    let content = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(content)
}

/// Write a report to a JSON file.
pub fn write_json(
    report: &JsonReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForestError> {
    std::fs::write(path.as_ref(), to_json_string(report, pretty)?)?;
    Ok(())
}

/// Read a report previously written by [`write_json`].
pub fn read_json(path: impl AsRef<Path>) -> Result<JsonReport, ForestError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_plot;
    use crate::config::EngineConfig;
    use crate::models::{MainSpecies, Plot, Species, TreeRecord};

    fn sample() -> JsonReport {
        let records = vec![
            TreeRecord::new(1.0, "Pb", Some(12.0), Some(14.0), "1"),
            TreeRecord::new(2.0, "Pb", Some(22.0), Some(17.0), "1"),
        ];
        let plot = Plot::new(200.0, None, records);
        let report = compute_plot(&plot, &EngineConfig::default()).unwrap();
        let distribution =
            DiameterDistribution::from_trees(&report.trees, plot.area_m2, 5.0).unwrap();
        JsonReport::new(&report, distribution)
    }

    #[test]
    fn test_json_has_top_level_sections() {
        let text = to_json_string(&sample(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["trees"].is_array());
        assert_eq!(value["trees"].as_array().unwrap().len(), 2);
        assert_eq!(value["stand"]["n"], 100.0);
        assert_eq!(value["stand"]["main_species"]["Single"], "Pb");
        assert_eq!(value["distribution"]["class_width"], 5.0);
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let text = to_json_string(&sample(), true).unwrap();
        assert!(text.contains("\n  \"trees\""));
    }

    #[test]
    fn test_write_and_read_back() {
        let report = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&report, &path, true).unwrap();

        let loaded = read_json(&path).unwrap();
        assert_eq!(loaded.trees.len(), report.trees.len());
        assert_eq!(loaded.trees[1].id, 2);
        assert_eq!(loaded.stand.main_species, MainSpecies::Single(Species::Pb));
        assert_eq!(loaded.distribution.classes.len(), 2);
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_json(&path), Err(ForestError::Json(_))));
    }
}

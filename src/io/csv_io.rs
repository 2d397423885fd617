use std::io::{Read, Write};
use std::path::Path;

use crate::error::ForestError;
use crate::models::{Stand, Tree, TreeRecord};

/// Columns every field sheet must carry, in the order they are usually laid out.
pub const REQUIRED_COLUMNS: [&str; 5] = ["tree_ID", "species", "DBH", "height", "COD_Status"];

/// CSV row structure for a raw field record.
#[derive(Debug, serde::Deserialize)]
struct RecordRow {
    #[serde(rename = "tree_ID")]
    tree_id: f64,
    species: String,
    #[serde(rename = "DBH")]
    dbh: Option<f64>,
    height: Option<f64>,
    #[serde(rename = "COD_Status")]
    status: String,
}

/// CSV row structure for the per-tree metrics export.
#[derive(Debug, serde::Serialize)]
struct TreeMetricsRow {
    #[serde(rename = "tree_ID")]
    tree_id: u32,
    species: String,
    status: u8,
    #[serde(rename = "DBH")]
    dbh: Option<f64>,
    height: Option<f64>,
    est_dbh: f64,
    est_height: f64,
    basal_area: f64,
    volume: f64,
    merchantable_volume: f64,
    wood_value: f64,
    biomass_trunk: f64,
    biomass_bark: f64,
    biomass_branches: f64,
    biomass_foliage: f64,
    biomass_aerial: f64,
    biomass_roots: f64,
    biomass_total: f64,
}

#[derive(Debug, serde::Serialize)]
struct StandRow<'a> {
    metric: &'a str,
    value: String,
    unit: &'a str,
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), ForestError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ForestError::ParseError(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let extra: Vec<&str> = headers
        .iter()
        .filter(|h| !REQUIRED_COLUMNS.contains(h))
        .collect();
    if !extra.is_empty() {
        tracing::warn!(columns = ?extra, "ignoring unknown columns");
    }
    Ok(())
}

fn parse_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<TreeRecord>, ForestError> {
    let headers = rdr.headers()?.clone();
    check_headers(&headers)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: RecordRow = result?;
        records.push(TreeRecord::new(
            row.tree_id,
            row.species,
            row.dbh,
            row.height,
            row.status,
        ));
    }

    tracing::debug!(records = records.len(), "field records loaded");
    Ok(records)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

/// Read raw tree records from a CSV field sheet.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<TreeRecord>, ForestError> {
    let mut rdr = reader_builder().from_path(path.as_ref())?;
    parse_records(&mut rdr)
}

/// Read raw tree records from CSV bytes.
pub fn read_records_from_bytes(data: &[u8]) -> Result<Vec<TreeRecord>, ForestError> {
    let mut rdr = reader_builder().from_reader(data);
    parse_records(&mut rdr)
}

/// Write one row of metrics per tree.
pub fn write_tree_metrics<W: Write>(trees: &[Tree], writer: W) -> Result<(), ForestError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for tree in trees {
        let m = &tree.metrics;
        wtr.serialize(TreeMetricsRow {
            tree_id: tree.id,
            species: tree.species.to_string(),
            status: tree.status.code(),
            dbh: tree.dbh,
            height: tree.height,
            est_dbh: tree.est_dbh,
            est_height: tree.est_height,
            basal_area: m.basal_area,
            volume: m.volume,
            merchantable_volume: m.merchantable_volume,
            wood_value: m.wood_value,
            biomass_trunk: m.biomass.trunk,
            biomass_bark: m.biomass.bark,
            biomass_branches: m.biomass.branches,
            biomass_foliage: m.biomass.foliage,
            biomass_aerial: m.biomass.aerial,
            biomass_roots: m.biomass.roots,
            biomass_total: m.biomass.total,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Stand figures as `(metric, value, unit)` triples, in display order.
pub fn stand_rows(stand: &Stand) -> Vec<(&'static str, String, &'static str)> {
    vec![
        ("area", stand.area_m2.to_string(), "m2"),
        ("age", stand.age.to_string(), "years"),
        ("trees", stand.tree_count.to_string(), "count"),
        ("N", stand.n.to_string(), "trees/ha"),
        ("N_alive", stand.n_alive.to_string(), "trees/ha"),
        ("N_dead", stand.n_dead.to_string(), "trees/ha"),
        ("N_missing", stand.n_missing.to_string(), "trees/ha"),
        ("N_stump", stand.n_stump.to_string(), "trees/ha"),
        ("main_species", stand.main_species.to_string(), ""),
        ("n_dom", stand.dominant_count.to_string(), "count"),
        ("hdom", stand.dominant_height.to_string(), "m"),
        ("ddom", stand.dominant_diameter.to_string(), "cm"),
        ("G", stand.basal_area.to_string(), "m2/ha"),
        ("V", stand.volume.to_string(), "m3/ha"),
        ("V_merchantable", stand.merchantable_volume.to_string(), "m3/ha"),
        ("wood_value", stand.wood_value.to_string(), "per ha"),
        ("biomass", stand.biomass.to_string(), "Mg/ha"),
        ("dg", stand.quadratic_mean_diameter.to_string(), "cm"),
        ("Fw", stand.wilson_factor.to_string(), ""),
        ("SDI", stand.stand_density_index.to_string(), ""),
        ("site_index", stand.site_index.to_string(), "m"),
    ]
}

/// Write the stand summary as `metric,value,unit` rows.
pub fn write_stand<W: Write>(stand: &Stand, writer: W) -> Result<(), ForestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (metric, value, unit) in stand_rows(stand) {
        wtr.serialize(StandRow {
            metric,
            value,
            unit,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the per-tree metrics to a CSV file.
pub fn write_tree_metrics_csv(trees: &[Tree], path: impl AsRef<Path>) -> Result<(), ForestError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_tree_metrics(trees, file)
}

/// Write the stand summary to a CSV file.
pub fn write_stand_csv(stand: &Stand, path: impl AsRef<Path>) -> Result<(), ForestError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_stand(stand, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{compute_plot, PlotReport};
    use crate::config::EngineConfig;
    use crate::models::Plot;

    const SHEET: &str = "\
tree_ID,species,DBH,height,COD_Status
1,Pb,12,14,1
2,Eu,20,,1
3,Pb,,13.5,2
4,Pm,,,3
";

    #[test]
    fn test_read_records() {
        let records = read_records_from_bytes(SHEET.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], TreeRecord::new(1.0, "Pb", Some(12.0), Some(14.0), "1"));
        assert_eq!(records[1].species, "Eu");
        assert_eq!(records[1].height, None);
        assert_eq!(records[2].dbh, None);
        assert_eq!(records[3].dbh, None);
        assert_eq!(records[3].height, None);
        assert_eq!(records[3].status, "3");
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let data = "COD_Status,notes,height,DBH,species,tree_ID\n1,edge tree,14,12,Pb,7\n";
        let records = read_records_from_bytes(data.as_bytes()).unwrap();
        assert_eq!(records[0], TreeRecord::new(7.0, "Pb", Some(12.0), Some(14.0), "1"));
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let data = "tree_ID,species,DBH,COD_Status\n1,Pb,12,1\n";
        let err = read_records_from_bytes(data.as_bytes()).unwrap_err();
        match err {
            ForestError::ParseError(msg) => assert!(msg.contains("height")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_dbh_fails() {
        let data = "tree_ID,species,DBH,height,COD_Status\n1,Pb,twelve,14,1\n";
        assert!(read_records_from_bytes(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.csv");
        std::fs::write(&path, SHEET).unwrap();
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_records("/definitely/not/here.csv").is_err());
    }

    fn sample_report() -> PlotReport {
        let records = vec![
            TreeRecord::new(1.0, "Pb", Some(12.0), Some(14.0), "1"),
            TreeRecord::new(2.0, "Pb", Some(14.0), None, "1"),
        ];
        compute_plot(&Plot::new(200.0, Some(30.0), records), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_write_tree_metrics() {
        let report = sample_report();
        let mut out = Vec::new();
        write_tree_metrics(&report.trees, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("tree_ID,species,status,DBH,height,est_dbh,est_height"));
        assert!(header.ends_with("biomass_total"));
        assert_eq!(lines.count(), 2);

        // absent height stays empty, the imputed one is in est_height
        let mut rdr = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[1][0], "2");
        assert_eq!(&rows[1][4], "");
        assert!(rows[1][6].parse::<f64>().unwrap() > 0.0);
    }

    #[test]
    fn test_write_stand() {
        let report = sample_report();
        let mut out = Vec::new();
        write_stand(&report.stand, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("metric,value,unit\n"));
        assert!(text.contains("N,100,trees/ha"));
        assert!(text.contains("main_species,Pb,"));
        assert_eq!(text.lines().count(), stand_rows(&report.stand).len() + 1);
    }

    #[test]
    fn test_write_csv_files() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path().join("trees.csv");
        let stand = dir.path().join("stand.csv");
        write_tree_metrics_csv(&report.trees, &trees).unwrap();
        write_stand_csv(&report.stand, &stand).unwrap();
        assert!(std::fs::read_to_string(&trees).unwrap().contains("tree_ID"));
        assert!(std::fs::read_to_string(&stand).unwrap().contains("hdom"));
    }
}

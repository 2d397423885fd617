mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::ForestError;
use crate::models::TreeRecord;

pub use csv_io::{
    read_records, read_records_from_bytes, stand_rows, write_stand, write_stand_csv,
    write_tree_metrics, write_tree_metrics_csv, REQUIRED_COLUMNS,
};
pub use json_io::{read_json, to_json_string, write_json, JsonReport};

/// Trait for loading the raw field records of a plot.
pub trait RecordReader {
    fn read(&self, path: &Path) -> Result<Vec<TreeRecord>, ForestError>;
}

/// Trait for writing a computed plot report.
pub trait ReportWriter {
    fn write(&self, report: &JsonReport, path: &Path) -> Result<(), ForestError>;
}

/// CSV format: field sheets in, per-tree metrics out.
pub struct CsvFormat;

impl RecordReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Vec<TreeRecord>, ForestError> {
        read_records(path)
    }
}

impl ReportWriter for CsvFormat {
    fn write(&self, report: &JsonReport, path: &Path) -> Result<(), ForestError> {
        write_tree_metrics_csv(&report.trees, path)
    }
}

/// JSON format writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ReportWriter for JsonFormat {
    fn write(&self, report: &JsonReport, path: &Path) -> Result<(), ForestError> {
        write_json(report, path, self.pretty)
    }
}

/// Pick a writer from the output file extension (`.csv` or `.json`).
pub fn writer_for_path(path: &Path, pretty: bool) -> Result<Box<dyn ReportWriter>, ForestError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("csv") => Ok(Box::new(CsvFormat)),
        Some("json") => Ok(Box::new(JsonFormat { pretty })),
        _ => Err(ForestError::ParseError(format!(
            "cannot infer output format from '{}' (use .csv or .json)",
            path.display()
        ))),
    }
}

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

pub use analysis::{compute_plot, Analyzer, PlotReport};
pub use config::EngineConfig;
pub use error::ForestError;
pub use io::{RecordReader, ReportWriter};
pub use models::{Plot, Species, Stand, Tree, TreeRecord, TreeStatus};

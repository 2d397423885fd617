use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use forest_metrics::{
    analysis::Analyzer,
    config::EngineConfig,
    io::{self, JsonReport},
    models::Plot,
    visualization::{
        print_diameter_histogram, print_species_reference, print_stand_summary, print_tree_table,
    },
};

#[derive(Parser)]
#[command(
    name = "forest-metrics",
    about = "Forest Metrics - per-tree and stand metrics for forest inventory plots",
    version,
    author
)]
struct Cli {
    /// Log every pipeline stage to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PlotArgs {
    /// Path to the field sheet (CSV with tree_ID, species, DBH, height, COD_Status)
    #[arg(short, long)]
    input: PathBuf,

    /// Plot area in m²
    #[arg(short, long)]
    area: f64,

    /// Stand age in years (enables the site index)
    #[arg(long)]
    age: Option<f64>,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the metrics of a plot and display the stand summary
    Analyze {
        #[command(flatten)]
        plot: PlotArgs,

        /// Show the per-tree metrics table
        #[arg(long)]
        trees: bool,

        /// Show the diameter distribution histogram
        #[arg(long)]
        distribution: bool,

        /// Diameter class width in cm for the distribution
        #[arg(long, default_value = "5.0")]
        class_width: f64,
    },

    /// Compute the metrics of a plot and write them to a file
    Export {
        #[command(flatten)]
        plot: PlotArgs,

        /// Output file path (.csv for per-tree metrics, .json for the full report)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the stand summary as a metric,value,unit CSV
        #[arg(long)]
        stand_output: Option<PathBuf>,

        /// Diameter class width in cm for the JSON distribution
        #[arg(long, default_value = "5.0")]
        class_width: f64,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the supported species and status codes
    Species,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_plot(args: &PlotArgs) -> Result<Plot> {
    let records = io::read_records(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    Ok(Plot::new(args.area, args.age, records))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            plot: args,
            trees,
            distribution,
            class_width,
        } => {
            let config = load_config(args.config.as_deref())?;
            let plot = load_plot(&args)?;

            println!(
                "\n{}",
                format!("Forest Metrics: {}", args.input.display())
                    .bold()
                    .cyan()
            );
            println!(
                "  Loaded {} trees on {:.0} m²",
                plot.records.len(),
                plot.area_m2
            );

            let analyzer = Analyzer::with_config(&plot, config);
            let report = analyzer.report()?;

            print_stand_summary(&report.stand);

            if trees {
                print_tree_table(&report.trees);
            }

            if distribution {
                let dist = analyzer.diameter_distribution(&report, class_width)?;
                print_diameter_histogram(&dist);
            }
            println!();
        }

        Commands::Export {
            plot: args,
            output,
            stand_output,
            class_width,
            pretty,
        } => {
            let config = load_config(args.config.as_deref())?;
            let plot = load_plot(&args)?;

            let analyzer = Analyzer::with_config(&plot, config);
            let report = analyzer.report()?;
            let dist = analyzer.diameter_distribution(&report, class_width)?;

            let writer = io::writer_for_path(&output, pretty)?;
            writer
                .write(&JsonReport::new(&report, dist), &output)
                .with_context(|| format!("failed to write {}", output.display()))?;

            println!(
                "{} Wrote {} trees to {}",
                "Success:".green().bold(),
                report.trees.len(),
                output.display()
            );

            if let Some(stand_path) = stand_output {
                io::write_stand_csv(&report.stand, &stand_path)
                    .with_context(|| format!("failed to write {}", stand_path.display()))?;
                println!(
                    "{} Wrote stand summary to {}",
                    "Success:".green().bold(),
                    stand_path.display()
                );
            }
        }

        Commands::Species => {
            print_species_reference();
            println!();
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use probation_clean::stages::discharge_type_frequency;
use probation_clean::{clean, load_csv, run, ExportConfig, PipelineConfig, PipelineReport};

#[derive(Parser)]
#[command(name = "probation-clean")]
#[command(author, version, about = "Probation case record cleaning pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw probation extract and export it to CSV and SQLite
    Clean {
        /// Raw input file (CSV with header row)
        #[arg(short, long, default_value = "04_data/raw/probation_dataset_dirty.csv")]
        input: PathBuf,

        /// Cleaned CSV output, overwritten on each run
        #[arg(long, default_value = "04_data/processed/probation_cleaned.csv")]
        output_csv: PathBuf,

        /// SQLite database for the cleaned table
        #[arg(long, default_value = "04_data/processed/probation_data.db")]
        output_db: PathBuf,

        /// Table name replaced inside the database
        #[arg(long, default_value = "probation_records")]
        table: String,

        /// JSON file overriding column names and vocabularies
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write per-stage counts as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Profile a raw extract without writing anything
    Analyze {
        /// Raw input file (CSV with header row)
        #[arg(short, long, default_value = "04_data/raw/probation_dataset_dirty.csv")]
        input: PathBuf,

        /// JSON file overriding column names and vocabularies
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            input,
            output_csv,
            output_db,
            table,
            config,
            report,
            verbose,
        } => {
            setup_logging(verbose);
            let export_config = ExportConfig {
                csv_path: output_csv,
                db_path: output_db,
                table_name: table,
            };
            clean_dataset(input, export_config, config, report)
        }
        Commands::Analyze {
            input,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_dataset(input, config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config: {:?}", path)),
        None => Ok(PipelineConfig::default()),
    }
}

fn clean_dataset(
    input: PathBuf,
    export_config: ExportConfig,
    config: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;
    let report = run(&input, &export_config, &config).context("Cleaning pipeline failed")?;

    if let Some(path) = report_path {
        report
            .write_json(&path)
            .with_context(|| format!("Failed to write report: {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    info!(
        "Success. Database created at {:?} (table {:?})",
        export_config.db_path, export_config.table_name
    );
    Ok(())
}

fn analyze_dataset(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    info!("Analyzing case records from {:?}", input);
    let mut table = load_csv(&input).context("Failed to load input")?;

    println!("Dataset Analysis");
    println!("================");
    println!("Rows: {}", table.len());
    println!("Columns: {}", table.columns.join(", "));
    println!();

    // Raw discharge types need normalized headers but uncleaned values
    let mut headers_only = table.clone();
    probation_clean::normalize_headers(&mut headers_only);
    let frequency = discharge_type_frequency(&headers_only, &config.columns)
        .context("Failed to read discharge types")?;

    let report = clean(&mut table, &config).context("Failed to profile input")?;
    print_report(&report);

    println!();
    println!("Raw Discharge Types");
    println!("-------------------");
    for (raw, count) in frequency {
        let label = if raw.is_empty() { "(missing)" } else { raw.as_str() };
        println!("{:<24} {}", label, count);
    }

    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("Duplicates");
    println!("----------");
    println!("Exact duplicate rows: {}", report.dedup.duplicates_removed);
    println!();

    println!("Risk Scores");
    println!("-----------");
    println!("Numeric: {}", report.scores.from_numeric);
    println!("From labels: {}", report.scores.from_label);
    println!("Unrecoverable: {}", report.scores.imputed);
    match report.scores.median {
        Some(median) => println!("Median: {:.1} (imputed as {})", median, report.scores.fill_value),
        None => println!("Median: undefined (fallback {})", report.scores.fill_value),
    }
    println!();

    println!("Dates");
    println!("-----");
    for (column, count) in &report.dates.unparseable {
        println!("Unparseable {}: {}", column, count);
    }
    println!(
        "Discharge before sentence: {}",
        report.dates.impossible_corrected
    );
    println!();

    println!("Discharge Categories");
    println!("--------------------");
    for (category, count) in &report.categories.counts {
        println!("{:<12} {}", category.as_str(), count);
    }
    println!("Unmapped raw values: {}", report.categories.unmapped);
}

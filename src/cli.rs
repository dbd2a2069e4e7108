use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use datascrub::cleaner::{OutlierPolicy, OutputFormat, clean_data, export_data, load_data};
use datascrub::config::{CleaningConfig, DEFAULT_LOG_FILE};
use datascrub::logging;
use std::path::PathBuf;

/// CLI-compatible output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliFormat {
    Csv,
    Excel,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Csv => Self::Csv,
            CliFormat::Excel => Self::Excel,
            CliFormat::Json => Self::Json,
        }
    }
}

/// CLI-compatible outlier policy enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutlierPolicy {
    /// Pull outliers back onto the IQR fences
    Clip,
    /// Drop rows containing outliers
    Remove,
    /// Replace outliers with the column median
    Median,
}

impl From<CliOutlierPolicy> for OutlierPolicy {
    fn from(cli: CliOutlierPolicy) -> Self {
        match cli {
            CliOutlierPolicy::Clip => Self::Clip,
            CliOutlierPolicy::Remove => Self::Remove,
            CliOutlierPolicy::Median => Self::Median,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "datascrub",
    version,
    about = "Research data cleaning utility",
    long_about = "Cleans a CSV, Excel or JSON dataset: normalizes text, drops duplicate rows, \
                  fills missing values, handles numeric outliers and standardizes date columns."
)]
pub struct Cli {
    /// Path to input data file (.csv, .xls, .xlsx, .json)
    pub input_file: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "cleaned_data.csv")]
    pub output: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: CliFormat,

    /// How to treat numeric outliers (overrides the config file)
    #[arg(long, value_enum)]
    pub outlier_policy: Option<CliOutlierPolicy>,

    /// Path to a JSON cleaning configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file to append to (overrides the config file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runs one cleaning job and returns the path written.
///
/// Logging lives for exactly this call. Any failure is logged as critical
/// before it is handed back to `main`.
pub fn run(cli: &Cli) -> Result<PathBuf> {
    let config = resolve_config(cli);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.log_file.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let _session = logging::init(&log_file)?;

    let result = config.and_then(|config| execute(cli, &config));
    if let Err(err) = &result {
        tracing::error!(severity = "critical", "Process failed: {err:#}");
    }
    result
}

fn resolve_config(cli: &Cli) -> Result<CleaningConfig> {
    let mut config = match &cli.config {
        Some(path) => CleaningConfig::load(path)?,
        None => CleaningConfig::default(),
    };
    if let Some(policy) = cli.outlier_policy {
        config.outlier_policy = policy.into();
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file.clone_from(log_file);
    }
    Ok(config)
}

fn execute(cli: &Cli, config: &CleaningConfig) -> Result<PathBuf> {
    tracing::info!(
        "Starting data cleaning of {} (outlier policy: {})",
        cli.input_file.display(),
        config.outlier_policy
    );

    let table = load_data(&cli.input_file)?;
    let cleaned = clean_data(table, config)?;

    let mut df = cleaned.into_df();
    export_data(&mut df, &cli.output, cli.format.into())
        .with_context(|| format!("Writing {}", cli.output.display()))?;

    tracing::info!("Data cleaning completed successfully");
    Ok(cli.output.clone())
}

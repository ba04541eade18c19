use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::sink::SinkFormat;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile employee roster, salary, and qualification data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the canonical tables and write them to an output directory
    Clean(CleanArgs),
    /// Report the maximum salary per degree or per position and degree
    Report(ReportArgs),
    /// Show the first rows of a canonical dataset
    Preview(PreviewArgs),
}

/// Where the raw sources live.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// YAML pipeline configuration (built-in source layout if omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory that relative source locations are resolved against
    #[arg(short = 'd', long = "data-dir", default_value = ".")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Directory receiving the canonical tables
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: PathBuf,
    /// File format of the written tables
    #[arg(long, value_enum, default_value = "csv")]
    pub format: SinkFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum ReportKind {
    #[default]
    Degree,
    PositionDegree,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Grouping of the report
    #[arg(long = "by", value_enum, default_value = "degree")]
    pub by: ReportKind,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Render an aligned table to stdout instead of CSV
    #[arg(long, conflicts_with = "output")]
    pub table: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum DatasetKind {
    Employees,
    Salaries,
    Qualifications,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Canonical dataset to show
    #[arg(long, value_enum, default_value = "employees")]
    pub dataset: DatasetKind,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "space" | " " => Ok(b' '),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub mod aggregate;
pub mod cli;
pub mod concat;
pub mod config;
pub mod data;
pub mod dataset;
pub mod dedup;
pub mod error;
pub mod io_utils;
pub mod join;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod schema;
pub mod sink;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, DatasetKind, ReportKind, SourceArgs},
    config::PipelineConfig,
    loader::FileLoader,
    pipeline::CanonicalDatasets,
    sink::FileSink,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("staff_reconcile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Report(args) => handle_report(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn build_canonical(sources: &SourceArgs) -> Result<CanonicalDatasets> {
    let config = PipelineConfig::load_or_default(sources.config.as_deref())?;
    debug!("Pipeline sources: {:?}", config.sources);
    let loader = FileLoader::new(&sources.data_dir);
    pipeline::run(&loader, &config)
        .with_context(|| format!("Running pipeline over {:?}", sources.data_dir))
}

fn handle_clean(args: &cli::CleanArgs) -> Result<()> {
    let canonical = build_canonical(&args.sources)?;
    let sink = FileSink::new(&args.output_dir);
    canonical.persist(&sink, args.format)?;
    info!(
        "Wrote canonical tables to {:?} as {}",
        sink.dir(),
        args.format.extension()
    );
    Ok(())
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let canonical = build_canonical(&args.sources)?;
    let (headers, records) = match args.by {
        ReportKind::Degree => {
            let rows = canonical.report_by_degree()?;
            (
                model::DegreeSalary::HEADERS.to_vec(),
                rows.iter().map(|row| row.to_record()).collect::<Vec<_>>(),
            )
        }
        ReportKind::PositionDegree => {
            let rows = canonical.report_by_position_degree()?;
            (
                model::PositionDegreeSalary::HEADERS.to_vec(),
                rows.iter().map(|row| row.to_record()).collect::<Vec<_>>(),
            )
        }
    };
    let headers = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();

    if args.table {
        table::print_table(&headers, &records);
    } else {
        let mut writer =
            io_utils::open_csv_writer(args.output.as_deref(), io_utils::DEFAULT_CSV_DELIMITER)?;
        writer
            .write_record(&headers)
            .context("Writing report headers")?;
        for record in &records {
            writer.write_record(record).context("Writing report row")?;
        }
        writer.flush().context("Flushing report output")?;
    }
    info!("Report produced {} row(s)", records.len());
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let canonical = build_canonical(&args.sources)?;
    let dataset = match args.dataset {
        DatasetKind::Employees => &canonical.employees,
        DatasetKind::Salaries => &canonical.salaries,
        DatasetKind::Qualifications => &canonical.qualifications,
    };
    print!("{}", table::render_dataset(&dataset.head(args.rows)));
    info!(
        "Displayed {} of {} row(s) from '{}'",
        dataset.len().min(args.rows),
        dataset.len(),
        dataset.name()
    );
    Ok(())
}

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;

use crate::{
    data::{Value, unsigned_zero},
    dataset::Dataset,
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum SinkFormat {
    #[default]
    Csv,
    Json,
}

impl SinkFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SinkFormat::Csv => "csv",
            SinkFormat::Json => "jsonl",
        }
    }
}

/// Receives finished datasets under a table name.
pub trait Sink {
    fn persist(&self, dataset: &Dataset, name: &str, format: SinkFormat) -> Result<PathBuf>;
}

/// Writes each dataset to `<dir>/<name>.<ext>`, replacing any previous file.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Sink for FileSink {
    fn persist(&self, dataset: &Dataset, name: &str, format: SinkFormat) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Creating output directory {:?}", self.dir))?;
        let path = self.dir.join(format!("{name}.{}", format.extension()));
        match format {
            SinkFormat::Csv => write_csv(dataset, &path),
            SinkFormat::Json => write_json_lines(dataset, &path),
        }
        .with_context(|| format!("Persisting '{name}' to {path:?}"))?;
        info!("Persisted {} row(s) of '{}' to {:?}", dataset.len(), name, path);
        Ok(path)
    }
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(Some(path), io_utils::DEFAULT_CSV_DELIMITER)?;
    writer
        .write_record(dataset.headers())
        .context("Writing headers")?;
    for (idx, row) in dataset.display_rows().iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

pub fn write_json_lines(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = io_utils::open_output(Some(path))?;
    let headers = dataset.headers();
    for (idx, row) in dataset.rows().iter().enumerate() {
        let object = headers
            .iter()
            .zip(row)
            .map(|(name, cell)| (name.clone(), json_cell(cell.as_ref())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::to_writer(&mut writer, &object)
            .with_context(|| format!("Serializing row {}", idx + 1))?;
        writer.write_all(b"\n")?;
    }
    writer.flush().context("Flushing JSON output")?;
    Ok(())
}

fn json_cell(value: Option<&Value>) -> serde_json::Value {
    match value {
        None => serde_json::Value::Null,
        Some(Value::String(s)) => serde_json::Value::String(s.clone()),
        Some(Value::Integer(i)) => serde_json::Value::from(*i),
        Some(Value::Float(f)) => serde_json::Value::from(unsigned_zero(*f)),
    }
}

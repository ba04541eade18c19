//! Reads raw source files into typed [`Dataset`]s.
//!
//! The reconciliation core never touches files; it consumes whatever a
//! [`Loader`] hands it. [`FileLoader`] is the stock implementation and reads
//! two formats against an explicit schema:
//!
//! - **CSV**: with or without a header row, any single-byte delimiter, any
//!   `encoding_rs` input encoding. Headerless rows map to columns by
//!   position; missing trailing fields become null.
//! - **JSON lines**: one object per line, fields matched by name.
//!
//! Anything that does not fit the schema is a
//! [`PipelineError::SchemaMismatch`] for that source.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    data::{Value, parse_typed_value},
    dataset::{Dataset, Row},
    error::PipelineError,
    io_utils,
    schema::{ColumnType, Schema},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub has_header: bool,
    pub delimiter: u8,
    pub encoding: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: None,
        }
    }
}

/// Everything needed to load one source.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub name: String,
    pub location: PathBuf,
    pub format: SourceFormat,
    pub options: LoadOptions,
    pub schema: Schema,
}

pub trait Loader {
    fn load(&self, source: &SourceSpec) -> Result<Dataset>;
}

/// Loads sources from the filesystem, resolving relative locations against
/// `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    base_dir: PathBuf,
}

impl FileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, location: &Path) -> PathBuf {
        if location.is_absolute() {
            location.to_path_buf()
        } else {
            self.base_dir.join(location)
        }
    }
}

impl Loader for FileLoader {
    fn load(&self, source: &SourceSpec) -> Result<Dataset> {
        let path = self.resolve(&source.location);
        info!(
            "Loading '{}' from {:?} as {:?}",
            source.name, path, source.format
        );
        let rows = match source.format {
            SourceFormat::Csv => read_csv_rows(&path, source),
            SourceFormat::Json => read_json_rows(&path, source),
        }
        .with_context(|| format!("Loading source '{}' from {path:?}", source.name))?;
        let dataset = Dataset::new(source.name.clone(), source.schema.clone(), rows)?;
        info!("Loaded {} row(s) into '{}'", dataset.len(), source.name);
        Ok(dataset)
    }
}

fn read_csv_rows(path: &Path, source: &SourceSpec) -> Result<Vec<Row>> {
    let encoding = io_utils::resolve_encoding(source.options.encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(
        path,
        source.options.delimiter,
        source.options.has_header,
    )?;
    if source.options.has_header {
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        source.schema.validate_headers(&source.name, &headers)?;
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading record {}", row_idx + 1))?;
        // Quoted fields may span lines.
        let line = record
            .position()
            .map_or(row_idx + 1, |position| position.line() as usize);
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {line}"))?;
        rows.push(parse_csv_row(&source.name, &source.schema, &decoded, line)?);
    }
    debug!("Read {} CSV row(s) from {path:?}", rows.len());
    Ok(rows)
}

fn parse_csv_row(
    source_name: &str,
    schema: &Schema,
    fields: &[String],
    line: usize,
) -> Result<Row, PipelineError> {
    if fields.len() > schema.len() {
        return Err(PipelineError::schema_mismatch(
            source_name,
            format!(
                "line {line} has {} field(s) but schema declares {}",
                fields.len(),
                schema.len()
            ),
        ));
    }
    schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let raw = fields.get(idx).map(String::as_str).unwrap_or("");
            parse_typed_value(raw, &column.datatype).map_err(|err| {
                PipelineError::schema_mismatch(
                    source_name,
                    format!("line {line} column '{}': {err:#}", column.name),
                )
            })
        })
        .collect()
}

fn read_json_rows(path: &Path, source: &SourceSpec) -> Result<Vec<Row>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut rows = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_number = idx + 1;
        let line = line.with_context(|| format!("Reading line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&line)
            .map_err(|err| {
                PipelineError::schema_mismatch(
                    &source.name,
                    format!("line {line_number} is not a JSON object: {err}"),
                )
            })?;
        rows.push(parse_json_row(
            &source.name,
            &source.schema,
            &object,
            line_number,
        )?);
    }
    debug!("Read {} JSON row(s) from {path:?}", rows.len());
    Ok(rows)
}

fn parse_json_row(
    source_name: &str,
    schema: &Schema,
    object: &serde_json::Map<String, serde_json::Value>,
    line: usize,
) -> Result<Row, PipelineError> {
    schema
        .columns
        .iter()
        .map(|column| {
            let value = object.get(&column.name).unwrap_or(&serde_json::Value::Null);
            json_to_value(value, &column.datatype).ok_or_else(|| {
                PipelineError::schema_mismatch(
                    source_name,
                    format!(
                        "line {line} field '{}': expected {} but found {value}",
                        column.name, column.datatype
                    ),
                )
            })
        })
        .collect()
}

/// `None` when the JSON value cannot be read as `ty`; `Some(None)` for null.
fn json_to_value(value: &serde_json::Value, ty: &ColumnType) -> Option<Option<Value>> {
    use serde_json::Value as Json;

    match (value, ty) {
        (Json::Null, _) => Some(None),
        (Json::String(s), ColumnType::String) => Some(Some(Value::String(s.clone()))),
        (Json::Number(n), ColumnType::String) => Some(Some(Value::String(n.to_string()))),
        (Json::Number(n), ColumnType::Integer) => n.as_i64().map(|i| Some(Value::Integer(i))),
        (Json::Number(n), ColumnType::Float) => n.as_f64().map(|f| Some(Value::Float(f))),
        (Json::String(s), ColumnType::Integer | ColumnType::Float) => {
            parse_typed_value(s, ty).ok()
        }
        _ => None,
    }
}

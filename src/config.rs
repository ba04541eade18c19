//! YAML pipeline configuration.
//!
//! ```yaml
//! sources:
//!   roster:
//!     location: source1.json
//!     format: json
//!   salary:
//!     location: source2.csv
//!     format: csv
//!     has_header: true
//!     delimiter: ","
//!   qualification:
//!     location: source3
//!     format: csv
//!     has_header: false
//!     delimiter: space
//!     encoding: latin1
//! ```
//!
//! A source left out of the file keeps its built-in default.

use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    cli::parse_delimiter,
    loader::{LoadOptions, SourceFormat, SourceSpec},
    model,
    schema::Schema,
};

pub const ROSTER: &str = "emp";
pub const SALARY: &str = "emp_salary";
pub const QUALIFICATION: &str = "emp_qualification";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub location: PathBuf,
    pub format: SourceFormat,
    #[serde(default = "SourceConfig::default_has_header")]
    pub has_header: bool,
    #[serde(default = "SourceConfig::default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl SourceConfig {
    const fn default_has_header() -> bool {
        true
    }

    fn default_delimiter() -> String {
        ",".to_string()
    }

    pub fn default_roster() -> Self {
        Self {
            location: PathBuf::from("source1.json"),
            format: SourceFormat::Json,
            has_header: false,
            delimiter: Self::default_delimiter(),
            encoding: None,
        }
    }

    pub fn default_salary() -> Self {
        Self {
            location: PathBuf::from("source2.csv"),
            format: SourceFormat::Csv,
            has_header: true,
            delimiter: Self::default_delimiter(),
            encoding: None,
        }
    }

    pub fn default_qualification() -> Self {
        Self {
            location: PathBuf::from("source3"),
            format: SourceFormat::Csv,
            has_header: false,
            delimiter: "space".to_string(),
            encoding: None,
        }
    }

    pub fn to_spec(&self, name: &str, schema: Schema) -> Result<SourceSpec> {
        let delimiter = parse_delimiter(&self.delimiter)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid delimiter for source '{name}'"))?;
        Ok(SourceSpec {
            name: name.to_string(),
            location: self.location.clone(),
            format: self.format,
            options: LoadOptions {
                has_header: self.has_header,
                delimiter,
                encoding: self.encoding.clone(),
            },
            schema,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "SourceConfig::default_roster")]
    pub roster: SourceConfig,
    #[serde(default = "SourceConfig::default_salary")]
    pub salary: SourceConfig,
    #[serde(default = "SourceConfig::default_qualification")]
    pub qualification: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            roster: SourceConfig::default_roster(),
            salary: SourceConfig::default_salary(),
            qualification: SourceConfig::default_qualification(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn roster_spec(&self) -> Result<SourceSpec> {
        self.sources
            .roster
            .to_spec(ROSTER, model::employee_schema())
    }

    pub fn salary_spec(&self) -> Result<SourceSpec> {
        self.sources
            .salary
            .to_spec(SALARY, model::employee_schema())
    }

    pub fn qualification_spec(&self) -> Result<SourceSpec> {
        self.sources
            .qualification
            .to_spec(QUALIFICATION, model::qualification_schema())
    }
}

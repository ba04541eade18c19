//! Column schema model for source and canonical datasets.
//!
//! Every dataset carries an explicit [`Schema`]; nothing is inferred. A schema
//! is an ordered list of [`ColumnMeta`] entries, each naming a column and its
//! [`ColumnType`].

use std::fmt;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Integer,
    Float,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
        }
    }

    /// Whether values of the two types can be compared as join keys.
    pub fn is_join_compatible(&self, other: &ColumnType) -> bool {
        match (self, other) {
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                true
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: ColumnType,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, datatype: ColumnType) -> Self {
        Self {
            name: name.into(),
            datatype,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Schema { columns }
    }

    /// Builds a schema from `(name, type)` pairs.
    pub fn of(columns: &[(&str, ColumnType)]) -> Self {
        Schema {
            columns: columns
                .iter()
                .map(|(name, datatype)| ColumnMeta::new(*name, *datatype))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Checks a file header row against the schema, position by position.
    pub fn validate_headers(
        &self,
        source_name: &str,
        headers: &[String],
    ) -> std::result::Result<(), PipelineError> {
        if headers.len() != self.columns.len() {
            return Err(PipelineError::schema_mismatch(
                source_name,
                format!(
                    "header length mismatch: schema expects {} column(s) but file contains {}",
                    self.columns.len(),
                    headers.len()
                ),
            ));
        }
        for (idx, column) in self.columns.iter().enumerate() {
            let found = headers[idx].trim();
            if found != column.name {
                return Err(PipelineError::schema_mismatch(
                    source_name,
                    format!(
                        "header mismatch at position {}: expected '{}' but found '{}'",
                        idx + 1,
                        column.name,
                        found
                    ),
                ));
            }
        }
        Ok(())
    }
}

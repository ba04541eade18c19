//! Typed failures raised by the reconciliation core.
//!
//! Relational operations return [`PipelineError`] directly; the loader, sink,
//! and CLI layers wrap it in `anyhow` with context so callers can still
//! `downcast_ref::<PipelineError>()` to inspect the underlying failure.

use thiserror::Error;

use crate::schema::ColumnType;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A loaded dataset does not have the expected shape.
    #[error("Schema mismatch in source '{source_name}': {detail}")]
    SchemaMismatch { source_name: String, detail: String },

    /// Join keys on the two sides cannot be compared.
    #[error(
        "Type mismatch for join keys: left '{left}' is {left_type} but right '{right}' is {right_type}"
    )]
    JoinKeyTypeMismatch {
        left: String,
        right: String,
        left_type: ColumnType,
        right_type: ColumnType,
    },

    #[error("Column '{column}' not found in dataset '{dataset}'")]
    UnknownColumn { dataset: String, column: String },

    #[error("Column '{column}' appears more than once in the output")]
    DuplicateColumn { column: String },
}

impl PipelineError {
    pub fn schema_mismatch(source_name: &str, detail: impl Into<String>) -> Self {
        PipelineError::SchemaMismatch {
            source_name: source_name.to_string(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

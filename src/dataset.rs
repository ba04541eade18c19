//! Immutable, schema-typed row collections passed between pipeline stages.
//!
//! A [`Dataset`] pairs a [`Schema`] with rows of nullable [`Value`] cells.
//! Operations never mutate a dataset; they build a new one. Each dataset
//! carries a name used in log lines, error messages, and as the persisted
//! table name.

use crate::{
    data::Value,
    error::{PipelineError, Result},
    schema::{ColumnMeta, Schema},
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    name: String,
    schema: Schema,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset, checking every row against the schema's width and
    /// column types.
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Result<Self> {
        let name = name.into();
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(PipelineError::schema_mismatch(
                    &name,
                    format!(
                        "row {} has {} field(s) but schema expects {}",
                        row_idx + 1,
                        row.len(),
                        schema.len()
                    ),
                ));
            }
            for (value, column) in row.iter().zip(&schema.columns) {
                if let Some(value) = value
                    && value.column_type() != column.datatype
                {
                    return Err(PipelineError::schema_mismatch(
                        &name,
                        format!(
                            "row {} column '{}' holds {} but schema declares {}",
                            row_idx + 1,
                            column.name,
                            value.column_type(),
                            column.datatype
                        ),
                    ));
                }
            }
        }
        Ok(Self { name, schema, rows })
    }

    pub fn empty(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Same name and schema, different rows. Callers guarantee the rows fit.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            name: self.name.clone(),
            schema: self.schema.clone(),
            rows,
        }
    }

    pub(crate) fn from_parts(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        self.schema.headers()
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: self.schema.clone(),
            rows: self.rows.clone(),
        }
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .column_index(column)
            .ok_or_else(|| PipelineError::UnknownColumn {
                dataset: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Prefixes every column name with `alias.` so joined datasets keep
    /// both sides' columns addressable.
    pub fn qualified(&self, alias: &str) -> Self {
        let columns = self
            .schema
            .columns
            .iter()
            .map(|c| ColumnMeta::new(format!("{alias}.{}", c.name), c.datatype))
            .collect();
        Self {
            name: alias.to_string(),
            schema: Schema::new(columns),
            rows: self.rows.clone(),
        }
    }

    /// Projects columns in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Self> {
        let projections = columns.iter().map(|c| (*c, *c)).collect::<Vec<_>>();
        self.select_as(&projections)
    }

    /// Projects `(source, output)` column pairs, renaming as it goes.
    pub fn select_as(&self, projections: &[(&str, &str)]) -> Result<Self> {
        let mut indices = Vec::with_capacity(projections.len());
        let mut columns = Vec::with_capacity(projections.len());
        for (source, output) in projections {
            let idx = self.column_index(source)?;
            if columns.iter().any(|c: &ColumnMeta| c.name == *output) {
                return Err(PipelineError::DuplicateColumn {
                    column: output.to_string(),
                });
            }
            columns.push(ColumnMeta::new(*output, self.schema.columns[idx].datatype));
            indices.push(idx);
        }
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|idx| row[*idx].clone()).collect())
            .collect();
        Ok(Self::from_parts(self.name.clone(), Schema::new(columns), rows))
    }

    pub fn head(&self, limit: usize) -> Self {
        self.with_rows(self.rows.iter().take(limit).cloned().collect())
    }

    /// Rows rendered as display strings, nulls as empty cells.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| crate::data::display_cell(cell.as_ref()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn people() -> Dataset {
        Dataset::new(
            "people",
            Schema::of(&[("id", ColumnType::Integer), ("name", ColumnType::String)]),
            vec![
                vec![Some(Value::Integer(1)), Some(Value::String("Ada".into()))],
                vec![Some(Value::Integer(2)), None],
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_value_of_wrong_type() {
        let err = Dataset::new(
            "people",
            Schema::of(&[("id", ColumnType::Integer)]),
            vec![vec![Some(Value::String("one".into()))]],
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn new_rejects_short_rows() {
        let err = Dataset::new(
            "people",
            Schema::of(&[("id", ColumnType::Integer), ("name", ColumnType::String)]),
            vec![vec![Some(Value::Integer(1))]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 field(s)"));
    }

    #[test]
    fn qualified_prefixes_column_names() {
        let qualified = people().qualified("emp");
        assert_eq!(qualified.headers(), vec!["emp.id", "emp.name"]);
        assert_eq!(qualified.name(), "emp");
        assert_eq!(qualified.len(), 2);
    }

    #[test]
    fn select_as_renames_and_reorders() {
        let projected = people().select_as(&[("name", "who"), ("id", "key")]).unwrap();
        assert_eq!(projected.headers(), vec!["who", "key"]);
        assert_eq!(projected.rows()[0][1], Some(Value::Integer(1)));
        assert_eq!(projected.rows()[1][0], None);
    }

    #[test]
    fn select_unknown_column_is_reported() {
        let err = people().select(&["salary"]).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn { ref column, .. } if column == "salary"));
    }
}

use log::debug;

use crate::{
    data::Value,
    dataset::{Dataset, Row},
    error::{PipelineError, Result},
    schema::{ColumnMeta, ColumnType, Schema},
};

/// Null cells contribute the empty string to a concatenation.
pub fn null_as_empty(value: Option<&Value>) -> String {
    value.map(Value::as_display).unwrap_or_default()
}

/// Joins the selected cells of `row` with `separator`. The separator goes
/// between every adjacent pair even when a cell is empty; nothing is trimmed.
pub fn concat_fields(row: &Row, fields: &[usize], separator: &str) -> String {
    fields
        .iter()
        .map(|idx| null_as_empty(row.get(*idx).and_then(|cell| cell.as_ref())))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Returns a copy of `dataset` with a trailing string column `new_column`
/// holding the concatenation of `fields`.
pub fn with_concatenated(
    dataset: &Dataset,
    new_column: &str,
    fields: &[&str],
    separator: &str,
) -> Result<Dataset> {
    if dataset.schema().column_index(new_column).is_some() {
        return Err(PipelineError::DuplicateColumn {
            column: new_column.to_string(),
        });
    }
    let indices = fields
        .iter()
        .map(|field| dataset.column_index(field))
        .collect::<Result<Vec<_>>>()?;

    let mut columns = dataset.schema().columns.clone();
    columns.push(ColumnMeta::new(new_column, ColumnType::String));

    let rows = dataset
        .rows()
        .iter()
        .map(|row| {
            let mut extended = row.clone();
            extended.push(Some(Value::String(concat_fields(row, &indices, separator))));
            extended
        })
        .collect::<Vec<_>>();
    debug!(
        "Derived '{}' in '{}' from {:?}",
        new_column,
        dataset.name(),
        fields
    );
    Ok(Dataset::from_parts(
        dataset.name(),
        Schema::new(columns),
        rows,
    ))
}

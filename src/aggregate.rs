use std::collections::BTreeMap;

use log::debug;

use crate::{
    data::{ComparableValue, Value},
    dataset::{Dataset, Row},
    error::{PipelineError, Result},
    schema::{ColumnMeta, Schema},
};

/// Groups `dataset` by `group_columns` and takes the maximum of
/// `value_column` per group. Output columns are `output_column` followed by
/// the group columns; groups come out in ascending key order.
///
/// Null values are skipped, so a group with only nulls reports null.
pub fn group_max(
    dataset: &Dataset,
    group_columns: &[&str],
    value_column: &str,
    output_column: &str,
) -> Result<Dataset> {
    let group_indices = group_columns
        .iter()
        .map(|column| dataset.column_index(column))
        .collect::<Result<Vec<_>>>()?;
    let value_idx = dataset.column_index(value_column)?;
    if group_columns.contains(&output_column) {
        return Err(PipelineError::DuplicateColumn {
            column: output_column.to_string(),
        });
    }

    let mut groups: BTreeMap<Vec<ComparableValue>, Option<Value>> = BTreeMap::new();
    for row in dataset.rows() {
        let key = group_indices
            .iter()
            .map(|idx| ComparableValue(row[*idx].clone()))
            .collect::<Vec<_>>();
        let current = groups.entry(key).or_insert(None);
        if let Some(candidate) = &row[value_idx]
            && current.as_ref().is_none_or(|best| candidate > best)
        {
            *current = Some(candidate.clone());
        }
    }

    let mut columns = vec![ColumnMeta::new(
        output_column,
        dataset.schema().columns[value_idx].datatype,
    )];
    columns.extend(
        group_indices
            .iter()
            .map(|idx| dataset.schema().columns[*idx].clone()),
    );

    let rows = groups
        .into_iter()
        .map(|(key, max)| {
            let mut row: Row = Vec::with_capacity(key.len() + 1);
            row.push(max);
            row.extend(key.into_iter().map(|cell| cell.0));
            row
        })
        .collect::<Vec<_>>();
    debug!(
        "Grouped '{}' by {:?}: {} group(s)",
        dataset.name(),
        group_columns,
        rows.len()
    );
    Ok(Dataset::from_parts(
        dataset.name(),
        Schema::new(columns),
        rows,
    ))
}

//! Inner equi-join of two datasets.
//!
//! The right side is indexed into a hash lookup keyed by the typed key
//! values, then the left side streams through it. Output rows carry all left
//! columns followed by all right columns, so callers qualify both inputs
//! (see [`Dataset::qualified`]) when names could collide.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    data::{Value, unsigned_zero},
    dataset::{Dataset, Row},
    error::{PipelineError, Result},
    schema::Schema,
};

/// Joins rows of `left` and `right` whose key columns are equal. Rows with a
/// null in any key column never match.
pub fn inner_join(
    left: &Dataset,
    right: &Dataset,
    left_keys: &[&str],
    right_keys: &[&str],
) -> Result<Dataset> {
    let plan = JoinPlan::new(left, right, left_keys, right_keys)?;
    let lookup = build_right_lookup(right, &plan.right_indices);

    let mut rows: Vec<Row> = Vec::new();
    for left_row in left.rows() {
        let Some(key) = build_key(left_row, &plan.left_indices) else {
            continue;
        };
        if let Some(bucket) = lookup.get(&key) {
            for right_row in bucket {
                let mut combined = left_row.clone();
                combined.extend(right_row.iter().cloned());
                rows.push(combined);
            }
        }
    }

    debug!(
        "Inner join '{}' x '{}' on {:?} = {:?}: {} row(s)",
        left.name(),
        right.name(),
        left_keys,
        right_keys,
        rows.len()
    );
    Ok(Dataset::from_parts(
        format!("{}_{}", left.name(), right.name()),
        plan.schema,
        rows,
    ))
}

/// Validated key positions and output schema, computed before any row is read.
struct JoinPlan {
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
    schema: Schema,
}

impl JoinPlan {
    fn new(
        left: &Dataset,
        right: &Dataset,
        left_keys: &[&str],
        right_keys: &[&str],
    ) -> Result<Self> {
        if left_keys.len() != right_keys.len() || left_keys.is_empty() {
            return Err(PipelineError::schema_mismatch(
                left.name(),
                format!(
                    "join needs the same non-zero number of key columns on both sides ({} vs {})",
                    left_keys.len(),
                    right_keys.len()
                ),
            ));
        }
        let left_indices = column_indices(left, left_keys)?;
        let right_indices = column_indices(right, right_keys)?;
        validate_key_types(left, right, &left_indices, &right_indices)?;
        let schema = build_output_schema(left.schema(), right.schema())?;
        Ok(Self {
            left_indices,
            right_indices,
            schema,
        })
    }
}

fn column_indices(dataset: &Dataset, columns: &[&str]) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|name| dataset.column_index(name))
        .collect()
}

fn validate_key_types(
    left: &Dataset,
    right: &Dataset,
    left_indices: &[usize],
    right_indices: &[usize],
) -> Result<()> {
    for (l_idx, r_idx) in left_indices.iter().zip(right_indices) {
        let left_column = &left.schema().columns[*l_idx];
        let right_column = &right.schema().columns[*r_idx];
        if !left_column
            .datatype
            .is_join_compatible(&right_column.datatype)
        {
            return Err(PipelineError::JoinKeyTypeMismatch {
                left: left_column.name.clone(),
                right: right_column.name.clone(),
                left_type: left_column.datatype,
                right_type: right_column.datatype,
            });
        }
    }
    Ok(())
}

fn build_output_schema(left: &Schema, right: &Schema) -> Result<Schema> {
    let mut seen: HashSet<&str> = HashSet::new();
    for column in left.columns.iter().chain(&right.columns) {
        if !seen.insert(column.name.as_str()) {
            return Err(PipelineError::DuplicateColumn {
                column: column.name.clone(),
            });
        }
    }
    let mut columns = left.columns.clone();
    columns.extend(right.columns.iter().cloned());
    Ok(Schema::new(columns))
}

fn build_right_lookup<'a>(
    right: &'a Dataset,
    key_indices: &[usize],
) -> HashMap<Vec<KeyPart>, Vec<&'a Row>> {
    let mut map: HashMap<Vec<KeyPart>, Vec<&Row>> = HashMap::new();
    for row in right.rows() {
        if let Some(key) = build_key(row, key_indices) {
            map.entry(key).or_default().push(row);
        }
    }
    map
}

/// One key cell in hashable form. Whole floats inside the `i64` range become
/// `Integer`, so `3` and `3.0` meet; every other float keys on its bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Integer(i64),
    Float(u64),
    Text(String),
}

impl KeyPart {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Integer(i) => KeyPart::Integer(*i),
            Value::String(s) => KeyPart::Text(s.clone()),
            Value::Float(f) => {
                let f = unsigned_zero(*f);
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    KeyPart::Integer(f as i64)
                } else {
                    KeyPart::Float(f.to_bits())
                }
            }
        }
    }
}

fn build_key(row: &Row, key_indices: &[usize]) -> Option<Vec<KeyPart>> {
    key_indices
        .iter()
        .map(|idx| row.get(*idx)?.as_ref().map(KeyPart::from_value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn int(value: i64) -> Option<Value> {
        Some(Value::Integer(value))
    }

    fn text(value: &str) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }

    fn left() -> Dataset {
        Dataset::new(
            "l",
            Schema::of(&[("l.id", ColumnType::Integer), ("l.tag", ColumnType::String)]),
            vec![
                vec![int(1), text("a")],
                vec![int(2), text("b")],
                vec![None, text("c")],
            ],
        )
        .unwrap()
    }

    fn right() -> Dataset {
        Dataset::new(
            "r",
            Schema::of(&[("r.id", ColumnType::Integer), ("r.val", ColumnType::String)]),
            vec![
                vec![int(1), text("x")],
                vec![int(1), text("y")],
                vec![int(3), text("z")],
                vec![None, text("n")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn inner_join_pairs_every_match_and_drops_the_rest() {
        let joined = inner_join(&left(), &right(), &["l.id"], &["r.id"]).unwrap();
        assert_eq!(joined.headers(), vec!["l.id", "l.tag", "r.id", "r.val"]);
        assert_eq!(
            joined.rows().to_vec(),
            vec![
                vec![int(1), text("a"), int(1), text("x")],
                vec![int(1), text("a"), int(1), text("y")],
            ]
        );
    }

    #[test]
    fn null_keys_never_match() {
        let joined = inner_join(&left(), &right(), &["l.id"], &["r.id"]).unwrap();
        assert!(joined.rows().iter().all(|row| row[0].is_some()));
    }

    #[test]
    fn incompatible_key_types_fail_before_reading_rows() {
        let err = inner_join(&left(), &right(), &["l.tag"], &["r.id"]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::JoinKeyTypeMismatch {
                left_type: ColumnType::String,
                right_type: ColumnType::Integer,
                ..
            }
        ));
    }

    #[test]
    fn integer_keys_match_whole_floats() {
        let floats = Dataset::new(
            "f",
            Schema::of(&[("f.id", ColumnType::Float)]),
            vec![vec![Some(Value::Float(2.0))]],
        )
        .unwrap();
        let joined = inner_join(&left(), &floats, &["l.id"], &["f.id"]).unwrap();
        assert_eq!(joined.len(), 1);
    }

    #[test]
    fn large_float_keys_match_only_themselves() {
        let schema = Schema::of(&[("k", ColumnType::Float)]);
        let left = Dataset::new(
            "a",
            schema.clone(),
            vec![vec![Some(Value::Float(1e19))], vec![Some(Value::Float(-0.0))]],
        )
        .unwrap()
        .qualified("a");
        let right = Dataset::new(
            "b",
            schema,
            vec![
                vec![Some(Value::Float(2e19))],
                vec![Some(Value::Float(1e19))],
                vec![Some(Value::Float(0.0))],
            ],
        )
        .unwrap()
        .qualified("b");
        let joined = inner_join(&left, &right, &["a.k"], &["b.k"]).unwrap();
        assert_eq!(
            joined.rows().to_vec(),
            vec![
                vec![Some(Value::Float(1e19)), Some(Value::Float(1e19))],
                vec![Some(Value::Float(-0.0)), Some(Value::Float(0.0))],
            ]
        );
    }

    #[test]
    fn colliding_column_names_are_rejected() {
        let err = inner_join(&left(), &left(), &["l.id"], &["l.id"]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateColumn { .. }));
    }
}

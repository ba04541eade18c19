//! Grouped dense ranking and "latest wins" row selection.
//!
//! [`dense_rank`] assigns each row its rank inside its group when the group
//! is ordered descending by an order key: equal keys share a rank and the
//! next distinct key gets the next integer. [`top_with_ties`] keeps the
//! rank-1 rows, so a group whose best key is tied keeps every tied row.
//! [`resolve_latest`] applies that to a [`Dataset`] by column name.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::{debug, info};

use crate::{data::ComparableValue, dataset::Dataset, error::Result};

/// Dense rank (1-based) of every row within its group, descending by `order_key`.
/// The returned vector is aligned with `rows`.
pub fn dense_rank<T, K, O, G, F>(rows: &[T], group_key: G, order_key: F) -> Vec<usize>
where
    K: Ord,
    O: Ord,
    G: Fn(&T) -> K,
    F: Fn(&T) -> O,
{
    let mut groups: BTreeMap<K, Vec<(O, usize)>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        groups
            .entry(group_key(row))
            .or_default()
            .push((order_key(row), idx));
    }

    let mut ranks = vec![0usize; rows.len()];
    for members in groups.into_values() {
        let ordered = members
            .into_iter()
            .sorted_by(|left, right| right.0.cmp(&left.0))
            .collect_vec();
        let mut rank = 0usize;
        let mut previous: Option<&O> = None;
        for (key, idx) in &ordered {
            if previous.is_none_or(|prev| prev != key) {
                rank += 1;
                previous = Some(key);
            }
            ranks[*idx] = rank;
        }
    }
    ranks
}

/// Rows holding their group's greatest `order_key`, ties included.
/// Survivors keep their input order.
pub fn top_with_ties<T, K, O, G, F>(rows: &[T], group_key: G, order_key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    O: Ord,
    G: Fn(&T) -> K,
    F: Fn(&T) -> O,
{
    let ranks = dense_rank(rows, group_key, order_key);
    rows.iter()
        .zip(ranks)
        .filter(|(_, rank)| *rank == 1)
        .map(|(row, _)| row.clone())
        .collect()
}

/// Keeps, per distinct `group_column` value, the row(s) with the greatest
/// `tie_break_column`. Nulls group together and rank below any value.
pub fn resolve_latest(
    dataset: &Dataset,
    group_column: &str,
    tie_break_column: &str,
) -> Result<Dataset> {
    let group_idx = dataset.column_index(group_column)?;
    let order_idx = dataset.column_index(tie_break_column)?;

    let rows = top_with_ties(
        dataset.rows(),
        |row| ComparableValue(row[group_idx].clone()),
        |row| ComparableValue(row[order_idx].clone()),
    );
    let groups = rows
        .iter()
        .map(|row| ComparableValue(row[group_idx].clone()))
        .collect::<BTreeSet<_>>()
        .len();
    debug!(
        "Resolved latest '{}' by {} desc within {}",
        dataset.name(),
        tie_break_column,
        group_column
    );
    info!(
        "Kept {} of {} row(s) in '{}' across {} distinct {} value(s)",
        rows.len(),
        dataset.len(),
        dataset.name(),
        groups,
        group_column
    );
    Ok(dataset.with_rows(rows))
}

use std::collections::BTreeSet;

use log::debug;

use crate::dataset::Dataset;

/// Keeps the first occurrence of each distinct row, preserving input order.
pub fn dedup<T>(rows: &[T]) -> Vec<T>
where
    T: Ord + Clone,
{
    let mut seen: BTreeSet<&T> = BTreeSet::new();
    rows.iter()
        .filter(|row| seen.insert(*row))
        .cloned()
        .collect()
}

pub fn dedup_dataset(dataset: &Dataset) -> Dataset {
    let rows = dedup(dataset.rows());
    debug!(
        "Deduplicated '{}': {} -> {} row(s)",
        dataset.name(),
        dataset.len(),
        rows.len()
    );
    dataset.with_rows(rows)
}

use crate::error::{EdaError, Result};
use crate::table::{finite_value, float_column};
use arrow::{
    array::{Float64Array, UInt32Array},
    compute::take_record_batch,
    record_batch::RecordBatch,
};
use std::cmp::Ordering;
use tracing::debug;

/// Row indices ordered by score, highest first.
///
/// The sort is stable, so tied scores keep their original row order.
/// Null and NaN scores go last.
pub fn descending_order(scores: &Float64Array) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        match (finite_value(scores, a), finite_value(scores, b)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    order
}

/// The `n` highest-scoring rows of `batch` by `score_column`, as a new batch.
/// Shorter tables return every row.
pub fn top_n(batch: &RecordBatch, score_column: &str, n: usize) -> Result<RecordBatch> {
    let scores = float_column(batch, score_column)?;
    let indices = UInt32Array::from_iter_values(
        descending_order(scores)
            .into_iter()
            .take(n)
            .map(|i| i as u32),
    );
    debug!(requested = n, selected = indices.len(), "top-n selection");
    take_record_batch(batch, &indices)
        .map_err(|e| EdaError::data_load(format!("top {} rows by {}", n, score_column), e))
}

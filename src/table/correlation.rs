use crate::table::finite_value;
use arrow::{
    array::{Array, Float64Array},
    record_batch::RecordBatch,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Pairwise Pearson coefficients between the numeric columns of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared entries.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Correlate every `Float64` column of `batch` with every other one.
///
/// Non-numeric columns (the name, code and region labels) are skipped.
/// Each pair uses only the rows where both values are present. A pair with
/// fewer than two such rows, or with a constant column, is NaN.
pub fn correlation_matrix(batch: &RecordBatch) -> CorrelationMatrix {
    let schema = batch.schema();
    let numeric: Vec<(String, &Float64Array)> = schema
        .fields()
        .iter()
        .zip(batch.columns())
        .filter_map(|(field, col)| {
            col.as_any()
                .downcast_ref::<Float64Array>()
                .map(|arr| (field.name().clone(), arr))
        })
        .collect();

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                if has_variance(numeric[i].1) {
                    1.0
                } else {
                    warn!(column = %numeric[i].0, "constant column; correlation undefined");
                    f64::NAN
                }
            } else {
                pearson(numeric[i].1, numeric[j].1)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!(columns = n, rows = batch.num_rows(), "computed correlation matrix");
    CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    }
}

/// Pearson correlation over the rows where both `x` and `y` are present.
pub fn pearson(x: &Float64Array, y: &Float64Array) -> f64 {
    let pairs: Vec<(f64, f64)> = (0..x.len().min(y.len()))
        .filter_map(|i| Some((finite_value(x, i)?, finite_value(y, i)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    // constant input, compared on the raw values
    let (x0, y0) = pairs[0];
    if pairs.iter().all(|p| p.0 == x0) || pairs.iter().all(|p| p.1 == y0) {
        return f64::NAN;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / count;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn has_variance(arr: &Float64Array) -> bool {
    let mut present = (0..arr.len()).filter_map(|i| finite_value(arr, i));
    match present.next() {
        Some(first) => {
            let mut seen = 1;
            let mut varies = false;
            for v in present {
                seen += 1;
                varies |= v != first;
            }
            seen >= 2 && varies
        }
        None => false,
    }
}

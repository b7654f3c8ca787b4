//! The working table: column selection and the derived views the charts
//! are drawn from.

use crate::error::{EdaError, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

pub mod correlation;
pub mod top;

pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use top::top_n;

pub const COUNTRY_NAME: &str = "Country name";
pub const ISO_CODE: &str = "iso alpha";
pub const REGION: &str = "Regional indicator";
pub const HAPPINESS_SCORE: &str = "Happiness score";
pub const GDP_PER_CAPITA: &str = "Logged GDP per capita";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Identifying text; excluded from numeric views.
    Label,
    /// Must have loaded as `Float64`.
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub role: ColumnRole,
}

impl ColumnSpec {
    const fn label(name: &'static str) -> Self {
        ColumnSpec {
            name,
            role: ColumnRole::Label,
        }
    }

    const fn numeric(name: &'static str) -> Self {
        ColumnSpec {
            name,
            role: ColumnRole::Numeric,
        }
    }
}

/// The fixed column set every chart is drawn from, in output order.
pub const WORKING_COLUMNS: [ColumnSpec; 10] = [
    ColumnSpec::label(COUNTRY_NAME),
    ColumnSpec::label(ISO_CODE),
    ColumnSpec::label(REGION),
    ColumnSpec::numeric(HAPPINESS_SCORE),
    ColumnSpec::numeric(GDP_PER_CAPITA),
    ColumnSpec::numeric("Social support"),
    ColumnSpec::numeric("Healthy life expectancy"),
    ColumnSpec::numeric("Freedom to make life choices"),
    ColumnSpec::numeric("Generosity"),
    ColumnSpec::numeric("Perceptions of corruption"),
];

/// Copy the named columns out of `batch`, in the order given, keeping row
/// order. Label columns are cast to `Utf8`; numeric columns must already be
/// `Float64`.
pub fn project(batch: &RecordBatch, columns: &[ColumnSpec]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for spec in columns {
        let idx = schema
            .index_of(spec.name)
            .map_err(|_| EdaError::schema_mismatch(spec.name, "is missing from the input"))?;
        let array = batch.column(idx);

        let array = match (spec.role, array.data_type()) {
            (ColumnRole::Numeric, DataType::Float64) | (ColumnRole::Label, DataType::Utf8) => {
                array.clone()
            }
            (ColumnRole::Numeric, other) => {
                return Err(EdaError::schema_mismatch(
                    spec.name,
                    format!("must be numeric but loaded as {}", other),
                ));
            }
            (ColumnRole::Label, _) => cast(array, &DataType::Utf8)
                .map_err(|e| EdaError::schema_mismatch(spec.name, e))?,
        };

        let dtype = array.data_type().clone();
        fields.push(Field::new(spec.name, dtype, true));
        arrays.push(array);
    }

    debug!(
        selected = columns.len(),
        available = schema.fields().len(),
        "projected working table"
    );
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| EdaError::schema_mismatch("<projection>", e))
}

/// Borrow a column as floats.
pub fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    batch
        .column_by_name(name)
        .ok_or_else(|| EdaError::schema_mismatch(name, "is missing from the table"))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| EdaError::schema_mismatch(name, "is not numeric"))
}

/// Borrow a column as strings.
pub fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| EdaError::schema_mismatch(name, "is missing from the table"))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| EdaError::schema_mismatch(name, "is not text"))
}

/// Value at `idx` as `Some(f64)`, treating null and NaN alike as missing.
pub(crate) fn finite_value(array: &Float64Array, idx: usize) -> Option<f64> {
    if array.is_null(idx) {
        return None;
    }
    let v = array.value(idx);
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

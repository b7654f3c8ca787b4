use crate::error::{EdaError, Result};
use crate::load::utils::{infer_column_dtype, is_missing};
use arrow::{
    array::{ArrayRef, Float64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Build a typed batch from cleaned, column-major string cells.
///
/// Each column is typed with [`infer_column_dtype`]; missing cells become nulls.
pub fn columns_to_batch(
    source_name: &str,
    headers: &[String],
    columns: &[Vec<String>],
) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(headers.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(headers.len());

    for (name, cells) in headers.iter().zip(columns) {
        match infer_column_dtype(cells) {
            DataType::Float64 => {
                let mut b = Float64Builder::with_capacity(cells.len());
                for cell in cells {
                    b.append_option(if is_missing(cell) {
                        None
                    } else {
                        cell.parse::<f64>().ok()
                    });
                }
                arrays.push(Arc::new(b.finish()) as ArrayRef);
                fields.push(Field::new(name, DataType::Float64, true));
            }
            _ => {
                let mut b = StringBuilder::new();
                for cell in cells {
                    if is_missing(cell) {
                        b.append_null();
                    } else {
                        b.append_value(cell);
                    }
                }
                arrays.push(Arc::new(b.finish()) as ArrayRef);
                fields.push(Field::new(name, DataType::Utf8, true));
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| EdaError::data_load(source_name, e))
}

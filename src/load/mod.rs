// src/load/mod.rs
use crate::error::{EdaError, Result};
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, info};

pub mod convert;
pub mod utils;

use convert::columns_to_batch;
use utils::{clean_str, normalize_headers};

/// Load the CSV at `path` into a typed in-memory table.
///
/// Fails with [`EdaError::DataLoad`] if the file is missing or malformed.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| EdaError::data_load(&source_name, e))?;
    let batch = read_csv(BufReader::new(file), &source_name)?;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded table"
    );
    Ok(batch)
}

/// Parse CSV from any reader. The first record is the header row; every
/// following record must have exactly as many fields.
pub fn read_csv<R: Read>(reader: R, source_name: &str) -> Result<RecordBatch> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let raw_headers: Vec<String> = rdr
        .headers()
        .map_err(|e| EdaError::data_load(source_name, e))?
        .iter()
        .map(clean_str)
        .collect();
    if raw_headers.is_empty() {
        return Err(EdaError::data_load(source_name, "missing header row"));
    }
    let headers = normalize_headers(&raw_headers);
    debug!(?headers, "read header row");

    // column-major so each column can be typed on its own
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            EdaError::data_load(source_name, format!("CSV parse error at record {}: {}", idx, e))
        })?;
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.push(clean_str(field));
        }
    }

    columns_to_batch(source_name, &headers, &columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::{array::Array, datatypes::DataType};
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,happiness_eda::load=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn test_load_csv_from_file() -> Result<()> {
        init_test_logging();
        let content = "Country name,iso alpha,Happiness score\n\
                       Finland,FIN,7.804\n\
                       \"Korea, Republic of\",KOR,5.951\n\
                       Denmark,DNK,\n";
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;

        let batch = load_csv(tmp.path())?;

        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 3);
        let schema = batch.schema();
        assert_eq!(schema.field(0).name(), "Country name");
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
        assert_eq!(batch.column(2).null_count(), 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, EdaError::DataLoad { .. }), "got {err:?}");
    }

    #[test]
    fn ragged_record_is_a_load_error() {
        let content = "a,b\n1,2\n3\n";
        let err = read_csv(Cursor::new(content), "inline").unwrap_err();
        match err {
            EdaError::DataLoad { message, .. } => assert!(message.contains("record 1")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_csv(Cursor::new(""), "inline").unwrap_err();
        assert!(matches!(err, EdaError::DataLoad { .. }));
    }

    #[test]
    fn header_only_gives_empty_table() -> Result<()> {
        let batch = read_csv(Cursor::new("a,b\n"), "inline")?;
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
        Ok(())
    }

    #[test]
    fn na_cells_keep_a_column_numeric() -> Result<()> {
        let content = "Country name,Perceptions of corruption\n\
                       Finland,0.182\n\
                       Turkmenistan,NA\n\
                       Somaliland region,N/A\n\
                       State of Palestine,null\n";
        let batch = read_csv(Cursor::new(content), "inline")?;
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);
        assert_eq!(batch.column(1).null_count(), 3);
        Ok(())
    }
}

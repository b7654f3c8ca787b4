use arrow::datatypes::DataType;

/// Trim whitespace and strip one pair of outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cell spellings read as a missing value, alongside the empty cell.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "#N/A", "<NA>", "null", "NULL", "None", "NaN", "nan", "-NaN", "-nan",
];

/// True if a cleaned cell holds no value.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

/// Infer the Arrow dtype of a whole column from its cleaned cells.
///
/// Missing cells (see [`is_missing`]) are ignored; a column is `Float64` only
/// if every remaining cell parses as a float.
pub fn infer_column_dtype(cells: &[String]) -> DataType {
    let numeric = cells
        .iter()
        .filter(|c| !is_missing(c))
        .all(|c| c.parse::<f64>().is_ok());
    if numeric {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Give every header a unique, non-empty name.
///
/// Blank headers become `Unnamed: <idx>` and repeats get a `.1`, `.2`, ...
/// suffix, so a stray index column or duplicated name still loads.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name.clone()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while out.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        out.push(candidate);
    }
    out
}

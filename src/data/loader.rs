use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexSet;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset};
use crate::error::DashboardError;

/// Cell text Pandas reads as missing.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "#N/A", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None",
];

// ---------------------------------------------------------------------------
// Load options / sources
// ---------------------------------------------------------------------------

/// Knobs for reading a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field separator for delimited text.
    pub separator: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

/// Where a dataset comes from: a path plus how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub path: PathBuf,
    pub options: LoadOptions,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// File name for status messages.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn read(&self) -> crate::error::Result<Dataset> {
        read_dataset(&self.path, &self.options)
    }
}

/// Parse a user-typed separator: one ASCII character, or `\t` for tab.
pub fn parse_separator(raw: &str) -> Result<u8> {
    if raw == "\\t" {
        return Ok(b'\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => bail!("separator must be a single ASCII character, got {raw:?}"),
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset, folding any failure into [`DashboardError::FileRead`]
/// with the full context chain as its message.
pub fn read_dataset(path: &Path, options: &LoadOptions) -> crate::error::Result<Dataset> {
    load_file(path, options).map_err(|e| DashboardError::FileRead {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text, separator from `options`
/// * `.tsv`          – tab-separated unless another separator was chosen
/// * `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` – first worksheet
/// * `.json`         – `[{ "col": value, ... }, ...]`
/// * `.parquet`      – flat scalar columns
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_delimited(path, options.separator),
        "tsv" if options.separator == b',' => load_delimited(path, b'\t'),
        "tsv" => load_delimited(path, options.separator),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_spreadsheet(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row. Rows may be short
/// (padded with nulls) but not longer than the header.
fn load_delimited(path: &Path, separator: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("No columns to parse from file");
    }

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {}", row_no + 1))?;
        if record.len() > headers.len() {
            bail!(
                "row {}: expected {} fields, saw {}",
                row_no + 1,
                headers.len(),
                record.len()
            );
        }
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Dataset::from_rows(headers, rows))
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if NULL_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return CellValue::Bool(s.eq_ignore_ascii_case("true"));
    }
    CellValue::String(raw.to_string())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First worksheet; its first row holds the column names.
fn load_spreadsheet(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| anyhow!("Failed to open spreadsheet: {e}"))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Spreadsheet contains no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| anyhow!("Failed to read sheet '{sheet}': {e}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .with_context(|| format!("Sheet '{sheet}' is empty"))?
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {i}"),
            other => other.to_string(),
        })
        .collect();

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();
    Ok(Dataset::from_rows(headers, rows))
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        // serial date number, the same thing Excel stores
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 30, "job": "admin", "balance": 1787.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: IndexSet<String> = IndexSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        headers.extend(obj.keys().cloned());
        objects.push(obj);
    }

    let rows: Vec<Vec<CellValue>> = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers.into_iter().collect(), rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns.
///
/// Integers and floats stay numeric, booleans stay booleans, and every other
/// Arrow type (strings, dates, timestamps, ...) is read as text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .zip(&headers)
            .map(|(array, name)| {
                arrow_cells(array).with_context(|| format!("reading column '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(Dataset::from_rows(headers, rows))
}

// -- Arrow helpers --

/// Convert one Arrow column into cells, casting to the nearest scalar type.
fn arrow_cells(array: &ArrayRef) -> Result<Vec<CellValue>> {
    let n = array.len();
    let data_type = array.data_type();

    let cells = if *data_type == DataType::Boolean {
        let arr = array.as_boolean();
        (0..n)
            .map(|i| match arr.is_null(i) {
                true => CellValue::Null,
                false => CellValue::Bool(arr.value(i)),
            })
            .collect()
    } else if data_type.is_integer() {
        let ints = cast(array, &DataType::Int64).context("casting to Int64")?;
        let arr = ints.as_primitive::<Int64Type>();
        (0..n)
            .map(|i| match arr.is_null(i) {
                true => CellValue::Null,
                false => CellValue::Integer(arr.value(i)),
            })
            .collect()
    } else if data_type.is_floating() {
        let floats = cast(array, &DataType::Float64).context("casting to Float64")?;
        let arr = floats.as_primitive::<Float64Type>();
        (0..n)
            .map(|i| match arr.is_null(i) {
                true => CellValue::Null,
                false => CellValue::Float(arr.value(i)),
            })
            .collect()
    } else {
        let text = cast(array, &DataType::Utf8)
            .with_context(|| format!("unsupported column type {data_type:?}"))?;
        let arr = text.as_string::<i32>();
        (0..n)
            .map(|i| match arr.is_null(i) {
                true => CellValue::Null,
                false => CellValue::String(arr.value(i).to_string()),
            })
            .collect()
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use super::*;

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn reads_csv_with_typed_columns() {
        let file = temp_file(
            ".csv",
            "age,job,balance,default\n30,admin,1787.5,no\n41,,NA,yes\n35,services,-12,TRUE\n",
        );
        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.numeric_columns(), vec!["age", "balance"]);
        assert_eq!(ds.categorical_columns(), vec!["job", "default"]);
        let job = ds.column("job").unwrap();
        assert_eq!(job.values[1], CellValue::Null);
        let balance = ds.column("balance").unwrap();
        assert_eq!(balance.values[2], CellValue::Integer(-12));
        assert_eq!(ds.column("default").unwrap().values[2], CellValue::Bool(true));
    }

    #[test]
    fn honours_the_separator() {
        let file = temp_file(".csv", "\"age\";\"job\"\n58;\"management\"\n44;\"technician\"\n");
        let options = LoadOptions {
            separator: parse_separator(";").unwrap(),
        };
        let ds = read_dataset(file.path(), &options).unwrap();
        assert_eq!(ds.numeric_columns(), vec!["age"]);
        assert_eq!(ds.categorical_columns(), vec!["job"]);

        // with the wrong separator everything collapses into one text column
        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.columns().len(), 1);
        assert!(ds.numeric_columns().is_empty());
    }

    #[test]
    fn tsv_defaults_to_tab() {
        let file = temp_file(".tsv", "x\ty\n1\ta\n2\tb\n");
        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.numeric_columns(), vec!["x"]);
        assert_eq!(ds.categorical_columns(), vec!["y"]);
    }

    #[test]
    fn header_only_file_loads_empty() {
        let file = temp_file(".csv", "a,b\n");
        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.columns().len(), 2);
    }

    #[test]
    fn malformed_files_are_file_read_errors() {
        let too_wide = temp_file(".csv", "a,b\n1,2,3\n");
        let err = read_dataset(too_wide.path(), &LoadOptions::default()).unwrap_err();
        match err {
            DashboardError::FileRead { path, message } => {
                assert_eq!(path, too_wide.path());
                assert!(message.contains("expected 2 fields"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }

        let empty = temp_file(".csv", "");
        assert!(matches!(
            read_dataset(empty.path(), &LoadOptions::default()),
            Err(DashboardError::FileRead { .. })
        ));

        let not_a_workbook = temp_file(".xlsx", "definitely not a zip archive");
        assert!(matches!(
            read_dataset(not_a_workbook.path(), &LoadOptions::default()),
            Err(DashboardError::FileRead { .. })
        ));

        let bad_json = temp_file(".json", "{\"not\": \"records\"}");
        assert!(matches!(
            read_dataset(bad_json.path(), &LoadOptions::default()),
            Err(DashboardError::FileRead { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let file = temp_file(".dat", "a,b\n1,2\n");
        let err = read_dataset(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension: .dat"), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let source = DatasetSource::new("/nonexistent/bank.csv", LoadOptions::default());
        assert_eq!(source.display_name(), "bank.csv");
        assert!(matches!(source.read(), Err(DashboardError::FileRead { .. })));
    }

    #[test]
    fn separator_parsing() {
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert_eq!(parse_separator("\t").unwrap(), b'\t');
        assert!(parse_separator("").is_err());
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("§").is_err());
    }

    #[test]
    fn reads_json_records() {
        let file = temp_file(
            ".json",
            r#"[{"age": 30, "job": "admin"}, {"age": 41.5, "job": null, "loan": true}]"#,
        );
        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.numeric_columns(), vec!["age", "loan"]);
        assert_eq!(ds.categorical_columns(), vec!["job"]);
        assert_eq!(ds.column("loan").unwrap().values[0], CellValue::Null);
    }

    #[test]
    fn reads_flat_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int32, false),
            Field::new("job", DataType::Utf8, true),
            Field::new("balance", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![30, 41])),
                Arc::new(StringArray::from(vec![Some("admin"), None])),
                Arc::new(Float64Array::from(vec![Some(1.5), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = read_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.numeric_columns(), vec!["age", "balance"]);
        assert_eq!(ds.categorical_columns(), vec!["job"]);
        assert_eq!(ds.column("age").unwrap().values[1], CellValue::Integer(41));
        assert_eq!(ds.column("balance").unwrap().values[1], CellValue::Null);
    }
}

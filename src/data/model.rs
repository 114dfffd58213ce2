use std::collections::HashMap;
use std::fmt;

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a `BTreeMap` key for cross-tabulation, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in ordered maps --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`; booleans count as 0/1 like NumPy.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column with its inferred kind
// ---------------------------------------------------------------------------

/// Column classification, the only validation the dashboard performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    /// One value per row of the dataset.
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column and classify it by inspecting its values.
    ///
    /// Follows Pandas dtypes: any string makes the column categorical
    /// (`object`), and so do booleans mixed with missing or numeric cells. A
    /// column of a zero-row table is categorical too; everything else,
    /// including an all-null column, is numeric.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let has_string = values.iter().any(|v| matches!(v, CellValue::String(_)));
        let has_bool = values.iter().any(|v| matches!(v, CellValue::Bool(_)));
        let impure_bool = has_bool && values.iter().any(|v| !matches!(v, CellValue::Bool(_)));
        let kind = if values.is_empty() || has_string || impure_bool {
            ColumnKind::Categorical
        } else {
            ColumnKind::Numeric
        };
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    /// Non-null values, in row order.
    pub fn present(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A single in-memory table of rows × named columns.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from a header row and row-major cells.
    ///
    /// Short rows are padded with `Null`, extra cells are dropped and
    /// duplicate headers get a `.1`, `.2`, ... suffix.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = dedupe_headers(headers);
        let row_count = rows.len();

        let mut buffers: Vec<Vec<CellValue>> = headers
            .iter()
            .map(|_| Vec::with_capacity(row_count))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for buffer in buffers.iter_mut() {
                buffer.push(cells.next().unwrap_or(CellValue::Null));
            }
        }

        let columns = headers
            .into_iter()
            .zip(buffers)
            .map(|(name, values)| Column::new(name, values))
            .collect();

        Dataset { columns, row_count }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with [`DashboardError::UnknownColumn`].
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| DashboardError::UnknownColumn(name.to_string()))
    }

    /// Numeric column names in order of appearance.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.names_of(ColumnKind::Numeric)
    }

    /// Categorical column names in order of appearance.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.names_of(ColumnKind::Categorical)
    }

    fn names_of(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    /// A numeric column as `f64`, with missing cells as NaN.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.require(name)?;
        if !column.is_numeric() {
            return Err(DashboardError::InvalidColumn(format!(
                "'{name}' is categorical, not numeric"
            )));
        }
        Ok(column
            .values
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect())
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for header in headers {
        let name = match seen.get(&header).copied() {
            Some(mut count) => loop {
                count += 1;
                let candidate = format!("{header}.{count}");
                if !seen.contains_key(&candidate) {
                    seen.insert(header.clone(), count);
                    break candidate;
                }
            },
            None => header,
        };
        seen.entry(name.clone()).or_insert(0);
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec!["age".into(), "job".into(), "balance".into(), "married".into()],
            vec![
                vec![CellValue::Integer(30), s("admin"), CellValue::Float(1.5), CellValue::Bool(true)],
                vec![CellValue::Integer(41), s("technician"), CellValue::Null, CellValue::Bool(false)],
                vec![CellValue::Null, CellValue::Integer(7), CellValue::Float(-2.0), CellValue::Bool(true)],
            ],
        )
    }

    #[test]
    fn classifies_columns_in_order_of_appearance() {
        let ds = sample();
        assert_eq!(ds.numeric_columns(), vec!["age", "balance", "married"]);
        assert_eq!(ds.categorical_columns(), vec!["job"]);
    }

    #[test]
    fn pads_short_rows_with_null() {
        let ds = Dataset::from_rows(
            vec!["age".into(), "balance".into()],
            vec![
                vec![CellValue::Integer(30), CellValue::Float(1.5)],
                vec![CellValue::Integer(41)],
            ],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("balance").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn booleans_with_gaps_or_numbers_are_categorical() {
        let ds = Dataset::from_rows(
            vec!["flag".into(), "mixed".into(), "pure".into()],
            vec![
                vec![CellValue::Bool(true), CellValue::Bool(false), CellValue::Bool(true)],
                vec![CellValue::Null, CellValue::Integer(3), CellValue::Bool(false)],
            ],
        );
        assert_eq!(ds.categorical_columns(), vec!["flag", "mixed"]);
        assert_eq!(ds.numeric_columns(), vec!["pure"]);
    }

    #[test]
    fn all_null_column_is_numeric_but_empty_table_is_categorical() {
        let ds = Dataset::from_rows(vec!["x".into()], vec![vec![CellValue::Null]]);
        assert_eq!(ds.numeric_columns(), vec!["x"]);

        let empty = Dataset::from_rows(vec!["x".into()], Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.categorical_columns(), vec!["x"]);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "a".into(), "a.1".into(), "a".into()],
            Vec::new(),
        );
        let names: Vec<&str> = ds.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a.1", "a.1.1", "a.2"]);
    }

    #[test]
    fn numeric_values_maps_nulls_to_nan() {
        let ds = sample();
        let balance = ds.numeric_values("balance").unwrap();
        assert_eq!(balance[0], 1.5);
        assert!(balance[1].is_nan());
        let married = ds.numeric_values("married").unwrap();
        assert_eq!(married, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn numeric_values_rejects_bad_selections() {
        let ds = sample();
        assert!(matches!(
            ds.numeric_values("job"),
            Err(DashboardError::InvalidColumn(_))
        ));
        assert!(matches!(
            ds.numeric_values("missing"),
            Err(DashboardError::UnknownColumn(name)) if name == "missing"
        ));
    }

    #[test]
    fn cell_values_order_nulls_first() {
        let mut values = vec![s("b"), CellValue::Integer(2), CellValue::Null, s("a")];
        values.sort();
        assert_eq!(values, vec![CellValue::Null, CellValue::Integer(2), s("a"), s("b")]);
    }
}

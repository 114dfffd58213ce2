/// Data layer: typed table and file loading.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .txt / .xlsx / .ods / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → rows of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  named columns, numeric / categorical
///   └──────────┘
/// ```

pub mod loader;
pub mod model;

//! Loading and exporting tables.
//!
//! Input is chosen by file extension (`.csv`, `.xls`, `.xlsx`, `.json`);
//! output by an explicit [`OutputFormat`].

use super::types::Table;
use crate::error::{CleanerError, Result};
use calamine::{Data, Reader as _, open_workbook_auto};
use chrono::NaiveDateTime;
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rows sampled by the CSV reader to infer column dtypes.
const CSV_INFER_SCHEMA_ROWS: usize = 10_000;

const EMPTY_CELL: &Data = &Data::Empty;

/// Output file formats the exporter can write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Excel,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Json => "json",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            other => Err(CleanerError::UnsupportedFormat(format!(
                "unsupported export format: {other}"
            ))),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Loads a table from `path`, choosing the decoder by extension.
///
/// # Errors
///
/// [`CleanerError::FileNotFound`] when the path does not exist,
/// [`CleanerError::UnsupportedFormat`] for unknown extensions and
/// [`CleanerError::LoadFailure`] when decoding fails.
pub fn load_data(path: &Path) -> Result<Table> {
    let result = load_frame(path);
    match result {
        Ok(df) => {
            tracing::info!(
                "Loaded {} rows and {} columns from {}",
                df.height(),
                df.width(),
                path.display()
            );
            Ok(Table::new(df))
        }
        Err(err) => {
            tracing::error!("Error loading file: {err}");
            Err(err)
        }
    }
}

fn load_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(CleanerError::FileNotFound(path.to_path_buf()));
    }

    let ext = extension_of(path);
    match ext.as_str() {
        "csv" => read_csv(path),
        "xls" | "xlsx" => read_excel(path),
        "json" => read_json(path),
        _ => Err(CleanerError::UnsupportedFormat(format!(
            "unsupported file format: .{ext}"
        ))),
    }
}

/// Date-looking text stays text; only the date stage interprets it.
fn read_csv(path: &Path) -> Result<DataFrame> {
    let parse_options = CsvParseOptions::default().with_encoding(CsvEncoding::LossyUtf8);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(CSV_INFER_SCHEMA_ROWS))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| CleanerError::LoadFailure(format!("failed to read CSV: {e}")))?;

    empty_columns_as_numeric(df)
}

/// A column with no values at all carries no type; treat it as an
/// all-missing numeric column rather than empty text.
fn empty_columns_as_numeric(df: DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }
    let casts: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|c| c.null_count() == c.len() && c.dtype() == &DataType::String)
        .map(|c| col(c.name().clone()).cast(DataType::Float64))
        .collect();
    if casts.is_empty() {
        return Ok(df);
    }
    df.lazy()
        .with_columns(casts)
        .collect()
        .map_err(|e| CleanerError::LoadFailure(format!("failed to type empty columns: {e}")))
}

fn read_json(path: &Path) -> Result<DataFrame> {
    let file = std::fs::File::open(path)?;
    JsonReader::new(file)
        .with_json_format(JsonFormat::Json)
        .finish()
        .map_err(|e| CleanerError::LoadFailure(format!("failed to read JSON: {e}")))
}

fn read_excel(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CleanerError::LoadFailure(format!("failed to open workbook: {e}")))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CleanerError::LoadFailure("workbook has no worksheets".to_owned()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| CleanerError::LoadFailure(format!("failed to read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell.to_string().trim() {
                "" => format!("column_{}", idx + 1),
                s => s.to_owned(),
            };
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(EMPTY_CELL))
                .collect();
            excel_column(&name, &cells).map(Column::from)
        })
        .collect::<Result<Vec<_>>>()?;

    DataFrame::new(columns)
        .map_err(|e| CleanerError::LoadFailure(format!("invalid worksheet layout: {e}")))
        .and_then(empty_columns_as_numeric)
}

/// Builds one typed series from worksheet cells. The narrowest type that
/// fits every non-empty cell wins; anything mixed falls back to text.
fn excel_column(name: &str, cells: &[&Data]) -> Result<Series> {
    let filled = || cells.iter().filter(|c| !matches!(c, Data::Empty));

    let all_int = filled().all(|c| matches!(c, Data::Int(_)));
    let all_number = filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
    let all_bool = filled().all(|c| matches!(c, Data::Bool(_)));
    let all_datetime = filled().all(|c| excel_datetime(c).is_some());
    let any_filled = filled().next().is_some();

    if any_filled && all_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        Ok(Series::new(name.into(), values))
    } else if any_filled && all_number {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Ok(Series::new(name.into(), values))
    } else if any_filled && all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        Ok(Series::new(name.into(), values))
    } else if any_filled && all_datetime {
        let millis: Vec<Option<i64>> = cells
            .iter()
            .map(|c| excel_datetime(c).map(|dt| dt.and_utc().timestamp_millis()))
            .collect();
        Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .map_err(|e| CleanerError::LoadFailure(format!("invalid dates in '{name}': {e}")))
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Data::Empty => None,
                other => Some(other.to_string()),
            })
            .collect();
        Ok(Series::new(name.into(), values))
    }
}

fn excel_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok(),
        _ => None,
    }
}

/// Writes `df` to `path` in the requested format.
///
/// # Errors
///
/// Returns [`CleanerError::ExportFailure`] if the file cannot be created or
/// encoded.
pub fn export_data(df: &mut DataFrame, path: &Path, format: OutputFormat) -> Result<()> {
    let result = match format {
        OutputFormat::Csv => write_csv(df, path),
        OutputFormat::Excel => write_excel(df, path),
        OutputFormat::Json => write_json(df, path),
    };

    match result {
        Ok(()) => {
            tracing::info!("Successfully exported cleaned data to {}", path.display());
            Ok(())
        }
        Err(err) => {
            let err = match err {
                CleanerError::ExportFailure(msg) => CleanerError::ExportFailure(msg),
                other => CleanerError::ExportFailure(other.to_string()),
            };
            tracing::error!("Export failed: {err}");
            Err(err)
        }
    }
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| {
        CleanerError::ExportFailure(format!("cannot create {}: {e}", path.display()))
    })
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| CleanerError::ExportFailure(format!("failed to write CSV: {e}")))
}

fn write_json(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    JsonWriter::new(&mut file)
        .with_json_format(JsonFormat::Json)
        .finish(df)
        .map_err(|e| CleanerError::ExportFailure(format!("failed to write JSON: {e}")))
}

fn write_excel(df: &DataFrame, path: &Path) -> Result<()> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| {
        CleanerError::ExportFailure(format!("failed to write Excel: {e}"))
    };

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        for (idx, column) in df.get_columns().iter().enumerate() {
            let col = u16::try_from(idx).map_err(|_err| {
                CleanerError::ExportFailure("too many columns for a worksheet".to_owned())
            })?;
            worksheet
                .write_string(0, col, column.name().as_str())
                .map_err(xlsx_err)?;

            let series = column.as_materialized_series();
            let dtype = series.dtype();
            if dtype.is_primitive_numeric() {
                let values = series.cast(&DataType::Float64)?;
                for (row, v) in (1u32..).zip(values.f64()?.into_iter()) {
                    match v {
                        Some(x) if x.is_finite() => {
                            worksheet.write_number(row, col, x).map_err(xlsx_err)?;
                        }
                        Some(x) if x.is_infinite() => {
                            worksheet
                                .write_string(row, col, x.to_string())
                                .map_err(xlsx_err)?;
                        }
                        _ => {}
                    }
                }
            } else if dtype.is_bool() {
                for (row, v) in (1u32..).zip(series.bool()?.into_iter()) {
                    if let Some(b) = v {
                        worksheet.write_boolean(row, col, b).map_err(xlsx_err)?;
                    }
                }
            } else {
                let values = series.cast(&DataType::String)?;
                for (row, v) in (1u32..).zip(values.str()?.into_iter()) {
                    if let Some(s) = v {
                        worksheet.write_string(row, col, s).map_err(xlsx_err)?;
                    }
                }
            }
        }
    }

    workbook.save(path).map_err(xlsx_err)
}

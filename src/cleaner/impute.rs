//! Missing-value imputation.
//!
//! Strategy per load-time classification:
//! - Numeric: median of the non-missing values
//! - Datetime: the current timestamp (today for `Date` columns)
//! - Text / Boolean: the most frequent value, ties going to the smallest
//!
//! Float `NaN` counts as missing. Numeric and boolean columns with no values
//! at all are left missing; there is nothing to fill them with.

use super::text::as_text;
use super::types::{ColumnKind, Table};
use crate::error::{CleanerError, Result};
use chrono::{Local, NaiveDate, Utc};
use polars::prelude::*;

/// Fills missing values in every column according to its classification.
pub fn impute_missing(table: Table) -> Result<Table> {
    let mut df = nan_as_missing(&table)?;

    let mut fills = Vec::new();
    for (name, kind) in table.kinds() {
        let column = df.column(name)?;
        let missing = column.null_count();
        if missing == 0 {
            continue;
        }
        if missing == column.len() && matches!(kind, ColumnKind::Numeric | ColumnKind::Boolean) {
            tracing::warn!("Column '{name}' has no values to impute from, leaving it missing");
            continue;
        }

        let fill = match kind {
            ColumnKind::Numeric => median_fill(name),
            ColumnKind::Datetime => temporal_fill(name, column.dtype())?,
            ColumnKind::Boolean => mode_fill(name),
            ColumnKind::Text => {
                if column.dtype() != &DataType::String {
                    let text = as_text(column.as_materialized_series());
                    df.replace(name, text)?;
                }
                mode_fill(name).fill_null(lit(""))
            }
        };
        tracing::debug!("Imputing {missing} missing values in {kind} column '{name}'");
        fills.push(fill);
    }

    if fills.is_empty() {
        return Ok(table.with_df(df));
    }
    let df = df.lazy().with_columns(fills).collect()?;
    Ok(table.with_df(df))
}

/// Turns float `NaN` into a real missing value so every later stage sees
/// one kind of gap.
fn nan_as_missing(table: &Table) -> Result<DataFrame> {
    let floats: Vec<Expr> = table
        .df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_float())
        .map(|c| col(c.name().clone()).fill_nan(lit(NULL)))
        .collect();
    if floats.is_empty() {
        return Ok(table.df.clone());
    }
    Ok(table.df.clone().lazy().with_columns(floats).collect()?)
}

fn median_fill(name: &str) -> Expr {
    let values = col(name).cast(DataType::Float64);
    values.clone().fill_null(values.median())
}

/// Most frequent non-missing value; sorting the modes makes the smallest win ties.
fn mode_fill(name: &str) -> Expr {
    let mode = col(name)
        .drop_nulls()
        .mode()
        .sort(SortOptions::default())
        .first();
    col(name).fill_null(mode)
}

/// Fills on the physical representation and casts back, so the column keeps
/// its exact temporal dtype (unit and time zone included).
fn temporal_fill(name: &str, dtype: &DataType) -> Result<Expr> {
    let now = match dtype {
        DataType::Date => lit(days_since_epoch(Local::now().date_naive())),
        DataType::Datetime(unit, tz) => lit(now_in_unit(*unit, tz.is_some())),
        other => {
            return Err(CleanerError::CleaningFailure(format!(
                "column '{name}' is classified as datetime but has dtype {other}"
            )));
        }
    };
    Ok(col(name).fill_null(now.cast(dtype.clone())))
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    i32::try_from((date - epoch).num_days()).unwrap_or(i32::MAX)
}

/// Current time as a physical timestamp. Naive columns get the local wall
/// clock; zoned columns store UTC instants.
fn now_in_unit(unit: TimeUnit, zoned: bool) -> i64 {
    let now = if zoned {
        Utc::now().naive_utc()
    } else {
        Local::now().naive_local()
    }
    .and_utc();

    match unit {
        TimeUnit::Milliseconds => now.timestamp_millis(),
        TimeUnit::Microseconds => now.timestamp_micros(),
        TimeUnit::Nanoseconds => now.timestamp_nanos_opt().unwrap_or(i64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_ties_go_to_smallest() -> anyhow::Result<()> {
        let df = df!(
            "grade" => &[Some("b"), Some("a"), None, Some("b"), Some("a"), Some("c")],
            "n" => &[Some(3i64), Some(1), Some(1), None, Some(3), Some(2)]
        )?;
        let table = impute_missing(Table::new(df))?;

        let grade = table.df.column("grade")?.as_materialized_series().clone();
        assert_eq!(grade.str()?.get(2), Some("a"));
        Ok(())
    }

    #[test]
    fn test_mode_ignores_missing_majority() -> anyhow::Result<()> {
        let df = df!("city" => &[None, None, None, Some("York")])?;
        let table = impute_missing(Table::new(df))?;

        let city = table.df.column("city")?.as_materialized_series().clone();
        assert_eq!(city.str()?.get(0), Some("York"));
        Ok(())
    }

    #[test]
    fn test_nan_counts_as_missing() -> anyhow::Result<()> {
        let df = df!("amount" => &[1.0, 2.0, f64::NAN, 3.0])?;
        let table = impute_missing(Table::new(df))?;

        let amount = table.df.column("amount")?.as_materialized_series().clone();
        let values: Vec<Option<f64>> = amount.f64()?.into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
        Ok(())
    }

    #[test]
    fn test_nested_text_column_is_rendered_then_filled() -> anyhow::Result<()> {
        let tags = Series::new(
            "tags".into(),
            [
                Some(Series::new("".into(), ["a", "b"])),
                None,
                Some(Series::new("".into(), ["a", "b"])),
            ],
        );
        let df = DataFrame::new(vec![Column::from(tags)])?;
        let table = impute_missing(Table::new(df))?;

        let tags = table.df.column("tags")?.as_materialized_series().clone();
        assert_eq!(tags.dtype(), &DataType::String);
        assert_eq!(tags.null_count(), 0);
        assert_eq!(tags.str()?.get(1), tags.str()?.get(0));
        Ok(())
    }

    #[test]
    fn test_numeric_median_fill() -> anyhow::Result<()> {
        let df = df!("vals" => &[Some(10.0), None, Some(30.0), Some(20.0), None])?;
        let table = impute_missing(Table::new(df))?;

        let vals = table.df.column("vals")?.as_materialized_series().clone();
        let vals: Vec<Option<f64>> = vals.f64()?.into_iter().collect();
        assert_eq!(
            vals,
            vec![Some(10.0), Some(20.0), Some(30.0), Some(20.0), Some(20.0)]
        );
        Ok(())
    }

    #[test]
    fn test_integer_column_without_gaps_keeps_dtype() -> anyhow::Result<()> {
        let df = df!("id" => &[1i64, 2, 3])?;
        let table = impute_missing(Table::new(df))?;
        assert_eq!(table.df.column("id")?.dtype(), &DataType::Int64);
        Ok(())
    }

    #[test]
    fn test_all_missing_numeric_left_missing() -> anyhow::Result<()> {
        let df = df!("empty" => &[None::<f64>, None, None])?;
        let table = impute_missing(Table::new(df))?;
        assert_eq!(table.df.column("empty")?.null_count(), 3);
        Ok(())
    }

    #[test]
    fn test_text_mode_fill() -> anyhow::Result<()> {
        let df = df!(
            "city" => &[Some("Leeds"), None, Some("York"), Some("Leeds")],
            "blank" => &[None::<&str>, None, None, None]
        )?;
        let table = impute_missing(Table::new(df))?;

        let city = table.df.column("city")?.as_materialized_series().clone();
        assert_eq!(city.str()?.get(1), Some("Leeds"));

        let blank = table.df.column("blank")?.as_materialized_series().clone();
        assert_eq!(blank.null_count(), 0);
        assert_eq!(blank.str()?.get(0), Some(""));
        Ok(())
    }

    #[test]
    fn test_boolean_mode_fill() -> anyhow::Result<()> {
        let df = df!("flag" => &[Some(true), None, Some(true), Some(false)])?;
        let table = impute_missing(Table::new(df))?;

        let flag = table.df.column("flag")?.as_materialized_series().clone();
        assert_eq!(flag.bool()?.get(1), Some(true));
        Ok(())
    }

    #[test]
    fn test_date_fill_uses_today() -> anyhow::Result<()> {
        let d = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap_or_default();
        let df = df!("when" => &[Some(d), None])?;
        let table = impute_missing(Table::new(df))?;

        let when = table.df.column("when")?.as_materialized_series().clone();
        assert_eq!(when.dtype(), &DataType::Date);
        let dates: Vec<Option<NaiveDate>> = when.date()?.as_date_iter().collect();
        assert_eq!(dates.first().copied().flatten(), Some(d));
        let filled = dates.get(1).copied().flatten();
        assert!(filled.is_some());
        assert!(filled >= Some(d));
        Ok(())
    }

    #[test]
    fn test_datetime_fill_keeps_unit() -> anyhow::Result<()> {
        let ts = Series::new("stamp".into(), &[Some(1_672_531_200_000i64), None])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let df = DataFrame::new(vec![Column::from(ts)])?;
        let table = impute_missing(Table::new(df))?;

        let stamp = table.df.column("stamp")?;
        assert_eq!(
            stamp.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(stamp.null_count(), 0);
        Ok(())
    }
}

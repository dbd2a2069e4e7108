use super::types::{OutlierPolicy, Table};
use crate::error::{CleanerError, Result};
use polars::prelude::*;

/// Default fence distance, in inter-quartile ranges, from Q1 and Q3.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// IQR-derived fences for one numeric column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Computes Q1/Q3 (linear interpolation) and the fences `Q1 - k·IQR`,
/// `Q3 + k·IQR`. Returns `None` when the column holds no values.
pub fn iqr_bounds(values: &Float64Chunked, multiplier: f64) -> Result<Option<OutlierBounds>> {
    let q1 = values.quantile(0.25, QuantileMethod::Linear)?;
    let q3 = values.quantile(0.75, QuantileMethod::Linear)?;

    Ok(q1.zip(q3).map(|(q1, q3)| {
        let iqr = q3 - q1;
        OutlierBounds {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }))
}

/// Handles out-of-range values in one numeric column.
///
/// Bounds come from the column as it stands now, so with
/// [`OutlierPolicy::Remove`] rows dropped for an earlier column shrink the
/// population a later column is measured on. Missing values are never
/// treated as outliers. A column left unchanged keeps its original dtype.
pub fn handle_outliers(
    table: Table,
    column: &str,
    policy: OutlierPolicy,
    multiplier: f64,
) -> Result<Table> {
    let series = table.df.column(column)?.as_materialized_series().clone();
    if !series.dtype().is_primitive_numeric() {
        return Err(CleanerError::CleaningFailure(format!(
            "outlier handling needs a numeric column, '{column}' is {}",
            series.dtype()
        )));
    }
    let values = series.cast(&DataType::Float64)?;
    let ca = values.f64()?;

    let Some(bounds) = iqr_bounds(ca, multiplier)? else {
        tracing::debug!("Column '{column}' has no values, skipping outlier handling");
        return Ok(table);
    };
    if !(bounds.lower.is_finite() && bounds.upper.is_finite()) {
        tracing::warn!(
            "Column '{column}': fences [{}, {}] are not finite, skipping outlier handling",
            bounds.lower,
            bounds.upper
        );
        return Ok(table);
    }
    let outliers = ca
        .into_iter()
        .flatten()
        .filter(|v| !bounds.contains(*v))
        .count();
    if outliers == 0 {
        return Ok(table);
    }

    tracing::info!(
        "Column '{column}': {outliers} values outside [{:.4}, {:.4}], applying {policy}",
        bounds.lower,
        bounds.upper
    );

    let value = col(column).cast(DataType::Float64);
    let (lower, upper) = (lit(bounds.lower), lit(bounds.upper));
    let lf = table.df.clone().lazy();
    let lf = match policy {
        OutlierPolicy::Clip => lf.with_column(value.clip(lower, upper).alias(column)),
        OutlierPolicy::Remove => lf.filter(
            value
                .clone()
                .is_null()
                .or(value.clone().gt_eq(lower).and(value.lt_eq(upper))),
        ),
        OutlierPolicy::Median => {
            let out_of_range = value.clone().lt(lower).or(value.clone().gt(upper));
            lf.with_column(
                when(out_of_range)
                    .then(value.clone().median())
                    .otherwise(value)
                    .alias(column),
            )
        }
    };

    Ok(table.with_df(lf.collect()?))
}

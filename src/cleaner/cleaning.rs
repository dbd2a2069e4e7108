use super::dates::standardize_dates;
use super::dedup::drop_duplicates;
use super::impute::impute_missing;
use super::outliers::handle_outliers;
use super::text::normalize_text_columns;
use super::types::{ColumnKind, Table};
use crate::config::CleaningConfig;
use crate::error::{CleanerError, Result};

/// Runs the fixed cleaning sequence: text normalization, deduplication,
/// imputation, outlier handling, date standardization.
///
/// # Errors
///
/// Any stage failure is logged and returned as
/// [`CleanerError::CleaningFailure`]; no partially cleaned table is handed back.
pub fn clean_data(table: Table, config: &CleaningConfig) -> Result<Table> {
    let original_rows = table.height();
    tracing::info!("Original dataset contains {original_rows} rows");

    let result = run_stages(table, config);

    match result {
        Ok(cleaned) => {
            let cleaned_rows = cleaned.height();
            tracing::info!(
                "Removed {} problematic rows",
                original_rows.saturating_sub(cleaned_rows)
            );
            tracing::info!("Final dataset contains {cleaned_rows} clean rows");
            Ok(cleaned)
        }
        Err(err) => {
            tracing::error!("Cleaning failed: {err}");
            Err(match err {
                CleanerError::CleaningFailure(msg) => CleanerError::CleaningFailure(msg),
                other => CleanerError::CleaningFailure(other.to_string()),
            })
        }
    }
}

fn run_stages(table: Table, config: &CleaningConfig) -> Result<Table> {
    let mut table = normalize_text_columns(table)?;

    let before = table.height();
    table = drop_duplicates(table)?;
    tracing::debug!("Dropped {} duplicate rows", before - table.height());

    table = impute_missing(table)?;

    for column in table.columns_of_kind(ColumnKind::Numeric) {
        table = handle_outliers(
            table,
            &column,
            config.outlier_policy,
            config.iqr_multiplier,
        )?;
    }

    for column in date_columns(&table, &config.date_column_marker) {
        table = standardize_dates(table, &column)?;
    }

    Ok(table)
}

/// Columns whose name contains `marker`, ignoring case.
pub fn date_columns(table: &Table, marker: &str) -> Vec<String> {
    let marker = marker.to_lowercase();
    table
        .kinds()
        .iter()
        .map(|(name, _)| name)
        .filter(|name| name.to_lowercase().contains(&marker))
        .cloned()
        .collect()
}

use super::types::Table;
use crate::error::Result;
use polars::prelude::*;

/// Drops rows that repeat an earlier row across every column.
///
/// The first occurrence wins and surviving rows keep their relative order.
/// Missing values compare equal to each other.
pub fn drop_duplicates(table: Table) -> Result<Table> {
    let df = table
        .df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(table.with_df(df))
}

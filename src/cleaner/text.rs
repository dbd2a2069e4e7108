//! Text normalization for text-classified columns.

use super::types::{ColumnKind, Table};
use crate::error::Result;
use polars::prelude::*;
use unicode_normalization::UnicodeNormalization as _;

/// Normalizes a single value: NFKC, whitespace runs collapsed to one space,
/// leading and trailing whitespace removed. Missing input yields `""`.
pub fn clean_text(value: Option<&str>) -> String {
    let Some(text) = value else {
        return String::new();
    };
    let composed: String = text.nfkc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Applies [`clean_text`] to every text column. Values that end up empty are
/// turned back into missing so the imputer sees them.
pub fn normalize_text_columns(table: Table) -> Result<Table> {
    let mut df = table.df.clone();

    for name in table.columns_of_kind(ColumnKind::Text) {
        let text = as_text(df.column(&name)?.as_materialized_series());
        let cleaned: StringChunked = text
            .str()?
            .into_iter()
            .map(|v| {
                let cleaned = clean_text(v);
                (!cleaned.is_empty()).then_some(cleaned)
            })
            .collect();

        df.replace(&name, cleaned.with_name(name.as_str().into()).into_series())?;
    }

    Ok(table.with_df(df))
}

/// String view of any column. Nested values (lists, structs) cannot be cast
/// and are rendered one by one instead.
pub(crate) fn as_text(series: &Series) -> Series {
    match series.cast(&DataType::String) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("Rendering '{}' value by value: {err}", series.name());
            let rendered: StringChunked = series
                .rechunk()
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            rendered.with_name(series.name().clone()).into_series()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_nfkc_and_whitespace() {
        assert_eq!(clean_text(Some("  He\u{301}llo   world\u{a0}")), "Héllo world");
        assert_eq!(clean_text(Some("\tline1\r\nline2 ")), "line1 line2");
        // Compatibility forms fold to their plain equivalents
        assert_eq!(clean_text(Some("ｆｕｌｌ")), "full");
        assert_eq!(clean_text(Some("ﬁle")), "file");
    }

    #[test]
    fn test_clean_text_missing_and_blank() {
        assert_eq!(clean_text(None), "");
        assert_eq!(clean_text(Some("   \u{3000} ")), "");
    }

    #[test]
    fn test_normalize_columns_marks_blank_as_missing() -> anyhow::Result<()> {
        let df = df!(
            "name" => &[Some("  Alice  "), Some("   "), None, Some("Bob\t\tSmith")],
            "score" => &[1.0, 2.0, 3.0, 4.0]
        )?;
        let table = normalize_text_columns(Table::new(df))?;

        let names = table.df.column("name")?.as_materialized_series().clone();
        let names = names.str()?;
        assert_eq!(names.get(0), Some("Alice"));
        assert_eq!(names.get(1), None);
        assert_eq!(names.get(2), None);
        assert_eq!(names.get(3), Some("Bob Smith"));

        // Numeric columns are left alone
        let score = table.df.column("score")?;
        assert_eq!(score.dtype(), &DataType::Float64);
        Ok(())
    }

    #[test]
    fn test_nested_values_become_text() -> anyhow::Result<()> {
        let tags = Series::new(
            "tags".into(),
            [Some(Series::new("".into(), ["a", "b"])), None],
        );
        let df = DataFrame::new(vec![Column::from(tags)])?;
        let table = normalize_text_columns(Table::new(df))?;

        let tags = table.df.column("tags")?.as_materialized_series().clone();
        assert_eq!(tags.dtype(), &DataType::String);
        let first = tags.str()?.get(0).unwrap_or_default();
        assert!(first.contains('a') && first.contains('b'), "got {first}");
        assert_eq!(tags.str()?.get(1), None);
        Ok(())
    }
}

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column classification that drives which pipeline stage touches a column.
///
/// Computed once from the loaded frame and never re-derived, so a text column
/// that normalization emptied is still imputed as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Datetime,
    Boolean,
    Text,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Datetime => "Datetime",
            Self::Boolean => "Boolean",
            Self::Text => "Text",
        }
    }

    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Date | DataType::Datetime(_, _) => Self::Datetime,
            DataType::Boolean => Self::Boolean,
            dt if dt.is_primitive_numeric() => Self::Numeric,
            _ => Self::Text,
        }
    }
}

/// How the outlier stage treats values outside the IQR fences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierPolicy {
    /// Pull values back onto the nearest fence
    #[default]
    Clip,
    /// Drop rows holding an out-of-range value
    Remove,
    /// Replace out-of-range values with the column median
    Median,
}

impl std::fmt::Display for OutlierPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clip => "clip",
            Self::Remove => "remove",
            Self::Median => "median",
        };
        f.write_str(s)
    }
}

/// The in-memory table: a frame plus the classification taken at load time.
#[derive(Clone, Debug)]
pub struct Table {
    pub df: DataFrame,
    kinds: Vec<(String, ColumnKind)>,
}

impl Table {
    /// Wraps a freshly loaded frame and classifies its columns.
    pub fn new(df: DataFrame) -> Self {
        let kinds = df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), ColumnKind::from_dtype(c.dtype())))
            .collect();
        Self { df, kinds }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// Column names paired with their load-time classification, in column order.
    pub fn kinds(&self) -> &[(String, ColumnKind)] {
        &self.kinds
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.kinds
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }

    /// Names of the columns with the given classification, left to right.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.kinds
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn into_df(self) -> DataFrame {
        self.df
    }

    /// Swaps in a new version of the frame, keeping the classification.
    pub(crate) fn with_df(self, df: DataFrame) -> Self {
        Self {
            df,
            kinds: self.kinds,
        }
    }
}

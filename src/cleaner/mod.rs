pub mod cleaning;
pub mod dates;
pub mod dedup;
pub mod impute;
pub mod io;
pub mod outliers;
pub mod text;
pub mod types;

pub use cleaning::{clean_data, date_columns};
pub use dates::{DateParse, parse_date, standardize_dates};
pub use dedup::drop_duplicates;
pub use impute::impute_missing;
pub use io::{OutputFormat, export_data, load_data};
pub use outliers::{IQR_MULTIPLIER, OutlierBounds, handle_outliers, iqr_bounds};
pub use text::{clean_text, normalize_text_columns};
pub use types::{ColumnKind, OutlierPolicy, Table};

pub mod analysis;
pub mod normalized_row;
pub mod raw_row;
pub mod schema;
pub mod suggestion;

pub use analysis::{AnalysisResult, MAX_ECHOED_ROWS, SampleSize, Series, TimeSeriesResult};
pub use normalized_row::NormalizedRow;
pub use raw_row::{RawRow, RawValue};
pub use schema::{ColumnSchema, ColumnType};
pub use suggestion::{Suggestion, SuggestionKind};

//! Record normalization and series extraction.
//!
//! - encoding-tolerant text matching (`text`)
//! - plain / European number parsing (`number`)
//! - record list discovery inside an unstable envelope (`locate`)
//! - filter + sort + trailing window (`series`)

pub mod locate;
pub mod number;
pub mod series;
pub mod text;

pub use locate::find_records;
pub use number::parse_number;
pub use series::{DEFAULT_LIMIT, extract_last_n};
pub use text::normalize;

/// Record field holding the indicator name.
pub const FIELD_INDICATOR: &str = "Indicador";
/// Record field holding the `YYYY-MM-DD` date.
pub const FIELD_DATE: &str = "Fecha";
/// Record field holding the value.
pub const FIELD_VALUE: &str = "Valor";
/// Optional record field holding the unit/denomination.
pub const FIELD_MEASURE: &str = "Medida";

//! Upstream data sources.
//!
//! - BCE daily indicator feed, the primary source (`bce`)
//! - FRED crude oil series, optional (`fred`)

pub mod bce;
pub mod fred;

pub use bce::{BceClient, DEFAULT_SOURCE_URL, INDICATORS};
pub use fred::{DEFAULT_BASE_URL as DEFAULT_FRED_BASE_URL, DEFAULT_OIL_SERIES, FredClient};

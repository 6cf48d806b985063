//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed values and dated points (`Numeric`, `DatedValue`)
//! - rendered outputs (`Observation`, `ExtractionResult`, `LatestValue`, `Snapshot`)
//! - run configuration (`IndicatorSpec`, `SnapshotConfig`)

pub mod types;

pub use types::*;

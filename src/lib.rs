//! `indicadores` library crate.
//!
//! The binary (`indicadores`) is a thin wrapper around this library so that:
//!
//! - extraction logic is testable without network access or processes
//! - the snapshot pipeline can be driven from a saved feed as well as live

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod extract;
pub mod io;
pub mod report;

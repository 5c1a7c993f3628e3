//! Source loading for the provincial stringency cost panel.
//!
//! This crate reads the wide workbook exports (one row per province, one
//! column per quarter) into Polars DataFrames and loads optional lookup
//! tables.
//!
//! # Example
//!
//! ```ignore
//! use covcost_ingest::{DataSources, SourceSet};
//!
//! let tables = DataSources::new("data").load(SourceSet::All)?;
//! println!("{} provinces", tables.grp.height());
//! ```

mod error;
mod table;
pub mod polars_utils;
mod sources;
mod urbanization;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{read_csv_table, read_wide_table};

// === Sources ===
pub use sources::{
    DEFAULT_CASES_FILE, DEFAULT_GRP_FILE, DEFAULT_STRINGENCY_FILE, DataSources, SourceSet,
    SourceTables,
};

// === Lookups ===
pub use urbanization::load_urbanization_csv;

// === Value Helpers ===
pub use polars_utils::{any_to_f64, any_to_string, format_numeric, parse_f64};

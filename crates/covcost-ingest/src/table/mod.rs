//! Table reading utilities.

mod reader;

pub use reader::{read_csv_table, read_wide_table};

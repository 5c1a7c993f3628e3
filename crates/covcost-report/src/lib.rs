//! Rendering of regression and cost results.
//!
//! Text reports use comfy-table for tabular parts; JSON goes through serde;
//! the trend chart is drawn with plotters into an SVG file.

pub mod error;
pub mod format;
pub mod interpret;
pub mod json;
pub mod plot;
pub mod tables;
pub mod text;

pub use error::{ReportError, Result};
pub use interpret::{MISSING_VARIABLES, interpretation};
pub use json::to_json;
pub use plot::{TREND_TITLE, plot_trends};
pub use tables::Styling;
pub use text::{render_cost, render_duplicates, render_regression, render_time_index};

//! Long-format panel construction.
//!
//! Turns the wide provincial tables into one row per province-quarter,
//! merges the sources, derives the regression variables and computes the
//! counterfactual policy cost.

pub mod cost;
pub mod duplicates;
pub mod error;
pub mod features;
pub mod frame;
pub mod merge;
pub mod reshape;
pub mod trend;

pub use cost::apply_counterfactual;
pub use duplicates::{find_duplicate_observations, trim_quarter_labels};
pub use error::{PanelError, Result};
pub use features::{FeatureOptions, PreparedPanel, build_features, lag_within_groups};
pub use frame::PanelFrame;
pub use merge::{attach_urbanization, merge_panels};
pub use reshape::reshape_to_panel;
pub use trend::{DEFAULT_TREND_PROVINCES, ProvinceSeries, province_series};

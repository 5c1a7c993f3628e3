//! Data model for the provincial stringency cost panel.

pub mod columns;
pub mod cost;
pub mod duplicates;
pub mod error;
pub mod province;
pub mod quarter;
pub mod result;
pub mod spec;

pub use cost::{BetaSource, CostSummary, DEFAULT_STRINGENCY_BETA};
pub use duplicates::{DuplicateEntry, DuplicateReport};
pub use error::{ModelError, Result};
pub use province::{HIGH_URBANIZATION_EXAMPLE, LOW_URBANIZATION_EXAMPLE, UrbanizationTable};
pub use quarter::{QuarterIndex, is_canonical_quarter};
pub use result::{Coefficient, CovarianceKind, RegressionResult, percent_effect};
pub use spec::ModelSpec;

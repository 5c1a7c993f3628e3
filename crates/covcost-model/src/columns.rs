//! Column names shared by every stage of the panel pipeline.
//!
//! The names follow the headers of the source workbook exports so that
//! intermediate frames can be inspected next to the raw CSV files.

/// Government province code (entity identifier).
pub const PROVINCE_CODE: &str = "GbProv";
/// English province name.
pub const PROVINCE_NAME: &str = "ProvEN";
/// Quarter label taken from the wide table headers.
pub const QUARTER: &str = "Quarter";
/// Integer time index derived from the quarter label.
pub const TIME: &str = "Time";

/// Real GRP in billion 2019 RMB.
pub const GRP_REAL: &str = "GRP_real";
/// OxCGRT stringency index.
pub const STRINGENCY: &str = "Stringency_Index";
/// New confirmed cases per million inhabitants.
pub const CASES_PER_MILLION: &str = "Covid_Cases_per_mil";
/// Time-invariant urbanization rate in percent.
pub const URBANIZATION: &str = "Urbanization_Rate";

pub const LOG_GRP: &str = "log_GRP";
pub const CASES: &str = "Covid_Cases";
pub const STRINGENCY_LAG: &str = "Stringency_Index_L1";
pub const CASES_LAG: &str = "Covid_Cases_L1";
pub const STRINGENCY_X_URBAN: &str = "Stringency_x_Urban";
pub const STRINGENCY_LAG_X_URBAN: &str = "Stringency_L1_x_Urban";

pub const GRP_COUNTERFACTUAL: &str = "GRP_counterfactual";
pub const POLICY_COST: &str = "Policy_Cost";

/// Identifier columns carried through reshape and merge.
pub const ID_COLUMNS: [&str; 2] = [PROVINCE_CODE, PROVINCE_NAME];

/// Join keys for combining reshaped panels.
pub const PANEL_KEYS: [&str; 3] = [PROVINCE_CODE, PROVINCE_NAME, QUARTER];

/// Uniqueness key of an observation.
pub const OBSERVATION_KEYS: [&str; 2] = [PROVINCE_CODE, QUARTER];

/// Returns true when a wide-table header names a quarter column.
///
/// Selection is purely syntactic: the header must start with `20` and
/// contain a `Q` somewhere.
pub fn is_quarter_column(header: &str) -> bool {
    header.starts_with("20") && header.contains('Q')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_columns_are_matched_by_syntax() {
        assert!(is_quarter_column("2020Q1"));
        assert!(is_quarter_column("2022Q4 "));
        assert!(is_quarter_column("20-Q"));
        assert!(!is_quarter_column(" 2020Q1"));
        assert!(!is_quarter_column("2020-03"));
        assert!(!is_quarter_column("Q1 2020"));
        assert!(!is_quarter_column(PROVINCE_CODE));
    }
}

//! Console reports.

use covcost_model::{CostSummary, DuplicateReport, QuarterIndex, RegressionResult, UrbanizationTable};

use crate::format::{REPORT_WIDTH, heavy_rule, light_rule, with_thousands};
use crate::interpret::interpretation;
use crate::tables::{Styling, coefficient_table, duplicate_table, time_index_table};

/// Quarters shown at each end of the time index listing.
const TIME_INDEX_PREVIEW: usize = 5;

pub const DUPLICATE_WARNING: &str =
    "!!! WARNING: Found duplicate entries for the same province and quarter !!!";
pub const NO_DUPLICATES: &str =
    "--- No duplicate province-quarter entries found. Proceeding. ---";

pub fn render_duplicates(report: &DuplicateReport, styling: Styling) -> String {
    if report.is_empty() {
        return format!("{NO_DUPLICATES}\n");
    }
    format!(
        "{DUPLICATE_WARNING}\n{}\n{} rows share {} province-quarter keys\n",
        duplicate_table(report, styling),
        report.len(),
        report.key_count()
    )
}

/// First and last quarters of the label to `Time` mapping.
pub fn render_time_index(quarters: &QuarterIndex, styling: Styling) -> String {
    let pairs: Vec<(&str, usize)> = quarters
        .labels()
        .iter()
        .enumerate()
        .map(|(code, label)| (label.as_str(), code))
        .collect();

    let mut lines = vec!["--- Converted 'Quarter' to numeric 'Time' column ---".to_string()];
    if pairs.len() <= 2 * TIME_INDEX_PREVIEW {
        lines.push(time_index_table(pairs, styling).to_string());
    } else {
        let head = pairs[..TIME_INDEX_PREVIEW].iter().copied();
        let tail = pairs[pairs.len() - TIME_INDEX_PREVIEW..].iter().copied();
        lines.push(time_index_table(head, styling).to_string());
        lines.push("...".to_string());
        lines.push(time_index_table(tail, styling).to_string());
    }
    lines.push("-".repeat(49));
    finish(lines)
}

/// Banner, sample description, coefficient table, fit statistics and the
/// interpretation of one fitted model.
pub fn render_regression(
    result: &RegressionResult,
    urbanization: &UrbanizationTable,
    styling: Styling,
) -> String {
    let mut lines = vec![
        String::new(),
        heavy_rule(),
        format!("{:^width$}", result.model.title(), width = REPORT_WIDTH)
            .trim_end()
            .to_string(),
        heavy_rule(),
        "Dependent Variable: log(GRP)".to_string(),
        format!("Number of Provinces: {}", result.n_entities),
        format!("Total Observations: {}", result.n_obs),
        light_rule(),
        coefficient_table(&result.coefficients, styling).to_string(),
        format!(
            "Time periods: {}   Residual df: {}   R-squared (two-way demeaned): {:.4}",
            result.n_periods, result.df_resid, result.r_squared
        ),
        format!("Covariance: {}", result.covariance.as_str()),
        heavy_rule(),
    ];

    let interpretation = interpretation(result, urbanization);
    if !interpretation.is_empty() {
        lines.push(String::new());
        lines.extend(interpretation);
    }
    finish(lines)
}

pub fn render_cost(summary: &CostSummary) -> String {
    finish(vec![
        heavy_rule(),
        "   Estimated Total Economic Cost of Zero-COVID Policies (2020-2022)".to_string(),
        heavy_rule(),
        format!("Based on the estimated coefficient (β1) of: {}", summary.beta),
        format!(
            "Total calculated policy-attributable GRP loss (Billion 2019 RMB): {}",
            with_thousands(summary.total_billion, 2)
        ),
        format!(
            "Total calculated policy-attributable GRP loss (Trillion 2019 RMB): {}",
            with_thousands(summary.total_trillion(), 2)
        ),
        heavy_rule(),
    ])
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

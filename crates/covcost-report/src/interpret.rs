//! Plain-language reading of the key coefficients.

use covcost_model::columns::{STRINGENCY, STRINGENCY_LAG, STRINGENCY_X_URBAN};
use covcost_model::{
    HIGH_URBANIZATION_EXAMPLE, LOW_URBANIZATION_EXAMPLE, ModelSpec, RegressionResult,
    UrbanizationTable, percent_effect,
};

/// Interaction p-values below this are read as significant.
pub const INTERACTION_SIGNIFICANCE: f64 = 0.1;

pub const MISSING_VARIABLES: &str = "Could not find expected variables in the model results.";

/// Interpretation lines for `result`; empty for models printed as a table only.
pub fn interpretation(result: &RegressionResult, urbanization: &UrbanizationTable) -> Vec<String> {
    match result.model {
        ModelSpec::Baseline => baseline(result),
        ModelSpec::Lagged => lagged(result),
        ModelSpec::Interaction => interaction(result, urbanization),
        ModelSpec::Combined => Vec::new(),
    }
}

fn baseline(result: &RegressionResult) -> Vec<String> {
    let mut lines = vec!["Interpretation of the Key Coefficient (Stringency_Index):".to_string()];
    match result.param(STRINGENCY) {
        Some(beta) => lines.push(format!(
            "A one-unit increase in the Stringency Index is associated with a {:.4}% change \
             in quarterly GRP, holding COVID cases and fixed effects constant.",
            percent_effect(beta)
        )),
        None => lines.push(MISSING_VARIABLES.to_string()),
    }
    lines
}

fn lagged(result: &RegressionResult) -> Vec<String> {
    let mut lines = vec!["Interpretation:".to_string()];
    let (Some(current), Some(previous)) = (
        result.coefficient(STRINGENCY),
        result.coefficient(STRINGENCY_LAG),
    ) else {
        lines.push(MISSING_VARIABLES.to_string());
        return lines;
    };
    lines.extend([
        String::new(),
        "Contemporaneous Effect (t):".to_string(),
        format!(
            "The coefficient for Stringency_Index in the current quarter is {:.5} (p-value: {:.4}).",
            current.estimate, current.p_value
        ),
        String::new(),
        "Lagged Effect (t-1):".to_string(),
        format!(
            "The coefficient for Stringency_Index in the previous quarter is {:.5} (p-value: {:.4}).",
            previous.estimate, previous.p_value
        ),
    ]);
    lines
}

fn interaction(result: &RegressionResult, urbanization: &UrbanizationTable) -> Vec<String> {
    let mut lines = vec!["Interpretation of Key Coefficients:".to_string()];
    let (Some(base), Some(inter)) = (
        result.coefficient(STRINGENCY),
        result.coefficient(STRINGENCY_X_URBAN),
    ) else {
        lines.push(MISSING_VARIABLES.to_string());
        return lines;
    };
    lines.extend([
        String::new(),
        format!(
            "Baseline Effect (Stringency_Index): {:.6} (p-value: {:.4})",
            base.estimate, base.p_value
        ),
        format!(
            "Interaction Effect (Stringency_x_Urban): {:.6} (p-value: {:.4})",
            inter.estimate, inter.p_value
        ),
        String::new(),
    ]);

    if inter.p_value >= INTERACTION_SIGNIFICANCE {
        lines.push("The interaction term is not statistically significant at conventional levels.".to_string());
        return lines;
    }

    lines.push("The interaction term is statistically significant, supporting the hypothesis.".to_string());
    lines.push(String::new());
    lines.push("Example Total Effect for a 1-unit Stringency increase:".to_string());
    for province in [LOW_URBANIZATION_EXAMPLE, HIGH_URBANIZATION_EXAMPLE] {
        let Some(rate) = example_rate(urbanization, province) else {
            continue;
        };
        let effect = percent_effect(base.estimate + inter.estimate * rate);
        lines.push(format!(
            " -> In a province like {province} ({rate}% urbanization): {effect:.4}% change in GRP."
        ));
    }
    lines
}

/// Rate of an example province, falling back to the built-in table when a
/// custom table leaves it out.
fn example_rate(urbanization: &UrbanizationTable, province: &str) -> Option<f64> {
    urbanization
        .rate(province)
        .or_else(|| UrbanizationTable::default().rate(province))
}

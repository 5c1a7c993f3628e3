//! Wide to long reshaping of provincial tables.

use polars::prelude::{Column, DataFrame};
use tracing::{debug, warn};

use covcost_model::columns::{ID_COLUMNS, PROVINCE_CODE, PROVINCE_NAME, QUARTER, is_quarter_column};

use crate::error::Result;
use crate::frame::{f64_values, require_columns, string_values};

const STAGE: &str = "wide";

/// Melts a wide provincial table into `GbProv, ProvEN, Quarter, <value_name>`.
///
/// Quarter columns are the headers starting with `20` and containing `Q`;
/// every other non-identifier column is dropped. Rows come out quarter-major:
/// all provinces for the first quarter column, then the next. Quarter labels
/// are kept verbatim, surrounding whitespace included.
pub fn reshape_to_panel(wide: &DataFrame, value_name: &str) -> Result<DataFrame> {
    require_columns(wide, &ID_COLUMNS, STAGE)?;

    let quarter_columns: Vec<String> = wide
        .get_column_names()
        .into_iter()
        .filter(|name| is_quarter_column(name.as_str()))
        .map(ToString::to_string)
        .collect();
    if quarter_columns.is_empty() {
        warn!(value = value_name, "no quarter columns found, panel is empty");
    }

    let codes = string_values(wide, PROVINCE_CODE, STAGE)?;
    let names = string_values(wide, PROVINCE_NAME, STAGE)?;
    let total = wide.height() * quarter_columns.len();
    let mut code_out = Vec::with_capacity(total);
    let mut name_out = Vec::with_capacity(total);
    let mut quarter_out = Vec::with_capacity(total);
    let mut value_out: Vec<Option<f64>> = Vec::with_capacity(total);

    for quarter in &quarter_columns {
        let values = f64_values(wide, quarter, STAGE)?;
        for (idx, value) in values.into_iter().enumerate() {
            code_out.push(codes[idx].clone());
            name_out.push(names[idx].clone());
            quarter_out.push(quarter.clone());
            value_out.push(value);
        }
    }

    debug!(
        value = value_name,
        provinces = wide.height(),
        quarters = quarter_columns.len(),
        rows = total,
        "reshaped wide table"
    );

    let df = DataFrame::new(vec![
        Column::new(PROVINCE_CODE.into(), code_out),
        Column::new(PROVINCE_NAME.into(), name_out),
        Column::new(QUARTER.into(), quarter_out),
        Column::new(value_name.into(), value_out),
    ])?;
    Ok(df)
}

//! comfy-table builders shared by the text reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use covcost_model::columns::{PROVINCE_CODE, PROVINCE_NAME, QUARTER, TIME};
use covcost_model::{Coefficient, DuplicateReport};

use crate::format::fixed;

/// Whether tables carry ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Styling {
    /// Style only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Decimal places of coefficient table entries.
const COEFFICIENT_DECIMALS: usize = 4;

pub fn apply_table_style(table: &mut Table, styling: Styling) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    match styling {
        Styling::Auto => {}
        Styling::Always => {
            table.enforce_styling();
        }
        Styling::Never => {
            table.force_no_tty();
        }
    }
}

/// Parameter estimates with standard errors and confidence bounds.
pub fn coefficient_table(coefficients: &[Coefficient], styling: Styling) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Parameter"),
        header_cell("Estimate"),
        header_cell("Std. Err."),
        header_cell("T-stat"),
        header_cell("P-value"),
        header_cell("Lower CI"),
        header_cell("Upper CI"),
    ]);
    apply_table_style(&mut table, styling);
    for index in 1..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for coef in coefficients {
        table.add_row(vec![
            Cell::new(&coef.name).add_attribute(Attribute::Bold),
            Cell::new(fixed(coef.estimate, COEFFICIENT_DECIMALS)),
            Cell::new(fixed(coef.std_error, COEFFICIENT_DECIMALS)),
            Cell::new(fixed(coef.t_stat, COEFFICIENT_DECIMALS)),
            p_value_cell(coef.p_value),
            Cell::new(fixed(coef.ci_lower, COEFFICIENT_DECIMALS)),
            Cell::new(fixed(coef.ci_upper, COEFFICIENT_DECIMALS)),
        ]);
    }
    table
}

/// Every row that shares a province-quarter key with another row.
pub fn duplicate_table(report: &DuplicateReport, styling: Styling) -> Table {
    let value_columns: Vec<&str> = report
        .entries
        .first()
        .map(|entry| entry.values.iter().map(|(name, _)| name.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec![
        header_cell("Row"),
        header_cell(PROVINCE_CODE),
        header_cell(PROVINCE_NAME),
        header_cell(QUARTER),
    ];
    header.extend(value_columns.iter().map(|name| header_cell(name)));

    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table, styling);
    align_column(&mut table, 0, CellAlignment::Right);

    for entry in &report.entries {
        let mut row = vec![
            Cell::new(entry.row).fg(Color::DarkGrey),
            Cell::new(&entry.province_code),
            Cell::new(&entry.province_name),
            Cell::new(&entry.quarter).fg(Color::Yellow),
        ];
        row.extend(value_columns.iter().map(|name| {
            let value = entry
                .values
                .iter()
                .find(|(column, _)| column == name)
                .map_or("-", |(_, value)| value.as_str());
            Cell::new(value)
        }));
        table.add_row(row);
    }
    table
}

/// Quarter label to time code pairs.
pub fn time_index_table<'a>(
    pairs: impl IntoIterator<Item = (&'a str, usize)>,
    styling: Styling,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(QUARTER), header_cell(TIME)]);
    apply_table_style(&mut table, styling);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, code) in pairs {
        table.add_row(vec![Cell::new(label), Cell::new(code)]);
    }
    table
}

fn p_value_cell(p_value: f64) -> Cell {
    let cell = Cell::new(fixed(p_value, COEFFICIENT_DECIMALS));
    if p_value < 0.05 {
        cell.fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

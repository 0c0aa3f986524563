use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use invar_cli::trace::{Origin, TraceReport, VariableReport};
use invar_core::ColumnSummary;

pub fn print_report(report: &TraceReport) {
    let summary = &report.summary;
    println!("Program point: {}", summary.name);
    println!("Records: {}", summary.records);
    println!("Declarations: {}", report.decls.display());
    println!("Traces: {}", report.dtrace.display());

    let mut columns = Table::new();
    columns.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Tags"),
        header_cell("Present"),
        header_cell("Missing"),
    ]);
    apply_summary_table_style(&mut columns);
    align_column(&mut columns, 3, CellAlignment::Right);
    align_column(&mut columns, 4, CellAlignment::Right);
    for column in &summary.columns {
        columns.add_row(column_row(column));
    }
    println!();
    println!("{columns}");

    let mut variables = Table::new();
    variables.set_header(vec![
        header_cell("Variable"),
        header_cell("Origin"),
        header_cell("Dec type"),
        header_cell("Rep type"),
        header_cell("Constant"),
    ]);
    apply_summary_table_style(&mut variables);
    for variable in &report.variables {
        variables.add_row(variable_row(variable));
    }
    variables.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} declared, {} latent",
            summary.declared, summary.latent
        ))
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(format!("{} constants", summary.constants)).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("{variables}");
}

pub fn print_json(report: &TraceReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    println!("{json}");
    Ok(())
}

fn column_row(column: &ColumnSummary) -> Vec<Cell> {
    let tags = if column.tags.is_empty() {
        dim_cell("-")
    } else {
        let names: Vec<&str> = column.tags.iter().map(|tag| tag.as_str()).collect();
        Cell::new(names.join(", "))
    };
    vec![
        Cell::new(&column.column)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(column.rep_type.as_str()),
        tags,
        Cell::new(column.present),
        count_cell(column.missing),
    ]
}

fn variable_row(variable: &VariableReport) -> Vec<Cell> {
    let name = match variable.origin {
        Origin::Declared => Cell::new(&variable.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Origin::Latent => Cell::new(format!("  -> {}", variable.name)).fg(Color::DarkGrey),
    };
    let constant = match &variable.constant {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    };
    vec![
        name,
        Cell::new(variable.origin.as_str()),
        Cell::new(&variable.dec_type),
        Cell::new(variable.rep_type.rep_name()),
        constant,
    ]
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use pdm_model::{Entity, Field};

use crate::types::{EntitySummary, GenerateResult};

pub fn print_summary(result: &GenerateResult) {
    println!("PDM file: {}", result.pdm_file.display());
    if result.package.is_empty() {
        println!("Package: (default)");
    } else {
        println!("Package: {}", result.package);
    }
    println!("Template: {}", result.template);
    if let Some(path) = &result.schema_json {
        println!("Schema JSON: {}", path.display());
    }
    if result.dry_run {
        println!("Dry run: no files written");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Table"),
        header_cell("Fields"),
        header_cell("Primary key"),
        header_cell("Imports"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_fields = 0usize;
    for summary in &result.entities {
        total_fields += summary.fields;
        table.add_row(vec![
            entity_cell(&summary.entity_name),
            Cell::new(&summary.table_name),
            Cell::new(summary.fields),
            optional_cell(summary.primary_key.as_deref()),
            count_cell(summary.imports),
            output_cell(summary, result.dry_run),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} tables", result.entities.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_fields).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

/// One table per entity: its columns and their mapped Java types.
pub fn print_entity_fields(entity: &Entity) {
    print!("{} ({})", entity.name, entity.table_name);
    if let Some(comment) = entity.comment.as_deref() {
        print!(" - {comment}");
    }
    println!();

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Column type"),
        header_cell("Java type"),
        header_cell("Length"),
        header_cell("Required"),
        header_cell("Comment"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for field in &entity.fields {
        table.add_row(vec![
            field_cell(field),
            Cell::new(&field.col_name),
            Cell::new(&field.col_type),
            Cell::new(field.type_name()),
            match field.col_length {
                Some(length) => Cell::new(length),
                None => dim_cell("-"),
            },
            flag_cell(field.mandatory),
            optional_cell(field.comment.as_deref()),
        ]);
    }
    println!("{table}");
}

fn output_cell(summary: &EntitySummary, dry_run: bool) -> Cell {
    match &summary.output {
        Some(path) if dry_run => dim_cell(path.display()),
        Some(path) => Cell::new(file_name(path)).fg(Color::Green),
        None => dim_cell("-"),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        })
}

fn entity_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn field_cell(field: &Field) -> Cell {
    if field.is_primary_key {
        Cell::new(format!("{} (PK)", field.name))
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(&field.name)
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
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
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

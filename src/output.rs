use crate::types::AggregateTable;
use crate::util::format_number;
use serde::Serialize;
use std::error::Error;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Export one aggregate table as a two-column CSV, headed by the table's
/// key/value field names so the file matches the renderer bindings.
pub fn write_csv(path: &str, table: &AggregateTable) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([table.key_field, table.value_field])?;
    for row in &table.rows {
        wtr.write_record([row.key.to_string(), row.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print one table as a markdown preview: title, chart binding line, then up
/// to `max_rows` rows. An empty table renders as `(no rows)` — the yearly
/// report legitimately produces those for a year with no observations.
pub fn preview_table(table: &AggregateTable, max_rows: usize) {
    println!("{}", table.title);
    println!(
        "({} chart | x: {} | y: {})",
        table.chart, table.key_field, table.value_field
    );
    if table.rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record([table.key_field, table.value_field]);
    for row in table.rows.iter().take(max_rows) {
        builder.push_record([row.key.to_string(), format_number(row.value, 2)]);
    }
    let mut rendered = builder.build();
    rendered.with(Style::markdown());
    println!("{}", rendered);
    if table.rows.len() > max_rows {
        println!("({} more rows)", table.rows.len() - max_rows);
    }
    println!("");
}

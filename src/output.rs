use crate::types::{ProjectExportRow, SummaryStats};
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

/// Write the filtered view's selectable columns as the CSV download.
pub fn export_filtered_csv(path: &str, rows: &[ProjectExportRow]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the scalar metrics as a pretty-printed JSON summary file.
pub fn export_summary_json(path: &str, summary: &SummaryStats) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, serde_json::to_string_pretty(summary)?)?;
    Ok(())
}

/// Print a titled markdown table, truncated to `max_rows` with a count of
/// what was cut.
pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{title}");
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{table_str}");
    if rows.len() > max_rows {
        println!("({} more rows not shown)", rows.len() - max_rows);
    }
    println!();
}

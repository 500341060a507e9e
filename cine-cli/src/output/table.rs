//! Table output formatting using the `tabled` crate
//!
//! Column widths follow the terminal width when stdout is a TTY; piped
//! output is never truncated.

use super::{cell_text, truncate, Column, OutputConfig};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format data as a table with the given columns
    pub fn format_with_columns<T: Serialize>(
        data: &[T],
        columns: &[Column],
        config: &OutputConfig,
    ) -> String {
        if data.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.name.as_str()));

        for item in data {
            let json = serde_json::to_value(item).unwrap_or_default();
            let row: Vec<String> = columns
                .iter()
                .map(|col| {
                    let value = json.get(&col.key).cloned().unwrap_or_default();
                    Self::format_value(&value, col, config)
                })
                .collect();
            builder.push_record(row);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        for (i, value) in Self::numeric_columns(data, columns).into_iter().enumerate() {
            if value {
                table.with(Modify::new(Columns::single(i)).with(Alignment::right()));
            }
        }

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }

    fn format_value(value: &serde_json::Value, col: &Column, config: &OutputConfig) -> String {
        let s = match value.as_f64() {
            Some(f) if !value.is_i64() && !value.is_u64() => format!("{:.4}", f),
            _ => cell_text(value),
        };

        match col.max_width {
            Some(max_width) if config.should_truncate() => truncate(&s, max_width),
            _ => s,
        }
    }

    /// Columns whose first row holds a number, right-aligned.
    fn numeric_columns<T: Serialize>(data: &[T], columns: &[Column]) -> Vec<bool> {
        let first = data
            .first()
            .and_then(|item| serde_json::to_value(item).ok())
            .unwrap_or_default();
        columns
            .iter()
            .map(|col| first.get(&col.key).is_some_and(|v| v.is_number()))
            .collect()
    }
}

//! CSV output formatting for data export.
//!
//! Quoting and escaping are left to the `csv` crate writer.

use super::{cell_text, Column};
use serde::Serialize;

/// CSV output formatter
pub struct CsvOutput;

impl CsvOutput {
    /// Header row followed by one row per item, reading each column's key
    /// from the item's serialized form.
    pub fn format_with_columns<T: Serialize>(data: &[T], columns: &[Column]) -> String {
        let rows = data.iter().map(|item| {
            let json = serde_json::to_value(item).unwrap_or_default();
            columns
                .iter()
                .map(|col| json.get(&col.key).map(cell_text).unwrap_or_default())
                .collect::<Vec<_>>()
        });
        let headers: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        Self::from_rows(&headers, rows)
    }

    /// CSV from pre-rendered rows.
    pub fn from_rows<I, R, S>(headers: &[&str], rows: I) -> String
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        match Self::write(headers, rows) {
            Ok(s) => s.trim_end().to_string(),
            Err(e) => format!("error\n\"{}\"", e.to_string().replace('"', "\"\"")),
        }
    }

    fn write<I, R, S>(headers: &[&str], rows: I) -> anyhow::Result<String>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Role {
        actor: String,
        character: String,
    }

    #[test]
    fn test_format_with_columns() {
        let data = vec![
            Role {
                actor: "Matthew McConaughey".to_string(),
                character: "Cooper".to_string(),
            },
            Role {
                actor: "Anne Hathaway".to_string(),
                character: "Brand".to_string(),
            },
        ];
        let columns = vec![
            Column::new("actor", "actor"),
            Column::new("character", "character"),
        ];

        let output = CsvOutput::format_with_columns(&data, &columns);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "actor,character");
        assert_eq!(lines[1], "Matthew McConaughey,Cooper");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_quotes_fields_with_commas_and_quotes() {
        let output = CsvOutput::from_rows(
            &["title", "summary"],
            vec![vec!["Dune", "A \"gifted\" heir, on Arrakis"]],
        );
        assert_eq!(
            output,
            "title,summary\nDune,\"A \"\"gifted\"\" heir, on Arrakis\""
        );
    }

    #[test]
    fn test_empty_data_keeps_header() {
        let data: Vec<Role> = vec![];
        let columns = vec![Column::new("actor", "actor")];
        assert_eq!(CsvOutput::format_with_columns(&data, &columns), "actor");
    }
}

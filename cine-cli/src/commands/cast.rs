//! Cast command - actors of a movie and the characters they played

use cine_store::{CastMember, GraphStore};
use colored::Colorize;
use serde::Serialize;

use super::Settings;
use crate::output::{Column, CsvOutput, Output, OutputConfig, Outputter};

/// Title used by the workflow and by `cinegraph cast` without `--title`.
pub const DEFAULT_TITLE: &str = "Interstellar";

#[derive(Debug, Serialize)]
pub struct CastResults {
    pub title: String,
    pub cast: Vec<CastMember>,
}

impl CastResults {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("actor", "actor"),
            Column::new("character", "character"),
        ]
    }
}

impl Outputter for CastResults {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} ({} rows)\n",
            "CAST:".cyan().bold(),
            self.title,
            self.cast.len()
        );
        if self.cast.is_empty() {
            output.push_str(&format!("{}", "No matching actors.".dimmed()));
            return output;
        }
        let lines: Vec<String> = self.cast.iter().map(cast_line).collect();
        output.push_str(&lines.join("\n"));
        output
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::format_with_columns(&self.cast, &Self::columns())
    }
}

/// `actor -> character`, the way cast rows are printed.
pub fn cast_line(member: &CastMember) -> String {
    format!("{} -> {}", member.actor, member.character)
}

/// Run the cast command against an existing graph.
pub fn run(settings: &Settings, title: &str) -> anyhow::Result<()> {
    let store = GraphStore::open_read_only(&settings.db_path)?;
    let graph = store.connect()?;

    let cast = graph.movie_cast(title)?;
    tracing::debug!("{} cast rows for {:?}", cast.len(), title);

    let results = CastResults {
        title: title.to_string(),
        cast,
    };
    Output::new(&results, &settings.output).render()
}

//! Search command - movies whose summaries are closest to a text query
//!
//! The query is embedded with the configured model and compared against the
//! vectors stored on Movie nodes by `cinegraph run`.

use cine_embeddings::build_model;
use cine_store::{GraphStore, SimilarMovie};
use colored::Colorize;
use serde::Serialize;

use super::Settings;
use crate::output::{Column, CsvOutput, Output, OutputConfig, Outputter, TableOutput};

/// Query used by the workflow and by `cinegraph search` examples.
pub const DEFAULT_QUERY: &str = "space opera";

#[derive(Debug, Serialize)]
pub struct SimilarResults {
    pub query: String,
    pub model: String,
    pub results: Vec<SimilarMovie>,
}

impl SimilarResults {
    pub(super) fn columns() -> Vec<Column> {
        vec![
            Column::new("title", "title"),
            Column::new("similarity", "similarity"),
            Column::new("summary", "summary").with_max_width(60),
            Column::new("writers", "writers"),
        ]
    }
}

impl Outputter for SimilarResults {
    fn to_table(&self, config: &OutputConfig) -> String {
        format!(
            "{} \"{}\" ({})\n{}",
            "SEARCH:".cyan().bold(),
            self.query,
            self.model.dimmed(),
            TableOutput::format_with_columns(&self.results, &Self::columns(), config)
        )
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::format_with_columns(&self.results, &Self::columns())
    }
}

/// Run the search command against an existing, enriched graph.
pub async fn run(settings: &Settings, query: &str, limit: usize) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Search query cannot be empty. Please provide a search term.");
    }

    let model = build_model(&settings.embeddings)?;
    let store = GraphStore::open_read_only(&settings.db_path)?;
    let graph = store.connect()?;

    if graph.movies_with_vectors()? == 0 {
        anyhow::bail!(
            "No movie embeddings in {}. Run 'cinegraph run' first.",
            settings.db_path.display()
        );
    }

    let results = graph.search_movies(query, model.as_ref(), limit).await?;
    let results = SimilarResults {
        query: query.to_string(),
        model: model.model_name().to_string(),
        results,
    };
    Output::new(&results, &settings.output).render()
}

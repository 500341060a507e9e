//! Run command - the whole workflow in one go
//!
//! Wipes the database, creates the schema, bulk loads the CSV files, embeds
//! every movie summary, then runs the cast traversal and the similarity
//! search. Any failure stops the workflow; there is no rollback of the
//! steps that already ran.

use cine_core::LoadManifest;
use cine_embeddings::build_model;
use cine_store::{EnrichReport, GraphStore, LoadReport};
use colored::Colorize;
use serde::Serialize;

use super::cast::{cast_line, CastResults};
use super::search::SimilarResults;
use super::Settings;
use crate::output::{Output, OutputConfig, Outputter, TableOutput};

/// Parameters of the query phase.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub title: String,
    pub query: String,
    pub limit: usize,
}

/// Everything the workflow produced, for `--format json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub database: String,
    pub data_dir: String,
    pub load: LoadReport,
    pub enrich: EnrichReport,
    pub cast: CastResults,
    pub similar: SimilarResults,
}

impl Outputter for RunReport {
    // Progress and cast rows were already streamed; finish with the search table.
    fn to_table(&self, config: &OutputConfig) -> String {
        format!(
            "---\nMovies that are closest to the query '{}':\n{}",
            self.similar.query,
            TableOutput::format_with_columns(
                &self.similar.results,
                &SimilarResults::columns(),
                config
            )
        )
    }

    fn to_csv(&self, config: &OutputConfig) -> String {
        self.similar.to_csv(config)
    }
}

pub async fn run(settings: &Settings, options: &RunOptions) -> anyhow::Result<()> {
    let human = settings.output.is_human();

    let manifest = LoadManifest::movie_graph()?;
    let missing = manifest.missing_files(&settings.data_dir);
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        anyhow::bail!(
            "Missing input files in {}:\n  {}",
            settings.data_dir.display(),
            list.join("\n  ")
        );
    }

    let model = build_model(&settings.embeddings)?;

    let store = GraphStore::reset(&settings.db_path)?;
    let graph = store.connect()?;
    graph.create_schema()?;
    if human {
        println!("Finished creating node and relationship tables");
    }

    let load = graph.bulk_load(&settings.data_dir, &manifest, |statement| {
        if human {
            println!("Running: {}", statement);
        }
    })?;
    if human {
        println!("---\nFinished ingesting data");
    }

    let enrich = graph
        .enrich_movies_with(&settings.data_dir, model.as_ref(), |_| {
            if human {
                println!("Added a new column `vector` to the Movie table");
            }
        })
        .await?;
    if human {
        if !enrich.unmatched_titles.is_empty() {
            println!(
                "{} {} titles had no Movie node and were skipped: {}",
                "WARNING:".yellow().bold(),
                enrich.unmatched_titles.len(),
                enrich.unmatched_titles.join(", ")
            );
        }
        println!("Inserted the embedding data into the graph!");
        println!(
            "---\nHere are the actors and the characters they played in {}:",
            options.title
        );
    }
    let cast = graph.movie_cast_with(&options.title, |member| {
        if human {
            println!("{}", cast_line(member));
        }
    })?;

    let similar = graph
        .search_movies(&options.query, model.as_ref(), options.limit)
        .await?;
    tracing::info!(
        "workflow finished: {} cast rows, {} similar movies",
        cast.len(),
        similar.len()
    );

    let report = RunReport {
        database: store.path().display().to_string(),
        data_dir: settings.data_dir.display().to_string(),
        load,
        enrich,
        cast: CastResults {
            title: options.title.clone(),
            cast,
        },
        similar: SimilarResults {
            query: options.query.clone(),
            model: model.model_name().to_string(),
            results: similar,
        },
    };
    Output::new(&report, &settings.output).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use cine_core::{NodeTable, Table};
    use cine_store::{CastMember, SimilarMovie};

    fn report() -> RunReport {
        RunReport {
            database: "./test_kuzudb".to_string(),
            data_dir: "./data".to_string(),
            load: LoadReport {
                tables: vec![Table::Node(NodeTable::Movie)],
                statements: vec!["COPY Movie FROM './data/movie.csv';".to_string()],
            },
            enrich: EnrichReport {
                rows: 1,
                matched: 1,
                unmatched_titles: Vec::new(),
                dimension: 8,
                model: "hash-8".to_string(),
            },
            cast: CastResults {
                title: "Dune".to_string(),
                cast: vec![CastMember {
                    actor: "Zendaya".to_string(),
                    character: "Chani".to_string(),
                }],
            },
            similar: SimilarResults {
                query: "desert planet".to_string(),
                model: "hash-8".to_string(),
                results: vec![SimilarMovie {
                    title: "Dune".to_string(),
                    similarity: 0.9,
                    summary: "A noble family fights for a desert planet.".to_string(),
                    writers: vec!["Jon Spaihts".to_string()],
                }],
            },
        }
    }

    #[test]
    fn test_table_ends_with_similarity_header_and_rows() {
        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let table = report().render(&config);
        assert!(table.starts_with("---\nMovies that are closest to the query 'desert planet':\n"));
        assert!(table.contains("0.9000"));
        assert!(table.contains("Jon Spaihts"));
    }

    #[test]
    fn test_csv_is_the_similarity_rows_only() {
        let csv = report().render(&OutputConfig::new(OutputFormat::Csv));
        assert!(csv.starts_with("title,similarity,summary,writers"));
        assert!(!csv.contains("Movies that are closest"));
    }
}

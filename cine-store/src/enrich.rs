//! Embedding enrichment of Movie nodes.

use std::path::Path;

use anyhow::{Context, Result};
use cine_core::{read_movies, vector_column_ddl, MOVIE_FILE};
use cine_embeddings::EmbeddingModel;
use kuzu::Value;
use serde::Serialize;

use crate::graph::MovieGraph;
use crate::values::vector_param;

const SET_VECTOR: &str = "MATCH (m:Movie {title: $title}) SET m.vector = $vector RETURN m.title;";

/// Outcome of [`MovieGraph::enrich_movies`].
#[derive(Debug, Clone, Serialize)]
pub struct EnrichReport {
    /// Rows read from the movie CSV
    pub rows: usize,
    /// Movie nodes that received a vector
    pub matched: usize,
    /// CSV titles with no Movie node; their vectors were dropped
    pub unmatched_titles: Vec<String>,
    /// Length of every stored vector
    pub dimension: usize,
    /// Model that produced the vectors
    pub model: String,
}

impl<'db> MovieGraph<'db> {
    /// Embed every movie summary and store the vectors on existing Movie nodes.
    ///
    /// Steps run in order: read `movie.csv`, embed each summary with one call
    /// per row, add the `vector` column, then set it on the node whose title
    /// matches. All embeddings are computed before the schema is touched, so
    /// an embedding failure leaves the Movie table without a vector column.
    /// Titles without a node are skipped, never created.
    pub async fn enrich_movies(
        &self,
        base_dir: &Path,
        model: &dyn EmbeddingModel,
    ) -> Result<EnrichReport> {
        self.enrich_movies_with(base_dir, model, |_| {}).await
    }

    /// [`enrich_movies`](Self::enrich_movies), calling `on_column_added` with
    /// the vector dimension once the column exists and before any vector is set.
    pub async fn enrich_movies_with(
        &self,
        base_dir: &Path,
        model: &dyn EmbeddingModel,
        mut on_column_added: impl FnMut(usize),
    ) -> Result<EnrichReport> {
        let movies = read_movies(base_dir.join(MOVIE_FILE))?;
        let dimension = model.dimension();

        let mut vectors = Vec::with_capacity(movies.len());
        for movie in &movies {
            let vector = model
                .embed(&movie.summary)
                .await
                .with_context(|| format!("Failed to embed summary of {:?}", movie.title))?;
            if vector.len() != dimension {
                anyhow::bail!(
                    "Embedding for {:?} has {} dimensions, expected {}",
                    movie.title,
                    vector.len(),
                    dimension
                );
            }
            vectors.push(vector);
        }
        tracing::info!(
            "embedded {} summaries with {}",
            vectors.len(),
            model.model_name()
        );

        self.add_vector_column(dimension)?;
        on_column_added(dimension);

        let mut matched = 0;
        let mut unmatched_titles = Vec::new();
        for (movie, vector) in movies.iter().zip(&vectors) {
            if self.set_movie_vector(&movie.title, vector)? {
                matched += 1;
            } else {
                tracing::warn!("no Movie node titled {:?}; embedding dropped", movie.title);
                unmatched_titles.push(movie.title.clone());
            }
        }

        Ok(EnrichReport {
            rows: movies.len(),
            matched,
            unmatched_titles,
            dimension,
            model: model.model_name().to_string(),
        })
    }

    /// Add `vector DOUBLE[dimension]` to Movie unless it is already there.
    pub fn add_vector_column(&self, dimension: usize) -> Result<()> {
        if self.has_vector_column()? {
            tracing::info!("Movie.vector already exists; keeping it");
            return Ok(());
        }
        self.query(&vector_column_ddl(dimension))
            .context("Failed to add vector column to Movie")?;
        Ok(())
    }

    /// Set the vector of the Movie titled `title`. Returns false when no such node exists.
    pub fn set_movie_vector(&self, title: &str, vector: &[f32]) -> Result<bool> {
        let mut result = self.execute(
            SET_VECTOR,
            vec![
                ("title", Value::String(title.to_string())),
                ("vector", vector_param(vector)),
            ],
        )?;
        Ok(result.next().is_some())
    }
}

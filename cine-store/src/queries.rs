//! Read queries: cast traversal and vector similarity search.

use anyhow::{Context, Result};
use cine_embeddings::EmbeddingModel;
use kuzu::Value;
use serde::{Deserialize, Serialize};

use crate::graph::MovieGraph;
use crate::values::{f64_at, string_at, strings_at, vector_param};

/// Rows returned by a similarity search unless told otherwise.
pub const DEFAULT_SIMILARITY_LIMIT: usize = 3;

const MOVIE_CAST: &str = r#"
MATCH (a:Actor)-[:ACTED_IN]->(m:Movie {title: $title}),
      (a)-[:PLAYED]->(c:Character)
RETURN DISTINCT a.name, c.name
"#;

/// An actor and a character they played.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CastMember {
    pub actor: String,
    pub character: String,
}

/// One row of a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMovie {
    pub title: String,
    /// Cosine similarity between the stored vector and the query vector
    pub similarity: f64,
    pub summary: String,
    /// Writers of the movie
    pub writers: Vec<String>,
}

impl<'db> MovieGraph<'db> {
    /// Distinct (actor, character) pairs for actors who acted in `title`.
    ///
    /// Rows are streamed from the result and passed to `on_row` as they
    /// arrive, then returned together.
    pub fn movie_cast_with(
        &self,
        title: &str,
        mut on_row: impl FnMut(&CastMember),
    ) -> Result<Vec<CastMember>> {
        let result = self
            .execute(MOVIE_CAST, vec![("title", Value::String(title.to_string()))])
            .with_context(|| format!("Cast query failed for {:?}", title))?;

        let mut cast = Vec::new();
        for row in result {
            let member = CastMember {
                actor: string_at(&row, 0)?,
                character: string_at(&row, 1)?,
            };
            on_row(&member);
            cast.push(member);
        }
        Ok(cast)
    }

    /// Distinct (actor, character) pairs for actors who acted in `title`.
    pub fn movie_cast(&self, title: &str) -> Result<Vec<CastMember>> {
        self.movie_cast_with(title, |_| {})
    }

    /// Movies ranked by cosine similarity to `query_vector`, most similar first.
    ///
    /// Only movies with at least one writer and a stored vector take part.
    /// Order among equal scores is whatever the engine returns.
    pub fn similar_movies(&self, query_vector: &[f32], limit: usize) -> Result<Vec<SimilarMovie>> {
        match self.vector_dimension()? {
            None => anyhow::bail!("Movie table has no vector column; embed the movies first"),
            Some(stored) if stored != query_vector.len() => anyhow::bail!(
                "Query vector has {} dimensions but Movie.vector stores {}; \
                 search with the embedding settings the graph was built with",
                query_vector.len(),
                stored
            ),
            Some(_) => {}
        }

        let statement = format!(
            r#"
MATCH (m:Movie)<-[:WROTE]-(w:Writer)
WHERE m.vector IS NOT NULL
WITH m, w, array_cosine_similarity(m.vector, $query_vector) AS similarity
RETURN m.title AS title, similarity, m.summary AS summary, COLLECT(w.name) AS writers
ORDER BY similarity DESC
LIMIT {};
"#,
            limit
        );

        let result = self
            .execute(&statement, vec![("query_vector", vector_param(query_vector))])
            .context("Similarity query failed")?;

        result
            .map(|row| {
                Ok(SimilarMovie {
                    title: string_at(&row, 0)?,
                    similarity: f64_at(&row, 1)?,
                    summary: string_at(&row, 2)?,
                    writers: strings_at(&row, 3)?,
                })
            })
            .collect()
    }

    /// Embed `text` with `model` and run [`similar_movies`](Self::similar_movies).
    pub async fn search_movies(
        &self,
        text: &str,
        model: &dyn EmbeddingModel,
        limit: usize,
    ) -> Result<Vec<SimilarMovie>> {
        let query_vector = model
            .embed(text)
            .await
            .with_context(|| format!("Failed to embed query {:?}", text))?;
        self.similar_movies(&query_vector, limit)
    }
}

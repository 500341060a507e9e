//! CineGraph core - data model for the movie knowledge graph.
//!
//! This crate holds everything about the graph that does not need a live
//! database: the node and relationship tables with their DDL, the ordered
//! bulk-load manifest, the movie CSV record type and the cosine similarity
//! used to check ranked search results.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cine_core::{read_movies, movies_released_before, LoadManifest};
//!
//! let manifest = LoadManifest::movie_graph()?;
//! assert_eq!(manifest.len(), 11);
//!
//! let movies = read_movies("data/movie.csv")?;
//! let older = movies_released_before(&movies, 2015);
//! # Ok::<(), cine_core::CoreError>(())
//! ```

#![warn(clippy::all)]

mod error;
mod manifest;
mod records;
mod schema;
mod similarity;

pub use error::{CoreError, Result};
pub use manifest::{LoadEntry, LoadManifest, Table, MOVIE_GRAPH_FILES};
pub use records::{movies_released_before, read_movies, read_movies_from, MovieRecord};
pub use schema::{schema_ddl, vector_column_ddl, NodeTable, RelTable, VECTOR_COLUMN};
pub use similarity::{cosine_similarity, rank_by_similarity};

/// Output dimension of `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Embedding model used when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// File name of the movie table inside the data directory.
pub const MOVIE_FILE: &str = "movie.csv";

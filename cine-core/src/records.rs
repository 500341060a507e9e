//! Movie CSV records.
//!
//! The movie file has no header row; columns are title, year and summary in
//! that order.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One row of `movie.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: i64,
    pub summary: String,
}

/// Read every movie row from a headerless CSV file.
pub fn read_movies(path: impl AsRef<Path>) -> Result<Vec<MovieRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_movies_from(file, &path.display().to_string())
}

/// Read movie rows from any reader. `origin` names the source in errors.
pub fn read_movies_from<R: Read>(reader: R, origin: &str) -> Result<Vec<MovieRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut movies = Vec::new();
    for result in csv_reader.deserialize() {
        let record: MovieRecord = result.map_err(|source| CoreError::Csv {
            path: origin.to_string(),
            source,
        })?;
        movies.push(record);
    }

    tracing::debug!("read {} movies from {}", movies.len(), origin);
    Ok(movies)
}

/// Movies released strictly before `year`.
pub fn movies_released_before(movies: &[MovieRecord], year: i64) -> Vec<MovieRecord> {
    movies.iter().filter(|m| m.year < year).cloned().collect()
}

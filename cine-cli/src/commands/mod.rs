//! Command implementations for the CineGraph CLI
//!
//! Each command module provides a `run` function that executes the command logic.

use std::path::PathBuf;

use cine_embeddings::EmbeddingConfig;

use crate::output::OutputConfig;

pub mod cast;
pub mod eda;
pub mod run;
pub mod search;
pub mod stats;

/// Everything a command needs, resolved from flags, environment and config.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub embeddings: EmbeddingConfig,
    pub output: OutputConfig,
}

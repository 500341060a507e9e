//! CineGraph storage - Kùzu-backed movie knowledge graph.
//!
//! This crate owns every statement sent to the embedded graph database:
//! - Store lifecycle (wipe-and-open, open existing, read-only)
//! - Schema creation and bulk loading from CSV
//! - Embedding enrichment of Movie nodes
//! - Cast traversal and vector similarity queries

mod enrich;
mod graph;
mod queries;
mod store;
mod values;

pub use enrich::EnrichReport;
pub use graph::{LoadReport, MovieGraph};
pub use queries::{CastMember, SimilarMovie, DEFAULT_SIMILARITY_LIMIT};
pub use store::{AccessMode, GraphStore};

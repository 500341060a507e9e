//! Error types for cine-core.

use thiserror::Error;

/// Result type alias for cine-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while reading source data or building a load manifest.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A source file could not be opened or read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be decoded into a record.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File that failed.
        path: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A table name did not match any node or relationship table.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A relationship table is loaded before one of the node tables it connects.
    #[error("{rel} is loaded before its endpoint table {node}")]
    LoadOrder {
        /// Relationship table name.
        rel: String,
        /// Endpoint node table that has not been loaded yet.
        node: String,
    },

    /// The same table appears twice in a manifest.
    #[error("Table {0} appears more than once in the load manifest")]
    DuplicateTable(String),
}

//! Ordered mapping from graph tables to their CSV source files.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::schema::{NodeTable, RelTable};

/// Either kind of table that can be bulk loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Table {
    Node(NodeTable),
    Rel(RelTable),
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Node(n) => n.as_str(),
            Table::Rel(r) => r.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NodeTable::parse(s)
            .map(Table::Node)
            .or_else(|| RelTable::parse(s).map(Table::Rel))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Table> for String {
    fn from(table: Table) -> Self {
        table.as_str().to_string()
    }
}

/// One table and the CSV file it is copied from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadEntry {
    pub table: Table,
    pub file: String,
}

impl LoadEntry {
    /// `COPY` statement for this entry relative to `base_dir`.
    pub fn copy_statement(&self, base_dir: &Path) -> String {
        let path = self.source_path(base_dir);
        // Cypher string literal; single quotes are doubled
        let literal = path.to_string_lossy().replace('\'', "''");
        format!("COPY {} FROM '{}';", self.table, literal)
    }

    pub fn source_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.file)
    }
}

/// Load order and source file of every table in the movie graph.
pub const MOVIE_GRAPH_FILES: [(&str, &str); 11] = [
    ("Actor", "actor.csv"),
    ("Movie", "movie.csv"),
    ("Director", "director.csv"),
    ("Character", "character.csv"),
    ("Writer", "writer.csv"),
    ("ACTED_IN", "acted_in.csv"),
    ("DIRECTED", "directed.csv"),
    ("PLAYED", "played.csv"),
    ("PLAYED_ROLE_IN", "played_role_in.csv"),
    ("RELATED_TO", "related_to.csv"),
    ("WROTE", "wrote.csv"),
];

/// Ordered list of tables to bulk load.
///
/// Construction checks that every relationship table comes after both of its
/// endpoint node tables, so copying in order never references a missing node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadManifest {
    entries: Vec<LoadEntry>,
}

impl LoadManifest {
    /// Build a manifest from `(table name, file name)` pairs.
    pub fn new<I, S, F>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, F)>,
        S: AsRef<str>,
        F: Into<String>,
    {
        let mut entries = Vec::new();
        let mut seen: HashSet<Table> = HashSet::new();

        for (name, file) in pairs {
            let name = name.as_ref();
            let table = Table::parse(name).ok_or_else(|| CoreError::UnknownTable(name.to_string()))?;

            if let Table::Rel(rel) = table {
                let (from, to) = rel.endpoints();
                for node in [from, to] {
                    if !seen.contains(&Table::Node(node)) {
                        return Err(CoreError::LoadOrder {
                            rel: rel.to_string(),
                            node: node.to_string(),
                        });
                    }
                }
            }

            if !seen.insert(table) {
                return Err(CoreError::DuplicateTable(table.to_string()));
            }
            entries.push(LoadEntry {
                table,
                file: file.into(),
            });
        }

        Ok(Self { entries })
    }

    /// The eleven-file movie dataset: five node tables, then six relationship tables.
    pub fn movie_graph() -> Result<Self> {
        Self::new(MOVIE_GRAPH_FILES)
    }

    pub fn entries(&self) -> &[LoadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File name registered for `table`, if any.
    pub fn file_for(&self, table: Table) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.table == table)
            .map(|e| e.file.as_str())
    }

    /// Source files under `base_dir` that do not exist.
    pub fn missing_files(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(|e| e.source_path(base_dir))
            .filter(|p| !p.is_file())
            .collect()
    }
}

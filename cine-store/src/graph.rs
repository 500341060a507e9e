//! MovieGraph - a connection session on the movie graph.

use std::path::Path;

use anyhow::{Context, Result};
use cine_core::{schema_ddl, LoadManifest, NodeTable, RelTable, Table, VECTOR_COLUMN};
use kuzu::{Connection, QueryResult, Value};
use serde::Serialize;

use crate::values::{i64_at, string_at, vector_at};

/// Summary of a bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Tables copied, in load order
    pub tables: Vec<Table>,
    /// COPY statements issued, in order
    pub statements: Vec<String>,
}

/// Single connection to a [`GraphStore`](crate::GraphStore).
///
/// Statements run one at a time on this connection; nothing here spawns work.
pub struct MovieGraph<'db> {
    conn: Connection<'db>,
}

impl<'db> MovieGraph<'db> {
    pub(crate) fn new(conn: Connection<'db>) -> Self {
        Self { conn }
    }

    /// Run a Cypher statement and return its result.
    pub fn query(&self, statement: &str) -> Result<QueryResult<'db>> {
        tracing::debug!(statement, "query");
        self.conn
            .query(statement)
            .with_context(|| format!("Query failed: {}", statement))
    }

    /// Run a parameterized statement.
    pub(crate) fn execute(
        &self,
        statement: &str,
        params: Vec<(&str, Value)>,
    ) -> Result<QueryResult<'db>> {
        tracing::debug!(statement, params = params.len(), "execute");
        let mut prepared = self
            .conn
            .prepare(statement)
            .with_context(|| format!("Failed to prepare: {}", statement))?;
        self.conn
            .execute(&mut prepared, params)
            .with_context(|| format!("Query failed: {}", statement))
    }

    /// Create every node and relationship table if it does not already exist.
    ///
    /// Safe to call against a store that already has the schema.
    pub fn create_schema(&self) -> Result<usize> {
        let statements = schema_ddl();
        for statement in &statements {
            self.query(statement)
                .context("Failed to initialize schema")?;
        }
        tracing::info!("schema ready ({} tables)", statements.len());
        Ok(statements.len())
    }

    /// Bulk copy every manifest entry from `base_dir`, in manifest order.
    ///
    /// `on_statement` is called with each COPY statement right before it runs.
    /// There is no surrounding transaction: when a copy fails, tables copied
    /// before it stay loaded and the error is returned.
    pub fn bulk_load(
        &self,
        base_dir: &Path,
        manifest: &LoadManifest,
        mut on_statement: impl FnMut(&str),
    ) -> Result<LoadReport> {
        let mut report = LoadReport {
            tables: Vec::with_capacity(manifest.len()),
            statements: Vec::with_capacity(manifest.len()),
        };

        for entry in manifest.entries() {
            let source = entry.source_path(base_dir);
            if !source.is_file() {
                anyhow::bail!(
                    "Source file for {} not found: {}",
                    entry.table,
                    source.display()
                );
            }

            let statement = entry.copy_statement(base_dir);
            on_statement(&statement);
            self.query(&statement)
                .with_context(|| format!("Failed to load {}", entry.table))?;

            report.tables.push(entry.table);
            report.statements.push(statement);
        }

        tracing::info!("loaded {} tables from {}", report.tables.len(), base_dir.display());
        Ok(report)
    }

    /// Number of nodes in a node table.
    pub fn node_count(&self, table: NodeTable) -> Result<i64> {
        let statement = format!("MATCH (n:{}) RETURN count(n);", table);
        self.single_count(&statement)
    }

    /// Number of edges in a relationship table.
    pub fn rel_count(&self, table: RelTable) -> Result<i64> {
        let statement = format!("MATCH ()-[r:{}]->() RETURN count(r);", table);
        self.single_count(&statement)
    }

    fn single_count(&self, statement: &str) -> Result<i64> {
        let row = self
            .query(statement)?
            .next()
            .with_context(|| format!("No rows returned by: {}", statement))?;
        i64_at(&row, 0)
    }

    /// Whether the Movie table already carries the embedding column.
    pub fn has_vector_column(&self) -> Result<bool> {
        let statement = format!("CALL table_info('{}') RETURN *;", NodeTable::Movie);
        let found = self.query(&statement)?.any(|row| {
            row.iter()
                .any(|v| matches!(v, Value::String(name) if name == VECTOR_COLUMN))
        });
        Ok(found)
    }

    /// Length of the stored `vector` column, or `None` when Movie has no such column.
    pub fn vector_dimension(&self) -> Result<Option<usize>> {
        let statement = format!("CALL table_info('{}') RETURN *;", NodeTable::Movie);
        for row in self.query(&statement)? {
            let is_vector = row
                .iter()
                .any(|v| matches!(v, Value::String(name) if name == VECTOR_COLUMN));
            if !is_vector {
                continue;
            }
            // Type renders as e.g. `DOUBLE[1536]`
            let dimension = row.iter().find_map(|v| match v {
                Value::String(ty) => ty
                    .strip_suffix(']')
                    .and_then(|ty| ty.rsplit_once('['))
                    .and_then(|(_, n)| n.parse::<usize>().ok()),
                _ => None,
            });
            return dimension
                .map(Some)
                .with_context(|| format!("Unexpected type for Movie.{}", VECTOR_COLUMN));
        }
        Ok(None)
    }

    /// Number of Movie nodes carrying an embedding.
    pub fn movies_with_vectors(&self) -> Result<i64> {
        if !self.has_vector_column()? {
            return Ok(0);
        }
        self.single_count("MATCH (m:Movie) WHERE m.vector IS NOT NULL RETURN count(m);")
    }

    /// Every movie title with its stored vector, ordered by title.
    ///
    /// Movies that were never enriched come back with `None`; if the column
    /// does not exist yet every movie does.
    pub fn movie_vectors(&self) -> Result<Vec<(String, Option<Vec<f32>>)>> {
        if !self.has_vector_column()? {
            return self
                .query("MATCH (m:Movie) RETURN m.title ORDER BY m.title;")?
                .map(|row| Ok((string_at(&row, 0)?, None)))
                .collect();
        }

        self.query("MATCH (m:Movie) RETURN m.title, m.vector ORDER BY m.title;")?
            .map(|row| Ok((string_at(&row, 0)?, vector_at(&row, 1)?)))
            .collect()
    }
}

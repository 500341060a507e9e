//! Stats command - row counts per table

use cine_core::{NodeTable, RelTable};
use cine_store::GraphStore;
use colored::Colorize;
use serde::Serialize;

use super::Settings;
use crate::output::{Column, CsvOutput, Output, OutputConfig, Outputter, TableOutput};

#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: String,
    pub kind: &'static str,
    pub rows: i64,
}

#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub database: String,
    pub tables: Vec<TableCount>,
    pub movies_with_vectors: i64,
}

impl GraphStats {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("table", "table"),
            Column::new("kind", "kind"),
            Column::new("rows", "rows"),
        ]
    }
}

impl Outputter for GraphStats {
    fn to_table(&self, config: &OutputConfig) -> String {
        format!(
            "{} {}\n{}\n{} {}",
            "DATABASE:".cyan().bold(),
            self.database,
            TableOutput::format_with_columns(&self.tables, &Self::columns(), config),
            "Movies with embeddings:".dimmed(),
            self.movies_with_vectors.to_string().green()
        )
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::format_with_columns(&self.tables, &Self::columns())
    }
}

/// Run the stats command against an existing graph.
pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let store = GraphStore::open_read_only(&settings.db_path)?;
    let graph = store.connect()?;

    let mut tables = Vec::with_capacity(NodeTable::ALL.len() + RelTable::ALL.len());
    for node in NodeTable::ALL {
        tables.push(TableCount {
            table: node.to_string(),
            kind: "node",
            rows: graph.node_count(node)?,
        });
    }
    for rel in RelTable::ALL {
        tables.push(TableCount {
            table: rel.to_string(),
            kind: "rel",
            rows: graph.rel_count(rel)?,
        });
    }

    let stats = GraphStats {
        database: settings.db_path.display().to_string(),
        tables,
        movies_with_vectors: graph.movies_with_vectors()?,
    };
    Output::new(&stats, &settings.output).render()
}

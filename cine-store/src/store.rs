//! GraphStore - lifecycle of the embedded Kùzu database.

use anyhow::{Context, Result};
use kuzu::{Connection, Database, SystemConfig};
use std::path::{Path, PathBuf};

use crate::graph::MovieGraph;

/// Database access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Read-write mode (schema changes, loading, enrichment)
    #[default]
    ReadWrite,
    /// Read-only mode (cast and similarity queries)
    ReadOnly,
}

/// Embedded graph database at a fixed location on disk.
pub struct GraphStore {
    db: Database,
    path: PathBuf,
    mode: AccessMode,
}

impl GraphStore {
    /// Delete anything stored at `path` and open a fresh, empty database there.
    ///
    /// Destructive: previous contents are not recoverable. Each workflow run
    /// starts from an empty graph, so runs never accumulate data.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        remove_storage(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        tracing::info!("reset graph store at {}", path.display());
        Self::open_with_mode(path, AccessMode::ReadWrite)
    }

    /// Open an existing (or new) database in read-write mode without wiping it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(path, AccessMode::ReadWrite)
    }

    /// Open an existing database in read-only mode.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!(
                "No graph database at {}. Run 'cinegraph run' first to build it.",
                path.display()
            );
        }
        Self::open_with_mode(path, AccessMode::ReadOnly)
    }

    /// Open a database with the specified access mode.
    pub fn open_with_mode(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();
        let config = SystemConfig::default().read_only(mode == AccessMode::ReadOnly);
        let db = Database::new(path, config)
            .with_context(|| format!("Failed to open graph database: {:?}", path))?;

        Ok(Self {
            db,
            path: path.to_path_buf(),
            mode,
        })
    }

    /// Open a connection session on this store.
    pub fn connect(&self) -> Result<MovieGraph<'_>> {
        tracing::debug!(mode = ?self.mode, "connecting to {}", self.path.display());
        let conn = Connection::new(&self.db).context("Failed to open database connection")?;
        Ok(MovieGraph::new(conn))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Remove a database file or directory plus its write-ahead log, if present.
fn remove_storage(path: &Path) -> Result<()> {
    let mut wal = path.as_os_str().to_owned();
    wal.push(".wal");

    for target in [path.to_path_buf(), PathBuf::from(wal)] {
        let Ok(meta) = std::fs::symlink_metadata(&target) else {
            continue;
        };
        let removed = if meta.is_dir() {
            std::fs::remove_dir_all(&target)
        } else {
            std::fs::remove_file(&target)
        };
        removed.with_context(|| format!("Failed to remove existing storage: {:?}", target))?;
    }
    Ok(())
}

//! Document persistence for repair documents.
//!
//! [`DocumentStore`] is the contract the pipeline, step machine and publish
//! gate depend on; [`SqliteStore`] is the shipped implementation. Each
//! operation opens a connection inside `spawn_blocking` so SQLite work
//! never blocks the async runtime.

pub mod db;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;

use crate::error::{RepairError, Result};
use crate::models::RepairDocument;

pub use db::Database;

/// Persistence contract for repair documents, keyed by `repair_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a new document. Must be idempotent-safe against duplicate
    /// submission (upsert-by-id semantics).
    async fn create(&self, document: &RepairDocument) -> Result<()>;

    /// Retrieves a document by id, `None` when absent.
    async fn get_by_id(&self, repair_id: &str) -> Result<Option<RepairDocument>>;

    /// Lists every stored document, newest first.
    async fn list_all(&self) -> Result<Vec<RepairDocument>>;

    /// Lists only publicly visible documents, newest first.
    async fn list_public(&self) -> Result<Vec<RepairDocument>>;

    /// Updates an existing document.
    async fn update(&self, document: &RepairDocument) -> Result<()>;

    /// Removes a document, reporting whether it existed.
    async fn delete(&self, repair_id: &str) -> Result<bool>;
}

/// SQLite-backed document store.
pub struct SqliteStore {
    db_path: PathBuf,
}

/// Builder for creating and configuring [`SqliteStore`] instances.
#[derive(Debug, Clone, Default)]
pub struct SqliteStoreBuilder {
    database_path: Option<PathBuf>,
}

impl SqliteStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/fixit/repairs.db` or `~/.local/share/fixit/repairs.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating parent directories and the
    /// schema up front.
    ///
    /// # Errors
    ///
    /// Returns `RepairError::FileSystem` if the database path is invalid
    /// and `RepairError::Storage` if schema initialization fails.
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RepairError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), RepairError>(())
        })
        .await
        .map_err(|e| RepairError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(SqliteStore { db_path })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("fixit")
            .place_data_file("repairs.db")
            .map_err(|e| RepairError::XdgDirectory(e.to_string()))
    }
}

impl SqliteStore {
    /// Runs a blocking database closure off the async runtime.
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| RepairError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create(&self, document: &RepairDocument) -> Result<()> {
        let doc = document.clone();
        self.with_db(move |db| db.upsert_document(&doc)).await
    }

    async fn get_by_id(&self, repair_id: &str) -> Result<Option<RepairDocument>> {
        let id = repair_id.to_string();
        self.with_db(move |db| db.get_document(&id)).await
    }

    async fn list_all(&self) -> Result<Vec<RepairDocument>> {
        self.with_db(|db| db.list_documents(false)).await
    }

    async fn list_public(&self) -> Result<Vec<RepairDocument>> {
        self.with_db(|db| db.list_documents(true)).await
    }

    async fn update(&self, document: &RepairDocument) -> Result<()> {
        let doc = document.clone();
        self.with_db(move |db| db.update_document(&doc)).await
    }

    async fn delete(&self, repair_id: &str) -> Result<bool> {
        let id = repair_id.to_string();
        self.with_db(move |db| db.delete_document(&id)).await
    }
}

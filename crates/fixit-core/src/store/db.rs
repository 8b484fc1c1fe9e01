//! SQLite schema and queries for repair documents.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::error::{RepairError, Result, StorageResultExt};
use crate::models::{RepairAnalysis, RepairDocument};

const CREATE_REPAIRS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS repairs (
    repair_id TEXT PRIMARY KEY,
    timestamp TEXT NOT NULL,
    status TEXT NOT NULL,
    object_name TEXT NOT NULL,
    category TEXT NOT NULL,
    issue_type TEXT NOT NULL,
    safety_warning TEXT,
    tools_needed INTEGER NOT NULL DEFAULT 0,
    ideal_view_instruction TEXT NOT NULL,
    steps TEXT NOT NULL,
    user_photo_url TEXT NOT NULL,
    ideal_view_image_url TEXT,
    manual_url TEXT,
    is_public INTEGER NOT NULL DEFAULT 0,
    is_successful INTEGER
)";

const CREATE_PUBLIC_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_repairs_public ON repairs (is_public)";

const UPSERT_REPAIR_SQL: &str = "INSERT INTO repairs (
    repair_id, timestamp, status, object_name, category, issue_type,
    safety_warning, tools_needed, ideal_view_instruction, steps,
    user_photo_url, ideal_view_image_url, manual_url, is_public, is_successful
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
ON CONFLICT(repair_id) DO UPDATE SET
    timestamp = excluded.timestamp,
    status = excluded.status,
    object_name = excluded.object_name,
    category = excluded.category,
    issue_type = excluded.issue_type,
    safety_warning = excluded.safety_warning,
    tools_needed = excluded.tools_needed,
    ideal_view_instruction = excluded.ideal_view_instruction,
    steps = excluded.steps,
    user_photo_url = excluded.user_photo_url,
    ideal_view_image_url = excluded.ideal_view_image_url,
    manual_url = excluded.manual_url,
    is_public = excluded.is_public,
    is_successful = excluded.is_successful";

const SELECT_COLUMNS: &str = "repair_id, timestamp, status, object_name, category, issue_type,
    safety_warning, tools_needed, ideal_view_instruction, steps,
    user_photo_url, ideal_view_image_url, manual_url, is_public, is_successful";

const DELETE_REPAIR_SQL: &str = "DELETE FROM repairs WHERE repair_id = ?1";

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute(CREATE_REPAIRS_TABLE_SQL, [])
            .db_context("Failed to create repairs table")?;
        self.connection
            .execute(CREATE_PUBLIC_INDEX_SQL, [])
            .db_context("Failed to create public-visibility index")?;
        Ok(())
    }

    /// Inserts a document, replacing any existing row with the same id.
    /// Upsert semantics make accidental duplicate submission harmless.
    pub fn upsert_document(&mut self, doc: &RepairDocument) -> Result<()> {
        let steps_json = serde_json::to_string(&doc.analysis.steps)?;

        self.connection
            .execute(
                UPSERT_REPAIR_SQL,
                params![
                    doc.repair_id,
                    doc.timestamp.to_string(),
                    doc.analysis.status.as_str(),
                    doc.analysis.object_name,
                    doc.analysis.category.as_str(),
                    doc.analysis.issue_type,
                    doc.analysis.safety_warning,
                    doc.analysis.tools_needed,
                    doc.analysis.ideal_view_instruction,
                    steps_json,
                    doc.user_photo_url,
                    doc.ideal_view_image_url,
                    doc.manual_url,
                    doc.is_public,
                    doc.is_successful,
                ],
            )
            .db_context("Failed to write repair document")?;
        Ok(())
    }

    /// Retrieves a document by its id.
    pub fn get_document(&self, repair_id: &str) -> Result<Option<RepairDocument>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM repairs WHERE repair_id = ?1");
        self.connection
            .query_row(&sql, params![repair_id], Self::build_document_from_row)
            .optional()
            .db_context("Failed to query repair document")
    }

    /// Lists documents newest first, optionally restricted to public ones.
    pub fn list_documents(&self, public_only: bool) -> Result<Vec<RepairDocument>> {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM repairs");
        if public_only {
            sql.push_str(" WHERE is_public = 1");
        }
        sql.push_str(" ORDER BY timestamp DESC");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare repair listing")?;
        let rows = stmt
            .query_map([], Self::build_document_from_row)
            .db_context("Failed to list repair documents")?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row.db_context("Failed to read repair row")?);
        }
        Ok(documents)
    }

    /// Updates an existing document.
    ///
    /// # Errors
    ///
    /// Returns `RepairError::DocumentNotFound` when no row carries the id.
    pub fn update_document(&mut self, doc: &RepairDocument) -> Result<()> {
        if self.get_document(&doc.repair_id)?.is_none() {
            return Err(RepairError::DocumentNotFound {
                id: doc.repair_id.clone(),
            });
        }
        self.upsert_document(doc)
    }

    /// Deletes a document, reporting whether a row existed.
    pub fn delete_document(&mut self, repair_id: &str) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_REPAIR_SQL, params![repair_id])
            .db_context("Failed to delete repair document")?;
        Ok(affected > 0)
    }

    /// Helper to construct a RepairDocument from a database row.
    fn build_document_from_row(row: &rusqlite::Row) -> rusqlite::Result<RepairDocument> {
        let status_str: String = row.get(2)?;
        let status = status_str.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        let category_str: String = row.get(4)?;
        let category = category_str.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid category: {category_str}").into(),
            )
        })?;

        let steps_json: String = row.get(9)?;
        let steps = serde_json::from_str(&steps_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
        })?;

        Ok(RepairDocument {
            repair_id: row.get(0)?,
            timestamp: row.get::<_, String>(1)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
            })?,
            analysis: RepairAnalysis {
                status,
                object_name: row.get(3)?,
                category,
                issue_type: row.get(5)?,
                safety_warning: row.get(6)?,
                tools_needed: row.get(7)?,
                ideal_view_instruction: row.get(8)?,
                steps,
            },
            user_photo_url: row.get(10)?,
            ideal_view_image_url: row.get(11)?,
            manual_url: row.get(12)?,
            is_public: row.get(13)?,
            is_successful: row.get(14)?,
        })
    }
}

/// Database module for persisting saved timetables
///
/// Saved timetables live as a single JSON document list under one logical
/// store name, newest first. Every write is a read-modify-write of that list.
mod error;

pub use error::StoreError;

use rusqlite::{Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::timetable::SavedTimetable;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_timetables.sql");

pub struct TimetableDbManager {
    db: Mutex<Connection>,
    store_name: String,
}

impl TimetableDbManager {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn open(db_path: &str, store_name: &str) -> Result<Self, StoreError> {
        info!("Opening timetable store at {} (store: {})", db_path, store_name);
        Self::with_connection(Connection::open(db_path)?, store_name)
    }

    /// Creates a store backed by a private in-memory database
    pub fn in_memory(store_name: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, store_name)
    }

    fn with_connection(conn: Connection, store_name: &str) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
            store_name: store_name.to_string(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns all saved timetables, newest first
    pub fn list(&self) -> Result<Vec<SavedTimetable>, StoreError> {
        let db = self.lock();
        read_documents(&db, &self.store_name)
    }

    /// Gets a saved timetable by id
    pub fn get(&self, id: &str) -> Result<SavedTimetable, StoreError> {
        self.list()?
            .into_iter()
            .find(|saved| saved.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Saves a timetable at the front of the list
    pub fn save(&self, saved: &SavedTimetable) -> Result<(), StoreError> {
        let db = self.lock();
        let mut documents = read_documents(&db, &self.store_name)?;
        documents.insert(0, saved.clone());
        write_documents(&db, &self.store_name, &documents)?;

        debug!("Saved timetable {} ({} stored)", saved.id, documents.len());
        Ok(())
    }

    /// Deletes a saved timetable by id
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let db = self.lock();
        let mut documents = read_documents(&db, &self.store_name)?;

        let before = documents.len();
        documents.retain(|saved| saved.id != id);
        if documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }

        write_documents(&db, &self.store_name, &documents)?;
        debug!("Deleted timetable {} ({} stored)", id, documents.len());
        Ok(())
    }
}

fn read_documents(db: &Connection, store_name: &str) -> Result<Vec<SavedTimetable>, StoreError> {
    let raw: Option<String> = db
        .query_row(
            "SELECT documents FROM document_store WHERE store_name = ?",
            [store_name],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn write_documents(
    db: &Connection,
    store_name: &str,
    documents: &[SavedTimetable],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(documents)?;

    db.execute(
        "INSERT INTO document_store (store_name, documents, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(store_name) DO UPDATE SET documents = excluded.documents,
                                               updated_at = excluded.updated_at",
        (store_name, json, chrono::Utc::now().to_rfc3339()),
    )?;

    Ok(())
}

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{NoteBlock, Task};

/// Storage slot holding the task collection
pub const TASKS_SLOT: &str = "plannerTasksV1";
/// Storage slot holding the note-block collection
pub const NOTES_SLOT: &str = "plannerNotesV1";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Failed to serialize slot {slot}: {source}")]
    SerializeError {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key-value store. Each slot holds one JSON document that is
/// rewritten in full on every save.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `path`
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Raw value of a slot, `None` when it was never written
    pub fn get_item(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Replace the value of a slot
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        tracing::debug!(slot = key, bytes = value.len(), "slot written");
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM storage WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_collection(TASKS_SLOT)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), DatabaseError> {
        self.save_collection(TASKS_SLOT, tasks)
    }

    pub fn load_note_blocks(&self) -> Vec<NoteBlock> {
        self.load_collection(NOTES_SLOT)
    }

    pub fn save_note_blocks(&self, blocks: &[NoteBlock]) -> Result<(), DatabaseError> {
        self.save_collection(NOTES_SLOT, blocks)
    }

    /// Read a JSON array from `slot`. Missing, unreadable or malformed data
    /// yields an empty collection; the latter two are logged.
    fn load_collection<T: DeserializeOwned>(&self, slot: &str) -> Vec<T> {
        let raw = match self.get_item(slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(slot, error = %e, "failed to read slot, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(slot, error = %e, "malformed slot contents, starting empty");
                Vec::new()
            }
        }
    }

    fn save_collection<T: Serialize>(&self, slot: &str, items: &[T]) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(items).map_err(|source| DatabaseError::SerializeError {
            slot: slot.to_string(),
            source,
        })?;
        self.set_item(slot, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteItem, Priority};

    fn sample_tasks() -> Vec<Task> {
        let mut a = Task::new("Reunião".to_string(), "2024-03-14".to_string());
        a.time = Some("09:00".to_string());
        a.priority = Priority::High;
        let mut b = Task::new("Mercado".to_string(), "2024-03-15".to_string());
        b.notes = "leite, pão".to_string();
        b.completed = true;
        vec![a, b]
    }

    #[test]
    fn missing_slot_loads_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_tasks().is_empty());
        assert!(db.load_note_blocks().is_empty());
    }

    #[test]
    fn tasks_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let tasks = sample_tasks();
        db.save_tasks(&tasks).unwrap();
        assert_eq!(db.load_tasks(), tasks);
    }

    #[test]
    fn save_replaces_previous_value() {
        let db = Database::open_in_memory().unwrap();
        db.save_tasks(&sample_tasks()).unwrap();
        db.save_tasks(&[]).unwrap();
        assert!(db.load_tasks().is_empty());
        assert_eq!(db.get_item(TASKS_SLOT).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_slot_loads_empty() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(TASKS_SLOT, "{not json").unwrap();
        db.set_item(NOTES_SLOT, r#"{"id":"not an array"}"#).unwrap();
        assert!(db.load_tasks().is_empty());
        assert!(db.load_note_blocks().is_empty());
    }

    #[test]
    fn slots_are_independent() {
        let db = Database::open_in_memory().unwrap();
        let mut block = NoteBlock::new("Ideias".to_string(), 1);
        block.items.push(NoteItem::new("primeira".to_string(), 2));
        db.save_note_blocks(&[block.clone()]).unwrap();
        db.set_item(TASKS_SLOT, "garbage").unwrap();

        assert!(db.load_tasks().is_empty());
        assert_eq!(db.load_note_blocks(), vec![block]);
    }

    #[test]
    fn remove_item_clears_slot() {
        let db = Database::open_in_memory().unwrap();
        db.set_item("k", "v").unwrap();
        db.remove_item("k").unwrap();
        assert_eq!(db.get_item("k").unwrap(), None);
    }
}

//! SQLite-backed cache slot for merged disaster events.
//!
//! One named key-value slot holds the whole merged list as a JSON blob; a
//! missing or malformed entry reads as empty, never as an error.

use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::types::CachedEvents;

const EVENTS_KEY: &str = "disaster_events";

/// SQLite cache for the merged event list.
///
/// The connection sits behind a mutex so the cache can be shared across
/// tasks; loads are serialized upstream anyway.
pub struct EventCache {
    conn: Mutex<Connection>,
}

impl EventCache {
    /// Create a new cache at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (tests and ephemeral runs).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS feed_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Read the event slot.
    ///
    /// Absent, unreadable, or malformed entries all count as a miss.
    pub fn load(&self) -> Option<CachedEvents> {
        let raw = match self.read_slot() {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::debug!("Event cache read failed: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::debug!("Discarding malformed event cache entry: {}", e);
                None
            }
        }
    }

    /// Overwrite the event slot with a fresh capture.
    pub fn store(&self, cached: &CachedEvents) -> Result<()> {
        let value = serde_json::to_string(cached)?;
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO feed_state (key, value) VALUES (?1, ?2)",
            params![EVENTS_KEY, value],
        )?;
        Ok(())
    }

    /// Clear the event slot.
    pub fn clear(&self) -> Result<()> {
        self.conn.lock().execute(
            "DELETE FROM feed_state WHERE key = ?1",
            params![EVENTS_KEY],
        )?;
        Ok(())
    }

    fn read_slot(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .lock()
            .query_row(
                "SELECT value FROM feed_state WHERE key = ?1",
                params![EVENTS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

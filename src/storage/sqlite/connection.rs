use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{TubeError, TubeResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS channels (
    position INTEGER NOT NULL,
    author TEXT NOT NULL,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    media_type TEXT NOT NULL,
    last_processed_marker TEXT,
    synced_at TEXT,
    PRIMARY KEY (author, title)
);

CREATE INDEX IF NOT EXISTS idx_channels_position ON channels(position);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> TubeResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> TubeResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, TubeError> {
        self.conn
            .lock()
            .map_err(|_| TubeError::Database(rusqlite::Error::InvalidQuery))
    }
}

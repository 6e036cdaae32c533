use chrono::{DateTime, Utc};

use crate::domain::{Channel, MediaType};
use crate::errors::{TubeError, TubeResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::ChannelStore;

pub struct SqliteChannelStore {
    storage: SqliteStorage,
}

impl SqliteChannelStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl ChannelStore for SqliteChannelStore {
    fn load(&self) -> TubeResult<Vec<Channel>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT url, author, title, media_type, last_processed_marker, synced_at FROM channels ORDER BY position",
        )?;

        let channels = stmt.query_map([], |row| {
            let media_type_str: String = row.get(3)?;
            let synced_at_str: Option<String> = row.get(5)?;

            Ok(Channel {
                url: row.get(0)?,
                author: row.get(1)?,
                title: row.get(2)?,
                media_type: media_type_str.parse().unwrap_or(MediaType::Audio),
                last_processed_marker: row.get(4)?,
                synced_at: synced_at_str
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            })
        })?;

        channels.collect::<Result<Vec<_>, _>>().map_err(TubeError::from)
    }

    fn save(&self, channels: &[Channel]) -> TubeResult<()> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM channels", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO channels (position, author, title, url, media_type, last_processed_marker, synced_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, channel) in channels.iter().enumerate() {
                stmt.execute((
                    position as i64,
                    &channel.author,
                    &channel.title,
                    &channel.url,
                    channel.media_type.as_str(),
                    &channel.last_processed_marker,
                    channel.synced_at.map(|dt| dt.to_rfc3339()),
                ))?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

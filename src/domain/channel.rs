use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "audio" | "a" => Ok(MediaType::Audio),
            "video" | "v" => Ok(MediaType::Video),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subscribed feed, identified by its `(author, title)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub url: String,
    pub author: String,
    pub title: String,
    pub media_type: MediaType,
    /// Link of the newest entry already handled
    pub last_processed_marker: Option<String>,
    /// Last successful fetch during a sync pass. Set even when the feed was
    /// empty, so a channel without a marker can still be past its baseline.
    pub synced_at: Option<DateTime<Utc>>,
}

impl Channel {
    pub fn new(url: String, author: String, title: String, media_type: MediaType) -> Self {
        Self {
            url,
            author,
            title,
            media_type,
            last_processed_marker: None,
            synced_at: None,
        }
    }

    pub fn with_marker(mut self, marker: Option<String>) -> Self {
        self.last_processed_marker = marker;
        self
    }

    pub fn with_synced_at(mut self, synced_at: Option<DateTime<Utc>>) -> Self {
        self.synced_at = synced_at;
        self
    }

    /// Whether the first pass already recorded where this channel stands
    pub fn is_baselined(&self) -> bool {
        self.synced_at.is_some() || self.last_processed_marker.is_some()
    }

    pub fn is_same(&self, author: &str, title: &str) -> bool {
        self.author == author && self.title == title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_short_forms() {
        assert_eq!("a".parse::<MediaType>().unwrap(), MediaType::Audio);
        assert_eq!("Video".parse::<MediaType>().unwrap(), MediaType::Video);
        assert!("podcast".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_identity_is_case_sensitive() {
        let channel = Channel::new(
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC1".to_string(),
            "Rust Team".to_string(),
            "Talks".to_string(),
            MediaType::Audio,
        );

        assert!(channel.is_same("Rust Team", "Talks"));
        assert!(!channel.is_same("rust team", "Talks"));
        assert!(!channel.is_same("Talks", "Rust Team"));
    }

    #[test]
    fn test_baselined_by_marker_or_sync_time() {
        let fresh = Channel::new(
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC1".to_string(),
            "Rust Team".to_string(),
            "Talks".to_string(),
            MediaType::Audio,
        );
        assert!(!fresh.is_baselined());

        let empty_feed_synced = fresh.clone().with_synced_at(Some(Utc::now()));
        assert!(empty_feed_synced.is_baselined());
        assert!(empty_feed_synced.last_processed_marker.is_none());

        let with_marker =
            fresh.with_marker(Some("https://www.youtube.com/watch?v=1".to_string()));
        assert!(with_marker.is_baselined());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Channel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn new(title: String, link: String) -> Self {
        Self {
            title,
            link,
            published: None,
        }
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }
}

/// Entries of a feed that the marker does not cover yet
#[derive(Debug, PartialEq, Eq)]
pub enum Delta<'a> {
    /// Never synced: nothing is offered, the newest entry becomes the marker
    Baseline(Option<&'a Entry>),
    /// New entries, oldest first
    New(Vec<&'a Entry>),
}

/// Compute the delta of newest-first `entries` for `channel`.
///
/// Entries up to (excluding) the one whose link equals the marker are new.
/// A marker that no longer appears in the feed means every entry is new, and
/// so does a baselined channel without a marker (its feed was empty).
pub fn compute_delta<'a>(entries: &'a [Entry], channel: &Channel) -> Delta<'a> {
    if !channel.is_baselined() {
        return Delta::Baseline(entries.first());
    }

    let marker = channel.last_processed_marker.as_deref();
    let mut new: Vec<&Entry> = entries
        .iter()
        .take_while(|e| Some(e.link.as_str()) != marker)
        .collect();
    new.reverse();
    Delta::New(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaType;
    use chrono::Utc;

    fn channel(marker: Option<&str>) -> Channel {
        Channel::new(
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC1".to_string(),
            "Rust Team".to_string(),
            "Talks".to_string(),
            MediaType::Audio,
        )
        .with_marker(marker.map(String::from))
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("Third".to_string(), "https://www.youtube.com/watch?v=3".to_string()),
            Entry::new("Second".to_string(), "https://www.youtube.com/watch?v=2".to_string()),
            Entry::new("First".to_string(), "https://www.youtube.com/watch?v=1".to_string()),
        ]
    }

    #[test]
    fn test_no_marker_is_baseline() {
        let entries = entries();
        let delta = compute_delta(&entries, &channel(None));
        assert_eq!(delta, Delta::Baseline(Some(&entries[0])));
    }

    #[test]
    fn test_no_marker_empty_feed() {
        assert_eq!(compute_delta(&[], &channel(None)), Delta::Baseline(None));
    }

    #[test]
    fn test_new_entries_oldest_first() {
        let entries = entries();
        let delta = compute_delta(&entries, &channel(Some("https://www.youtube.com/watch?v=1")));

        match delta {
            Delta::New(new) => {
                let titles: Vec<&str> = new.iter().map(|e| e.title.as_str()).collect();
                assert_eq!(titles, vec!["Second", "Third"]);
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn test_marker_at_newest_is_empty() {
        let entries = entries();
        let delta = compute_delta(&entries, &channel(Some("https://www.youtube.com/watch?v=3")));
        assert_eq!(delta, Delta::New(vec![]));
    }

    #[test]
    fn test_unknown_marker_offers_everything() {
        let entries = entries();
        match compute_delta(&entries, &channel(Some("https://www.youtube.com/watch?v=gone"))) {
            Delta::New(new) => {
                assert_eq!(new.len(), 3);
                assert_eq!(new[0].title, "First");
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }

    #[test]
    fn test_synced_without_marker_offers_everything() {
        let entries = entries();
        let synced = channel(None).with_synced_at(Some(Utc::now()));

        match compute_delta(&entries, &synced) {
            Delta::New(new) => {
                let titles: Vec<&str> = new.iter().map(|e| e.title.as_str()).collect();
                assert_eq!(titles, vec!["First", "Second", "Third"]);
            }
            other => panic!("unexpected delta: {:?}", other),
        }
    }
}

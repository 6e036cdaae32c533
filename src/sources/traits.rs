use crate::domain::Entry;
use crate::errors::TubeResult;

/// Normalized result of fetching a channel feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFeed {
    /// Address the feed was actually read from
    pub feed_url: String,
    pub author: String,
    pub title: String,
    /// Newest first
    pub entries: Vec<Entry>,
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher {
    /// Fetch and normalize the feed behind `url`
    fn fetch(&self, url: &str) -> TubeResult<FetchedFeed>;
}

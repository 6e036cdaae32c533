use tracing::info;

use crate::domain::{Channel, MediaType};
use crate::errors::{TubeError, TubeResult};
use crate::sources::FeedFetcher;
use crate::storage::traits::ChannelStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Channel),
    AlreadyPresent(Channel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Channel),
    NotFound,
}

/// In-memory set of subscribed channels, backed by a `ChannelStore`.
///
/// Every successful mutation is written through to the store right away.
pub struct ChannelRegistry<S: ChannelStore> {
    store: S,
    channels: Vec<Channel>,
}

impl<S: ChannelStore> ChannelRegistry<S> {
    pub fn load(store: S) -> TubeResult<Self> {
        let channels = store.load()?;
        Ok(Self { store, channels })
    }

    pub fn persist(&self) -> TubeResult<()> {
        self.store.save(&self.channels)
    }

    /// Subscribe to the feed behind `url`.
    ///
    /// Adding a channel whose `(author, title)` is already registered is not an error.
    pub fn add<F: FeedFetcher + ?Sized>(
        &mut self,
        fetcher: &F,
        url: &str,
        media_type: MediaType,
    ) -> TubeResult<AddOutcome> {
        let feed = fetcher.fetch(url).map_err(|e| match e {
            TubeError::InvalidSource(msg) => TubeError::InvalidSource(msg),
            other => TubeError::InvalidSource(format!("{}: {}", url, other)),
        })?;

        if let Some(existing) = self.find(&feed.author, &feed.title) {
            return Ok(AddOutcome::AlreadyPresent(existing.clone()));
        }

        let channel = Channel::new(feed.feed_url, feed.author, feed.title, media_type);
        self.channels.push(channel.clone());
        self.persist()?;

        info!(author = %channel.author, title = %channel.title, "channel added");
        Ok(AddOutcome::Added(channel))
    }

    /// Unsubscribe the channel matching `(author, title)` exactly
    pub fn remove(&mut self, author: &str, title: &str) -> TubeResult<RemoveOutcome> {
        let Some(index) = self.channels.iter().position(|c| c.is_same(author, title)) else {
            return Ok(RemoveOutcome::NotFound);
        };

        let channel = self.channels.remove(index);
        self.persist()?;

        info!(author = %channel.author, title = %channel.title, "channel removed");
        Ok(RemoveOutcome::Removed(channel))
    }

    pub fn list(&self) -> &[Channel] {
        &self.channels
    }

    pub fn find(&self, author: &str, title: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.is_same(author, title))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub(crate) fn channel_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }
}

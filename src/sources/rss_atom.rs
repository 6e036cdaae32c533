use feed_rs::parser;

use crate::domain::Entry;
use crate::errors::{TubeError, TubeResult};
use crate::sources::traits::FetchedFeed;

/// Parse raw feed bytes into the normalized `(author, title, entries)` shape.
///
/// This is the only place that decides which feed field is the author and
/// which is the title. When a feed only carries one of them, it is used for
/// both, so every channel still gets a complete identity.
pub fn parse_feed(feed_url: &str, bytes: &[u8]) -> TubeResult<FetchedFeed> {
    let parsed = parser::parse(bytes)
        .map_err(|e| TubeError::FeedMalformed(format!("{}: {}", feed_url, e)))?;

    let title = parsed
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());
    let author = parsed
        .authors
        .into_iter()
        .map(|p| p.name.trim().to_string())
        .find(|name| !name.is_empty());

    let (author, title) = match (author, title) {
        (Some(author), Some(title)) => (author, title),
        (Some(author), None) => (author.clone(), author),
        (None, Some(title)) => (title.clone(), title),
        (None, None) => {
            return Err(TubeError::FeedMalformed(format!(
                "{}: feed has neither author nor title",
                feed_url
            )))
        }
    };

    let mut entries: Vec<Entry> = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let link = entry
                .links
                .iter()
                .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
                .or_else(|| entry.links.first())
                .map(|l| l.href.clone())
                .unwrap_or(entry.id);

            Entry::new(title, link).with_published(entry.published.or(entry.updated))
        })
        .collect();

    // Feeds are expected newest first; enforce it when every entry is dated
    if entries.iter().all(|e| e.published.is_some()) {
        entries.sort_by(|a, b| b.published.cmp(&a.published));
    }

    Ok(FetchedFeed {
        feed_url: feed_url.to_string(),
        author,
        title,
        entries,
    })
}

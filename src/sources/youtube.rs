use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::errors::{TubeError, TubeResult};
use crate::sources::rss_atom::parse_feed;
use crate::sources::traits::{FeedFetcher, FetchedFeed};

const FEED_BASE: &str = "https://www.youtube.com/feeds/videos.xml";

/// Where a YouTube link points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    /// The feed address is known from the link alone
    Feed(String),
    /// A handle or custom channel page that has to be fetched to find the channel id
    ChannelPage(String),
}

pub struct YouTubeFetcher {
    client: Client,
}

impl YouTubeFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Classify a user-supplied link without touching the network
    pub fn locate(url: &str) -> TubeResult<FeedLocation> {
        let parsed =
            Url::parse(url.trim()).map_err(|e| TubeError::InvalidSource(format!("{}: {}", url, e)))?;

        let host = parsed.host_str().unwrap_or("").to_lowercase();
        let is_youtube = host == "youtube.com"
            || host.ends_with(".youtube.com")
            || host == "youtu.be";
        if !is_youtube {
            return Err(TubeError::InvalidSource(format!(
                "{}: not a YouTube link",
                url
            )));
        }

        let query = |key: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty())
        };

        if parsed.path() == "/feeds/videos.xml" {
            if let Some(id) = query("channel_id") {
                return Ok(FeedLocation::Feed(channel_feed_url(&id)));
            }
            if let Some(id) = query("playlist_id") {
                return Ok(FeedLocation::Feed(playlist_feed_url(&id)));
            }
        }

        // Playlist links, including watch?v=...&list=...
        if let Some(id) = query("list") {
            return Ok(FeedLocation::Feed(playlist_feed_url(&id)));
        }

        let channel_regex = Regex::new(r"^/channel/(UC[\w-]{22})").unwrap();
        if let Some(caps) = channel_regex.captures(parsed.path()) {
            return Ok(FeedLocation::Feed(channel_feed_url(&caps[1])));
        }

        let path = parsed.path();
        if path.starts_with("/@") || path.starts_with("/c/") || path.starts_with("/user/") {
            return Ok(FeedLocation::ChannelPage(parsed.to_string()));
        }

        Err(TubeError::InvalidSource(format!(
            "{}: expected a channel, handle or playlist link",
            url
        )))
    }

    /// Fetch YouTube page and extract channel ID from meta tags or page content
    fn channel_id_from_page(&self, url: &str) -> TubeResult<String> {
        let html = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| TubeError::FeedUnreachable(format!("{}: {}", url, e)))?;

        extract_channel_id(&html).ok_or_else(|| {
            TubeError::InvalidSource(format!("{}: could not find channel ID on page", url))
        })
    }

    fn resolve(&self, url: &str) -> TubeResult<String> {
        match Self::locate(url)? {
            FeedLocation::Feed(feed_url) => Ok(feed_url),
            FeedLocation::ChannelPage(page) => {
                let channel_id = self.channel_id_from_page(&page)?;
                debug!(page = %page, channel_id = %channel_id, "resolved channel page");
                Ok(channel_feed_url(&channel_id))
            }
        }
    }
}

impl Default for YouTubeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher for YouTubeFetcher {
    fn fetch(&self, url: &str) -> TubeResult<FetchedFeed> {
        let feed_url = self.resolve(url)?;
        debug!(feed_url = %feed_url, "fetching feed");

        let bytes = self
            .client
            .get(&feed_url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| TubeError::FeedUnreachable(format!("{}: {}", feed_url, e)))?;

        parse_feed(&feed_url, &bytes)
    }
}

fn channel_feed_url(channel_id: &str) -> String {
    format!("{}?channel_id={}", FEED_BASE, channel_id)
}

fn playlist_feed_url(playlist_id: &str) -> String {
    format!("{}?playlist_id={}", FEED_BASE, playlist_id)
}

fn extract_channel_id(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    // Try to find channel ID in meta tags
    let meta_selector = Selector::parse("meta[itemprop='channelId']").unwrap();
    if let Some(channel_id) = document
        .select(&meta_selector)
        .next()
        .and_then(|e| e.value().attr("content"))
    {
        return Some(channel_id.to_string());
    }

    let channel_regex = Regex::new(r"youtube\.com/channel/(UC[\w-]{22})").unwrap();

    // Try to find in canonical link
    let link_selector = Selector::parse("link[rel='canonical']").unwrap();
    if let Some(caps) = document
        .select(&link_selector)
        .next()
        .and_then(|e| e.value().attr("href"))
        .and_then(|href| channel_regex.captures(href))
    {
        return Some(caps[1].to_string());
    }

    // Fall back to the embedded page data
    let data_regex = Regex::new(r#""channelId":"(UC[\w-]{22})""#).unwrap();
    data_regex.captures(html).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL_ID: &str = "UCxxxxxxxxxxxxxxxxxxxxxx";

    #[test]
    fn test_playlist_from_watch_link() {
        let location = YouTubeFetcher::locate(
            "https://www.youtube.com/watch?v=4bvAIa5hjFk&list=PLV4xApIh67zHZXf4DoSDtXqVvneSgh-1X",
        )
        .unwrap();

        assert_eq!(
            location,
            FeedLocation::Feed(
                "https://www.youtube.com/feeds/videos.xml?playlist_id=PLV4xApIh67zHZXf4DoSDtXqVvneSgh-1X"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_channel_link() {
        let location =
            YouTubeFetcher::locate(&format!("https://youtube.com/channel/{}/videos", CHANNEL_ID))
                .unwrap();

        assert_eq!(location, FeedLocation::Feed(channel_feed_url(CHANNEL_ID)));
    }

    #[test]
    fn test_feed_link_passes_through() {
        let feed_url = channel_feed_url(CHANNEL_ID);
        assert_eq!(
            YouTubeFetcher::locate(&feed_url).unwrap(),
            FeedLocation::Feed(feed_url)
        );
    }

    #[test]
    fn test_handles_need_page_lookup() {
        for url in [
            "https://www.youtube.com/@someuser",
            "https://www.youtube.com/c/channelname",
            "https://www.youtube.com/user/username",
        ] {
            assert!(
                matches!(
                    YouTubeFetcher::locate(url).unwrap(),
                    FeedLocation::ChannelPage(_)
                ),
                "URL {} should need a page lookup",
                url
            );
        }
    }

    #[test]
    fn test_rejects_other_sites_and_garbage() {
        for url in [
            "https://example.com/feed.xml",
            "https://mastodon.social/@user",
            "not a url",
            "https://www.youtube.com/watch?v=4bvAIa5hjFk",
        ] {
            assert!(
                matches!(YouTubeFetcher::locate(url), Err(TubeError::InvalidSource(_))),
                "URL {} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_extract_channel_id_from_meta() {
        let html = format!(
            r#"<html><head><meta itemprop="channelId" content="{}"></head></html>"#,
            CHANNEL_ID
        );
        assert_eq!(extract_channel_id(&html).as_deref(), Some(CHANNEL_ID));
    }

    #[test]
    fn test_extract_channel_id_from_page_data() {
        let html = format!(
            r#"<html><script>var data = {{"channelId":"{}"}};</script></html>"#,
            CHANNEL_ID
        );
        assert_eq!(extract_channel_id(&html).as_deref(), Some(CHANNEL_ID));
        assert_eq!(extract_channel_id("<html></html>"), None);
    }
}

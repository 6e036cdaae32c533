use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{compute_delta, Channel, Delta, Entry, MediaType};
use crate::errors::TubeResult;
use crate::services::confirm::Confirm;
use crate::services::preflight::{self, Toolset};
use crate::services::registry_service::ChannelRegistry;
use crate::sources::FeedFetcher;
use crate::storage::traits::ChannelStore;
use crate::tools::{Downloader, ProcessRunner, TransferTool};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Only report what would be offered; change nothing
    pub dry_run: bool,
}

/// What happened to one channel during a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelReport {
    pub author: String,
    pub title: String,
    /// First pass for this channel: only the marker was recorded
    pub baseline: bool,
    /// Entries a dry run would have offered
    pub pending: Vec<String>,
    pub delivered: Vec<PathBuf>,
    pub declined: Vec<String>,
    /// (entry title, error)
    pub failed: Vec<(String, String)>,
    /// Channel-level failure, e.g. the feed could not be fetched
    pub error: Option<String>,
}

impl ChannelReport {
    fn for_channel(channel: &Channel) -> Self {
        Self {
            author: channel.author.clone(),
            title: channel.title.clone(),
            ..Default::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        self.error.is_some() || !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub channels: Vec<ChannelReport>,
}

impl SyncReport {
    /// True when no channel or entry failed
    pub fn is_success(&self) -> bool {
        !self.channels.iter().any(ChannelReport::has_failures)
    }

    pub fn delivered_count(&self) -> usize {
        self.channels.iter().map(|c| c.delivered.len()).sum()
    }

    pub fn declined_count(&self) -> usize {
        self.channels.iter().map(|c| c.declined.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.failed.len() + usize::from(c.error.is_some()))
            .sum()
    }
}

pub struct SyncEngine<'a, F, D, T, C>
where
    F: FeedFetcher + ?Sized,
    D: ProcessRunner,
    T: ProcessRunner,
    C: Confirm,
{
    fetcher: &'a F,
    downloader: Downloader<D>,
    transfer: TransferTool<T>,
    confirm: C,
    options: SyncOptions,
}

impl<'a, F, D, T, C> SyncEngine<'a, F, D, T, C>
where
    F: FeedFetcher + ?Sized,
    D: ProcessRunner,
    T: ProcessRunner,
    C: Confirm,
{
    pub fn new(fetcher: &'a F, toolset: Toolset<D, T>, confirm: C) -> Self {
        Self {
            fetcher,
            downloader: toolset.downloader,
            transfer: toolset.transfer,
            confirm,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// One pass over every registered channel, persisting after each channel
    pub fn sync_all<S: ChannelStore>(
        &mut self,
        registry: &mut ChannelRegistry<S>,
    ) -> TubeResult<SyncReport> {
        let mut report = SyncReport::default();

        for index in 0..registry.len() {
            let Some(channel) = registry.channel_mut(index) else {
                break;
            };
            report.channels.push(self.sync_channel(channel));

            if !self.options.dry_run {
                registry.persist()?;
            }
        }

        Ok(report)
    }

    /// Fetch one channel, offer its new entries and advance its marker
    pub fn sync_channel(&mut self, channel: &mut Channel) -> ChannelReport {
        let mut report = ChannelReport::for_channel(channel);
        info!(author = %channel.author, title = %channel.title, "syncing channel");

        let feed = match self.fetcher.fetch(&channel.url) {
            Ok(feed) => feed,
            Err(e) => {
                warn!(author = %channel.author, title = %channel.title, error = %e, "skipping channel");
                report.error = Some(e.to_string());
                return report;
            }
        };

        let new_entries = match compute_delta(&feed.entries, channel) {
            Delta::Baseline(newest) => {
                report.baseline = true;
                if !self.options.dry_run {
                    channel.last_processed_marker = newest.map(|e| e.link.clone());
                    channel.synced_at = Some(Utc::now());
                }
                return report;
            }
            Delta::New(entries) => entries,
        };

        if self.options.dry_run {
            report.pending = new_entries.iter().map(|e| e.title.clone()).collect();
            return report;
        }
        channel.synced_at = Some(Utc::now());

        // The marker never moves past an entry that failed in this pass, so
        // everything after that entry is offered again next run
        let mut blocked = false;
        for entry in new_entries {
            let handled = if !self.confirm.confirm(channel, entry) {
                info!(entry = %entry.title, "declined");
                report.declined.push(entry.title.clone());
                true
            } else {
                match self.deliver(channel.media_type, entry) {
                    Ok(path) => {
                        report.delivered.push(path);
                        true
                    }
                    Err(e) => {
                        warn!(entry = %entry.title, error = %e, "entry failed");
                        report.failed.push((entry.title.clone(), e.to_string()));
                        false
                    }
                }
            };

            blocked |= !handled;
            if !blocked {
                channel.last_processed_marker = Some(entry.link.clone());
            }
        }

        report
    }

    fn deliver(&self, media_type: MediaType, entry: &Entry) -> TubeResult<PathBuf> {
        let path = self.downloader.download(media_type, entry)?;
        self.transfer.send(&path)?;
        Ok(path)
    }
}

/// Check preconditions, then run one sync pass over `registry`.
///
/// Nothing is fetched and no marker moves unless every precondition holds.
pub fn run<S, F, D, T, C>(
    config_path: &Path,
    registry: &mut ChannelRegistry<S>,
    fetcher: &F,
    downloader_runner: D,
    transfer_runner: T,
    confirm: C,
    options: SyncOptions,
) -> TubeResult<SyncReport>
where
    S: ChannelStore,
    F: FeedFetcher + ?Sized,
    D: ProcessRunner,
    T: ProcessRunner,
    C: Confirm,
{
    let toolset = preflight::check(config_path, downloader_runner, transfer_runner)?;

    SyncEngine::new(fetcher, toolset, confirm)
        .with_options(options)
        .sync_all(registry)
}

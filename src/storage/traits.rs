use crate::domain::Channel;
use crate::errors::TubeResult;

/// Durable storage for the channel registry
#[cfg_attr(test, mockall::automock)]
pub trait ChannelStore {
    /// Load all channels in registry order; empty storage yields no channels
    fn load(&self) -> TubeResult<Vec<Channel>>;

    /// Replace the stored registry with `channels` in a single atomic write
    fn save(&self, channels: &[Channel]) -> TubeResult<()>;
}

pub mod confirm;
pub mod preflight;
pub mod registry_service;
pub mod sync_service;

pub use confirm::{AssumeYes, Confirm, Prompt};
pub use preflight::Toolset;
pub use registry_service::{AddOutcome, ChannelRegistry, RemoveOutcome};
pub use sync_service::{ChannelReport, SyncEngine, SyncOptions, SyncReport};

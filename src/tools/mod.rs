pub mod runner;
pub mod downloader;
pub mod transfer;

pub use runner::{ProcessRunner, RunError, SystemRunner};
pub use downloader::Downloader;
pub use transfer::TransferTool;

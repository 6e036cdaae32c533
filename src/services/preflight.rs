use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::errors::{TubeError, TubeResult};
use crate::tools::{Downloader, ProcessRunner, TransferTool};

/// Everything a sync pass needs once the preconditions hold
pub struct Toolset<D: ProcessRunner, T: ProcessRunner> {
    pub config: Config,
    pub downloader: Downloader<D>,
    pub transfer: TransferTool<T>,
}

/// Verify, in order, that the configuration loads, the downloader starts and
/// the transfer tool starts. The first failure is returned.
///
/// The working directory is created here so the probes and later downloads
/// run inside it.
pub fn check<D: ProcessRunner, T: ProcessRunner>(
    config_path: &Path,
    downloader_runner: D,
    transfer_runner: T,
) -> TubeResult<Toolset<D, T>> {
    let config = Config::load_or_init(config_path)?;

    fs::create_dir_all(&config.download_dir).map_err(|e| TubeError::MissingConfiguration {
        path: config_path.to_path_buf(),
        reason: format!(
            "cannot create DOWNLOAD_DIR {}: {}",
            config.download_dir.display(),
            e
        ),
    })?;

    let downloader = Downloader::new(&config, downloader_runner);
    downloader.probe()?;
    debug!(program = downloader.program(), "downloader available");

    let transfer = TransferTool::new(&config, transfer_runner);
    transfer.probe()?;
    debug!(program = transfer.program(), "transfer tool available");

    Ok(Toolset {
        config,
        downloader,
        transfer,
    })
}

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{Entry, MediaType};
use crate::errors::{TubeError, TubeResult};
use crate::tools::runner::{ProcessRunner, RunError};

pub struct Downloader<R: ProcessRunner> {
    runner: R,
    config: Config,
}

impl<R: ProcessRunner> Downloader<R> {
    pub fn new(config: &Config, runner: R) -> Self {
        Self {
            runner,
            config: config.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.config.downloader
    }

    pub fn work_dir(&self) -> &Path {
        &self.config.download_dir
    }

    /// Check the executable can be started; a non-zero exit still counts as present
    pub fn probe(&self) -> TubeResult<()> {
        match self
            .runner
            .run(self.program(), &["--version".to_string()], self.work_dir())
        {
            Ok(()) => Ok(()),
            Err(RunError::NotFound { program }) => Err(TubeError::DownloaderUnavailable(program)),
            Err(e) => {
                warn!(error = %e, "downloader probe exited with an error");
                Ok(())
            }
        }
    }

    /// Path the downloader is expected to produce for `entry`
    pub fn output_path(&self, media_type: MediaType, entry: &Entry) -> PathBuf {
        let extension = &self.config.profile(media_type).extension;
        self.work_dir()
            .join(format!("{}.{}", file_stem(&entry.title), extension))
    }

    /// Download `entry` into the working directory and return the produced file
    pub fn download(&self, media_type: MediaType, entry: &Entry) -> TubeResult<PathBuf> {
        let profile = self.config.profile(media_type);
        let template = format!("{}.%(ext)s", file_stem(&entry.title).replace('%', "%%"));

        let mut args = profile.flags.clone();
        args.push("--output".to_string());
        args.push(template);
        args.push(entry.link.clone());

        info!(link = %entry.link, media_type = %media_type, "downloading");
        self.runner
            .run(self.program(), &args, self.work_dir())
            .map_err(|e| match e {
                RunError::NotFound { program } => TubeError::DownloaderUnavailable(program),
                RunError::Failed { .. } => {
                    TubeError::DownloadFailed(format!("{}: {}", entry.title, e))
                }
            })?;

        let path = self.output_path(media_type, entry);
        if !path.is_file() {
            return Err(TubeError::DownloadFailed(format!(
                "{}: expected output {} was not produced",
                entry.title,
                path.display()
            )));
        }

        Ok(path)
    }
}

/// File name stem derived from an entry title
pub fn file_stem(title: &str) -> String {
    let stem = sanitize_filename::sanitize(title.trim());
    if stem.trim().is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

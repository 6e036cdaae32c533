use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{TubeError, TubeResult};
use crate::tools::runner::{ProcessRunner, RunError};

pub struct TransferTool<R: ProcessRunner> {
    runner: R,
    program: String,
    flags: Vec<String>,
    work_dir: PathBuf,
}

impl<R: ProcessRunner> TransferTool<R> {
    pub fn new(config: &Config, runner: R) -> Self {
        Self {
            runner,
            program: config.transfer_tool.clone(),
            flags: config.transfer_flags.clone(),
            work_dir: config.download_dir.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check the executable can be started; a non-zero exit still counts as present
    pub fn probe(&self) -> TubeResult<()> {
        match self
            .runner
            .run(&self.program, &["--help".to_string()], &self.work_dir)
        {
            Ok(()) => Ok(()),
            Err(RunError::NotFound { program }) => Err(TubeError::TransferToolUnavailable(program)),
            Err(e) => {
                warn!(error = %e, "transfer tool probe exited with an error");
                Ok(())
            }
        }
    }

    /// Send a downloaded file; the file is left in place whatever the outcome
    pub fn send(&self, path: &Path) -> TubeResult<()> {
        let mut args = self.flags.clone();
        args.push(path.to_string_lossy().into_owned());

        info!(path = %path.display(), "sending");
        self.runner
            .run(&self.program, &args, &self.work_dir)
            .map_err(|e| match e {
                RunError::NotFound { program } => TubeError::TransferToolUnavailable(program),
                RunError::Failed { .. } => {
                    TubeError::TransferFailed(format!("{}: {}", path.display(), e))
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaProfile;
    use crate::domain::MediaType;
    use crate::tools::runner::MockProcessRunner;

    fn config(flags: Vec<String>) -> Config {
        Config {
            downloader: "yt-dlp".to_string(),
            transfer_tool: "bt-obex".to_string(),
            transfer_flags: flags,
            download_dir: PathBuf::from("/srv/media"),
            audio: MediaProfile {
                flags: vec![],
                extension: "mp3".to_string(),
            },
            video: MediaProfile {
                flags: vec![],
                extension: "mp4".to_string(),
            },
            default_media_type: MediaType::Audio,
        }
    }

    #[test]
    fn test_send_passes_flags_then_path() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|program, args, cwd| {
                program == "bt-obex"
                    && cwd == Path::new("/srv/media")
                    && args
                        == [
                            "-p".to_string(),
                            "00:11:22:33:44:55".to_string(),
                            "/srv/media/talk.mp3".to_string(),
                        ]
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let tool = TransferTool::new(
            &config(vec!["-p".to_string(), "00:11:22:33:44:55".to_string()]),
            runner,
        );
        tool.send(Path::new("/srv/media/talk.mp3")).unwrap();
    }

    #[test]
    fn test_send_failure_maps_to_transfer_failed() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().times(1).returning(|program, _, _| {
            Err(RunError::Failed {
                program: program.to_string(),
                reason: "exit status: 1".to_string(),
            })
        });

        let tool = TransferTool::new(&config(vec![]), runner);
        assert!(matches!(
            tool.send(Path::new("/srv/media/talk.mp3")),
            Err(TubeError::TransferFailed(_))
        ));
    }

    #[test]
    fn test_probe_maps_not_found() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|_, args, _| args == ["--help".to_string()])
            .times(1)
            .returning(|program, _, _| {
                Err(RunError::NotFound {
                    program: program.to_string(),
                })
            });

        let tool = TransferTool::new(&config(vec![]), runner);
        assert!(matches!(
            tool.probe(),
            Err(TubeError::TransferToolUnavailable(_))
        ));
    }
}

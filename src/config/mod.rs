use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::MediaType;
use crate::errors::{TubeError, TubeResult};

const APP_DIR: &str = "tubesync";

const KNOWN_KEYS: &[&str] = &[
    "DOWNLOADER",
    "TRANSFER_TOOL",
    "TRANSFER_FLAGS",
    "DOWNLOAD_DIR",
    "AUDIO_FLAGS",
    "AUDIO_EXTENSION",
    "VIDEO_FLAGS",
    "VIDEO_EXTENSION",
    "DEFAULT_MEDIA_TYPE",
];

/// Downloader flags and the file extension they produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaProfile {
    pub flags: Vec<String>,
    pub extension: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub downloader: String,
    pub transfer_tool: String,
    pub transfer_flags: Vec<String>,
    pub download_dir: PathBuf,
    pub audio: MediaProfile,
    pub video: MediaProfile,
    pub default_media_type: MediaType,
}

impl Config {
    pub const TEMPLATE: &'static str = r#"# tubesync configuration
#
# Downloader executable, called as:
#   DOWNLOADER <AUDIO_FLAGS|VIDEO_FLAGS> --output <title>.%(ext)s <link>
DOWNLOADER=yt-dlp

# Transfer executable, called as: TRANSFER_TOOL <TRANSFER_FLAGS> <file>
TRANSFER_TOOL=bluetooth-sendto
TRANSFER_FLAGS=

# Working directory for downloads
DOWNLOAD_DIR=~/Downloads/tubesync

AUDIO_FLAGS="--extract-audio --audio-format mp3"
AUDIO_EXTENSION=mp3
VIDEO_FLAGS="--format mp4"
VIDEO_EXTENSION=mp4

# audio or video, used by `add` when --media is not given
DEFAULT_MEDIA_TYPE=audio
"#;

    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .or_else(Self::exe_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubesync.conf")
    }

    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .or_else(Self::exe_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("channels.db")
    }

    /// Load the configuration, writing a template first if the file is absent.
    ///
    /// A freshly written template still fails the load so the operator gets a
    /// chance to edit it before anything runs.
    pub fn load_or_init(path: &Path) -> TubeResult<Self> {
        if !path.exists() {
            Self::write_template(path)?;
            return Err(TubeError::MissingConfiguration {
                path: path.to_path_buf(),
                reason: "no configuration found, a template was written; edit it and re-run"
                    .to_string(),
            });
        }

        Self::load(path)
    }

    pub fn load(path: &Path) -> TubeResult<Self> {
        let missing = |reason: String| TubeError::MissingConfiguration {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(missing("file not found".to_string()));
        }

        let iter = dotenvy::from_path_iter(path).map_err(|e| missing(e.to_string()))?;
        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| missing(e.to_string()))?;
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "ignoring unknown configuration key");
                continue;
            }
            values.insert(key, value);
        }

        debug!(path = %path.display(), "configuration loaded");
        Self::from_values(&values).map_err(missing)
    }

    pub fn write_template(path: &Path) -> TubeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, Self::TEMPLATE)?;
        Ok(())
    }

    fn from_values(values: &HashMap<String, String>) -> Result<Self, String> {
        let required = |key: &str| -> Result<String, String> {
            values
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{} is required", key))
        };
        let optional = |key: &str, default: &str| -> String {
            values
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| default.to_string())
        };

        let download_dir = required("DOWNLOAD_DIR")?;
        let download_dir = PathBuf::from(shellexpand::tilde(&download_dir).into_owned());

        let default_media_type = optional("DEFAULT_MEDIA_TYPE", "audio")
            .parse::<MediaType>()
            .map_err(|e| format!("DEFAULT_MEDIA_TYPE: {}", e))?;

        let audio = MediaProfile {
            flags: split_flags(&optional("AUDIO_FLAGS", "--extract-audio --audio-format mp3")),
            extension: optional("AUDIO_EXTENSION", "mp3"),
        };
        let video = MediaProfile {
            flags: split_flags(&optional("VIDEO_FLAGS", "--format mp4")),
            extension: optional("VIDEO_EXTENSION", "mp4"),
        };
        if audio.extension.is_empty() || video.extension.is_empty() {
            return Err("media extensions must not be empty".to_string());
        }

        Ok(Self {
            downloader: required("DOWNLOADER")?,
            transfer_tool: required("TRANSFER_TOOL")?,
            transfer_flags: split_flags(&optional("TRANSFER_FLAGS", "")),
            download_dir,
            audio,
            video,
            default_media_type,
        })
    }

    pub fn profile(&self, media_type: MediaType) -> &MediaProfile {
        match media_type {
            MediaType::Audio => &self.audio,
            MediaType::Video => &self.video,
        }
    }
}

fn split_flags(value: &str) -> Vec<String> {
    value.split_whitespace().map(String::from).collect()
}

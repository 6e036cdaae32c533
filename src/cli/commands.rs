use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::MediaType;

#[derive(Parser)]
#[command(name = "tubesync")]
#[command(about = "Download new videos from subscribed channels and send them to a nearby device")]
#[command(version)]
pub struct Cli {
    /// Configuration file (created from a template when missing)
    #[arg(long, global = true, env = "TUBESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Channel database
    #[arg(long, global = true, env = "TUBESYNC_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a YouTube channel or playlist
    Add {
        /// Channel, handle or playlist URL
        url: String,

        /// audio or video (defaults to DEFAULT_MEDIA_TYPE from the configuration)
        #[arg(short, long)]
        media: Option<MediaType>,
    },

    /// Unsubscribe a channel by author and title (as shown by `list`)
    Remove {
        author: String,
        title: String,
    },

    /// List subscribed channels
    List {
        /// Print the channels as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download new entries of every channel and send them
    Run {
        /// Download every new entry without asking
        #[arg(short, long)]
        yes: bool,

        /// Dry run - only show what would be offered, change nothing
        #[arg(long)]
        dry_run: bool,
    },
}

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tubesync::cli::{Cli, Commands};
use tubesync::config::Config;
use tubesync::domain::MediaType;
use tubesync::errors::TubeResult;
use tubesync::services::{
    sync_service, AddOutcome, AssumeYes, ChannelRegistry, Prompt, RemoveOutcome, SyncOptions,
    SyncReport,
};
use tubesync::sources::YouTubeFetcher;
use tubesync::storage::{SqliteChannelStore, SqliteStorage};
use tubesync::tools::SystemRunner;

type Registry = ChannelRegistry<SqliteChannelStore>;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command fully succeeded
fn run() -> TubeResult<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let db_path = cli.db.unwrap_or_else(Config::default_db_path);

    // Initialize storage
    let storage = SqliteStorage::new(&db_path)?;
    let mut registry = ChannelRegistry::load(SqliteChannelStore::new(storage))?;

    match cli.command {
        Commands::Add { url, media } => cmd_add(&mut registry, &config_path, &url, media),
        Commands::Remove { author, title } => cmd_remove(&mut registry, &author, &title),
        Commands::List { json } => cmd_list(&registry, json),
        Commands::Run { yes, dry_run } => cmd_run(&mut registry, &config_path, yes, dry_run),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn cmd_add(
    registry: &mut Registry,
    config_path: &Path,
    url: &str,
    media: Option<MediaType>,
) -> TubeResult<bool> {
    let media_type = media.unwrap_or_else(|| {
        Config::load(config_path)
            .map(|c| c.default_media_type)
            .unwrap_or(MediaType::Audio)
    });

    println!("Validating channel: {}", url);

    match registry.add(&YouTubeFetcher::new(), url, media_type)? {
        AddOutcome::Added(channel) => {
            println!("Channel added successfully!");
            println!("  Author: {}", channel.author);
            println!("  Title: {}", channel.title);
            println!("  Media: {}", channel.media_type);
        }
        AddOutcome::AlreadyPresent(channel) => {
            println!(
                "Channel already exists: {} / {}",
                channel.author, channel.title
            );
        }
    }

    Ok(true)
}

fn cmd_remove(registry: &mut Registry, author: &str, title: &str) -> TubeResult<bool> {
    match registry.remove(author, title)? {
        RemoveOutcome::Removed(channel) => {
            println!("Removed: {} / {}", channel.author, channel.title);
        }
        RemoveOutcome::NotFound => {
            println!("Channel not found: {} / {}", author, title);
        }
    }

    Ok(true)
}

fn cmd_list(registry: &Registry, json: bool) -> TubeResult<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(registry.list())?);
        return Ok(true);
    }

    if registry.is_empty() {
        println!("No channels configured.");
        return Ok(true);
    }

    println!("Subscribed channels:\n");
    for channel in registry.list() {
        println!("  {} / {} [{}]", channel.author, channel.title, channel.media_type);
        println!("    URL: {}", channel.url);
        match (&channel.last_processed_marker, channel.synced_at) {
            (Some(marker), _) => println!("    Last processed: {}", marker),
            (None, Some(_)) => println!("    Last processed: (feed was empty)"),
            (None, None) => println!("    Last processed: (not synced yet)"),
        }
        if let Some(synced_at) = channel.synced_at {
            println!("    Last synced: {}", synced_at.format("%Y-%m-%d %H:%M UTC"));
        }
        println!();
    }

    Ok(true)
}

fn cmd_run(
    registry: &mut Registry,
    config_path: &Path,
    yes: bool,
    dry_run: bool,
) -> TubeResult<bool> {
    if registry.is_empty() {
        println!("No channels configured.");
    }

    let fetcher = YouTubeFetcher::new();
    let options = SyncOptions { dry_run };

    println!("Syncing channels...\n");

    let report = if yes {
        sync_service::run(
            config_path,
            registry,
            &fetcher,
            SystemRunner,
            SystemRunner,
            AssumeYes,
            options,
        )?
    } else {
        sync_service::run(
            config_path,
            registry,
            &fetcher,
            SystemRunner,
            SystemRunner,
            Prompt::stdin(),
            options,
        )?
    };

    print_report(&report, dry_run);
    Ok(report.is_success())
}

fn print_report(report: &SyncReport, dry_run: bool) {
    for channel in &report.channels {
        println!("{} / {}:", channel.author, channel.title);

        if let Some(error) = &channel.error {
            println!("  FAILED: {}", error);
        } else if channel.baseline {
            println!("  First sync, recorded the newest entry; nothing downloaded");
        }

        for title in &channel.pending {
            println!("  [DRY RUN] {}", title);
        }
        for path in &channel.delivered {
            println!("  Sent: {}", path.display());
        }
        for title in &channel.declined {
            println!("  Skipped: {}", title);
        }
        for (title, error) in &channel.failed {
            println!("  FAILED: {}: {}", title, error);
        }

        println!();
    }

    if dry_run {
        println!(
            "Dry run complete. Would offer {} entries.",
            report.channels.iter().map(|c| c.pending.len()).sum::<usize>()
        );
    } else {
        println!(
            "Sent {} entries, skipped {}, {} failures.",
            report.delivered_count(),
            report.declined_count(),
            report.failed_count()
        );
    }
}

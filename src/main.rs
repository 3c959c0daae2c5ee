//! Seedbox uploader.
//!
//! # Architecture Overview
//!
//! ```text
//!   link (argument or stdin line)
//!        │
//!        ▼
//!  ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌──────────────────────┐
//!  │  torrent  │──▶│  upload   │──▶│ metadata  │──▶│ backend / deluge     │──▶ seedbox
//!  │ resource  │   │  attempt  │   │ (ruTorrent│   │ fetch + submit       │
//!  └───────────┘   └─────┬─────┘   │   only)   │   └──────────────────────┘
//!                        │         └───────────┘
//!                        ▼
//!                  notification ──▶ console
//!
//!  config (snapshot per attempt, hot reload in listen mode)
//!  observability (tracing spans per attempt, Prometheus metrics)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use seedbox_upload::config::{load_config, ConfigError, ConfigStore, ConfigWatcher, SeedboxConfig};
use seedbox_upload::console::{self, ConsoleReporter, PromptChooser};
use seedbox_upload::lifecycle::{shutdown_signal, Shutdown};
use seedbox_upload::metadata::{Chooser, PresetChooser};
use seedbox_upload::observability::{logging, metrics};
use seedbox_upload::torrent::{looks_like_torrent, ServerDescriptor, TorrentResource};
use seedbox_upload::upload::{UploadFailure, UploadReport, Uploader};

#[derive(Parser)]
#[command(name = "seedbox-upload", version)]
#[command(about = "Send torrents and magnet links to a seedbox web interface", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "seedbox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one torrent
    Upload {
        /// `.torrent` URL or magnet link
        link: String,

        #[command(flatten)]
        target: Target,

        /// Upload even if the link does not look like a torrent
        #[arg(long)]
        force: bool,
    },
    /// Read links from stdin, one upload per line
    Listen {
        #[command(flatten)]
        target: Target,
    },
    /// List configured servers
    Servers,
    /// Load and validate the configuration
    CheckConfig,
}

#[derive(Args)]
struct Target {
    /// Server name or index
    #[arg(short, long)]
    server: Option<String>,

    /// Label to apply (ruTorrent)
    #[arg(long)]
    label: Option<String>,

    /// Directory to download into (ruTorrent)
    #[arg(long)]
    dir: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&cli.config, &e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::CheckConfig => {
            println!("{}: ok ({} servers)", cli.config.display(), config.servers.len());
            ExitCode::SUCCESS
        }
        Commands::Servers => {
            list_servers(&config);
            ExitCode::SUCCESS
        }
        Commands::Upload { link, target, force } => {
            logging::init_logging(&config.observability);
            upload(config, &link, target, force).await
        }
        Commands::Listen { target } => {
            logging::init_logging(&config.observability);
            listen(config, cli.config, target).await
        }
    }
}

fn report_config_error(path: &std::path::Path, error: &ConfigError) {
    match error {
        ConfigError::Validation(errors) => {
            eprintln!("{}: {} error(s)", path.display(), errors.len());
            for e in errors {
                eprintln!("  - {}", e);
            }
        }
        other => eprintln!("{}: {}", path.display(), other),
    }
}

fn list_servers(config: &SeedboxConfig) {
    if config.servers.is_empty() {
        println!("No servers configured.");
    }
    for (i, server) in config.servers.iter().enumerate() {
        match &server.name {
            Some(name) => println!("{}: {} [{}]", i, server.display_name(), name),
            None => println!("{}: {}", i, server.display_name()),
        }
    }
}

async fn upload(config: SeedboxConfig, link: &str, target: Target, force: bool) -> ExitCode {
    if !force && !config.upload.capture_all_links && !looks_like_torrent(link) {
        eprintln!("{} does not look like a torrent; pass --force to upload it anyway", link);
        return ExitCode::FAILURE;
    }
    let resource = match TorrentResource::parse(link) {
        Ok(resource) => resource,
        Err(e) => {
            eprintln!("invalid link {}: {}", link, e);
            return ExitCode::FAILURE;
        }
    };

    let server = match choose_server(&config, target.server.as_deref()).await {
        Ok(server) => server,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let chooser: Box<dyn Chooser> = if target.label.is_some() || target.dir.is_some() {
        Box::new(PresetChooser::new(target.label, target.dir))
    } else {
        Box::new(PromptChooser)
    };

    let uploader = Uploader::new(ConfigStore::new(config)).with_reporter(Arc::new(ConsoleReporter));
    let report = uploader.upload(resource, server, chooser.as_ref()).await;
    log_report(&report);

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn choose_server(config: &SeedboxConfig, key: Option<&str>) -> Result<ServerDescriptor, String> {
    if let Some(key) = key {
        return config
            .find_server(key)
            .cloned()
            .ok_or_else(|| format!("no server named or numbered '{}'", key));
    }

    match config.servers.as_slice() {
        [] => Err("no servers configured".to_string()),
        [only] => Ok(only.clone()),
        servers => {
            let servers = servers.to_vec();
            let listed = servers.clone();
            let picked = tokio::task::spawn_blocking(move || {
                let stdin = std::io::stdin();
                console::pick_server(&mut stdin.lock(), &mut std::io::stderr(), &listed)
            })
            .await
            .map_err(|e| format!("server prompt failed: {}", e))?;

            picked
                .and_then(|i| servers.into_iter().nth(i))
                .ok_or_else(|| "no server chosen".to_string())
        }
    }
}

/// In listen mode there is no prompt; without `--server` the first server is used.
fn listen_server(config: &SeedboxConfig, key: Option<&str>) -> Option<ServerDescriptor> {
    match key {
        Some(key) => config.find_server(key).cloned(),
        None => config.servers.first().cloned(),
    }
}

async fn listen(config: SeedboxConfig, path: PathBuf, target: Target) -> ExitCode {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = ConfigStore::new(config);
    let uploader = Uploader::new(store.clone()).with_reporter(Arc::new(ConsoleReporter));
    let chooser = Arc::new(PresetChooser::new(target.label, target.dir));
    let shutdown = Shutdown::new();

    // Hot reload
    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config hot reload unavailable");
            None
        }
    };
    let reload_store = store.clone();
    let reload_shutdown = shutdown.clone();
    let reload = tokio::spawn(async move {
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(config) => reload_store.replace(config),
                    None => break,
                },
                _ = reload_shutdown.triggered() => break,
            }
        }
    });

    tracing::info!("Reading links from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut attempts: JoinSet<UploadReport> = JoinSet::new();
    let signal = shutdown_signal();
    tokio::pin!(signal);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = &mut signal => break,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        let link = line.trim();
        if link.is_empty() {
            continue;
        }

        let snapshot = store.snapshot();
        let resource = match TorrentResource::from_link(link, snapshot.upload.capture_all_links) {
            Some(resource) => resource,
            None => {
                tracing::warn!(link, "Ignoring link that is not a torrent");
                continue;
            }
        };
        let server = match listen_server(&snapshot, target.server.as_deref()) {
            Some(server) => server,
            None => {
                tracing::error!(server = ?target.server, "No matching server configured");
                continue;
            }
        };

        let uploader = uploader.clone();
        let chooser = chooser.clone();
        attempts.spawn(async move { uploader.upload(resource, server, chooser.as_ref()).await });

        while let Some(done) = attempts.try_join_next() {
            log_joined(done);
        }
    }

    shutdown.trigger();
    tracing::info!(in_flight = attempts.len(), "Waiting for uploads in flight");
    let drain = async {
        while let Some(done) = attempts.join_next().await {
            log_joined(done);
        }
    };
    tokio::select! {
        _ = drain => {}
        _ = shutdown_signal() => tracing::warn!("Second signal, exiting without waiting"),
    }

    if let Err(e) = reload.await {
        tracing::debug!(error = %e, "Reload task ended abnormally");
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

fn log_joined(done: Result<UploadReport, tokio::task::JoinError>) {
    match done {
        Ok(report) => log_report(&report),
        Err(e) => tracing::error!(error = %e, "Upload task panicked"),
    }
}

fn log_report(report: &UploadReport) {
    match &report.result {
        Ok(()) => tracing::info!(attempt_id = %report.attempt_id, client = %report.client, "Uploaded"),
        Err(e) if matches!(e.failure, UploadFailure::Cancelled) => {
            tracing::info!(attempt_id = %report.attempt_id, "Cancelled")
        }
        Err(e) => tracing::error!(
            attempt_id = %report.attempt_id,
            client = %report.client,
            phase = %e.phase,
            error = %e,
            "Upload failed"
        ),
    }
}

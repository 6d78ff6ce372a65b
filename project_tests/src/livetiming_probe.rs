//! # Live Timing Feed Probe
//!
//! Connects to the production live timing endpoint and logs every snapshot
//! the client publishes until Ctrl-C. Useful for eyeballing the stream
//! during a session without wiring up a front end.
//!
//! Run during a live session; outside of one the negotiate succeeds but the
//! stream stays quiet apart from heartbeats.

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio::sync::broadcast;

use lib_livetiming::livetiming::{Client, ClientOptions};

#[derive(Parser, Debug, Clone)]
struct Config {
    #[clap(long, env = "LIVETIMING_HTTP_URL", default_value = "https://livetiming.formula1.com")]
    http_base_url: String,

    #[clap(long, env = "LIVETIMING_WS_URL", default_value = "wss://livetiming.formula1.com")]
    ws_base_url: String,

    #[clap(long, env = "LIVETIMING_LOG_DIR", default_value = "./logs")]
    log_dir: PathBuf,

    #[clap(long, env = "LIVETIMING_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    setup_logging(&config.log_dir, &config.log_level)?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let (client, mut snapshots) = Client::new(ClientOptions {
        http_base_url: config.http_base_url,
        ws_base_url: config.ws_base_url,
    });
    let listen_handle = tokio::spawn(client.listen(shutdown_tx.subscribe()));

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                log::info!("Ctrl-C received, initiating shutdown.");
                let _ = shutdown_tx.send(());
            }
            Some(meeting) = snapshots.meetings.recv() => {
                log::info!(
                    "meeting: {} | {} ({:?}, {:?}) lap {}/{} part {}",
                    meeting.name,
                    meeting.session.name,
                    meeting.session.session_type,
                    meeting.session.status,
                    meeting.session.current_lap,
                    meeting.session.total_laps,
                    meeting.session.part,
                );
            }
            Some(drivers) = snapshots.drivers.recv() => {
                let mut board: Vec<_> = drivers.values().collect();
                board.sort_by_key(|d| if d.position == 0 { u32::MAX } else { d.position });
                let top = board
                    .iter()
                    .take(3)
                    .map(|d| format!("P{} {} {}", d.position, d.short_name, d.leader_gap))
                    .collect::<Vec<_>>()
                    .join(" | ");
                log::info!("board ({} drivers): {}", drivers.len(), top);
            }
            Some(msg) = snapshots.race_ctrl_msgs.recv() => {
                log::info!("race control [{:?}]: {}", msg.category, msg.body);
            }
            done = snapshots.done.recv() => {
                match done {
                    Some(err) => log::error!("client exited with error: {err}"),
                    None => log::info!("client exited cleanly"),
                }
                break;
            }
        }
    }

    let _ = listen_handle.await;
    Ok(())
}

fn setup_logging(log_dir: &Path, log_level: &str) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    // Clean up old log files, keeping only the most recent one
    cleanup_old_logs(log_dir)?;

    let log_file_name = format!(
        "livetiming_probe_{}.log",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );

    let level = match log_level.to_lowercase().as_str() {
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_dir.join(log_file_name))?)
        .apply()?;

    Ok(())
}

fn cleanup_old_logs(log_dir: &Path) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "log"))
        .collect();

    // Sort by modification time, newest first
    entries.sort_by_key(|e| {
        std::cmp::Reverse(e.metadata().and_then(|m| m.modified()).ok())
    });

    // Keep the most recent one (index 0), delete the rest
    for entry in entries.iter().skip(1) {
        if let Err(e) = fs::remove_file(entry.path()) {
            eprintln!("Failed to delete old log file {:?}: {}", entry.path(), e);
        }
    }

    Ok(())
}

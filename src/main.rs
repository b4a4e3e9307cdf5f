//! zdtrans-daemon: background hotkey service for the zdtrans translator
//!
//! Listens for the configured global hotkeys, captures the selected text
//! in the foreground application when one fires, and hands it on for the
//! bound action. With `--record` it instead records a new combination and
//! prints it in canonical form.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zdtrans_daemon::capture::{text_preview, CaptureWorker};
use zdtrans_daemon::hotkey::{report_degraded, HotkeyEngine, HotkeyListener};
use zdtrans_daemon::lifecycle::ShutdownSignal;
use zdtrans_daemon::{Config, EngineEvent};

#[derive(Debug, Parser)]
#[command(name = "zdtrans-daemon", version, about)]
struct Cli {
    /// Path to config.json (defaults to ./config.json, then ~/.zdtrans/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Record a new hotkey combination, print it and exit
    #[arg(long)]
    record: bool,
}

/// Whether the main loop keeps going after an event
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `--record` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "zdtrans-daemon starting"
    );

    let config = Config::load(cli.config.as_deref())?;

    let shutdown = ShutdownSignal::new();

    // Owns the clipboard for the daemon's lifetime
    let capture = CaptureWorker::system(&config.capture)?;

    // Listener thread -> consumer
    let (event_tx, mut event_rx) = mpsc::channel::<EngineEvent>(config.event_buffer);

    let engine = HotkeyEngine::new(config.bindings(), event_tx);
    let listener = HotkeyListener::new(engine.clone());

    match listener.start() {
        Ok(()) => info!("hotkey listener started"),
        Err(e) => report_degraded(&e),
    }

    if cli.record {
        engine.start_recording();
        info!("press the new key combination");
    }

    info!("daemon initialized, entering main loop");

    let shutdown_wait = shutdown.wait();
    tokio::pin!(shutdown_wait);

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    info!("event channel closed");
                    break;
                };
                // Awaited inline: a capture in flight always finishes its restore
                if handle_event(event, &capture, cli.record).await == Flow::Exit {
                    break;
                }
            }

            result = &mut shutdown_wait => {
                if let Err(e) = result {
                    error!(?e, "failed to register shutdown signal handlers");
                }
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("zdtrans-daemon stopped");

    Ok(())
}

async fn handle_event(event: EngineEvent, capture: &CaptureWorker, record_mode: bool) -> Flow {
    match event {
        EngineEvent::ActionTriggered { action } => {
            let text = capture.capture().await;
            if text.is_empty() {
                info!(%action, "action triggered with no selected text");
            } else {
                info!(
                    %action,
                    text_len = text.len(),
                    text_preview = %text_preview(&text),
                    "selected text ready for action"
                );
            }
            Flow::Continue
        }
        EngineEvent::ComboPreview { combo } => {
            info!(%combo, "recording");
            Flow::Continue
        }
        EngineEvent::ComboRejected => {
            warn!("combination needs a modifier (Ctrl/Alt/Shift/Cmd), try again");
            Flow::Continue
        }
        EngineEvent::ComboRecorded { combo } => {
            info!(%combo, "combination recorded");
            if record_mode {
                println!("{combo}");
                Flow::Exit
            } else {
                Flow::Continue
            }
        }
    }
}

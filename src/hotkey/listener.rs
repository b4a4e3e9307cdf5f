//! Global keyboard listener backed by `rdev`
//!
//! `rdev::listen` installs the OS hook and blocks for the life of the
//! process, so it runs on a dedicated thread and feeds every key event
//! into the [`HotkeyEngine`]. rdev offers no way to remove the hook;
//! stopping the listener flips a flag and the callback then discards events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rdev::{Event, EventType};
use tracing::{error, info, warn};

use super::engine::{HotkeyEngine, RawKeyEvent};

/// How long `start` waits for the hook thread to report an install failure
const STARTUP_GRACE: Duration = Duration::from_millis(200);

/// Global key listener feeding a [`HotkeyEngine`]
pub struct HotkeyListener {
    engine: HotkeyEngine,
    /// Events are delivered only while set
    running: Arc<AtomicBool>,
    /// The hook thread is alive inside `rdev::listen`
    hooked: Arc<AtomicBool>,
}

impl HotkeyListener {
    /// Create a new, stopped listener
    pub fn new(engine: HotkeyEngine) -> Self {
        Self {
            engine,
            running: Arc::new(AtomicBool::new(false)),
            hooked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start delivering global key events to the engine
    ///
    /// The first call spawns the hook thread. If the OS refuses the hook
    /// (missing Accessibility/Input Monitoring permission, no X display)
    /// within a short grace period the error is returned here; the caller
    /// may keep running without hotkeys. Calling `start` after `stop`
    /// resumes the existing hook.
    pub fn start(&self) -> Result<(), HotkeyError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyRunning);
        }

        if self.hooked.load(Ordering::SeqCst) {
            info!("hotkey listener resumed");
            return Ok(());
        }

        let engine = self.engine.clone();
        let running = Arc::clone(&self.running);
        let hooked = Arc::clone(&self.hooked);
        let (startup_tx, startup_rx) = std_mpsc::channel::<String>();

        hooked.store(true, Ordering::SeqCst);
        let spawned = thread::Builder::new()
            .name("hotkey-listener".to_owned())
            .spawn(move || {
                info!("hotkey listener thread started");

                let callback_running = Arc::clone(&running);
                let result = rdev::listen(move |event: Event| {
                    if callback_running.load(Ordering::SeqCst) {
                        forward(&engine, event);
                    }
                });

                hooked.store(false, Ordering::SeqCst);
                running.store(false, Ordering::SeqCst);

                if let Err(e) = result {
                    error!(error = ?e, "failed to install global key hook");
                    let _ = startup_tx.send(format!("{e:?}"));
                }
                info!("hotkey listener thread stopped");
            });

        if let Err(e) = spawned {
            self.hooked.store(false, Ordering::SeqCst);
            self.running.store(false, Ordering::SeqCst);
            return Err(HotkeyError::ThreadSpawn(e.to_string()));
        }

        startup_outcome(startup_rx.recv_timeout(STARTUP_GRACE))
    }

    /// Stop delivering events
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("hotkey listener stopped");
        }
    }

    /// Check if the listener is currently delivering events
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The engine this listener feeds
    pub fn engine(&self) -> &HotkeyEngine {
        &self.engine
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Errors that can occur in the hotkey listener
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey listener is already running")]
    AlreadyRunning,

    #[error("failed to install global key hook ({0}) - check Accessibility/Input Monitoring permissions")]
    HookInstall(String),

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Interpret what the hook thread reported during the grace period
///
/// Silence means the thread is parked inside `rdev::listen`. A disconnect
/// means it already exited (or panicked) without naming an error.
fn startup_outcome(report: Result<String, RecvTimeoutError>) -> Result<(), HotkeyError> {
    match report {
        Ok(reason) => Err(HotkeyError::HookInstall(reason)),
        Err(RecvTimeoutError::Timeout) => {
            info!("global key hook installed");
            Ok(())
        }
        Err(RecvTimeoutError::Disconnected) => Err(HotkeyError::HookInstall(
            "listener thread exited during startup".to_owned(),
        )),
    }
}

/// Translate an rdev event into an engine event. Mouse and wheel events are ignored.
fn forward(engine: &HotkeyEngine, event: Event) {
    match event.event_type {
        EventType::KeyPress(key) => engine.handle(RawKeyEvent::Press(key)),
        EventType::KeyRelease(key) => engine.handle(RawKeyEvent::Release(key)),
        _ => {}
    }
}

/// Warn when a startup error leaves the engine without input
pub fn report_degraded(error: &HotkeyError) {
    error!(%error, "hotkey listener unavailable");
    warn!("continuing without global hotkeys");
}
